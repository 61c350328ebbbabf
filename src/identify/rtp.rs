use crate::protocol::RTP_MIN_HEADER_LEN;

/// Check whether a UDP payload looks like an RTP packet
///
/// This is a cheap heuristic, not a decoder:
///   - the payload must hold at least a minimal RTP header (12 bytes)
///   - the first byte must be `0x80` or `0xa0` (version 2, no extension, no CSRC, with or
///     without padding)
///   - the payload type must be in 0-34 or 96-127, and outside the 72-76 band (RTCP
///     packet types 200-204 with the marker bit set)
///
/// RTP streams using other header layouts are missed, and some non-RTP payloads match.
pub fn is_rtp(payload: &[u8]) -> bool {
    if payload.len() < RTP_MIN_HEADER_LEN {
        return false;
    }
    if payload[0] != 0x80 && payload[0] != 0xa0 {
        return false;
    }
    let payload_type = payload[1] & 0x7f;
    if (72..=76).contains(&payload_type) {
        return false;
    }
    payload_type <= 34 || payload_type >= 96
}
