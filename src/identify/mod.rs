//! Protocol identification of captured frames
//!
//! [`identify`] walks the headers of one Ethernet frame down to the transport layer, looking
//! through VLAN tags, IPv6 fragment headers and IPsec ESP encapsulation, and sorts the frame
//! into one of three classes: TCP, RTP (UDP payload matching the RTP heuristic), or anything
//! else.
//!
//! ## Example
//!
//! ```rust
//! use voip_parser::identify::{identify, Classification, Frame};
//!
//! fn route(data: &[u8]) -> usize {
//!     let frame = Frame::new(data);
//!     match identify(&frame) {
//!         Classification::Rtp => { /* media path */ }
//!         Classification::Tcp | Classification::NonTcp => { /* signaling pre-filter */ }
//!     }
//!     identify(&frame).as_index()
//! }
//! ```
//!
//! Classification never fails: frames that cannot be walked (truncated, unknown network
//! layer, unknown transport) are reported as [`Classification::NonTcp`].

mod frame;
pub mod headers;
mod rtp;

pub use frame::Frame;
pub use rtp::is_rtp;

use std::fmt;

use tracing::trace;

use crate::identify::headers::*;
use crate::protocol::*;

/// Result of the protocol identification
///
/// The discriminant values are stable and can be used as an index into a routing table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Classification {
    /// Not TCP, and not recognized as RTP (UDP, ICMP, malformed, ...)
    NonTcp = 0,
    Tcp = 1,
    Rtp = 2,
}

impl Classification {
    /// Number of classes (size of a routing table indexed by [`Classification::as_index`])
    pub const COUNT: usize = 3;

    #[inline]
    pub const fn as_index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Classification::NonTcp => f.write_str("NON_TCP"),
            Classification::Tcp => f.write_str("TCP"),
            Classification::Rtp => f.write_str("RTP"),
        }
    }
}

/// Transport layer location, once network and encapsulation headers are resolved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransportLayer {
    /// Resolved transport protocol (after fragment and ESP headers)
    pub protocol: IpProtocol,
    /// Offset of the transport header from the start of the frame
    pub header_offset: usize,
    /// End of usable data (frame length, minus the ESP trailer if encapsulated)
    pub payload_end: usize,
    /// The transport layer was found inside an ESP payload
    pub esp: bool,
    /// The transport protocol was read from an IPv6 fragment header
    pub fragmented: bool,
}

/// Walk link, network and encapsulation headers down to the transport protocol
///
/// Returns `None` if the network layer is neither IPv4 nor IPv6, or if a header is truncated.
pub fn resolve_transport(frame: &Frame) -> Option<TransportLayer> {
    let data = frame.data();
    let mut offset = frame.l3_offset();
    let mut fragmented = false;
    let l3 = frame.l3_data()?;
    let mut protocol = match frame.ethertype()? {
        EtherType::IPV4 => {
            let (_, ip) = parse_ipv4_header(l3).ok()?;
            offset += ip.header_len;
            ip.protocol
        }
        EtherType::IPV6 => {
            let (_, ip) = parse_ipv6_header(l3).ok()?;
            offset += IPV6_HEADER_LEN;
            if ip.next_header == IpProtocol::IPV6_FRAGMENT {
                let (_, fragment) = parse_ipv6_fragment_header(data.get(offset..)?).ok()?;
                trace!(
                    "ipv6 fragment id {:#x} offset {} next header {}",
                    fragment.identification,
                    fragment.fragment_offset,
                    fragment.next_header
                );
                offset += IPV6_FRAGMENT_HEADER_LEN;
                fragmented = true;
                fragment.next_header
            } else {
                ip.next_header
            }
        }
        _ => return None,
    };
    let mut payload_end = data.len();
    let mut esp = false;
    if protocol == IpProtocol::ESP {
        let (_, header) = parse_esp_header(data.get(offset..)?).ok()?;
        offset += ESP_HEADER_LEN;
        let trailer = esp_trailer(data)?;
        trace!(
            "esp spi {:#x} seq {} inner protocol {}",
            header.spi,
            header.sequence,
            trailer.next_header
        );
        protocol = trailer.next_header;
        payload_end = data.len() - ESP_TRAILER_LEN;
        esp = true;
    }
    Some(TransportLayer {
        protocol,
        header_offset: offset,
        payload_end,
        esp,
        fragmented,
    })
}

/// Get the application payload of a resolved UDP or TCP transport layer
///
/// Returns `None` for other protocols, or if the transport header is truncated.
pub fn transport_payload<'a>(frame: &Frame<'a>, transport: &TransportLayer) -> Option<&'a [u8]> {
    let data = frame.data().get(..transport.payload_end)?;
    let l4 = data.get(transport.header_offset..)?;
    match transport.protocol {
        IpProtocol::UDP => l4.get(UDP_HEADER_LEN..),
        IpProtocol::TCP => parse_tcp_header(l4).ok().map(|(payload, _)| payload),
        _ => None,
    }
}

/// Classify one frame as TCP, RTP or neither
///
/// For UDP, the payload (without any ESP trailer) is checked with [`is_rtp`]. A UDP header
/// extending past the usable data is treated as malformed and classified `NonTcp`.
pub fn identify(frame: &Frame) -> Classification {
    let transport = match resolve_transport(frame) {
        Some(transport) => transport,
        None => {
            trace!("no transport layer in {} bytes frame", frame.len());
            return Classification::NonTcp;
        }
    };
    let class = match transport.protocol {
        IpProtocol::UDP => {
            let start = transport.header_offset + UDP_HEADER_LEN;
            match frame.data().get(start..transport.payload_end) {
                Some(payload) if is_rtp(payload) => Classification::Rtp,
                _ => Classification::NonTcp,
            }
        }
        IpProtocol::TCP => Classification::Tcp,
        _ => Classification::NonTcp,
    };
    trace!(
        "frame len {} protocol {} esp {} fragmented {}: {}",
        frame.len(),
        transport.protocol,
        transport.esp,
        transport.fragmented,
        class
    );
    class
}
