//! SDP field parsers (RFC 4566)
//!
//! Both parsers take the value of a single line (without the `x=` prefix) and split it on
//! spaces, left to right, with no backtracking.

use crate::utils::Span;

/// Connection data (`c=<nettype> <addrtype> <connection-address>`)
///
/// ```text
/// c=IN IP4 88.215.55.98
/// c=IN IP6 FF15::101/3
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SdpConnectionData<'a> {
    pub addr_type: &'a [u8],
    pub conn_addr: &'a [u8],
    /// Complete line value, if source retention is enabled
    pub src: &'a [u8],
}

/// Media description (`m=<media> <port> <proto> <fmt> ...`)
///
/// ```text
/// m=audio 24414 RTP/AVP 8 18 101
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SdpMediaDescription<'a> {
    pub media_type: &'a [u8],
    pub port: &'a [u8],
    pub proto: &'a [u8],
    /// Format list, as a single space-separated field
    pub fmt: &'a [u8],
    /// Complete line value, if source retention is enabled
    pub src: &'a [u8],
}

/// How much of a media description line is decoded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MediaParseMode {
    /// Stop after the port: `proto` and `fmt` stay empty
    #[default]
    PortOnly,
    /// Decode all fields, including protocol and format list
    Full,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ConnState {
    NetType,
    AddrType,
    ConnAddr,
}

/// Parse the value of a `c=` line
///
/// The network type is skipped. Parsing stops at the first space following the connection
/// address, so anything after it is ignored.
pub fn parse_connection_data(v: &[u8], keep_source: bool) -> SdpConnectionData {
    let mut addr_type = Span::default();
    let mut conn_addr = Span::default();
    let mut state = ConnState::NetType;

    for (pos, &c) in v.iter().enumerate() {
        match state {
            ConnState::NetType => {
                if c == b' ' {
                    state = ConnState::AddrType;
                }
            }
            ConnState::AddrType => {
                if c == b' ' {
                    state = ConnState::ConnAddr;
                } else {
                    addr_type.push(pos);
                }
            }
            ConnState::ConnAddr => {
                if c == b' ' {
                    break;
                }
                conn_addr.push(pos);
            }
        }
    }

    SdpConnectionData {
        addr_type: addr_type.slice(v),
        conn_addr: conn_addr.slice(v),
        src: if keep_source { v } else { &[] },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MediaState {
    Media,
    Port,
    Proto,
    Fmt,
}

/// Parse the value of a `m=` line
///
/// With [`MediaParseMode::PortOnly`], parsing stops on the space following the port.
pub fn parse_media_description(
    v: &[u8],
    mode: MediaParseMode,
    keep_source: bool,
) -> SdpMediaDescription {
    let mut media_type = Span::default();
    let mut port = Span::default();
    let mut proto = Span::default();
    let mut fmt = Span::default();
    let mut state = MediaState::Media;

    for (pos, &c) in v.iter().enumerate() {
        match state {
            MediaState::Media => {
                if c == b' ' {
                    state = MediaState::Port;
                } else {
                    media_type.push(pos);
                }
            }
            MediaState::Port => {
                if c == b' ' {
                    if mode == MediaParseMode::PortOnly {
                        break;
                    }
                    state = MediaState::Proto;
                } else {
                    port.push(pos);
                }
            }
            MediaState::Proto => {
                if c == b' ' {
                    state = MediaState::Fmt;
                } else {
                    proto.push(pos);
                }
            }
            MediaState::Fmt => fmt.push(pos),
        }
    }

    SdpMediaDescription {
        media_type: media_type.slice(v),
        port: port.slice(v),
        proto: proto.slice(v),
        fmt: fmt.slice(v),
        src: if keep_source { v } else { &[] },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_data() {
        let c = parse_connection_data(b"IN IP4 10.238.238.46", true);
        assert_eq!(c.addr_type, b"IP4");
        assert_eq!(c.conn_addr, b"10.238.238.46");
        assert_eq!(c.src, b"IN IP4 10.238.238.46");

        let c = parse_connection_data(b"IN IP6 FF15::101/3", false);
        assert_eq!(c.addr_type, b"IP6");
        assert_eq!(c.conn_addr, b"FF15::101/3");
        assert_eq!(c.src, b"");

        assert_eq!(parse_connection_data(b"", true), SdpConnectionData::default());
    }

    #[test]
    fn connection_data_trailing_content() {
        let c = parse_connection_data(b"IN IP4 224.2.1.1 extra tokens", true);
        assert_eq!(c.conn_addr, b"224.2.1.1");
        // incomplete lines stop where they stop
        let c = parse_connection_data(b"IN IP4", true);
        assert_eq!(c.addr_type, b"IP4");
        assert_eq!(c.conn_addr, b"");
    }

    #[test]
    fn media_description_port_only() {
        let m = parse_media_description(b"audio 48008 RTP/AVP 8 18 101", MediaParseMode::PortOnly, true);
        assert_eq!(m.media_type, b"audio");
        assert_eq!(m.port, b"48008");
        assert_eq!(m.proto, b"");
        assert_eq!(m.fmt, b"");
        assert_eq!(m.src, b"audio 48008 RTP/AVP 8 18 101");

        let m = parse_media_description(b"", MediaParseMode::PortOnly, true);
        assert_eq!(m, SdpMediaDescription::default());
    }

    #[test]
    fn media_description_full() {
        let m = parse_media_description(b"audio 48008 RTP/AVP 8 18 101", MediaParseMode::Full, false);
        assert_eq!(m.media_type, b"audio");
        assert_eq!(m.port, b"48008");
        assert_eq!(m.proto, b"RTP/AVP");
        assert_eq!(m.fmt, b"8 18 101");
        assert_eq!(m.src, b"");

        let m = parse_media_description(b"video 49170/2 RTP/AVP", MediaParseMode::Full, true);
        assert_eq!(m.port, b"49170/2");
        assert_eq!(m.proto, b"RTP/AVP");
        assert_eq!(m.fmt, b"");
    }
}
