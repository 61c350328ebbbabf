//! SIP/SDP header parser
//!
//! The parser extracts the handful of fields needed to correlate signaling with media: the
//! request or status line, `From`, `To`, `Call-ID`, the cell identifier carried in
//! `P-Access-Network-Info`, and the SDP connection and media lines.
//!
//! Parsing is zero-copy: all fields of a [`SipMessage`] borrow from the input buffer, and
//! are empty slices when absent. Parsing never fails. Input that does not start with a
//! request or status line gives an (almost) empty message.
//!
//! ## Example
//!
//! ```rust
//! use voip_parser::sip::parse_sip;
//!
//! let data = b"BYE sip:bob@biloxi.example.com SIP/2.0\r\n\
//!              From: Alice <sip:alice@atlanta.example.com>;tag=9fxced76sl\r\n\
//!              Call-ID: 3848276298220188511@atlanta.example.com\r\n\r\n";
//! let msg = parse_sip(data);
//! assert_eq!(msg.request.method, b"BYE");
//! assert_eq!(msg.from.user, b"alice");
//! assert_eq!(msg.call_id.value, b"3848276298220188511@atlanta.example.com");
//! ```

mod request;
mod sdp;
mod uri;

pub use request::*;
pub use sdp::*;
pub use uri::*;

use std::fmt;

use tracing::trace;

use crate::utils::{starts_with_at, trim, CrlfLines};

/// Prefix of the cell identifier in a `P-Access-Network-Info` value
const CELL_ID_PREFIX: &[u8] = b"utran-cell-id-3gpp";
/// Offset of the identifier in a cell-id segment (prefix and `=`)
const CELL_ID_OFFSET: usize = 19;
/// Shortest cell identifier accepted
const CELL_ID_MIN_LEN: usize = 10;

/// Single header value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SipValue<'a> {
    pub value: &'a [u8],
    /// Complete header value, if source retention is enabled
    pub src: &'a [u8],
}

/// SDP fields of a message body
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SdpMessage<'a> {
    pub media_desc: SdpMediaDescription<'a>,
    pub conn_data: SdpConnectionData<'a>,
}

/// Fields extracted from a SIP message
///
/// When a header or SDP line appears several times, the last occurrence wins, except for the
/// cell identifier where the first valid one is kept.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SipMessage<'a> {
    pub request: SipRequest<'a>,
    pub from: SipNameAddr<'a>,
    pub to: SipNameAddr<'a>,
    pub call_id: SipValue<'a>,
    pub cell_id: SipValue<'a>,
    pub sdp: SdpMessage<'a>,
}

impl<'a> SipMessage<'a> {
    /// Test if the first line was recognized as a request or status line
    #[inline]
    pub fn is_sip(&self) -> bool {
        self.request.is_request() || self.request.is_response()
    }
}

/// Runtime options of the SIP parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// Keep the complete source slice of each parsed part (`src` fields)
    pub keep_source: bool,
    /// Do not extract SDP fields
    pub skip_sdp: bool,
    /// Decoding depth of `m=` lines
    pub media_mode: MediaParseMode,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            keep_source: true,
            skip_sdp: false,
            media_mode: MediaParseMode::PortOnly,
        }
    }
}

/// SIP parser, holding its configuration
#[derive(Clone, Copy, Debug, Default)]
pub struct SipParser {
    config: ParserConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Separator {
    Colon,
    Equal,
}

/// Headers extracted by the parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Header {
    From,
    To,
    CallId,
    AccessNetworkInfo,
}

impl Header {
    /// Match a header name, long or compact form, ignoring case
    fn from_name(name: &[u8]) -> Option<Header> {
        let is = |s: &[u8]| name.eq_ignore_ascii_case(s);
        if is(b"f") || is(b"from") {
            Some(Header::From)
        } else if is(b"t") || is(b"to") {
            Some(Header::To)
        } else if is(b"i") || is(b"call-id") {
            Some(Header::CallId)
        } else if is(b"p-access-network-info") {
            Some(Header::AccessNetworkInfo)
        } else {
            None
        }
    }
}

/// Find the first `:` or `=` of a line
fn index_sep(line: &[u8]) -> Option<(usize, Separator)> {
    line.iter().enumerate().find_map(|(pos, &c)| match c {
        b':' => Some((pos, Separator::Colon)),
        b'=' => Some((pos, Separator::Equal)),
        _ => None,
    })
}

/// Extract the cell identifier from a `P-Access-Network-Info` value
fn find_cell_id(value: &[u8]) -> Option<&[u8]> {
    value
        .split(|&c| c == b';')
        .map(trim)
        .filter(|seg| starts_with_at(seg, 0, CELL_ID_PREFIX))
        .filter_map(|seg| seg.get(CELL_ID_OFFSET..))
        .find(|id| id.len() >= CELL_ID_MIN_LEN)
}

impl SipParser {
    pub const fn new(config: ParserConfig) -> Self {
        SipParser { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a SIP message
    pub fn parse<'a>(&self, v: &'a [u8]) -> SipMessage<'a> {
        let keep_source = self.config.keep_source;
        let mut msg = SipMessage::default();
        let mut lines = CrlfLines::new(v);

        if let Some(first) = lines.next() {
            msg.request = parse_request_line(trim(first), keep_source);
        }
        if !msg.is_sip() {
            trace!("no request or status line, skipping {} bytes", v.len());
            return msg;
        }

        for line in lines {
            let line = trim(line);
            match index_sep(line) {
                Some((pos, Separator::Colon)) if pos > 0 => {
                    self.parse_header(trim(&line[..pos]), trim(&line[pos + 1..]), &mut msg)
                }
                Some((1, Separator::Equal)) if !self.config.skip_sdp => {
                    self.parse_sdp_line(line[0], trim(&line[2..]), &mut msg)
                }
                _ => (),
            }
        }
        msg
    }

    fn parse_header<'a>(&self, name: &[u8], value: &'a [u8], msg: &mut SipMessage<'a>) {
        let keep_source = self.config.keep_source;
        match Header::from_name(name) {
            Some(Header::From) => msg.from = parse_name_addr(value, keep_source),
            Some(Header::To) => msg.to = parse_name_addr(value, keep_source),
            Some(Header::CallId) => {
                msg.call_id = SipValue {
                    value,
                    src: if keep_source { value } else { &[] },
                }
            }
            Some(Header::AccessNetworkInfo) if msg.cell_id.value.is_empty() => {
                if keep_source {
                    msg.cell_id.src = value;
                }
                if let Some(id) = find_cell_id(value) {
                    trace!("cell id {:?}", String::from_utf8_lossy(id));
                    msg.cell_id.value = id;
                }
            }
            _ => (),
        }
    }

    fn parse_sdp_line<'a>(&self, kind: u8, value: &'a [u8], msg: &mut SipMessage<'a>) {
        let keep_source = self.config.keep_source;
        match kind.to_ascii_lowercase() {
            b'm' => {
                msg.sdp.media_desc =
                    parse_media_description(value, self.config.media_mode, keep_source)
            }
            b'c' => msg.sdp.conn_data = parse_connection_data(value, keep_source),
            _ => (),
        }
    }
}

/// Parse a SIP message using the default [`ParserConfig`]
pub fn parse_sip(v: &[u8]) -> SipMessage {
    SipParser::default().parse(v)
}

struct Text<'a>(&'a [u8]);

impl<'a> fmt::Display for Text<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.0))
    }
}

struct Scheme(Option<UriType>);

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            Some(t) => f.write_str(t.as_str()),
            None => Ok(()),
        }
    }
}

fn write_name_addr(f: &mut fmt::Formatter, title: &str, n: &SipNameAddr) -> fmt::Result {
    writeln!(f, "  [{}]", title)?;
    writeln!(f, "    [UriType] => {}", Scheme(n.uri_type))?;
    writeln!(f, "    [Name] => {}", Text(n.name))?;
    writeln!(f, "    [User] => {}", Text(n.user))?;
    writeln!(f, "    [Host] => {}", Text(n.host))?;
    writeln!(f, "    [Port] => {}", Text(n.port))?;
    writeln!(f, "    [Tag] => {}", Text(n.tag))?;
    writeln!(f, "    [UserType] => {}", Text(n.user_type))?;
    writeln!(f, "    [Src] => {}", Text(n.src))
}

/// Multi-line dump of all fields, for logs
impl<'a> fmt::Display for SipMessage<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let req = &self.request;
        writeln!(f, "-SIP --------------------------------")?;
        writeln!(f, "  [REQ]")?;
        writeln!(f, "    [UriType] => {}", Scheme(req.uri_type))?;
        writeln!(f, "    [Method] => {}", Text(req.method))?;
        writeln!(f, "    [StatusCode] => {}", Text(req.status_code))?;
        writeln!(f, "    [StatusDesc] => {}", Text(req.status_desc))?;
        writeln!(f, "    [User] => {}", Text(req.user))?;
        writeln!(f, "    [Host] => {}", Text(req.host))?;
        writeln!(f, "    [Port] => {}", Text(req.port))?;
        writeln!(f, "    [UserType] => {}", Text(req.user_type))?;
        writeln!(f, "    [Src] => {}", Text(req.src))?;
        write_name_addr(f, "FROM", &self.from)?;
        write_name_addr(f, "TO", &self.to)?;
        writeln!(f, "  [Call-ID]")?;
        writeln!(f, "    [Value] => {}", Text(self.call_id.value))?;
        writeln!(f, "    [Src] => {}", Text(self.call_id.src))?;
        writeln!(f, "  [Cell-ID]")?;
        writeln!(f, "    [Value] => {}", Text(self.cell_id.value))?;
        writeln!(f, "    [Src] => {}", Text(self.cell_id.src))?;
        let m = &self.sdp.media_desc;
        writeln!(f, "-SDP --------------------------------")?;
        writeln!(f, "  [MediaDesc]")?;
        writeln!(f, "    [MediaType] => {}", Text(m.media_type))?;
        writeln!(f, "    [Port] => {}", Text(m.port))?;
        writeln!(f, "    [Proto] => {}", Text(m.proto))?;
        writeln!(f, "    [Fmt] => {}", Text(m.fmt))?;
        writeln!(f, "    [Src] => {}", Text(m.src))?;
        let c = &self.sdp.conn_data;
        writeln!(f, "  [ConnData]")?;
        writeln!(f, "    [AddrType] => {}", Text(c.addr_type))?;
        writeln!(f, "    [ConnAddr] => {}", Text(c.conn_addr))?;
        writeln!(f, "    [Src] => {}", Text(c.src))?;
        write!(f, "-------------------------------------")
    }
}
