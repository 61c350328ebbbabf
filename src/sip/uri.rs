use std::fmt;

use crate::utils::{starts_with_at, Span};

/// URI scheme of a request line or name-addr
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UriType {
    Sip,
    Sips,
    Tel,
}

impl UriType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UriType::Sip => "sip",
            UriType::Sips => "sips",
            UriType::Tel => "tel",
        }
    }
}

impl fmt::Display for UriType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check for a URI scheme at `pos`, returning the scheme and its length (colon included)
pub(crate) fn scheme_at(v: &[u8], pos: usize) -> Option<(UriType, usize)> {
    if starts_with_at(v, pos, b"sip:") {
        Some((UriType::Sip, 4))
    } else if starts_with_at(v, pos, b"sips:") {
        Some((UriType::Sips, 5))
    } else if starts_with_at(v, pos, b"tel:") {
        Some((UriType::Tel, 4))
    } else {
        None
    }
}

/// Test if `pos` starts a URI or header parameter (follows `;` or the closing `>`)
#[inline]
pub(crate) fn after_param_sep(v: &[u8], pos: usize) -> bool {
    pos > 0 && matches!(v[pos - 1], b';' | b'>')
}

/// `From` or `To` header value
///
/// All fields borrow from the parsed buffer, and are empty when absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SipNameAddr<'a> {
    pub uri_type: Option<UriType>,
    /// Display name, without quotes
    pub name: &'a [u8],
    pub user: &'a [u8],
    pub host: &'a [u8],
    pub port: &'a [u8],
    pub tag: &'a [u8],
    /// Value of the `user=` URI parameter
    pub user_type: &'a [u8],
    /// Complete header value, if source retention is enabled
    pub src: &'a [u8],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Base,
    QuotedName,
    Name,
    User,
    Host,
    Port,
    UserType,
    Tag,
    Ignore,
}

/// Parse a `From`/`To` header value (`"Name" <sip:user@host:port;user=phone>;tag=xyz`)
///
/// The scan is a single left-to-right pass. Unknown parameters are skipped, and parsing never
/// fails: unrecognized input leaves fields empty. A quoted display name is taken as is, and
/// unquoted text following it is ignored.
pub fn parse_name_addr(v: &[u8], keep_source: bool) -> SipNameAddr {
    let mut uri_type = None;
    let mut name = Span::default();
    let mut user = Span::default();
    let mut host = Span::default();
    let mut port = Span::default();
    let mut tag = Span::default();
    let mut user_type = Span::default();
    let mut quoted = false;
    let mut state = State::Base;
    let mut pos = 0;

    while pos < v.len() {
        let c = v[pos];
        match state {
            State::Base => {
                if c == b'"' && uri_type.is_none() && !quoted {
                    state = State::QuotedName;
                    pos += 1;
                    continue;
                }
                if c != b' ' {
                    if let Some((scheme, len)) = scheme_at(v, pos) {
                        uri_type = Some(scheme);
                        state = State::User;
                        pos += len;
                        continue;
                    }
                    let param = after_param_sep(v, pos);
                    if param && starts_with_at(v, pos, b"tag=") {
                        state = State::Tag;
                        pos += 4;
                        continue;
                    }
                    if c == b'=' {
                        state = State::Ignore;
                        pos += 1;
                        continue;
                    }
                    if param && starts_with_at(v, pos, b"user=") {
                        state = State::UserType;
                        pos += 5;
                        continue;
                    }
                    if uri_type.is_none() && !quoted {
                        state = State::Name;
                        continue;
                    }
                }
            }
            State::QuotedName => {
                if c == b'"' {
                    quoted = true;
                    state = State::Base;
                    pos += 1;
                    continue;
                }
                name.push(pos);
            }
            State::Name => {
                if c == b'<' || c == b' ' {
                    state = State::Base;
                    pos += 1;
                    continue;
                }
                name.push(pos);
            }
            // user part and host share a span until '@' is seen
            State::User => match c {
                b'@' => {
                    user = host.take();
                    state = State::Host;
                }
                b':' => state = State::Port,
                b';' | b'>' => {
                    if uri_type == Some(UriType::Tel) {
                        user = host.take();
                    }
                    state = State::Base;
                }
                _ => host.push(pos),
            },
            State::Host => match c {
                b':' => state = State::Port,
                b';' | b'>' => state = State::Base,
                _ => host.push(pos),
            },
            State::Port => match c {
                b';' | b'>' => state = State::Base,
                _ => port.push(pos),
            },
            State::UserType => match c {
                b';' | b'>' => state = State::Base,
                _ => user_type.push(pos),
            },
            State::Tag => match c {
                b';' | b'>' => state = State::Base,
                _ => tag.push(pos),
            },
            State::Ignore => {
                if c == b';' || c == b'>' {
                    state = State::Base;
                }
            }
        }
        pos += 1;
    }
    if state == State::User && uri_type == Some(UriType::Tel) {
        user = host.take();
    }

    SipNameAddr {
        uri_type,
        name: name.slice(v),
        user: user.slice(v),
        host: host.slice(v),
        port: port.slice(v),
        tag: tag.slice(v),
        user_type: user_type.slice(v),
        src: if keep_source { v } else { &[] },
    }
}
