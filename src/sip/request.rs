use crate::sip::uri::{after_param_sep, scheme_at, UriType};
use crate::utils::{starts_with_at, Span};

/// Longest method token accepted on a request line
pub const MAX_METHOD_LEN: usize = 10;

/// Request line (`INVITE sip:user@host SIP/2.0`) or status line (`SIP/2.0 180 Ringing`)
///
/// For a request, `method` and the Request-URI fields are set. For a response, `method` is
/// empty and `status_code`/`status_desc` are set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SipRequest<'a> {
    pub uri_type: Option<UriType>,
    pub method: &'a [u8],
    pub status_code: &'a [u8],
    /// Reason phrase of a status line
    pub status_desc: &'a [u8],
    pub user: &'a [u8],
    pub host: &'a [u8],
    pub port: &'a [u8],
    /// Value of the `user=` URI parameter
    pub user_type: &'a [u8],
    /// Complete line, if source retention is enabled
    pub src: &'a [u8],
}

impl<'a> SipRequest<'a> {
    #[inline]
    pub fn is_request(&self) -> bool {
        !self.method.is_empty()
    }

    #[inline]
    pub fn is_response(&self) -> bool {
        !self.status_code.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Start,
    Method,
    Base,
    User,
    Host,
    Port,
    UserType,
    Status,
    StatusDesc,
}

/// Parse the first line of a SIP message
///
/// The line must start with an upper-case letter to be considered at all; otherwise all
/// fields are left empty. The method token is cut after `MAX_METHOD_LEN` bytes.
pub fn parse_request_line(v: &[u8], keep_source: bool) -> SipRequest {
    let mut uri_type = None;
    let mut method = Span::default();
    let mut status_code = Span::default();
    let mut status_desc = Span::default();
    let mut user = Span::default();
    let mut host = Span::default();
    let mut port = Span::default();
    let mut user_type = Span::default();
    let mut state = State::Start;
    let mut pos = 0;

    while pos < v.len() {
        let c = v[pos];
        match state {
            State::Start => {
                if pos == 0 && c.is_ascii_uppercase() {
                    state = State::Method;
                    continue;
                }
            }
            State::Method => {
                if c == b' ' || pos >= MAX_METHOD_LEN {
                    if method.slice(v) == b"SIP/2.0" {
                        method = Span::default();
                        state = State::Status;
                    } else {
                        state = State::Base;
                    }
                    pos += 1;
                    continue;
                }
                method.push(pos);
            }
            State::Base => {
                if c != b' ' {
                    if let Some((scheme, len)) = scheme_at(v, pos) {
                        uri_type = Some(scheme);
                        state = State::User;
                        pos += len;
                        continue;
                    }
                    if after_param_sep(v, pos) && starts_with_at(v, pos, b"user=") {
                        state = State::UserType;
                        pos += 5;
                        continue;
                    }
                    if c == b'@' {
                        user = host.take();
                        state = State::Host;
                    }
                }
            }
            // user part and host share a span until '@' is seen
            State::User => match c {
                b'@' => {
                    user = host.take();
                    state = State::Host;
                }
                b':' => state = State::Port,
                b';' | b'>' | b' ' => {
                    if uri_type == Some(UriType::Tel) {
                        user = host.take();
                    }
                    state = State::Base;
                }
                _ => host.push(pos),
            },
            State::Host => match c {
                b':' => state = State::Port,
                b';' | b'>' | b' ' => state = State::Base,
                _ => host.push(pos),
            },
            State::Port => match c {
                b';' | b'>' | b' ' => state = State::Base,
                _ => port.push(pos),
            },
            State::UserType => match c {
                b';' | b'>' | b' ' => state = State::Base,
                _ => user_type.push(pos),
            },
            State::Status => match c {
                b';' | b'>' | b' ' => state = State::StatusDesc,
                _ => status_code.push(pos),
            },
            State::StatusDesc => status_desc.push(pos),
        }
        pos += 1;
    }
    if state == State::User && uri_type == Some(UriType::Tel) {
        user = host.take();
    }

    SipRequest {
        uri_type,
        method: method.slice(v),
        status_code: status_code.slice(v),
        status_desc: status_desc.slice(v),
        user: user.slice(v),
        host: host.slice(v),
        port: port.slice(v),
        user_type: user_type.slice(v),
        src: if keep_source { v } else { &[] },
    }
}
