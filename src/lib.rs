//! # VoIP traffic parsers
//!
//! This crate contains the three decision functions of a VoIP/IMS traffic analysis pipeline:
//!
//! - [`identify`](identify/index.html): sort Ethernet frames into TCP, RTP, or other traffic,
//!   looking through VLAN tags, IPv6 fragment headers and IPsec ESP encapsulation
//! - [`classifier`](classifier/index.html): cheap multi-pattern pre-filter deciding whether a
//!   packet may carry SIP signaling (feature `classifier`, enabled by default)
//! - [`sip`](sip/index.html): zero-copy extraction of the main SIP headers and SDP fields
//!
//! All functions work on borrowed byte slices and never fail on untrusted input: malformed
//! frames are classified as [`Classification::NonTcp`], and unparsable messages give empty
//! fields. The only error type, [`ClassifierError`], is reported when compiling a pattern
//! list at startup.
//!
//! The [`worker`](worker/index.html) module combines the three functions the way a
//! processing thread uses them.
//!
//! # Example
//!
//! ```rust
//! use voip_parser::sip::parse_sip;
//!
//! let msg = parse_sip(b"SIP/2.0 180 Ringing\r\nCall-ID: a84b4c76e66710@pc33.atlanta.com\r\n\r\n");
//! assert_eq!(msg.request.status_code, b"180");
//! assert_eq!(msg.call_id.value, b"a84b4c76e66710@pc33.atlanta.com");
//! ```
//!
//! Compiling the signaling patterns is done once, and the result is shared by all threads:
//!
//! ```rust
//! # #[cfg(feature = "classifier")] {
//! use voip_parser::classifier::SignalingClassifier;
//! use voip_parser::identify::Frame;
//! use voip_parser::sip::ParserConfig;
//! use voip_parser::worker::{Verdict, Worker};
//!
//! let classifier = SignalingClassifier::new().expect("signaling patterns");
//! let mut worker = Worker::new(&classifier, ParserConfig::default());
//! let verdict = worker.process(&Frame::new(&[0u8; 60]));
//! assert!(matches!(verdict, Verdict::Passthrough(_)));
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod identify;
pub mod protocol;
pub mod sip;

mod utils;

pub use identify::{identify, Classification, Frame};
pub use sip::{parse_sip, ParserConfig, SipMessage, SipParser};

#[cfg(feature = "classifier")]
mod error;
#[cfg(feature = "classifier")]
pub use error::*;

#[cfg(feature = "classifier")]
#[cfg_attr(docsrs, doc(cfg(feature = "classifier")))]
pub mod classifier;

#[cfg(feature = "classifier")]
#[cfg_attr(docsrs, doc(cfg(feature = "classifier")))]
pub mod worker;
