//! Per-worker processing pipeline
//!
//! A [`Worker`] bundles what one processing thread needs: a handle on the shared signaling
//! classifier, its own [`Scratch`], and a [`SipParser`]. Workers are created from a
//! [`SignalingClassifier`] at thread startup, and release their scratch when dropped.
//!
//! ```rust
//! use std::thread;
//! use voip_parser::classifier::SignalingClassifier;
//! use voip_parser::sip::ParserConfig;
//! use voip_parser::worker::Worker;
//!
//! let classifier = SignalingClassifier::new().expect("signaling patterns");
//! let handles: Vec<_> = (0..2)
//!     .map(|_| {
//!         let classifier = classifier.clone();
//!         thread::spawn(move || {
//!             let worker = Worker::new(&classifier, ParserConfig::default());
//!             // receive frames and call worker.process(...)
//!             worker.stats().frames()
//!         })
//!     })
//!     .collect();
//! for h in handles {
//!     assert_eq!(h.join().unwrap(), 0);
//! }
//! ```

use tracing::{debug, trace};

use crate::classifier::{Scratch, SignalingClassifier};
use crate::identify::{identify, resolve_transport, transport_payload, Classification, Frame};
use crate::sip::{ParserConfig, SipMessage, SipParser};

/// Decision taken for one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict<'a> {
    /// RTP media
    Media,
    /// Frame accepted by the signaling pre-filter, with the parsed SIP message
    Signaling {
        transport: Classification,
        message: SipMessage<'a>,
    },
    /// Neither media nor signaling
    Passthrough(Classification),
}

impl<'a> Verdict<'a> {
    /// Routing class of the frame
    pub fn classification(&self) -> Classification {
        match self {
            Verdict::Media => Classification::Rtp,
            Verdict::Signaling { transport, .. } => *transport,
            Verdict::Passthrough(c) => *c,
        }
    }
}

/// Frame counters of a worker
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkerStats {
    by_class: [u64; Classification::COUNT],
    signaling: u64,
}

impl WorkerStats {
    /// Total number of frames processed
    pub fn frames(&self) -> u64 {
        self.by_class.iter().sum()
    }

    /// Number of frames of one class
    pub fn class(&self, c: Classification) -> u64 {
        self.by_class[c.as_index()]
    }

    /// Number of frames accepted by the signaling pre-filter
    pub fn signaling(&self) -> u64 {
        self.signaling
    }
}

/// Processing state owned by one thread
#[derive(Debug)]
pub struct Worker {
    classifier: SignalingClassifier,
    scratch: Scratch,
    parser: SipParser,
    stats: WorkerStats,
}

impl Worker {
    pub fn new(classifier: &SignalingClassifier, config: ParserConfig) -> Self {
        Worker {
            classifier: classifier.clone(),
            scratch: classifier.scratch(),
            parser: SipParser::new(config),
            stats: WorkerStats::default(),
        }
    }

    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    pub fn scratch(&self) -> &Scratch {
        &self.scratch
    }

    /// Identify a frame, and parse it as SIP if it passes the signaling pre-filter
    ///
    /// RTP frames are never scanned. Other frames are scanned whole; if accepted, the UDP or
    /// TCP payload is handed to the parser.
    pub fn process<'a>(&mut self, frame: &Frame<'a>) -> Verdict<'a> {
        let class = identify(frame);
        self.stats.by_class[class.as_index()] += 1;
        if class == Classification::Rtp {
            return Verdict::Media;
        }
        if self
            .classifier
            .is_signaling_candidate(frame.data(), &mut self.scratch)
        {
            return Verdict::Passthrough(class);
        }
        self.stats.signaling += 1;
        let payload = resolve_transport(frame)
            .and_then(|transport| transport_payload(frame, &transport))
            .unwrap_or_default();
        let message = self.parser.parse(payload);
        trace!(
            "{} signaling frame, {} bytes payload, sip: {}",
            class,
            payload.len(),
            message.is_sip()
        );
        Verdict::Signaling {
            transport: class,
            message,
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        debug!(
            "worker done: {} frames, {} rtp, {} tcp, {} non-tcp, {} signaling",
            self.stats.frames(),
            self.stats.class(Classification::Rtp),
            self.stats.class(Classification::Tcp),
            self.stats.class(Classification::NonTcp),
            self.stats.signaling
        );
    }
}
