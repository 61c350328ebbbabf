//! Signaling pre-filter
//!
//! Scanning a packet for a set of SIP/SDP tokens is much cheaper than running the SIP parser
//! on it, and most packets of a mixed capture carry no signaling at all. The classifier
//! compiles the pattern table once into a [`PatternDatabase`], shared read-only by all
//! workers, while each worker owns its [`Scratch`].
//!
//! ## Example
//!
//! ```rust
//! use voip_parser::classifier::SignalingClassifier;
//!
//! let classifier = SignalingClassifier::new().expect("default pattern table");
//! // in each worker thread
//! let mut scratch = classifier.scratch();
//! assert!(!classifier.is_signaling_candidate(b"BYE sip:alice@example.com SIP/2.0\r\n", &mut scratch));
//! assert!(classifier.is_signaling_candidate(b"\x17\x03\x03\x00\x20", &mut scratch));
//! ```
//!
//! A positive answer only means that the SIP parser should run; the parser copes with
//! false positives by returning a mostly empty message.

mod patterns;

pub use patterns::*;

use std::sync::Arc;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use tracing::{debug, info, trace};

use crate::error::ClassifierError;

/// Callback answer: keep scanning, or stop at this match
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Matching {
    Continue,
    Terminate,
}

/// How a scan ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The whole input was scanned
    Completed,
    /// The match callback asked to stop
    Terminated,
}

/// One pattern occurrence in the scanned input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternMatch {
    /// Index of the pattern in the compiled list
    pub pattern: usize,
    pub start: usize,
    pub end: usize,
}

/// Compiled, immutable pattern set
///
/// The database is `Send + Sync` and is meant to be built once at startup and shared (for
/// ex. through an `Arc`) by all workers.
#[derive(Debug)]
pub struct PatternDatabase {
    automaton: AhoCorasick,
    patterns: Vec<String>,
}

impl PatternDatabase {
    /// Compile a list of case-insensitive literal patterns
    ///
    /// Fails if the list is empty or contains an empty pattern.
    pub fn compile<I, P>(patterns: I) -> Result<Self, ClassifierError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_owned())
            .collect();
        if patterns.is_empty() {
            return Err(ClassifierError::EmptyPatternSet);
        }
        if let Some(index) = patterns.iter().position(|p| p.is_empty()) {
            return Err(ClassifierError::InvalidPattern {
                index,
                pattern: patterns[index].clone(),
            });
        }
        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::Standard)
            .ascii_case_insensitive(true)
            .build(&patterns)?;
        info!("compiled signaling database: {} patterns", patterns.len());
        Ok(PatternDatabase {
            automaton,
            patterns,
        })
    }

    /// Compile the default SIP/SDP pattern table
    pub fn with_default_patterns() -> Result<Self, ClassifierError> {
        PatternDatabase::compile(default_patterns())
    }

    #[inline]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Get the source text of pattern `id`
    pub fn pattern(&self, id: usize) -> Option<&str> {
        self.patterns.get(id).map(|s| s.as_str())
    }

    /// Allocate the per-worker scan state
    pub fn alloc_scratch(&self) -> Scratch {
        Scratch::default()
    }

    /// Scan `data`, calling `on_match` for each match in order of match end
    ///
    /// Scanning stops as soon as `on_match` returns [`Matching::Terminate`].
    pub fn scan<F>(&self, data: &[u8], scratch: &mut Scratch, mut on_match: F) -> ScanOutcome
    where
        F: FnMut(PatternMatch) -> Matching,
    {
        scratch.scans += 1;
        scratch.last_match = None;
        let mut matched = false;
        let mut outcome = ScanOutcome::Completed;
        for mat in self.automaton.find_iter(data) {
            let m = PatternMatch {
                pattern: mat.pattern().as_usize(),
                start: mat.start(),
                end: mat.end(),
            };
            matched = true;
            scratch.last_match = Some(m);
            if on_match(m) == Matching::Terminate {
                outcome = ScanOutcome::Terminated;
                break;
            }
        }
        if matched {
            scratch.hits += 1;
        }
        outcome
    }
}

/// Per-worker scan state
///
/// A scratch must not be shared between concurrent scans: each worker allocates its own with
/// [`PatternDatabase::alloc_scratch`] (or [`SignalingClassifier::scratch`]) and keeps it for
/// its lifetime.
#[derive(Debug, Default)]
pub struct Scratch {
    scans: u64,
    hits: u64,
    last_match: Option<PatternMatch>,
}

impl Scratch {
    /// Number of scans run with this scratch
    pub fn scans(&self) -> u64 {
        self.scans
    }

    /// Number of scans with at least one match
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Last match reported by the most recent scan
    pub fn last_match(&self) -> Option<PatternMatch> {
        self.last_match
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        if self.scans > 0 {
            debug!(
                "releasing scratch: {} scans, {} signaling candidates",
                self.scans, self.hits
            );
        }
    }
}

/// Signaling pre-filter, holding the shared pattern database
///
/// Cloning a classifier is cheap and shares the database.
#[derive(Clone, Debug)]
pub struct SignalingClassifier {
    database: Arc<PatternDatabase>,
}

impl SignalingClassifier {
    /// Build a classifier using the default SIP/SDP pattern table
    pub fn new() -> Result<Self, ClassifierError> {
        PatternDatabase::with_default_patterns().map(SignalingClassifier::from_database)
    }

    /// Build a classifier from a custom pattern list
    pub fn with_patterns<I, P>(patterns: I) -> Result<Self, ClassifierError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        PatternDatabase::compile(patterns).map(SignalingClassifier::from_database)
    }

    pub fn from_database<D: Into<Arc<PatternDatabase>>>(database: D) -> Self {
        SignalingClassifier {
            database: database.into(),
        }
    }

    pub fn database(&self) -> &Arc<PatternDatabase> {
        &self.database
    }

    /// Allocate a scratch for one worker
    pub fn scratch(&self) -> Scratch {
        self.database.alloc_scratch()
    }

    /// Pre-filter a packet
    ///
    /// Returns `true` if the packet contains none of the patterns (reject: not signaling), and
    /// `false` as soon as one pattern is found (the packet should go to the SIP parser).
    pub fn is_signaling_candidate(&self, data: &[u8], scratch: &mut Scratch) -> bool {
        let mut found = None;
        self.database.scan(data, scratch, |m| {
            found = Some(m);
            Matching::Terminate
        });
        if let Some(m) = found {
            trace!(
                "signaling pattern {:?} at offset {}",
                self.database.pattern(m.pattern).unwrap_or_default(),
                m.start
            );
        }
        found.is_none()
    }

    /// Inverse of [`SignalingClassifier::is_signaling_candidate`]: `true` if any pattern is found
    #[inline]
    pub fn is_signaling(&self, data: &[u8], scratch: &mut Scratch) -> bool {
        !self.is_signaling_candidate(data, scratch)
    }
}
