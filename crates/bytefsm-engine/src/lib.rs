//! Byte-driven finite state machine engine.
//!
//! This crate provides the parsing core beneath streaming text analyzers:
//! a caller builds a [`Definition`] (transition table plus per-state hooks),
//! creates one [`Context`] per input stream, and feeds bytes through
//! [`Context::parse`]. Hooks registered on the definition observe every
//! transition and can accumulate tokens or redirect the machine.
//!
//! # Architecture
//!
//! - [`transition`] -- Transition entries and byte-set conditions
//! - [`definition`] -- Shared, read-only transition table and hook registry
//! - [`context`] -- Per-stream mutable state, duplication, recording
//! - [`parse`] -- The byte-consumption algorithm
//!
//! # Ownership
//!
//! A `Definition` is mutable only while it is being built; the borrow
//! checker freezes it as soon as any `Context` holds a reference to it.
//! Contexts never own their definition, so one frozen definition can drive
//! any number of streams, including streams on other threads.

pub mod context;
pub mod definition;
pub mod parse;
pub mod transition;

pub use context::Context;
pub use definition::{Definition, HookKind};
pub use transition::{Condition, Transition};

/// State identifier. Valid states are `0..num_states`.
pub type State = u8;

/// Reserved sentinel for "no transition defined". Never a usable state id;
/// a context lands here when it consumes a byte with no configured edge.
pub const STATE_ERROR: State = 127;

/// Upper bound on `num_states`, so that [`STATE_ERROR`] stays out of band.
pub const MAX_STATES: usize = STATE_ERROR as usize;

/// Capacity of the fixed per-context recording buffer.
pub const RECORD_BUFFER_SIZE: usize = 256;

/// Error type for definition construction.
///
/// `Display` and `Error` are implemented by hand because thiserror treats
/// any field named `source` as an error source, and the `source` fields
/// here are plain state ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    NoStates,
    TooManyStates { requested: usize, max: usize },
    InvalidState { state: State, num_states: usize },
    EmptyCondition { source: State },
    InvertedRange { lo: u8, hi: u8 },
    DuplicateByte { source: State, byte: u8 },
    HookAlreadyRegistered { state: State, kind: HookKind },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::NoStates => {
                write!(f, "a definition needs at least one state")
            }
            BuildError::TooManyStates { requested, max } => {
                write!(f, "too many states: {requested} requested, at most {max} supported")
            }
            BuildError::InvalidState { state, num_states } => {
                write!(f, "state {state} is out of range for a definition with {num_states} states")
            }
            BuildError::EmptyCondition { source } => {
                write!(f, "transition from state {source} has an empty condition")
            }
            BuildError::InvertedRange { lo, hi } => {
                write!(f, "inverted byte range {lo:#04x}-{hi:#04x}")
            }
            BuildError::DuplicateByte { source, byte } => {
                write!(f, "byte {byte:#04x} mapped twice from state {source} in one populate call")
            }
            BuildError::HookAlreadyRegistered { state, kind } => {
                write!(f, "{kind} hook already registered for state {state}")
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Error type for parsing. Reaching the error sentinel is the only failure
/// the automaton itself can express; the record-buffer overflow variant
/// exists because this engine underlies security-context tracking, where a
/// silently truncated record could misclassify content.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("no transition from state {state} on byte {byte:#04x} at offset {offset}")]
    NoTransition { state: State, byte: u8, offset: usize },
    #[error("record buffer full ({capacity} bytes) at offset {offset}")]
    RecordOverflow { offset: usize, capacity: usize },
}

impl ParseError {
    /// Offset of the byte that could not be consumed. Bytes before this
    /// offset were all consumed successfully.
    pub fn offset(&self) -> usize {
        match *self {
            ParseError::NoTransition { offset, .. } => offset,
            ParseError::RecordOverflow { offset, .. } => offset,
        }
    }
}
