// Per-stream execution state: current/pending state, the fixed recording
// buffer, and non-owning references to the definition and the caller's
// per-stream value.

use crate::definition::Definition;
use crate::{RECORD_BUFFER_SIZE, State};

/// Mutable state of one parse session.
///
/// A context borrows its [`Definition`] and owns a caller-supplied value
/// `user`, which hooks mutate through the context. Callers who need to
/// observe `user` from outside mid-stream can make `T` a shared handle
/// such as `Rc<RefCell<U>>`. Dropping a context never affects the
/// definition.
pub struct Context<'d, T> {
    pub(crate) current_state: State,
    pub(crate) next_state: State,
    pub(crate) record_buf: [u8; RECORD_BUFFER_SIZE],
    pub(crate) record_pos: usize,
    pub(crate) recording: bool,
    pub(crate) definition: &'d Definition<T>,
    /// Caller state, threaded into every hook invocation.
    pub user: T,
}

impl<'d, T> Context<'d, T> {
    /// Create a context for a new stream. Parsing starts in state 0 with
    /// recording off.
    pub fn new(definition: &'d Definition<T>, user: T) -> Self {
        Self {
            current_state: 0,
            next_state: 0,
            record_buf: [0; RECORD_BUFFER_SIZE],
            record_pos: 0,
            recording: false,
            definition,
            user,
        }
    }

    /// Fork this context into an independent one, for speculative or branch
    /// parsing. The mutable fields (states, recording buffer and flag) are
    /// copied; the definition and user value are supplied by the caller,
    /// who is responsible for passing a structurally compatible definition.
    pub fn duplicate<'e>(&self, definition: &'e Definition<T>, user: T) -> Context<'e, T> {
        Context {
            current_state: self.current_state,
            next_state: self.next_state,
            record_buf: self.record_buf,
            record_pos: self.record_pos,
            recording: self.recording,
            definition,
            user,
        }
    }

    /// Overwrite this context's mutable fields with those of `src`, keeping
    /// its own definition and user value. Same semantics as [`duplicate`]
    /// but into an existing context instead of a new allocation.
    ///
    /// [`duplicate`]: Context::duplicate
    pub fn copy_from(&mut self, src: &Context<'_, T>) {
        self.current_state = src.current_state;
        self.next_state = src.next_state;
        self.record_buf = src.record_buf;
        self.record_pos = src.record_pos;
        self.recording = src.recording;
    }

    /// The definition this context parses against.
    pub fn definition(&self) -> &'d Definition<T> {
        self.definition
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.current_state
    }

    /// Force the current state, bypassing the transition algorithm. No exit
    /// or enter hooks fire. Intended for forced resets and error recovery,
    /// not normal operation.
    pub fn set_state(&mut self, state: State) {
        self.current_state = state;
        self.next_state = state;
    }

    /// Destination of the in-flight transition. Outside of a hook this is
    /// simply the last committed state.
    pub fn next_state(&self) -> State {
        self.next_state
    }

    /// Redirect the in-flight transition. Only meaningful from inside an
    /// exit or each-byte hook, before the engine commits the destination.
    pub fn set_next_state(&mut self, state: State) {
        self.next_state = state;
    }

    /// Begin recording: every byte consumed from here on is appended to the
    /// fixed recording buffer. Any previous recording is discarded.
    pub fn start_record(&mut self) {
        self.record_pos = 0;
        self.recording = true;
    }

    /// Stop recording and return the recorded bytes. The view lives until
    /// the next mutation of this context; the buffer itself is reused by
    /// the next [`start_record`].
    ///
    /// [`start_record`]: Context::start_record
    pub fn stop_record(&mut self) -> &[u8] {
        self.recording = false;
        &self.record_buf[..self.record_pos]
    }

    /// Bytes recorded so far, without stopping the recording.
    pub fn record_buffer(&self) -> &[u8] {
        &self.record_buf[..self.record_pos]
    }

    /// Number of bytes recorded so far.
    pub fn record_len(&self) -> usize {
        self.record_pos
    }

    /// Whether recording is active.
    pub fn is_recording(&self) -> bool {
        self.recording
    }
}

impl<T> std::fmt::Debug for Context<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("current_state", &self.current_state)
            .field("next_state", &self.next_state)
            .field("recording", &self.recording)
            .field("record_len", &self.record_pos)
            .finish()
    }
}
