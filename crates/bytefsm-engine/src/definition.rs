// Definition: shared transition table plus per-state hook registry.
//
// A definition is built with `&mut self` calls (`populate`, `on_enter`, ...)
// and frozen the moment a `Context` borrows it. There is no internal
// synchronization; the borrow checker is the freeze mechanism.

use hashbrown::HashSet;

use crate::context::Context;
use crate::transition::Transition;
use crate::{BuildError, MAX_STATES, STATE_ERROR, State};

/// A per-state lifecycle hook.
///
/// Invoked as `(context, state, byte, next_state)`. Exit and each-byte hooks
/// may redirect the pending transition with [`Context::set_next_state`].
/// Hooks must not call [`Context::parse`] on the context they receive.
pub type Hook<T> = Box<dyn Fn(&mut Context<'_, T>, State, u8, State) + Send + Sync>;

/// Which lifecycle slot a hook occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// Fires once when a transition enters the state.
    Enter,
    /// Fires once when a transition leaves the state.
    Exit,
    /// Fires for every byte consumed while in the state, self-loops included.
    EachByte,
}

impl std::fmt::Display for HookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookKind::Enter => f.write_str("enter"),
            HookKind::Exit => f.write_str("exit"),
            HookKind::EachByte => f.write_str("each-byte"),
        }
    }
}

/// Immutable-once-shared automaton: dense transition table and three hook
/// slots per state. `T` is the caller's per-stream state, threaded through
/// every hook invocation via the context.
pub struct Definition<T> {
    pub(crate) num_states: usize,
    /// One 256-entry row per state; unmapped entries hold [`STATE_ERROR`].
    pub(crate) table: Vec<[State; 256]>,
    pub(crate) enter_hooks: Vec<Option<Hook<T>>>,
    pub(crate) exit_hooks: Vec<Option<Hook<T>>>,
    pub(crate) each_byte_hooks: Vec<Option<Hook<T>>>,
}

impl<T> std::fmt::Debug for Definition<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mapped: usize = self
            .table
            .iter()
            .map(|row| row.iter().filter(|&&d| d != STATE_ERROR).count())
            .sum();
        f.debug_struct("Definition")
            .field("num_states", &self.num_states)
            .field("mapped_entries", &mapped)
            .finish()
    }
}

impl<T> Definition<T> {
    /// Create a definition with `num_states` states and no transitions.
    ///
    /// At most [`MAX_STATES`] states are supported, so that [`STATE_ERROR`]
    /// can never collide with a real state id.
    pub fn new(num_states: usize) -> Result<Self, BuildError> {
        if num_states == 0 {
            return Err(BuildError::NoStates);
        }
        if num_states > MAX_STATES {
            return Err(BuildError::TooManyStates { requested: num_states, max: MAX_STATES });
        }
        Ok(Self {
            num_states,
            table: vec![[STATE_ERROR; 256]; num_states],
            enter_hooks: (0..num_states).map(|_| None).collect(),
            exit_hooks: (0..num_states).map(|_| None).collect(),
            each_byte_hooks: (0..num_states).map(|_| None).collect(),
        })
    }

    /// Number of states in this definition.
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Destination for `(state, byte)`, or [`STATE_ERROR`] if the pair is
    /// unmapped or `state` is out of range.
    #[inline]
    pub fn target(&self, state: State, byte: u8) -> State {
        match self.table.get(state as usize) {
            Some(row) => row[byte as usize],
            None => STATE_ERROR,
        }
    }

    /// Add transitions to the table. Additive across calls: a later call may
    /// overwrite entries written by an earlier one (last write wins), but a
    /// byte mapped twice from the same source *within* one call is rejected
    /// as ambiguous.
    ///
    /// On error the table may hold a partial update; callers must treat
    /// construction failure as fatal rather than retry around it.
    pub fn populate(&mut self, transitions: &[Transition<'_>]) -> Result<(), BuildError> {
        let mut seen: HashSet<(State, u8)> = HashSet::new();
        for tr in transitions {
            self.check_state(tr.source)?;
            self.check_state(tr.destination)?;
            tr.condition.validate()?;
            let mut empty = true;
            for byte in tr.condition.bytes() {
                empty = false;
                if !seen.insert((tr.source, byte)) {
                    return Err(BuildError::DuplicateByte { source: tr.source, byte });
                }
                self.table[tr.source as usize][byte as usize] = tr.destination;
            }
            if empty {
                return Err(BuildError::EmptyCondition { source: tr.source });
            }
        }
        Ok(())
    }

    /// Register a hook that fires when a transition enters `state`.
    /// Registering a second hook for the same slot is an error.
    pub fn on_enter<F>(&mut self, state: State, hook: F) -> Result<(), BuildError>
    where
        F: Fn(&mut Context<'_, T>, State, u8, State) + Send + Sync + 'static,
    {
        self.check_state(state)?;
        Self::register(&mut self.enter_hooks, state, HookKind::Enter, Box::new(hook))
    }

    /// Register a hook that fires when a transition leaves `state`.
    pub fn on_exit<F>(&mut self, state: State, hook: F) -> Result<(), BuildError>
    where
        F: Fn(&mut Context<'_, T>, State, u8, State) + Send + Sync + 'static,
    {
        self.check_state(state)?;
        Self::register(&mut self.exit_hooks, state, HookKind::Exit, Box::new(hook))
    }

    /// Register a hook that fires for every byte consumed while in `state`,
    /// including self-loops.
    pub fn on_each_byte<F>(&mut self, state: State, hook: F) -> Result<(), BuildError>
    where
        F: Fn(&mut Context<'_, T>, State, u8, State) + Send + Sync + 'static,
    {
        self.check_state(state)?;
        Self::register(&mut self.each_byte_hooks, state, HookKind::EachByte, Box::new(hook))
    }

    fn register(
        slots: &mut [Option<Hook<T>>],
        state: State,
        kind: HookKind,
        hook: Hook<T>,
    ) -> Result<(), BuildError> {
        let slot = &mut slots[state as usize];
        if slot.is_some() {
            return Err(BuildError::HookAlreadyRegistered { state, kind });
        }
        *slot = Some(hook);
        Ok(())
    }

    #[inline]
    pub(crate) fn enter_hook(&self, state: State) -> Option<&Hook<T>> {
        self.enter_hooks.get(state as usize)?.as_ref()
    }

    #[inline]
    pub(crate) fn exit_hook(&self, state: State) -> Option<&Hook<T>> {
        self.exit_hooks.get(state as usize)?.as_ref()
    }

    #[inline]
    pub(crate) fn each_byte_hook(&self, state: State) -> Option<&Hook<T>> {
        self.each_byte_hooks.get(state as usize)?.as_ref()
    }

    fn check_state(&self, state: State) -> Result<(), BuildError> {
        if (state as usize) < self.num_states {
            Ok(())
        } else {
            Err(BuildError::InvalidState { state, num_states: self.num_states })
        }
    }
}
