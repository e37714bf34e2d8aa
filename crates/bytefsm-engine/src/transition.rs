// Transition entries and the byte-set conditions that trigger them.

use crate::{BuildError, State};

/// The set of byte values that trigger one transition edge.
///
/// Conditions are explicit: there is no implicit default edge, and
/// [`Condition::Any`] must be spelled out when a state really accepts every
/// byte. The borrowed `Set` variant lets grammar tables live in `const`
/// arrays with byte-string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition<'a> {
    /// A single byte value.
    Byte(u8),
    /// An inclusive byte range `lo..=hi`.
    Range(u8, u8),
    /// An explicit set of byte values.
    Set(&'a [u8]),
    /// All 256 byte values.
    Any,
}

impl<'a> Condition<'a> {
    /// Reject conditions that cannot describe a non-empty byte set.
    pub(crate) fn validate(&self) -> Result<(), BuildError> {
        match *self {
            Condition::Range(lo, hi) if lo > hi => Err(BuildError::InvertedRange { lo, hi }),
            _ => Ok(()),
        }
    }

    /// Iterate over the byte values in this condition.
    pub fn bytes(&self) -> ConditionBytes<'a> {
        match *self {
            Condition::Byte(b) => ConditionBytes::Range(b..=b),
            Condition::Range(lo, hi) => ConditionBytes::Range(lo..=hi),
            Condition::Set(bytes) => ConditionBytes::Set(bytes.iter().copied()),
            Condition::Any => ConditionBytes::Range(0..=u8::MAX),
        }
    }
}

/// Iterator over the byte values of a [`Condition`].
#[derive(Debug, Clone)]
pub enum ConditionBytes<'a> {
    Range(std::ops::RangeInclusive<u8>),
    Set(std::iter::Copied<std::slice::Iter<'a, u8>>),
}

impl Iterator for ConditionBytes<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        match self {
            ConditionBytes::Range(r) => r.next(),
            ConditionBytes::Set(s) => s.next(),
        }
    }
}

/// One transition entry: every byte in `condition` maps `source` to
/// `destination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<'a> {
    pub condition: Condition<'a>,
    pub source: State,
    pub destination: State,
}

impl<'a> Transition<'a> {
    /// Convenience constructor, mostly for grammar tables.
    pub const fn new(condition: Condition<'a>, source: State, destination: State) -> Self {
        Self { condition, source, destination }
    }
}
