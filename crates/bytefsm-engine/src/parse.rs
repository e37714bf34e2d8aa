// The byte-consumption algorithm.
//
// Per byte: look up the destination, record, fire exit and each-byte hooks,
// commit the (possibly redirected) destination, fire the enter hook. An
// unmapped byte is a hard stop; the engine never guesses.

use crate::context::Context;
use crate::{ParseError, RECORD_BUFFER_SIZE, STATE_ERROR};

impl<T> Context<'_, T> {
    /// Consume `input` against the definition, byte by byte.
    ///
    /// Returns the number of bytes consumed, which is `input.len()` on
    /// success. On failure the context is left at the offending byte: for an
    /// unmapped byte the context lands in [`STATE_ERROR`] (recover with
    /// [`set_state`]); for a recording overflow the state is untouched and
    /// parsing may resume at the reported offset once recording is stopped.
    /// In both cases [`ParseError::offset`] equals the consumed count.
    ///
    /// Hooks fire synchronously on the calling thread, in order: exit hook
    /// of the old state (transitions only), each-byte hook of the old state,
    /// commit, enter hook of the new state (transitions only). Exit and
    /// each-byte hooks may redirect the commit via
    /// [`set_next_state`]; the enter hook of the committed state then fires
    /// instead. Hooks must not re-enter `parse` on this context.
    ///
    /// [`set_state`]: Context::set_state
    /// [`set_next_state`]: Context::set_next_state
    /// [`STATE_ERROR`]: crate::STATE_ERROR
    pub fn parse(&mut self, input: &[u8]) -> Result<usize, ParseError> {
        let def = self.definition;
        for (offset, &byte) in input.iter().enumerate() {
            let state = self.current_state;
            let next = def.target(state, byte);
            if next == STATE_ERROR {
                self.current_state = STATE_ERROR;
                self.next_state = STATE_ERROR;
                return Err(ParseError::NoTransition { state, byte, offset });
            }

            if self.recording {
                if self.record_pos >= RECORD_BUFFER_SIZE {
                    return Err(ParseError::RecordOverflow {
                        offset,
                        capacity: RECORD_BUFFER_SIZE,
                    });
                }
                self.record_buf[self.record_pos] = byte;
                self.record_pos += 1;
            }

            self.next_state = next;
            if state != next {
                if let Some(hook) = def.exit_hook(state) {
                    hook(self, state, byte, next);
                }
            }
            if let Some(hook) = def.each_byte_hook(state) {
                hook(self, state, byte, next);
            }

            // Hooks may have redirected the pending destination.
            let committed = self.next_state;
            self.current_state = committed;
            if state != committed {
                if let Some(hook) = def.enter_hook(committed) {
                    hook(self, committed, byte, committed);
                }
            }
        }
        Ok(input.len())
    }
}

#[cfg(test)]
mod tests {
    use crate::transition::{Condition, Transition};
    use crate::{Context, Definition, ParseError, RECORD_BUFFER_SIZE, STATE_ERROR};

    /// `0 -a-> 1`, `1 -b-> 0`.
    fn two_state() -> Definition<Vec<String>> {
        let mut def = Definition::new(2).unwrap();
        def.populate(&[
            Transition::new(Condition::Byte(b'a'), 0, 1),
            Transition::new(Condition::Byte(b'b'), 1, 0),
        ])
        .unwrap();
        def
    }

    #[test]
    fn two_state_round_trip() {
        let def = two_state();
        let mut ctx = Context::new(&def, Vec::new());
        assert_eq!(ctx.parse(b"ababab"), Ok(6));
        assert_eq!(ctx.state(), 0);
    }

    #[test]
    fn unmapped_byte_halts_with_exact_offset() {
        let def = two_state();
        let mut ctx = Context::new(&def, Vec::new());
        let err = ctx.parse(b"ac").unwrap_err();
        assert_eq!(err, ParseError::NoTransition { state: 1, byte: b'c', offset: 1 });
        assert_eq!(err.offset(), 1);
        assert_eq!(ctx.state(), STATE_ERROR);
    }

    #[test]
    fn empty_input_consumes_nothing() {
        let def = two_state();
        let mut ctx = Context::new(&def, Vec::new());
        assert_eq!(ctx.parse(b""), Ok(0));
        assert_eq!(ctx.state(), 0);
    }

    #[test]
    fn chunked_input_behaves_like_one_buffer() {
        let def = two_state();
        let mut ctx = Context::new(&def, Vec::new());
        assert_eq!(ctx.parse(b"aba"), Ok(3));
        assert_eq!(ctx.state(), 1);
        assert_eq!(ctx.parse(b"bab"), Ok(3));
        assert_eq!(ctx.state(), 0);
    }

    #[test]
    fn parse_after_error_fails_at_offset_zero() {
        let def = two_state();
        let mut ctx = Context::new(&def, Vec::new());
        ctx.parse(b"x").unwrap_err();
        let err = ctx.parse(b"a").unwrap_err();
        assert_eq!(err, ParseError::NoTransition { state: STATE_ERROR, byte: b'a', offset: 0 });
    }

    #[test]
    fn set_state_recovers_from_the_error_state() {
        let def = two_state();
        let mut ctx = Context::new(&def, Vec::new());
        ctx.parse(b"ac").unwrap_err();
        ctx.set_state(0);
        assert_eq!(ctx.parse(b"ab"), Ok(2));
        assert_eq!(ctx.state(), 0);
    }

    #[test]
    fn hook_order_for_a_transition() {
        let mut def = two_state();
        def.on_exit(0, |ctx, state, byte, next| {
            ctx.user.push(format!("exit {state} {} {next}", byte as char));
        })
        .unwrap();
        def.on_each_byte(0, |ctx, state, byte, next| {
            ctx.user.push(format!("each {state} {} {next}", byte as char));
        })
        .unwrap();
        def.on_enter(1, |ctx, state, byte, next| {
            ctx.user.push(format!("enter {state} {} {next}", byte as char));
        })
        .unwrap();

        let mut ctx = Context::new(&def, Vec::new());
        ctx.parse(b"a").unwrap();
        assert_eq!(ctx.user, vec!["exit 0 a 1", "each 0 a 1", "enter 1 a 1"]);
    }

    #[test]
    fn self_loop_fires_each_byte_only() {
        let mut def: Definition<Vec<String>> = Definition::new(1).unwrap();
        def.populate(&[Transition::new(Condition::Byte(b'x'), 0, 0)]).unwrap();
        def.on_enter(0, |ctx, _, _, _| ctx.user.push("enter".into())).unwrap();
        def.on_exit(0, |ctx, _, _, _| ctx.user.push("exit".into())).unwrap();
        def.on_each_byte(0, |ctx, _, _, _| ctx.user.push("each".into())).unwrap();

        let mut ctx = Context::new(&def, Vec::new());
        ctx.parse(b"xxx").unwrap();
        assert_eq!(ctx.user, vec!["each", "each", "each"]);
    }

    #[test]
    fn enter_hook_does_not_fire_for_the_initial_state() {
        let mut def = two_state();
        def.on_enter(0, |ctx, _, _, _| ctx.user.push("enter 0".into())).unwrap();

        let mut ctx = Context::new(&def, Vec::new());
        ctx.parse(b"a").unwrap();
        assert!(ctx.user.is_empty());
        // Coming back around does fire it.
        ctx.parse(b"b").unwrap();
        assert_eq!(ctx.user, vec!["enter 0"]);
    }

    #[test]
    fn no_hooks_fire_for_the_unconsumed_byte() {
        let mut def = two_state();
        def.on_each_byte(1, |ctx, _, byte, _| ctx.user.push(format!("each {}", byte as char)))
            .unwrap();
        def.on_exit(1, |ctx, _, _, _| ctx.user.push("exit".into())).unwrap();

        let mut ctx = Context::new(&def, Vec::new());
        ctx.parse(b"ac").unwrap_err();
        assert!(ctx.user.is_empty());
    }

    #[test]
    fn exit_hook_can_redirect_the_transition() {
        let mut def: Definition<Vec<String>> = Definition::new(3).unwrap();
        def.populate(&[Transition::new(Condition::Byte(b'a'), 0, 1)]).unwrap();
        def.on_exit(0, |ctx, _, _, _| ctx.set_next_state(2)).unwrap();
        def.on_enter(1, |ctx, _, _, _| ctx.user.push("enter 1".into())).unwrap();
        def.on_enter(2, |ctx, state, _, next| {
            ctx.user.push(format!("enter {state} {next}"));
        })
        .unwrap();

        let mut ctx = Context::new(&def, Vec::new());
        ctx.parse(b"a").unwrap();
        assert_eq!(ctx.state(), 2);
        assert_eq!(ctx.user, vec!["enter 2 2"]);
    }

    #[test]
    fn redirect_to_self_suppresses_the_enter_hook() {
        let mut def: Definition<Vec<String>> = Definition::new(2).unwrap();
        def.populate(&[Transition::new(Condition::Byte(b'a'), 0, 1)]).unwrap();
        def.on_each_byte(0, |ctx, state, _, _| ctx.set_next_state(state)).unwrap();
        def.on_enter(1, |ctx, _, _, _| ctx.user.push("enter 1".into())).unwrap();

        let mut ctx = Context::new(&def, Vec::new());
        ctx.parse(b"a").unwrap();
        assert_eq!(ctx.state(), 0);
        assert!(ctx.user.is_empty());
    }

    #[test]
    fn recording_captures_consumed_bytes_in_order() {
        let def = two_state();
        let mut ctx = Context::new(&def, Vec::new());
        ctx.start_record();
        ctx.parse(b"abab").unwrap();
        assert_eq!(ctx.record_len(), 4);
        assert_eq!(ctx.record_buffer(), b"abab");
        assert_eq!(ctx.stop_record(), b"abab");
    }

    #[test]
    fn recording_tracks_length_at_every_point() {
        let def = two_state();
        let mut ctx = Context::new(&def, Vec::new());
        ctx.start_record();
        for (i, chunk) in [b"a", b"b", b"a"].iter().enumerate() {
            ctx.parse(*chunk).unwrap();
            assert_eq!(ctx.record_len(), i + 1);
        }
    }

    #[test]
    fn the_failed_byte_is_not_recorded() {
        let def = two_state();
        let mut ctx = Context::new(&def, Vec::new());
        ctx.start_record();
        ctx.parse(b"ac").unwrap_err();
        assert_eq!(ctx.stop_record(), b"a");
    }

    #[test]
    fn record_overflow_fails_loudly_and_is_resumable() {
        let mut def: Definition<()> = Definition::new(1).unwrap();
        def.populate(&[Transition::new(Condition::Any, 0, 0)]).unwrap();

        let input = vec![b'x'; RECORD_BUFFER_SIZE + 10];
        let mut ctx = Context::new(&def, ());
        ctx.start_record();
        let err = ctx.parse(&input).unwrap_err();
        assert_eq!(
            err,
            ParseError::RecordOverflow { offset: RECORD_BUFFER_SIZE, capacity: RECORD_BUFFER_SIZE }
        );
        // State untouched, buffer intact up to capacity.
        assert_eq!(ctx.state(), 0);
        assert_eq!(ctx.stop_record().len(), RECORD_BUFFER_SIZE);
        // Resume at the reported offset with recording off.
        assert_eq!(ctx.parse(&input[err.offset()..]), Ok(10));
    }
}
