//! Conditional and unconditional branches: the `if<cond>` family,
//! `if_icmp<cond>`, `if_acmp{eq,ne}`, and `goto`.
//!
//! Every branch here reads a signed 16-bit offset immediately following
//! the opcode. By the time that offset is in hand, `pc` has already
//! advanced past both offset bytes, i.e. to the opcode's own address
//! plus three. Subtracting that same three back off before adding the
//! offset recovers a target relative to the opcode's address, matching
//! the official JVM's `target = opcode_address + offset` rule.

use super::opcode::Opcode::{self, *};
use crate::vm::interpreter::{Effect, InterpreterError};
use crate::vm::interpreter::stack::Frame;
use crate::vm::runtime::heap::identical;
use tracing::trace;

pub(in crate::vm::interpreter::instructions) fn process(
    opcode: Opcode,
    frame: &mut Frame,
) -> Result<Effect, InterpreterError> {
    let Some(offset) = frame.fetch_i16() else {
        return Ok(Effect::Continue);
    };

    let taken = match opcode {
        GOTO => true,

        IFEQ => frame.pop_int().map(|v| v == 0),
        IFNE => frame.pop_int().map(|v| v != 0),
        IFLT => frame.pop_int().map(|v| v < 0),
        IFGE => frame.pop_int().map(|v| v >= 0),
        IFGT => frame.pop_int().map(|v| v > 0),
        IFLE => frame.pop_int().map(|v| v <= 0),

        IF_ICMPEQ => int_pair(frame, |a, b| a == b),
        IF_ICMPNE => int_pair(frame, |a, b| a != b),
        IF_ICMPLT => int_pair(frame, |a, b| a < b),
        IF_ICMPGE => int_pair(frame, |a, b| a >= b),
        IF_ICMPGT => int_pair(frame, |a, b| a > b),
        IF_ICMPLE => int_pair(frame, |a, b| a <= b),

        IF_ACMPEQ => ref_pair(frame, true),
        IF_ACMPNE => ref_pair(frame, false),

        _ => unreachable!("comparisons::process called with {opcode:?}"),
    }
    .unwrap_or(false);

    if taken {
        let target = (frame.pc as isize - 3 + offset as isize).max(0) as usize;
        trace!(?opcode, offset, target, "branch taken");
        frame.jump_to(target);
    } else {
        trace!(?opcode, offset, "branch not taken");
    }

    Ok(Effect::Continue)
}

fn int_pair(frame: &mut Frame, cmp: impl Fn(i32, i32) -> bool) -> Option<bool> {
    let b = frame.pop_int()?;
    let a = frame.pop_int()?;
    Some(cmp(a, b))
}

fn ref_pair(frame: &mut Frame, expect_equal: bool) -> Option<bool> {
    let b = frame.pop_ref()?;
    let a = frame.pop_ref()?;
    let equal = match (&a, &b) {
        (Some(a), Some(b)) => identical(a, b),
        (None, None) => true,
        _ => false,
    };
    Some(equal == expect_equal)
}
