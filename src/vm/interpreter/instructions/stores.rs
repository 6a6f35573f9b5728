//! Local-variable stores: `istore`/`astore` and their `_0`..`_3` shorthands.

use super::opcode::Opcode::{self, *};
use crate::vm::interpreter::{Effect, InterpreterError};
use crate::vm::interpreter::stack::Frame;
use tracing::trace;

pub(in crate::vm::interpreter::instructions) fn process(
    opcode: Opcode,
    frame: &mut Frame,
) -> Result<Effect, InterpreterError> {
    let index = match opcode {
        ISTORE | ASTORE => frame.fetch().map(|b| b as usize),
        ISTORE_0 | ASTORE_0 => Some(0),
        ISTORE_1 | ASTORE_1 => Some(1),
        ISTORE_2 | ASTORE_2 => Some(2),
        ISTORE_3 | ASTORE_3 => Some(3),
        _ => unreachable!("stores::process called with {opcode:?}"),
    };

    if let Some(index) = index {
        if let Some(value) = frame.pop() {
            trace!(?opcode, index, ?value, "store");
            frame.set_local(index, value);
        }
    }

    Ok(Effect::Continue)
}
