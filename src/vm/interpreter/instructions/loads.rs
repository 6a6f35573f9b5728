//! Local-variable loads: `iload`/`aload` and their `_0`..`_3` shorthands.

use super::opcode::Opcode::{self, *};
use crate::vm::interpreter::{Effect, InterpreterError};
use crate::vm::interpreter::stack::Frame;
use tracing::trace;

pub(in crate::vm::interpreter::instructions) fn process(
    opcode: Opcode,
    frame: &mut Frame,
) -> Result<Effect, InterpreterError> {
    let index = match opcode {
        ILOAD | ALOAD => frame.fetch().map(|b| b as usize),
        ILOAD_0 | ALOAD_0 => Some(0),
        ILOAD_1 | ALOAD_1 => Some(1),
        ILOAD_2 | ALOAD_2 => Some(2),
        ILOAD_3 | ALOAD_3 => Some(3),
        _ => unreachable!("loads::process called with {opcode:?}"),
    };

    if let Some(index) = index {
        if let Some(value) = frame.local(index).cloned() {
            trace!(?opcode, index, ?value, "load");
            frame.push(value);
        }
    }

    Ok(Effect::Continue)
}
