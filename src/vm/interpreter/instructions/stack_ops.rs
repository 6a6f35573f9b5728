//! Raw operand-stack shuffling: `pop` and `dup`.

use super::opcode::Opcode::{self, *};
use crate::vm::interpreter::{Effect, InterpreterError};
use crate::vm::interpreter::stack::Frame;
use tracing::trace;

pub(in crate::vm::interpreter::instructions) fn process(
    opcode: Opcode,
    frame: &mut Frame,
) -> Result<Effect, InterpreterError> {
    match opcode {
        POP => {
            let value = frame.pop();
            trace!(?value, "POP");
        }
        DUP => {
            if let Some(top) = frame.pop() {
                frame.push(top.clone());
                frame.push(top.clone());
                trace!(?top, "DUP");
            }
        }
        _ => unreachable!("stack_ops::process called with {opcode:?}"),
    }

    Ok(Effect::Continue)
}
