//! Integer arithmetic: `iadd`/`isub`/`imul`/`idiv` and `iinc`.

use super::opcode::Opcode::{self, *};
use crate::vm::interpreter::{Effect, InterpreterError};
use crate::vm::interpreter::stack::{Frame, Value};
use tracing::trace;

pub(in crate::vm::interpreter::instructions) fn process(
    opcode: Opcode,
    frame: &mut Frame,
) -> Result<Effect, InterpreterError> {
    match opcode {
        IADD => binary(frame, "IADD", i32::wrapping_add),
        ISUB => binary(frame, "ISUB", i32::wrapping_sub),
        IMUL => binary(frame, "IMUL", i32::wrapping_mul),

        IDIV => {
            let b = frame.pop_int();
            let a = frame.pop_int();
            match (a, b) {
                (Some(_), Some(0)) => return Err(InterpreterError::DivisionByZero),
                (Some(a), Some(b)) => {
                    let result = a.wrapping_div(b);
                    trace!(a, b, result, "IDIV");
                    frame.push(Value::Int(result));
                }
                _ => {}
            }
        }

        IINC => {
            if let (Some(index), Some(amount)) = (frame.fetch(), frame.fetch_i8()) {
                let index = index as usize;
                if let Some(Value::Int(current)) = frame.local(index) {
                    let updated = current.wrapping_add(amount as i32);
                    trace!(index, amount, updated, "IINC");
                    frame.set_local(index, Value::Int(updated));
                }
            }
        }

        _ => unreachable!("math::process called with {opcode:?}"),
    }

    Ok(Effect::Continue)
}

fn binary(frame: &mut Frame, name: &str, op: impl Fn(i32, i32) -> i32) {
    let b = frame.pop_int();
    let a = frame.pop_int();
    if let (Some(a), Some(b)) = (a, b) {
        let result = op(a, b);
        trace!(a, b, result, "{name}");
        frame.push(Value::Int(result));
    }
}
