//! The fetch-decode-execute loop: drives a call stack of [`Frame`]s
//! against a class's bytecode until it empties out.

pub(crate) mod instructions;
pub(crate) mod stack;

use self::instructions::opcode::Opcode;
use self::stack::{Frame, StackError};
use crate::vm::runtime::{MethodArea, RuntimeError};
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum InterpreterError {
    #[error(transparent)]
    Stack(#[from] StackError),
    #[error("Division by zero")]
    DivisionByZero,
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// What an executed opcode did to the call stack.
pub(crate) enum Effect {
    Continue,
    /// The current frame returned; pop it.
    Return,
}

/// Everything an opcode handler needs besides the frame it's mutating:
/// the class registry (for constant-pool/method resolution) and the
/// process's I/O streams.
pub(crate) struct ExecutionContext<'a> {
    pub method_area: &'a MethodArea,
    pub stdout: &'a mut dyn Write,
    pub stdin: &'a mut dyn BufRead,
}

/// Runs `entry` to completion. `entry` should already be pushed with its
/// locals sized to its method's `max_locals`.
pub(crate) fn run(entry: Frame, ctx: &mut ExecutionContext) -> Result<(), InterpreterError> {
    let mut call_stack = vec![entry];

    loop {
        let Some(frame) = call_stack.last_mut() else {
            break;
        };

        let Some(byte) = frame.fetch() else {
            debug!(
                class = %frame.classname,
                method = %frame.method_name,
                "frame fell off the end of its code"
            );
            call_stack.pop();
            continue;
        };

        let opcode = Opcode::from(byte);
        let effect = instructions::process(opcode, frame, ctx)?;

        if matches!(effect, Effect::Return) {
            call_stack.pop();
        }
    }

    Ok(())
}
