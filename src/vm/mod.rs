//! Ties the class loader, runtime data areas, and interpreter together
//! into a single "run this class file" entry point.

pub(crate) mod interpreter;
pub(crate) mod runtime;

use crate::classfile::ClassfileError;
use crate::vm::interpreter::stack::Frame;
use crate::vm::interpreter::{ExecutionContext, InterpreterError};
use crate::vm::runtime::{with_method_area, RuntimeError};
use std::io::{BufRead, Write};
use std::sync::Arc;
use thiserror::Error;

const MAIN_METHOD: &str = "main";
const MAIN_DESCRIPTOR: &str = "([Ljava/lang/String;)V";

#[derive(Error, Debug)]
pub enum VmError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Classfile(#[from] ClassfileError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error(transparent)]
    Interpreter(#[from] InterpreterError),
}

/// Loads `buffer` as a masked class file, resolves its
/// `main([Ljava/lang/String;)V`, and interprets it to completion, writing
/// to `stdout` and reading from `stdin`.
pub fn run(buffer: &[u8], stdout: &mut dyn Write, stdin: &mut dyn BufRead) -> Result<(), VmError> {
    with_method_area(|area| {
        let class = area.load_from_bytes(buffer)?;

        let method = class
            .find_method(MAIN_METHOD, MAIN_DESCRIPTOR)
            .ok_or_else(|| RuntimeError::MainNotFound(class.name.clone()))?;

        let code = method
            .code
            .as_ref()
            .ok_or_else(|| RuntimeError::MainNotFound(class.name.clone()))?;

        let frame = Frame::new(
            Arc::from(class.name.as_str()),
            MAIN_METHOD.to_string(),
            MAIN_DESCRIPTOR.to_string(),
            Arc::from(code.code.as_slice()),
            code.max_locals as usize,
        );

        let mut ctx = ExecutionContext {
            method_area: area,
            stdout,
            stdin,
        };

        interpreter::run(frame, &mut ctx)?;
        Ok(())
    })
}
