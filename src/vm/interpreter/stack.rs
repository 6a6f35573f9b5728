//! Operand stack, local variables, and activation frames.

use crate::vm::runtime::heap::Handle;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StackError {
    #[error("operand stack underflow")]
    Underflow,
}

/// A tagged operand/local slot. An integer slot never aliases a
/// reference slot — opcodes that expect one tag silently no-op on the
/// other rather than aborting execution.
#[derive(Debug, Clone)]
pub(crate) enum Value {
    Int(i32),
    Ref(Option<Handle>),
}

impl Value {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Ref(_) => None,
        }
    }

}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

/// One method activation: the executing method, its locals (sized to
/// `max_locals`), its operand stack, and its program counter.
pub(crate) struct Frame {
    pub classname: Arc<str>,
    pub method_name: String,
    pub descriptor: String,
    pub code: Arc<[u8]>,
    pub locals: Box<[Value]>,
    pub operands: Vec<Value>,
    pub pc: usize,
}

impl Frame {
    pub fn new(
        classname: Arc<str>,
        method_name: String,
        descriptor: String,
        code: Arc<[u8]>,
        max_locals: usize,
    ) -> Self {
        Frame {
            classname,
            method_name,
            descriptor,
            code,
            locals: (0..max_locals).map(|_| Value::default()).collect(),
            operands: Vec::new(),
            pc: 0,
        }
    }

    pub fn push(&mut self, value: Value) {
        self.operands.push(value);
    }

    /// Pops a value. Popping an empty stack is a soft failure: the opcode
    /// that triggered it becomes a no-op rather than aborting execution,
    /// so callers treat `None` as "nothing happened" rather than
    /// propagating a hard error.
    pub fn pop(&mut self) -> Option<Value> {
        self.operands.pop()
    }

    /// Pops a value and extracts its integer payload. A popped reference
    /// slot is simply discarded — the type mismatch is a soft failure,
    /// matching the original engine's "pop both operands, then check
    /// their tags before using them" behavior.
    pub fn pop_int(&mut self) -> Option<i32> {
        self.operands.pop()?.as_int()
    }

    /// Pops a value and extracts its reference payload (`Some(None)` for
    /// a popped `null`). An `Int` slot here is discarded the same way a
    /// `Ref` slot popped by [`Frame::pop_int`] would be.
    pub fn pop_ref(&mut self) -> Option<Option<Handle>> {
        match self.operands.pop()? {
            Value::Ref(r) => Some(r),
            Value::Int(_) => None,
        }
    }

    /// Reads `code[pc]` and advances `pc` by one. `None` once the frame
    /// has fallen off the end of its code, signaling natural return.
    pub fn fetch(&mut self) -> Option<u8> {
        let byte = *self.code.get(self.pc)?;
        self.pc += 1;
        Some(byte)
    }

    pub fn fetch_i8(&mut self) -> Option<i8> {
        self.fetch().map(|b| b as i8)
    }

    pub fn fetch_u16(&mut self) -> Option<u16> {
        let hi = self.fetch()? as u16;
        let lo = self.fetch()? as u16;
        Some((hi << 8) | lo)
    }

    pub fn fetch_i16(&mut self) -> Option<i16> {
        self.fetch_u16().map(|v| v as i16)
    }

    pub fn local(&self, idx: usize) -> Option<&Value> {
        self.locals.get(idx)
    }

    pub fn set_local(&mut self, idx: usize, value: Value) {
        if let Some(slot) = self.locals.get_mut(idx) {
            *slot = value;
        }
    }

    pub fn jump_to(&mut self, target: usize) {
        self.pc = target;
    }
}
