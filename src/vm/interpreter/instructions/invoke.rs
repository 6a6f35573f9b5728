//! `getstatic`, `invokevirtual`/`invokestatic`, and `return`.
//!
//! Method resolution walks the constant-pool indirection chain
//! (`MethodRef` → `Class.name_index` → `Utf8`; `NameAndType` →
//! name/descriptor `Utf8`s) down to a bare `(name, descriptor)` pair,
//! then looks that pair up in a small built-in dispatch table. Nothing
//! else is callable: there is no user-defined method invocation, so a
//! resolved pair that isn't one of the built-ins is a silent no-op.

use super::opcode::Opcode::{self, *};
use crate::classfile::{ConstantPool, ConstantPoolEntry};
use crate::vm::interpreter::stack::{Frame, Value};
use crate::vm::interpreter::{Effect, ExecutionContext, InterpreterError};
use crate::vm::runtime::heap::Object;
use std::io::{BufRead, Write};
use tracing::warn;

pub(in crate::vm::interpreter::instructions) fn process(
    opcode: Opcode,
    frame: &mut Frame,
    ctx: &mut ExecutionContext,
) -> Result<Effect, InterpreterError> {
    match opcode {
        RETURN => return Ok(Effect::Return),

        GETSTATIC => {
            let _index = frame.fetch_u16();
            frame.push(Value::Ref(Some(ctx.method_area.well_known_print_stream())));
        }

        INVOKEVIRTUAL | INVOKESTATIC => {
            let Some(index) = frame.fetch_u16() else {
                return Ok(Effect::Continue);
            };
            let has_receiver = opcode == INVOKEVIRTUAL;
            invoke(frame, ctx, index, has_receiver);
        }

        _ => unreachable!("invoke::process called with {opcode:?}"),
    }

    Ok(Effect::Continue)
}

fn invoke(frame: &mut Frame, ctx: &mut ExecutionContext, index: u16, has_receiver: bool) {
    let Some((name, descriptor)) = resolve_name_and_type(frame, ctx, index) else {
        return;
    };

    match (name.as_str(), descriptor.as_str()) {
        ("println", "(Ljava/lang/String;)V") => {
            let arg = frame.pop_ref().flatten();
            if has_receiver {
                frame.pop_ref();
            }
            let text = arg.and_then(|h| h.payload.clone()).unwrap_or_default();
            writeln_lossy(ctx.stdout, &text);
        }

        ("println", "(I)V") => {
            let arg = frame.pop_int();
            if has_receiver {
                frame.pop_ref();
            }
            if let Some(value) = arg {
                writeln_lossy(ctx.stdout, &value.to_string());
            }
        }

        ("equals", "(Ljava/lang/Object;)Z") => {
            let other = frame.pop_ref().flatten();
            let receiver = if has_receiver {
                frame.pop_ref().flatten()
            } else {
                None
            };
            let equal = match (receiver, other) {
                (Some(a), Some(b)) => a.is_string() && b.is_string() && a.payload == b.payload,
                _ => false,
            };
            frame.push(Value::Int(equal as i32));
        }

        ("input", "(Ljava/lang/String;)Ljava/lang/String;") if !has_receiver => {
            let prompt = frame.pop_ref().flatten();
            let text = prompt.and_then(|h| h.payload.clone()).unwrap_or_default();
            write_lossy(ctx.stdout, &text);

            let mut line = String::new();
            let _ = ctx.stdin.read_line(&mut line);
            while line.ends_with('\n') || line.ends_with('\r') {
                line.pop();
            }
            frame.push(Value::Ref(Some(Object::new_string(line))));
        }

        (name, descriptor) => {
            warn!(name, descriptor, "unrecognized invoke target, ignoring");
        }
    }
}

fn writeln_lossy(out: &mut dyn Write, text: &str) {
    let _ = writeln!(out, "{text}");
}

fn write_lossy(out: &mut dyn Write, text: &str) {
    let _ = write!(out, "{text}");
}

/// Resolves a constant-pool `MethodRef`/`InterfaceMethodRef` index to its
/// `(name, descriptor)` pair, against the constant pool of the class that
/// owns the currently executing frame.
fn resolve_name_and_type(
    frame: &Frame,
    ctx: &ExecutionContext,
    index: u16,
) -> Option<(String, String)> {
    let class = ctx.method_area.get(&frame.classname).ok()?;
    let classfile = class.decoded.as_ref()?;
    let pool = &classfile.constant_pool;

    let name_and_type_index = match pool.get(index).ok()? {
        ConstantPoolEntry::MethodRef {
            name_and_type_index,
            ..
        }
        | ConstantPoolEntry::InterfaceMethodRef {
            name_and_type_index,
            ..
        } => *name_and_type_index,
        _ => return None,
    };

    name_and_type(pool, name_and_type_index)
}

fn name_and_type(pool: &ConstantPool, index: u16) -> Option<(String, String)> {
    match pool.get(index).ok()? {
        ConstantPoolEntry::NameAndType {
            name_index,
            descriptor_index,
        } => {
            let name = pool.get_utf8(*name_index).ok()?.to_string();
            let descriptor = pool.get_utf8(*descriptor_index).ok()?.to_string();
            Some((name, descriptor))
        }
        _ => None,
    }
}
