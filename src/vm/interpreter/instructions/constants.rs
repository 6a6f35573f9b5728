//! `nop`, the constant-push family, `bipush`/`sipush`, and `ldc`/`ldc_w`.

use super::opcode::Opcode::{self, *};
use crate::classfile::ConstantPoolEntry;
use crate::vm::interpreter::{Effect, ExecutionContext, InterpreterError};
use crate::vm::interpreter::stack::{Frame, Value};
use crate::vm::runtime::heap::Object;
use tracing::trace;

pub(in crate::vm::interpreter::instructions) fn process(
    opcode: Opcode,
    frame: &mut Frame,
    ctx: &mut ExecutionContext,
) -> Result<Effect, InterpreterError> {
    match opcode {
        NOP => trace!("NOP"),

        ACONST_NULL | DCONST_0 => {
            // DCONST_0 stands in for the `double` constant this engine
            // never really materialises.
            frame.push(Value::Ref(None));
        }

        ICONST_M1 => frame.push(Value::Int(-1)),
        ICONST_0 => frame.push(Value::Int(0)),
        ICONST_1 => frame.push(Value::Int(1)),
        ICONST_2 => frame.push(Value::Int(2)),
        ICONST_3 => frame.push(Value::Int(3)),
        ICONST_4 => frame.push(Value::Int(4)),
        ICONST_5 => frame.push(Value::Int(5)),

        BIPUSH => {
            if let Some(v) = frame.fetch_i8() {
                frame.push(Value::Int(v as i32));
            }
        }

        SIPUSH => {
            if let Some(v) = frame.fetch_i16() {
                frame.push(Value::Int(v as i32));
            }
        }

        LDC => {
            if let Some(index) = frame.fetch() {
                load_constant(frame, ctx, index as u16);
            }
        }

        LDC_W => {
            if let Some(index) = frame.fetch_u16() {
                load_constant(frame, ctx, index);
            }
        }

        _ => unreachable!("constants::process called with {opcode:?}"),
    }

    Ok(Effect::Continue)
}

fn load_constant(frame: &mut Frame, ctx: &mut ExecutionContext, index: u16) {
    let Ok(class) = ctx.method_area.get(&frame.classname) else {
        return;
    };
    let Some(classfile) = class.decoded.as_ref() else {
        return;
    };

    match classfile.constant_pool.get(index) {
        Ok(ConstantPoolEntry::StringRef { utf8_index }) => {
            if let Ok(text) = classfile.constant_pool.get_utf8(*utf8_index) {
                frame.push(Value::Ref(Some(Object::new_string(text))));
            }
        }
        Ok(ConstantPoolEntry::Integer(value)) => frame.push(Value::Int(*value)),
        _ => trace!("ldc: index {index} did not resolve to a String or Integer, ignoring"),
    }
}
