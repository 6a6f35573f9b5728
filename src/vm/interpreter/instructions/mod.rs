//! Opcode dispatch, grouped the way the instruction set itself groups:
//! constant pushes, local loads/stores, raw stack shuffles, integer math,
//! branches, and method/field access.

pub(crate) mod opcode;

mod comparisons;
mod constants;
mod invoke;
mod loads;
mod math;
mod stack_ops;
mod stores;

use self::opcode::Opcode::{self, *};
use super::{Effect, ExecutionContext, InterpreterError};
use super::stack::Frame;
use tracing::warn;

pub(crate) fn process(
    opcode: Opcode,
    frame: &mut Frame,
    ctx: &mut ExecutionContext,
) -> Result<Effect, InterpreterError> {
    match opcode {
        NOP | ACONST_NULL | ICONST_M1 | ICONST_0 | ICONST_1 | ICONST_2 | ICONST_3 | ICONST_4
        | ICONST_5 | DCONST_0 | BIPUSH | SIPUSH | LDC | LDC_W => {
            constants::process(opcode, frame, ctx)
        }

        ILOAD | ALOAD | ILOAD_0 | ILOAD_1 | ILOAD_2 | ILOAD_3 | ALOAD_0 | ALOAD_1 | ALOAD_2
        | ALOAD_3 => loads::process(opcode, frame),

        ISTORE | ASTORE | ISTORE_0 | ISTORE_1 | ISTORE_2 | ISTORE_3 | ASTORE_0 | ASTORE_1
        | ASTORE_2 | ASTORE_3 => stores::process(opcode, frame),

        POP | DUP => stack_ops::process(opcode, frame),

        IADD | ISUB | IMUL | IDIV | IINC => math::process(opcode, frame),

        IFEQ | IFNE | IFLT | IFGE | IFGT | IFLE | IF_ICMPEQ | IF_ICMPNE | IF_ICMPLT
        | IF_ICMPGE | IF_ICMPGT | IF_ICMPLE | IF_ACMPEQ | IF_ACMPNE | GOTO => {
            comparisons::process(opcode, frame)
        }

        GETSTATIC | INVOKEVIRTUAL | INVOKESTATIC | RETURN => invoke::process(opcode, frame, ctx),

        UNIMPLEMENTED => {
            warn!(pc = frame.pc, "unimplemented opcode, treating as no-op");
            Ok(Effect::Continue)
        }
    }
}
