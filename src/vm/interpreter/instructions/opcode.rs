//! The narrow slice of JVM-style opcodes this interpreter recognizes.
//! Anything not listed here falls through to
//! [`super::process`]'s unimplemented-opcode diagnostic.

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, num_enum::FromPrimitive)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub(crate) enum Opcode {
    #[default]
    UNIMPLEMENTED = 0xFF,

    NOP = 0x00,
    ACONST_NULL = 0x01,
    ICONST_M1 = 0x02,
    ICONST_0 = 0x03,
    ICONST_1 = 0x04,
    ICONST_2 = 0x05,
    ICONST_3 = 0x06,
    ICONST_4 = 0x07,
    ICONST_5 = 0x08,
    /// Canonically `dconst_0`; this engine has no `double` support, so it
    /// is kept only as a stub that pushes `null`.
    DCONST_0 = 0x0E,
    BIPUSH = 0x10,
    SIPUSH = 0x11,
    LDC = 0x12,
    LDC_W = 0x13,

    ILOAD = 0x15,
    ALOAD = 0x19,
    ILOAD_0 = 0x1A,
    ILOAD_1 = 0x1B,
    ILOAD_2 = 0x1C,
    ILOAD_3 = 0x1D,
    ALOAD_0 = 0x2A,
    ALOAD_1 = 0x2B,
    ALOAD_2 = 0x2C,
    ALOAD_3 = 0x2D,

    ISTORE = 0x36,
    ASTORE = 0x3A,
    ISTORE_0 = 0x3B,
    ISTORE_1 = 0x3C,
    ISTORE_2 = 0x3D,
    ISTORE_3 = 0x3E,
    ASTORE_0 = 0x4B,
    ASTORE_1 = 0x4C,
    ASTORE_2 = 0x4D,
    ASTORE_3 = 0x4E,

    POP = 0x57,
    DUP = 0x59,

    IADD = 0x60,
    ISUB = 0x64,
    IMUL = 0x68,
    IDIV = 0x6C,

    IINC = 0x84,

    IFEQ = 0x99,
    IFNE = 0x9A,
    IFLT = 0x9B,
    IFGE = 0x9C,
    IFGT = 0x9D,
    IFLE = 0x9E,
    IF_ICMPEQ = 0x9F,
    IF_ICMPNE = 0xA0,
    IF_ICMPLT = 0xA1,
    IF_ICMPGE = 0xA2,
    IF_ICMPGT = 0xA3,
    IF_ICMPLE = 0xA4,
    IF_ACMPEQ = 0xA5,
    IF_ACMPNE = 0xA6,
    GOTO = 0xA7,

    RETURN = 0xB1,
    GETSTATIC = 0xB2,
    INVOKEVIRTUAL = 0xB6,
    INVOKESTATIC = 0xB8,
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
