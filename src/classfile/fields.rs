//! `field_info`/`method_info` structures, JVMS §4.5/§4.6 — narrowed to
//! what the decoder needs: name, descriptor, the `static` flag, and (for
//! methods) the parsed `Code` attribute.

use bitflags::bitflags;

use crate::classfile::attributes::Code;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct FieldFlags: u16 {
        const PUBLIC    = 0x0001;
        const PRIVATE   = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC    = 0x0008;
        const FINAL     = 0x0010;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct MethodFlags: u16 {
        const PUBLIC    = 0x0001;
        const PRIVATE   = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC    = 0x0008;
        const FINAL     = 0x0010;
    }
}

/// Key a field or method is stored under in the owning class's map.
pub(crate) fn member_key(name: &str, descriptor: &str) -> String {
    format!("{name}{descriptor}")
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Field {
    pub name: String,
    pub descriptor: String,
    pub flags: FieldFlags,
}

impl Field {
    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldFlags::STATIC)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Method {
    pub name: String,
    pub descriptor: String,
    pub flags: MethodFlags,
    pub code: Option<Code>,
}

impl Method {
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }
}
