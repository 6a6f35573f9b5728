//! Attribute parsing, JVMS §4.7. This engine only cares about the `Code`
//! attribute's contents; every other attribute (on a class, field, or
//! method) is read by name, then its body is skipped by its declared
//! length — the decoder never needs to understand it.

use crate::classfile::constant_pool::{ConstantPool, ConstantPoolError};
use crate::reader::MaskedReader;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
}

/// Scans an `attributes_count`-sized attribute table, returning the
/// decoded `Code` attribute if one is present (methods only ever carry at
/// most one). Every other attribute, including a second/duplicate `Code`
/// attribute, is skipped via its declared `u4` length.
pub(crate) fn read_attributes(
    reader: &mut MaskedReader,
    pool: &ConstantPool,
) -> Result<Option<Code>, ConstantPoolError> {
    let count = reader.read_u2()?;
    let mut code = None;

    for _ in 0..count {
        let name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        let name = pool.get_utf8(name_index).ok();

        if name == Some("Code") && code.is_none() {
            code = Some(read_code(reader)?);
        } else {
            reader.skip(length);
        }
    }

    Ok(code)
}

fn read_code(reader: &mut MaskedReader) -> Result<Code, ConstantPoolError> {
    let max_stack = reader.read_u2()?;
    let max_locals = reader.read_u2()?;

    let code_length = reader.read_u4()? as usize;
    let code = reader.read_bytes(code_length)?;

    let exception_table_length = reader.read_u2()?;
    reader.skip(exception_table_length as usize * 8);

    // Sub-attributes (LineNumberTable, StackMapTable, ...) are skipped the
    // same way the outer table skips attributes this engine doesn't need.
    let sub_attribute_count = reader.read_u2()?;
    for _ in 0..sub_attribute_count {
        let _name_index = reader.read_u2()?;
        let length = reader.read_u4()? as usize;
        reader.skip(length);
    }

    Ok(Code {
        max_stack,
        max_locals,
        code,
    })
}
