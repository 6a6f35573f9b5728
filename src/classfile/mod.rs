//! Parses and represents masked class files.
//!
//! Responsibilities:
//! - Validate the magic header and version.
//! - Decode the constant pool, field table, and method table (including
//!   each method's `Code` attribute).
//! - Resolve `this_class`'s name and register the class immediately, so a
//!   self-referencing constant pool entry resolves during decoding rather
//!   than needing a second pass.
//!
//! The decoder never evaluates bytecode and never eagerly resolves method
//! or field references — that's the interpreter's job.

mod attributes;
mod constant_pool;
mod fields;

pub(crate) use constant_pool::{ConstantPool, ConstantPoolEntry, ConstantPoolError};
pub(crate) use fields::{member_key, Field, FieldFlags, Method, MethodFlags};

use crate::reader::{MaskedReader, ReaderError};
use indexmap::IndexMap;
use thiserror::Error;

/// Magic header for this format, borrowed unchanged from the JVM class
/// file it's modeled on.
pub(crate) const MAGIC: u32 = 0xCAFE_BABE;

#[derive(Error, Debug)]
pub enum ClassfileError {
    #[error(transparent)]
    Reader(#[from] ReaderError),
    #[error("Invalid magic number")]
    InvalidMagic,
    #[error(transparent)]
    ConstantPool(#[from] ConstantPoolError),
    #[error("this_class does not resolve to a valid class reference")]
    BadClassRef,
}

/// In-memory representation of a decoded class: name, field/method
/// tables (keyed by `name+descriptor`, insertion order preserved), and
/// the constant pool they were built from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Classfile {
    pub name: String,
    pub constant_pool: ConstantPool,
    pub fields: IndexMap<String, Field>,
    pub methods: IndexMap<String, Method>,
}

impl Classfile {
    /// Decodes a masked class file from `buffer` in one pass.
    pub fn new(buffer: &[u8]) -> Result<Self, ClassfileError> {
        let mut reader = MaskedReader::new(buffer);
        let header = Self::read_header(&mut reader)?;
        header.finish(&mut reader)
    }

    /// Reads the magic/version/constant-pool/`this_class` prefix far
    /// enough to learn the class's name, then stops. The caller — the
    /// method area — checks its registry against that name before
    /// deciding whether to keep decoding via [`ClassHeader::finish`] or
    /// discard the rest of the buffer: a class already registered under
    /// this name is returned as-is rather than re-parsed.
    pub(crate) fn read_header(reader: &mut MaskedReader) -> Result<ClassHeader, ClassfileError> {
        let magic = reader.read_u4()?;
        if magic != MAGIC {
            return Err(ClassfileError::InvalidMagic);
        }
        let _minor = reader.read_u2()?;
        let _major = reader.read_u2()?;

        let constant_pool = ConstantPool::new(reader)?;

        let _access_flags = reader.read_u2()?;
        let this_class = reader.read_u2()?;
        let _super_class = reader.read_u2()?;
        let name = constant_pool
            .get_classname(this_class)
            .map_err(|_| ClassfileError::BadClassRef)?
            .to_string();

        Ok(ClassHeader {
            name,
            constant_pool,
        })
    }

    fn read_fields_and_methods(
        reader: &mut MaskedReader,
        pool: &ConstantPool,
    ) -> Result<(IndexMap<String, Field>, IndexMap<String, Method>), ClassfileError> {
        let interfaces_count = reader.read_u2()?;
        reader.skip(interfaces_count as usize * 2);

        let fields = Self::read_fields(reader, pool)?;
        let methods = Self::read_methods(reader, pool)?;
        Ok((fields, methods))
    }

    fn read_fields(
        reader: &mut MaskedReader,
        pool: &ConstantPool,
    ) -> Result<IndexMap<String, Field>, ClassfileError> {
        let count = reader.read_u2()?;
        let mut fields = IndexMap::with_capacity(count as usize);

        for _ in 0..count {
            let flags = FieldFlags::from_bits_truncate(reader.read_u2()?);
            let name_index = reader.read_u2()?;
            let descriptor_index = reader.read_u2()?;

            let name = pool.get_utf8(name_index)?.to_string();
            let descriptor = pool.get_utf8(descriptor_index)?.to_string();

            // Fields never carry a Code attribute; any attribute body is
            // skipped, matching the generic attribute-skip rule.
            attributes::read_attributes(reader, pool)?;

            let key = member_key(&name, &descriptor);
            fields.insert(
                key,
                Field {
                    name,
                    descriptor,
                    flags,
                },
            );
        }

        Ok(fields)
    }

    fn read_methods(
        reader: &mut MaskedReader,
        pool: &ConstantPool,
    ) -> Result<IndexMap<String, Method>, ClassfileError> {
        let count = reader.read_u2()?;
        let mut methods = IndexMap::with_capacity(count as usize);

        for _ in 0..count {
            let flags = MethodFlags::from_bits_truncate(reader.read_u2()?);
            let name_index = reader.read_u2()?;
            let descriptor_index = reader.read_u2()?;

            let name = pool.get_utf8(name_index)?.to_string();
            let descriptor = pool.get_utf8(descriptor_index)?.to_string();
            let code = attributes::read_attributes(reader, pool)?;

            let key = member_key(&name, &descriptor);
            methods.insert(
                key,
                Method {
                    name,
                    descriptor,
                    flags,
                    code,
                },
            );
        }

        Ok(methods)
    }

    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&Method> {
        self.methods.get(&member_key(name, descriptor))
    }
}

/// The prefix of a decoded class up to (and including) its resolved name.
/// Produced by [`Classfile::read_header`]; call [`ClassHeader::finish`] to
/// parse the rest of the buffer, or discard it if the registry already
/// holds a class under this name.
pub(crate) struct ClassHeader {
    pub name: String,
    constant_pool: ConstantPool,
}

impl ClassHeader {
    pub fn finish(self, reader: &mut MaskedReader) -> Result<Classfile, ClassfileError> {
        let (fields, methods) = Classfile::read_fields_and_methods(reader, &self.constant_pool)?;
        Ok(Classfile {
            name: self.name,
            constant_pool: self.constant_pool,
            fields,
            methods,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 20] = [
        0xAA, 0x3F, 0xC2, 0x7D, 0x91, 0x4B, 0x6E, 0xF0, 0x12, 0x8D, 0x55, 0x99, 0x0A, 0xDE, 0x6B,
        0x3C, 0x47, 0x81, 0x2F, 0xB4,
    ];

    fn mask(bytes: &[u8]) -> Vec<u8> {
        bytes
            .iter()
            .enumerate()
            .map(|(i, b)| b ^ KEY[i % KEY.len()])
            .collect()
    }

    fn utf8_entry(s: &str) -> Vec<u8> {
        let mut out = vec![1u8];
        out.extend((s.len() as u16).to_be_bytes());
        out.extend(s.as_bytes());
        out
    }

    /// Builds a minimal, well-formed class: one UTF8 ("Main"), a Class
    /// entry pointing at it, no fields, no methods, no attributes.
    fn minimal_class_bytes() -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend(MAGIC.to_be_bytes());
        raw.extend(0u16.to_be_bytes()); // minor
        raw.extend(68u16.to_be_bytes()); // major

        raw.extend(3u16.to_be_bytes()); // cp_count: slots 1 (Utf8), 2 (Class)
        raw.extend(utf8_entry("Main"));
        raw.push(7); // Class
        raw.extend(1u16.to_be_bytes()); // name_index -> "Main"

        raw.extend(0u16.to_be_bytes()); // access_flags
        raw.extend(2u16.to_be_bytes()); // this_class -> Class entry at 2
        raw.extend(0u16.to_be_bytes()); // super_class
        raw.extend(0u16.to_be_bytes()); // interfaces_count

        raw.extend(0u16.to_be_bytes()); // fields_count
        raw.extend(0u16.to_be_bytes()); // methods_count

        raw
    }

    #[test]
    fn rejects_bad_magic() {
        let bytes = mask(&[0, 0, 0, 0]);
        assert!(matches!(
            Classfile::new(&bytes),
            Err(ClassfileError::InvalidMagic)
        ));
    }

    #[test]
    fn decodes_minimal_class() {
        let bytes = mask(&minimal_class_bytes());
        let class = Classfile::new(&bytes).unwrap();

        assert_eq!(class.name, "Main");
        assert!(class.fields.is_empty());
        assert!(class.methods.is_empty());
    }

    #[test]
    fn decodes_a_method_with_code() {
        let mut raw = Vec::new();
        raw.extend(MAGIC.to_be_bytes());
        raw.extend(0u16.to_be_bytes());
        raw.extend(68u16.to_be_bytes());

        // cp: 1 Utf8 "Main", 2 Class->1, 3 Utf8 "main", 4 Utf8 "()V", 5 Utf8 "Code"
        raw.extend(6u16.to_be_bytes());
        raw.extend(utf8_entry("Main"));
        raw.push(7);
        raw.extend(1u16.to_be_bytes());
        raw.extend(utf8_entry("main"));
        raw.extend(utf8_entry("()V"));
        raw.extend(utf8_entry("Code"));

        raw.extend(0u16.to_be_bytes()); // access_flags
        raw.extend(2u16.to_be_bytes()); // this_class
        raw.extend(0u16.to_be_bytes()); // super_class
        raw.extend(0u16.to_be_bytes()); // interfaces_count
        raw.extend(0u16.to_be_bytes()); // fields_count

        raw.extend(1u16.to_be_bytes()); // methods_count
        raw.extend(0x0008u16.to_be_bytes()); // access_flags: static
        raw.extend(3u16.to_be_bytes()); // name_index -> "main"
        raw.extend(4u16.to_be_bytes()); // descriptor_index -> "()V"
        raw.extend(1u16.to_be_bytes()); // attributes_count
        raw.extend(5u16.to_be_bytes()); // attribute_name_index -> "Code"

        let code_body = {
            let mut body = Vec::new();
            body.extend(1u16.to_be_bytes()); // max_stack
            body.extend(1u16.to_be_bytes()); // max_locals
            body.extend(1u32.to_be_bytes()); // code_length
            body.push(0xB1); // return
            body.extend(0u16.to_be_bytes()); // exception_table_length
            body.extend(0u16.to_be_bytes()); // attributes_count
            body
        };
        raw.extend((code_body.len() as u32).to_be_bytes());
        raw.extend(code_body);

        let bytes = mask(&raw);
        let class = Classfile::new(&bytes).unwrap();

        let method = class.find_method("main", "()V").unwrap();
        assert!(method.is_static());
        let code = method.code.as_ref().unwrap();
        assert_eq!(code.code, vec![0xB1]);
        assert_eq!(code.max_locals, 1);
    }
}
