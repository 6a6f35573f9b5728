//! The runtime constant pool: a per-class indexed table of immutable
//! constants (strings, integers, class/method/field references).
//!
//! Specification for the constant pool in the JVM:
//! <https://docs.oracle.com/javase/specs/jvms/se8/html/jvms-2.html#jvms-2.5.5>

use crate::reader::{MaskedReader, ReaderError};
use thiserror::Error;

/// A single entry in the constant pool. Index 0 is never populated: it is
/// the reserved sentinel slot the format mandates.
#[derive(Debug, PartialEq, Clone)]
pub(crate) enum ConstantPoolEntry {
    Utf8(String),
    Integer(i32),
    /// Long/Double payloads are kept only so the two-slot skip rule can be
    /// exercised and the bytes aren't silently swallowed; no opcode in this
    /// engine's supported set ever loads one (Non-goal: 64-bit arithmetic).
    Long(i64),
    Double(f64),
    Class {
        name_index: u16,
    },
    StringRef {
        utf8_index: u16,
    },
    FieldRef {
        class_index: u16,
        name_and_type_index: u16,
    },
    MethodRef {
        class_index: u16,
        name_and_type_index: u16,
    },
    InterfaceMethodRef {
        class_index: u16,
        name_and_type_index: u16,
    },
    NameAndType {
        name_index: u16,
        descriptor_index: u16,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum ConstantPoolError {
    #[error("invalid constant pool index: {0}")]
    InvalidIndex(u16),
    #[error("accessed reserved slot: {0}")]
    UnusableSlot(u16),
    #[error("constant pool entry at {0} has the wrong tag for this use")]
    WrongTag(u16),
    #[error("unknown constant pool tag: {0}")]
    UnknownTag(u8),
    #[error(transparent)]
    Reader(#[from] ReaderError),
    #[error("invalid modified utf-8 at index {0}")]
    InvalidUtf8(u16),
}

/// Indexed table of [`ConstantPoolEntry`]. 1-based, matching the format.
#[derive(Debug, PartialEq, Clone)]
pub(crate) struct ConstantPool {
    entries: Vec<Option<ConstantPoolEntry>>,
}

impl ConstantPool {
    /// Reads `cp_count - 1` entries (index 0 is the unused sentinel).
    pub fn new(reader: &mut MaskedReader) -> Result<Self, ConstantPoolError> {
        let cp_count = reader.read_u2()? as usize;
        let mut pool = ConstantPool {
            entries: Vec::with_capacity(cp_count),
        };
        pool.entries.push(None); // index 0, unused

        let mut idx = 1;
        while idx < cp_count {
            let tag = reader.read_u1()?;
            let entry = match tag {
                1 => {
                    let len = reader.read_u2()? as usize;
                    let bytes = reader.read_bytes(len)?;
                    let text = cesu8::from_java_cesu8(&bytes)
                        .map_err(|_| ConstantPoolError::InvalidUtf8(idx as u16))?;
                    ConstantPoolEntry::Utf8(text.into_owned())
                }
                3 => ConstantPoolEntry::Integer(reader.read_u4()? as i32),
                4 => {
                    reader.read_u4()?; // Float, unused by this engine
                    ConstantPoolEntry::Integer(0)
                }
                5 => {
                    let hi = reader.read_u4()? as i64;
                    let lo = reader.read_u4()? as i64;
                    pool.entries.push(Some(ConstantPoolEntry::Long((hi << 32) | lo)));
                    pool.entries.push(None); // second slot, unusable
                    idx += 2;
                    continue;
                }
                6 => {
                    let hi = reader.read_u4()? as u64;
                    let lo = reader.read_u4()? as u64;
                    let bits = (hi << 32) | lo;
                    pool.entries
                        .push(Some(ConstantPoolEntry::Double(f64::from_bits(bits))));
                    pool.entries.push(None); // second slot, unusable
                    idx += 2;
                    continue;
                }
                7 => ConstantPoolEntry::Class {
                    name_index: reader.read_u2()?,
                },
                8 => ConstantPoolEntry::StringRef {
                    utf8_index: reader.read_u2()?,
                },
                9 => {
                    let class_index = reader.read_u2()?;
                    let name_and_type_index = reader.read_u2()?;
                    ConstantPoolEntry::FieldRef {
                        class_index,
                        name_and_type_index,
                    }
                }
                10 => {
                    let class_index = reader.read_u2()?;
                    let name_and_type_index = reader.read_u2()?;
                    ConstantPoolEntry::MethodRef {
                        class_index,
                        name_and_type_index,
                    }
                }
                11 => {
                    let class_index = reader.read_u2()?;
                    let name_and_type_index = reader.read_u2()?;
                    ConstantPoolEntry::InterfaceMethodRef {
                        class_index,
                        name_and_type_index,
                    }
                }
                12 => {
                    let name_index = reader.read_u2()?;
                    let descriptor_index = reader.read_u2()?;
                    ConstantPoolEntry::NameAndType {
                        name_index,
                        descriptor_index,
                    }
                }
                other => return Err(ConstantPoolError::UnknownTag(other)),
            };

            pool.entries.push(Some(entry));
            idx += 1;
        }

        Ok(pool)
    }

    /// 1-based lookup. `0`, out-of-range, and the unusable second half of
    /// a Long/Double slot are all reported as distinct errors.
    pub fn get(&self, index: u16) -> Result<&ConstantPoolEntry, ConstantPoolError> {
        if index == 0 {
            return Err(ConstantPoolError::UnusableSlot(index));
        }
        match self.entries.get(index as usize) {
            Some(Some(entry)) => Ok(entry),
            Some(None) => Err(ConstantPoolError::UnusableSlot(index)),
            None => Err(ConstantPoolError::InvalidIndex(index)),
        }
    }

    pub fn get_utf8(&self, index: u16) -> Result<&str, ConstantPoolError> {
        match self.get(index)? {
            ConstantPoolEntry::Utf8(s) => Ok(s.as_str()),
            _ => Err(ConstantPoolError::WrongTag(index)),
        }
    }

    /// Resolves `this_class`/`super_class`/`ClassRef` indirection down to
    /// the class's name string.
    pub fn get_classname(&self, class_index: u16) -> Result<&str, ConstantPoolError> {
        match self.get(class_index)? {
            ConstantPoolEntry::Class { name_index } => self.get_utf8(*name_index),
            _ => Err(ConstantPoolError::WrongTag(class_index)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(bytes: &[u8]) -> Vec<u8> {
        const KEY: [u8; 20] = [
            0xAA, 0x3F, 0xC2, 0x7D, 0x91, 0x4B, 0x6E, 0xF0, 0x12, 0x8D, 0x55, 0x99, 0x0A, 0xDE,
            0x6B, 0x3C, 0x47, 0x81, 0x2F, 0xB4,
        ];
        bytes
            .iter()
            .enumerate()
            .map(|(i, b)| b ^ KEY[i % KEY.len()])
            .collect()
    }

    fn u16_be(v: u16) -> [u8; 2] {
        v.to_be_bytes()
    }

    #[test]
    fn decodes_utf8_and_integer_entries() {
        let mut raw = Vec::new();
        raw.extend(u16_be(3)); // cp_count: slots 1, 2 used
        raw.push(1); // tag Utf8
        raw.extend(u16_be(5));
        raw.extend(b"hello");
        raw.push(3); // tag Integer
        raw.extend(42i32.to_be_bytes());

        let masked = mask(&raw);
        let mut reader = MaskedReader::new(&masked);
        let pool = ConstantPool::new(&mut reader).unwrap();

        assert_eq!(pool.get_utf8(1).unwrap(), "hello");
        assert_eq!(pool.get(2).unwrap(), &ConstantPoolEntry::Integer(42));
    }

    #[test]
    fn long_and_double_occupy_two_slots() {
        let mut raw = Vec::new();
        raw.extend(u16_be(4)); // slots 1-2 = Long, slot 3 = Utf8 "x"
        raw.push(5); // tag Long
        raw.extend(1i64.to_be_bytes());
        raw.push(1); // tag Utf8
        raw.extend(u16_be(1));
        raw.extend(b"x");

        let masked = mask(&raw);
        let mut reader = MaskedReader::new(&masked);
        let pool = ConstantPool::new(&mut reader).unwrap();

        assert_eq!(pool.get(1).unwrap(), &ConstantPoolEntry::Long(1));
        assert!(matches!(
            pool.get(2),
            Err(ConstantPoolError::UnusableSlot(2))
        ));
        assert_eq!(pool.get_utf8(3).unwrap(), "x");
    }

    #[test]
    fn index_zero_and_out_of_range_are_errors() {
        let mut raw = Vec::new();
        raw.extend(u16_be(1));
        let masked = mask(&raw);
        let mut reader = MaskedReader::new(&masked);
        let pool = ConstantPool::new(&mut reader).unwrap();

        assert!(matches!(pool.get(0), Err(ConstantPoolError::UnusableSlot(0))));
        assert!(matches!(
            pool.get(99),
            Err(ConstantPoolError::InvalidIndex(99))
        ));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut raw = Vec::new();
        raw.extend(u16_be(2));
        raw.push(200); // unknown tag
        let masked = mask(&raw);
        let mut reader = MaskedReader::new(&masked);

        assert!(matches!(
            ConstantPool::new(&mut reader),
            Err(ConstantPoolError::UnknownTag(200))
        ));
    }
}
