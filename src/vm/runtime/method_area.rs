//! The method area: a process-lifetime registry of loaded classes.
//!
//! Built-in classes (`java/lang/Object`, `java/lang/String`,
//! `java/io/PrintStream`, `java/lang/System`, `java/util/Scanner`) are
//! installed once at bootstrap so that opcode dispatch against them
//! always succeeds, even though none of them carry real bytecode.

use crate::classfile::{member_key, ClassHeader, Classfile, ClassfileError, Method, MethodFlags};
use crate::reader::MaskedReader;
use crate::vm::runtime::heap::{Handle, Object};
use dashmap::DashMap;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("class not loaded: {0}")]
    ClassNotLoaded(String),
    #[error("main([Ljava/lang/String;)V not found in class {0}")]
    MainNotFound(String),
    #[error(transparent)]
    Classfile(#[from] ClassfileError),
}

/// A loaded class: name, field/method maps, and (for user classes) the
/// constant pool they were decoded from. Built-in classes carry no
/// constant pool and no bytecode, but are still registered with the
/// member list the registry promises for them.
#[derive(Debug)]
pub(crate) struct Class {
    pub name: String,
    pub decoded: Option<Classfile>,
    pub methods: IndexMap<String, Method>,
    pub static_out: RwLock<Option<Handle>>,
}

impl Class {
    /// Registers a synthetic class with no bytecode, carrying only the
    /// `(name, descriptor)` member records it's documented to expose.
    fn builtin(name: &str, members: &[(&str, &str)]) -> Self {
        let methods = members
            .iter()
            .map(|(name, descriptor)| {
                let method = Method {
                    name: name.to_string(),
                    descriptor: descriptor.to_string(),
                    flags: MethodFlags::PUBLIC,
                    code: None,
                };
                (member_key(name, descriptor), method)
            })
            .collect();

        Class {
            name: name.to_string(),
            decoded: None,
            methods,
            static_out: RwLock::new(None),
        }
    }

    fn from_decoded(classfile: Classfile) -> Self {
        Class {
            name: classfile.name.clone(),
            methods: classfile.methods.clone(),
            decoded: Some(classfile),
            static_out: RwLock::new(None),
        }
    }

    /// Resolves a `(name, descriptor)` member. Invoke dispatch never
    /// actually consults this — built-ins are matched by bare
    /// `(name, descriptor)` against a hard-coded table regardless of
    /// owning class — but the registry still carries the member records
    /// the built-in classes are documented to expose.
    pub fn find_method(&self, name: &str, descriptor: &str) -> Option<&Method> {
        self.methods.get(&member_key(name, descriptor))
    }
}

/// Process-lifetime class registry. Classes, once installed, live for as
/// long as the registry does.
pub(crate) struct MethodArea {
    classes: DashMap<String, Arc<Class>>,
}

static METHOD_AREA: OnceCell<MethodArea> = OnceCell::new();

pub(crate) fn with_method_area<C, R>(callback: C) -> R
where
    C: FnOnce(&MethodArea) -> R,
{
    let area = METHOD_AREA.get_or_init(MethodArea::bootstrap);
    callback(area)
}

impl MethodArea {
    const PRINT_STREAM: &'static str = "java/io/PrintStream";

    /// Installs the five built-in classes, each with exactly the members
    /// it's documented to carry, and binds the well-known `System.out`
    /// handle used by the `getstatic` shortcut.
    fn bootstrap() -> Self {
        let classes = DashMap::new();

        let builtins: [(&str, &[(&str, &str)]); 4] = [
            ("java/lang/Object", &[]),
            ("java/lang/String", &[("equals", "(Ljava/lang/Object;)Z")]),
            (
                Self::PRINT_STREAM,
                &[
                    ("println", "(Ljava/lang/String;)V"),
                    ("println", "(I)V"),
                ],
            ),
            (
                "java/util/Scanner",
                &[
                    ("nextLine", "()Ljava/lang/String;"),
                    ("nextInt", "()I"),
                ],
            ),
        ];

        for (name, members) in builtins {
            classes.insert(name.to_string(), Arc::new(Class::builtin(name, members)));
        }

        let system = Class::builtin("java/lang/System", &[]);
        let print_stream = Object::new_instance(Self::PRINT_STREAM);
        *system.static_out.write() = Some(print_stream);
        classes.insert("java/lang/System".to_string(), Arc::new(system));

        MethodArea { classes }
    }

    pub fn get(&self, classname: &str) -> Result<Arc<Class>, RuntimeError> {
        self.classes
            .get(classname)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| RuntimeError::ClassNotLoaded(classname.to_string()))
    }

    /// The handle `getstatic` always pushes, regardless of which field is
    /// addressed — this engine only ever models one static output stream.
    pub fn well_known_print_stream(&self) -> Handle {
        self.classes
            .get("java/lang/System")
            .and_then(|entry| entry.static_out.read().clone())
            .expect("System.out bound during bootstrap")
    }

    /// Decodes `buffer` and installs the resulting class under its
    /// resolved name, unless a class of that name is already registered —
    /// in which case decoding short-circuits and the existing class is
    /// returned as-is.
    pub fn load_from_bytes(&self, buffer: &[u8]) -> Result<Arc<Class>, RuntimeError> {
        let mut reader = MaskedReader::new(buffer);
        let header: ClassHeader = Classfile::read_header(&mut reader)?;

        if let Some(existing) = self.classes.get(&header.name) {
            return Ok(Arc::clone(existing.value()));
        }

        let classfile = header.finish(&mut reader)?;
        let class = Arc::new(Class::from_decoded(classfile));
        self.classes
            .insert(class.name.clone(), Arc::clone(&class));
        Ok(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_installs_the_five_builtins() {
        let area = MethodArea::bootstrap();

        for name in [
            "java/lang/Object",
            "java/lang/String",
            "java/io/PrintStream",
            "java/lang/System",
            "java/util/Scanner",
        ] {
            assert!(area.get(name).is_ok(), "{name} should be registered");
        }
    }

    #[test]
    fn print_stream_handle_is_stable() {
        let area = MethodArea::bootstrap();
        let a = area.well_known_print_stream();
        let b = area.well_known_print_stream();
        assert!(crate::vm::runtime::heap::identical(&a, &b));
    }

    #[test]
    fn missing_class_reports_not_loaded() {
        let area = MethodArea::bootstrap();
        assert!(matches!(
            area.get("does/not/Exist"),
            Err(RuntimeError::ClassNotLoaded(_))
        ));
    }

    #[test]
    fn builtins_carry_their_documented_members() {
        let area = MethodArea::bootstrap();

        let string_class = area.get("java/lang/String").unwrap();
        assert!(string_class
            .find_method("equals", "(Ljava/lang/Object;)Z")
            .is_some());

        let print_stream = area.get("java/io/PrintStream").unwrap();
        assert!(print_stream
            .find_method("println", "(Ljava/lang/String;)V")
            .is_some());
        assert!(print_stream.find_method("println", "(I)V").is_some());

        let scanner = area.get("java/util/Scanner").unwrap();
        assert!(scanner
            .find_method("nextLine", "()Ljava/lang/String;")
            .is_some());
        assert!(scanner.find_method("nextInt", "()I").is_some());

        let object_class = area.get("java/lang/Object").unwrap();
        assert!(object_class.find_method("equals", "(Ljava/lang/Object;)Z").is_none());
    }
}
