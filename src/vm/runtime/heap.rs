//! Reference-counted object storage.
//!
//! This engine only ever allocates two kinds of heap object: built-in
//! `PrintStream`/`Scanner` instances (created once, at bootstrap) and
//! `String` objects (created fresh on every `ldc`/`ldc_w` of a string
//! constant, and by the `input` built-in). Arrays and user-defined
//! instance fields are out of scope.

use std::sync::Arc;

/// A heap object. Identity comparison (`if_acmp*`) compares `Arc` pointer
/// equality; `String.equals` compares `payload` instead.
///
/// `Arc` rather than `Rc`: the method area's well-known `PrintStream`
/// handle (`vm::runtime::method_area`) lives behind a process-lifetime
/// `static`, which requires `Sync` even though this engine never actually
/// shares a handle across threads.
#[derive(Debug, Clone)]
pub(crate) struct Object {
    pub class_name: String,
    /// Present only for `java/lang/String` instances.
    pub payload: Option<String>,
}

pub(crate) type Handle = Arc<Object>;

impl Object {
    pub fn new_string(value: impl Into<String>) -> Handle {
        Arc::new(Object {
            class_name: "java/lang/String".to_string(),
            payload: Some(value.into()),
        })
    }

    pub fn new_instance(class_name: impl Into<String>) -> Handle {
        Arc::new(Object {
            class_name: class_name.into(),
            payload: None,
        })
    }

    pub fn is_string(&self) -> bool {
        self.class_name == "java/lang/String"
    }
}

/// Reference identity: do `a` and `b` name the same heap allocation?
pub(crate) fn identical(a: &Handle, b: &Handle) -> bool {
    Arc::ptr_eq(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_ldc_of_same_text_have_equal_payload_but_different_identity() {
        let a = Object::new_string("hi");
        let b = Object::new_string("hi");

        assert_eq!(a.payload, b.payload);
        assert!(!identical(&a, &b));
        assert!(identical(&a, &a.clone()));
    }
}
