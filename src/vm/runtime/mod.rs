//! Runtime data areas: the method area (loaded classes, live for the
//! process's lifetime) and the heap (reference-counted objects).

pub(crate) mod heap;
pub(crate) mod method_area;

pub(crate) use method_area::{MethodArea, RuntimeError};
