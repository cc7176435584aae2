//! Already-parsed class facts consumed by Nova's reflection engine.
//!
//! A class-loading collaborator (jar/jmod readers, test fixtures, ...) hands over one
//! [`ClassStub`] per class: access flags, supertypes by binary name, and the raw declared member
//! lists with their JVM descriptors. This crate only models those facts and the descriptor
//! grammar; it never reads bytecode.

#![forbid(unsafe_code)]

mod descriptor;
mod error;
pub mod flags;
mod stub;

pub use crate::descriptor::{
    binary_to_internal, internal_to_binary, parse_array_class_name, parse_field_descriptor,
    parse_method_descriptor, BaseType, FieldType, MethodDescriptor, ReturnType,
};
pub use crate::error::{Error, Result};
pub use crate::stub::{ClassStub, FieldStub, InnerClassInfo, MethodStub, CLASS_INIT, INSTANCE_INIT};
