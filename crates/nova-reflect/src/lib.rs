//! Runtime type reflection over a canonical store of type descriptors.
//!
//! A [`TypeStore`] resolves classes by name through a [`ClassProvider`], synthesizes array
//! types on demand, and answers structural queries through [`Class`] handles: declared and
//! inherited members, the supertype closure, assignability, modifiers, and default
//! construction.
//!
//! ```
//! use nova_reflect::TypeStore;
//!
//! let store = TypeStore::with_minimal_jdk();
//! let string = store.for_name("java.lang.String").unwrap();
//! let object = store.object();
//! assert!(object.is_assignable_from(Some(&string)).unwrap());
//! assert_eq!(string.to_string(), "class java.lang.String");
//! ```

mod class;
mod descriptor;
mod error;
mod hierarchy;
mod instance;
pub mod jdk;
mod members;
mod modifiers;
mod provider;
mod store;

pub use class::Class;
pub use descriptor::{
    ArrayDef, ClassDef, ConstructorDef, DeclaredType, FieldDef, InterfaceDef, MethodDef,
    PrimitiveType, TypeDescriptor, TypeId, TypeKind, TypeRef,
};
pub use error::{ReflectError, Result};
pub use instance::{
    ConstructorFault, ConstructorInvoker, EmptyBodyInvoker, Instance, Thrown,
    UninitializedInstance,
};
pub use jdk::MinimalJdk;
pub use members::{Constructor, Field, Method};
pub use modifiers::{Modifiers, Visibility};
pub use provider::{ChainClassProvider, ClassProvider, MapClassProvider};
pub use store::{TypeStore, WellKnownTypes};
