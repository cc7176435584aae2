//! Immutable type descriptors and their declared member tables.

use std::sync::{Arc, OnceLock};

use nova_classfile::BaseType;

use crate::Modifiers;

/// Identity of a type inside one [`crate::TypeStore`]. Two handles denote the same type iff
/// their ids are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A member's type as recorded in a member table.
///
/// Array types are kept structural (`element` + `dimensions`) so member tables can be built
/// before the array descriptors exist; the pair is still canonical, so comparing `TypeRef`s
/// compares type identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Type(TypeId),
    Array { element: TypeId, dimensions: u8 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    /// Every primitive singleton, in the order the store allocates them.
    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Void,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// JVM descriptor character (`Z`, `I`, `V`, ...).
    pub fn descriptor_char(self) -> char {
        match self {
            PrimitiveType::Boolean => 'Z',
            PrimitiveType::Byte => 'B',
            PrimitiveType::Char => 'C',
            PrimitiveType::Short => 'S',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Float => 'F',
            PrimitiveType::Double => 'D',
            PrimitiveType::Void => 'V',
        }
    }

    pub(crate) fn id(self) -> TypeId {
        TypeId(self as u32)
    }
}

impl From<BaseType> for PrimitiveType {
    fn from(base: BaseType) -> Self {
        match base {
            BaseType::Byte => PrimitiveType::Byte,
            BaseType::Char => PrimitiveType::Char,
            BaseType::Double => PrimitiveType::Double,
            BaseType::Float => PrimitiveType::Float,
            BaseType::Int => PrimitiveType::Int,
            BaseType::Long => PrimitiveType::Long,
            BaseType::Short => PrimitiveType::Short,
            BaseType::Boolean => PrimitiveType::Boolean,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    pub modifiers: Modifiers,
    pub declaring_type: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
    pub modifiers: Modifiers,
    pub declaring_type: TypeId,
    pub is_varargs: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDef {
    pub params: Vec<TypeRef>,
    pub modifiers: Modifiers,
    pub declaring_type: TypeId,
    pub is_varargs: bool,
}

/// State shared by classes and interfaces.
#[derive(Debug)]
pub struct DeclaredType {
    pub name: String,
    pub modifiers: Modifiers,
    /// Directly implemented (or, for interfaces, extended) interfaces in declaration order.
    pub interfaces: Vec<TypeId>,
    pub fields: Vec<Arc<FieldDef>>,
    pub methods: Vec<Arc<MethodDef>>,
    /// Member classes and interfaces only.
    pub nested_types: Vec<TypeId>,
    pub enclosing_type: Option<TypeId>,
}

#[derive(Debug)]
pub struct ClassDef {
    pub decl: DeclaredType,
    pub superclass: Option<TypeId>,
    pub constructors: Vec<Arc<ConstructorDef>>,
}

#[derive(Debug)]
pub struct InterfaceDef {
    pub decl: DeclaredType,
}

#[derive(Debug)]
pub struct ArrayDef {
    /// JVM name, e.g. `[[Ljava.lang.String;`.
    pub name: String,
    /// Immediate component (itself an array when `dimensions > 1`).
    pub component: TypeId,
    /// Innermost non-array type.
    pub element: TypeId,
    pub dimensions: u8,
}

#[derive(Debug)]
pub enum TypeKind {
    Class(ClassDef),
    Interface(InterfaceDef),
    Primitive(PrimitiveType),
    Array(ArrayDef),
}

/// One resident type. Created once by the store and never mutated, except for the lazily
/// memoized supertype closure.
#[derive(Debug)]
pub struct TypeDescriptor {
    pub(crate) id: TypeId,
    pub(crate) kind: TypeKind,
    pub(crate) supertypes: OnceLock<Vec<TypeId>>,
}

impl TypeDescriptor {
    pub(crate) fn new(id: TypeId, kind: TypeKind) -> Self {
        Self {
            id,
            kind,
            supertypes: OnceLock::new(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            TypeKind::Class(def) => &def.decl.name,
            TypeKind::Interface(def) => &def.decl.name,
            TypeKind::Primitive(prim) => prim.name(),
            TypeKind::Array(def) => &def.name,
        }
    }

    pub fn declared(&self) -> Option<&DeclaredType> {
        match &self.kind {
            TypeKind::Class(def) => Some(&def.decl),
            TypeKind::Interface(def) => Some(&def.decl),
            TypeKind::Primitive(_) | TypeKind::Array(_) => None,
        }
    }

    pub fn superclass(&self) -> Option<TypeId> {
        match &self.kind {
            TypeKind::Class(def) => def.superclass,
            _ => None,
        }
    }

    pub fn declared_interfaces(&self) -> &[TypeId] {
        match self.declared() {
            Some(decl) => &decl.interfaces,
            None => &[],
        }
    }

    pub fn declared_fields(&self) -> &[Arc<FieldDef>] {
        match self.declared() {
            Some(decl) => &decl.fields,
            None => &[],
        }
    }

    pub fn declared_methods(&self) -> &[Arc<MethodDef>] {
        match self.declared() {
            Some(decl) => &decl.methods,
            None => &[],
        }
    }

    pub fn declared_constructors(&self) -> &[Arc<ConstructorDef>] {
        match &self.kind {
            TypeKind::Class(def) => &def.constructors,
            _ => &[],
        }
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive(_))
    }

    pub fn array(&self) -> Option<&ArrayDef> {
        match &self.kind {
            TypeKind::Array(def) => Some(def),
            _ => None,
        }
    }

    /// The structural reference member tables use for this type.
    pub fn type_ref(&self) -> TypeRef {
        match &self.kind {
            TypeKind::Array(def) => TypeRef::Array {
                element: def.element,
                dimensions: def.dimensions,
            },
            _ => TypeRef::Type(self.id),
        }
    }
}
