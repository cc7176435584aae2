use std::fmt;
use std::sync::Arc;

use crate::descriptor::{ConstructorDef, FieldDef, MethodDef};
use crate::{Class, Modifiers, TypeRef, TypeStore};

/// A field as reflected from its declaring type's member table.
#[derive(Clone)]
pub struct Field<'s> {
    store: &'s TypeStore,
    def: Arc<FieldDef>,
}

#[derive(Clone)]
pub struct Method<'s> {
    store: &'s TypeStore,
    def: Arc<MethodDef>,
}

/// A constructor. Never inherited; `declaring_class` is always the type it constructs.
#[derive(Clone)]
pub struct Constructor<'s> {
    store: &'s TypeStore,
    def: Arc<ConstructorDef>,
}

impl<'s> Field<'s> {
    pub(crate) fn new(store: &'s TypeStore, def: Arc<FieldDef>) -> Self {
        Self { store, def }
    }

    pub fn def(&self) -> &FieldDef {
        &self.def
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn modifiers(&self) -> Modifiers {
        self.def.modifiers
    }

    pub fn declaring_class(&self) -> Class<'s> {
        self.store.class(self.def.declaring_type)
    }

    pub fn field_type(&self) -> Class<'s> {
        resolve(self.store, self.def.ty)
    }
}

impl<'s> Method<'s> {
    pub(crate) fn new(store: &'s TypeStore, def: Arc<MethodDef>) -> Self {
        Self { store, def }
    }

    pub fn def(&self) -> &MethodDef {
        &self.def
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn modifiers(&self) -> Modifiers {
        self.def.modifiers
    }

    pub fn declaring_class(&self) -> Class<'s> {
        self.store.class(self.def.declaring_type)
    }

    pub fn return_type(&self) -> Class<'s> {
        resolve(self.store, self.def.return_type)
    }

    pub fn parameter_types(&self) -> Vec<Class<'s>> {
        resolve_all(self.store, &self.def.params)
    }

    pub fn parameter_count(&self) -> usize {
        self.def.params.len()
    }

    pub fn is_varargs(&self) -> bool {
        self.def.is_varargs
    }
}

impl<'s> Constructor<'s> {
    pub(crate) fn new(store: &'s TypeStore, def: Arc<ConstructorDef>) -> Self {
        Self { store, def }
    }

    pub fn def(&self) -> &ConstructorDef {
        &self.def
    }

    pub fn modifiers(&self) -> Modifiers {
        self.def.modifiers
    }

    pub fn declaring_class(&self) -> Class<'s> {
        self.store.class(self.def.declaring_type)
    }

    pub fn parameter_types(&self) -> Vec<Class<'s>> {
        resolve_all(self.store, &self.def.params)
    }

    pub fn parameter_count(&self) -> usize {
        self.def.params.len()
    }

    pub fn is_varargs(&self) -> bool {
        self.def.is_varargs
    }
}

fn resolve(store: &TypeStore, ty: TypeRef) -> Class<'_> {
    store.class(store.resolve_ref(ty))
}

fn resolve_all<'s>(store: &'s TypeStore, tys: &[TypeRef]) -> Vec<Class<'s>> {
    tys.iter().map(|ty| resolve(store, *ty)).collect()
}

fn write_modifiers(f: &mut fmt::Formatter<'_>, modifiers: Modifiers) -> fmt::Result {
    if modifiers == Modifiers::NONE {
        Ok(())
    } else {
        write!(f, "{modifiers} ")
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Class<'_>]) -> fmt::Result {
    f.write_str("(")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        f.write_str(&param.type_name())?;
    }
    f.write_str(")")
}

// `public static final int com.example.Limits.MAX`
impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_modifiers(f, self.modifiers())?;
        write!(
            f,
            "{} {}.{}",
            self.field_type().type_name(),
            self.declaring_class().type_name(),
            self.name()
        )
    }
}

// `public void com.example.Task.run(int,java.lang.String)`
impl fmt::Display for Method<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_modifiers(f, self.modifiers())?;
        write!(
            f,
            "{} {}.{}",
            self.return_type().type_name(),
            self.declaring_class().type_name(),
            self.name()
        )?;
        write_params(f, &self.parameter_types())
    }
}

// `public com.example.Task(int)`
impl fmt::Display for Constructor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_modifiers(f, self.modifiers())?;
        f.write_str(&self.declaring_class().type_name())?;
        write_params(f, &self.parameter_types())
    }
}

macro_rules! member_identity {
    ($($ty:ident),*) => {$(
        impl PartialEq for $ty<'_> {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self.store, other.store) && Arc::ptr_eq(&self.def, &other.def)
            }
        }

        impl Eq for $ty<'_> {}

        impl fmt::Debug for $ty<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($ty)).field(&self.to_string()).finish()
            }
        }
    )*};
}

member_identity!(Field, Method, Constructor);
