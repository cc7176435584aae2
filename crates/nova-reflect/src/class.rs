use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use nova_classfile::{CLASS_INIT, INSTANCE_INIT};

use crate::descriptor::{FieldDef, MethodDef, TypeKind};
use crate::error::{ReflectError, Result};
use crate::{
    Constructor, Field, Instance, Method, Modifiers, TypeDescriptor, TypeId, TypeRef, TypeStore,
};

/// Handle to one resident type of a [`TypeStore`].
///
/// Handles are cheap to clone. Two handles are equal iff they come from the same store and
/// denote the same descriptor.
#[derive(Clone)]
pub struct Class<'s> {
    store: &'s TypeStore,
    desc: Arc<TypeDescriptor>,
}

impl<'s> Class<'s> {
    pub(crate) fn new(store: &'s TypeStore, desc: Arc<TypeDescriptor>) -> Self {
        Self { store, desc }
    }

    pub(crate) fn belongs_to(&self, store: &TypeStore) -> bool {
        std::ptr::eq(self.store, store)
    }

    pub fn id(&self) -> TypeId {
        self.desc.id()
    }

    pub fn store(&self) -> &'s TypeStore {
        self.store
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.desc
    }

    /// Binary name for classes and interfaces, keyword for primitives, JVM form for arrays
    /// (`[Ljava.lang.String;`).
    pub fn name(&self) -> &str {
        self.desc.name()
    }

    /// Name as written in source: `String`, `Entry` for `java.util.Map$Entry`, `int[][]`.
    pub fn simple_name(&self) -> String {
        if let Some(component) = self.component_type() {
            return format!("{}[]", component.simple_name());
        }
        if let Some(outer) = self.enclosing_class() {
            let prefix = format!("{}$", outer.name());
            if let Some(simple) = self.name().strip_prefix(&prefix) {
                return simple.to_string();
            }
        }
        let name = self.name();
        name.rsplit_once('.')
            .map_or(name, |(_, simple)| simple)
            .to_string()
    }

    /// Name with arrays rendered as `java.lang.String[][]`.
    pub fn type_name(&self) -> String {
        match self.element_type() {
            Some(element) => format!("{}{}", element.name(), "[]".repeat(self.dimensions())),
            None => self.name().to_string(),
        }
    }

    /// Package of the type; primitives live in `java.lang`, arrays in their element's package.
    pub fn package_name(&self) -> String {
        match self.desc.kind() {
            TypeKind::Primitive(_) => "java.lang".to_string(),
            TypeKind::Array(def) => self.store.class(def.element).package_name(),
            TypeKind::Class(_) | TypeKind::Interface(_) => self
                .name()
                .rsplit_once('.')
                .map_or("", |(package, _)| package)
                .to_string(),
        }
    }

    pub fn is_array(&self) -> bool {
        self.desc.is_array()
    }

    pub fn is_primitive(&self) -> bool {
        self.desc.is_primitive()
    }

    pub fn is_interface(&self) -> bool {
        self.desc.is_interface()
    }

    pub fn is_member_class(&self) -> bool {
        self.desc
            .declared()
            .is_some_and(|decl| decl.enclosing_type.is_some())
    }

    pub fn modifiers(&self) -> Modifiers {
        match self.desc.kind() {
            TypeKind::Class(def) => def.decl.modifiers,
            TypeKind::Interface(def) => def.decl.modifiers | Modifiers::INTERFACE | Modifiers::ABSTRACT,
            TypeKind::Primitive(_) => Modifiers::PUBLIC | Modifiers::FINAL,
            TypeKind::Array(def) => {
                let element = self.store.class(def.element).modifiers();
                Modifiers::FINAL | (element & Modifiers::VISIBILITY)
            }
        }
    }

    /// Direct superclass. Arrays report the root class; interfaces, primitives and the root
    /// itself have none.
    pub fn superclass(&self) -> Option<Class<'s>> {
        match self.desc.kind() {
            TypeKind::Array(_) => Some(self.store.object()),
            _ => self.desc.superclass().map(|id| self.store.class(id)),
        }
    }

    /// Directly implemented (or extended) interfaces, in declaration order.
    pub fn interfaces(&self) -> Vec<Class<'s>> {
        if self.is_array() {
            let known = self.store.well_known();
            return vec![
                self.store.class(known.cloneable),
                self.store.class(known.serializable),
            ];
        }
        self.classes_of(self.desc.declared_interfaces())
    }

    /// Every proper supertype, nearest superclass first and interfaces after.
    pub fn supertypes(&self) -> Vec<Class<'s>> {
        self.classes_of(self.store.supertypes(&self.desc))
    }

    /// The class this one is a member of.
    pub fn declaring_class(&self) -> Option<Class<'s>> {
        self.desc
            .declared()
            .and_then(|decl| decl.enclosing_type)
            .map(|id| self.store.class(id))
    }

    /// Lexically enclosing class. Local and anonymous classes report none.
    pub fn enclosing_class(&self) -> Option<Class<'s>> {
        self.declaring_class()
    }

    /// The outermost class of this type's nest.
    pub fn top_level_class(&self) -> Class<'s> {
        let mut current = self.clone();
        while let Some(outer) = current.declaring_class() {
            current = outer;
        }
        current
    }

    pub fn component_type(&self) -> Option<Class<'s>> {
        self.desc.array().map(|def| self.store.class(def.component))
    }

    /// Innermost non-array type of an array.
    pub fn element_type(&self) -> Option<Class<'s>> {
        self.desc.array().map(|def| self.store.class(def.element))
    }

    /// Array nesting depth; 0 for non-arrays.
    pub fn dimensions(&self) -> usize {
        self.desc.array().map_or(0, |def| def.dimensions as usize)
    }

    /// The one-dimension-deeper array type with this type as component.
    pub fn array_type(&self) -> Result<Class<'s>> {
        self.store.array_of(self, 1)
    }

    /// Member classes and interfaces declared by this type, any visibility.
    pub fn declared_classes(&self) -> Vec<Class<'s>> {
        self.desc
            .declared()
            .map(|decl| self.classes_of(&decl.nested_types))
            .unwrap_or_default()
    }

    /// Public member types of this class and its superclasses.
    pub fn classes(&self) -> Vec<Class<'s>> {
        let mut out = Vec::new();
        let mut current = Some(self.clone());
        while let Some(class) = current {
            out.extend(
                class
                    .declared_classes()
                    .into_iter()
                    .filter(|member| member.modifiers().is_public()),
            );
            current = match class.desc.kind() {
                TypeKind::Class(def) => def.superclass.map(|id| self.store.class(id)),
                _ => None,
            };
        }
        out
    }

    pub fn declared_fields(&self) -> Vec<Field<'s>> {
        self.desc
            .declared_fields()
            .iter()
            .map(|def| Field::new(self.store, def.clone()))
            .collect()
    }

    pub fn declared_methods(&self) -> Vec<Method<'s>> {
        self.desc
            .declared_methods()
            .iter()
            .map(|def| Method::new(self.store, def.clone()))
            .collect()
    }

    pub fn declared_constructors(&self) -> Vec<Constructor<'s>> {
        self.desc
            .declared_constructors()
            .iter()
            .map(|def| Constructor::new(self.store, def.clone()))
            .collect()
    }

    /// Public fields of this type and all of its supertypes, one entry per
    /// `(name, declaring type)`.
    pub fn fields(&self) -> Vec<Field<'s>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for owner in self.self_and_supertypes() {
            for def in owner.declared_fields() {
                if !def.modifiers.is_public() {
                    continue;
                }
                if seen.insert((def.name.clone(), def.declaring_type)) {
                    out.push(Field::new(self.store, def.clone()));
                }
            }
        }
        out
    }

    /// Public methods of this type and all of its supertypes, one entry per
    /// `(name, parameter types)`.
    ///
    /// The most derived declaration wins: anything found on a class beats an interface, and a
    /// subinterface beats the superinterface it redeclares. Static interface methods are not
    /// inherited.
    pub fn methods(&self) -> Vec<Method<'s>> {
        let mut index: HashMap<(String, Vec<TypeRef>), usize> = HashMap::new();
        let mut out: Vec<Arc<MethodDef>> = Vec::new();

        for owner in self.self_and_supertypes() {
            let inherited_from_interface = owner.is_interface() && owner.id() != self.id();
            for def in owner.declared_methods() {
                if !def.modifiers.is_public() {
                    continue;
                }
                if inherited_from_interface && def.modifiers.is_static() {
                    continue;
                }

                let key = (def.name.clone(), def.params.clone());
                match index.get(&key).copied() {
                    None => {
                        index.insert(key, out.len());
                        out.push(def.clone());
                    }
                    Some(slot) => {
                        if owner.is_interface()
                            && self.store.supertypes(&owner).contains(&out[slot].declaring_type)
                        {
                            out[slot] = def.clone();
                        }
                    }
                }
            }
        }

        out.into_iter()
            .map(|def| Method::new(self.store, def))
            .collect()
    }

    /// Public constructors declared by this class. Constructors are never inherited.
    pub fn constructors(&self) -> Vec<Constructor<'s>> {
        self.declared_constructors()
            .into_iter()
            .filter(|ctor| ctor.modifiers().is_public())
            .collect()
    }

    /// Public field `name`, searching this type, then its superinterfaces, then its superclass.
    pub fn field(&self, name: Option<&str>) -> Result<Field<'s>> {
        let name = name.ok_or(ReflectError::NullArgument("name"))?;
        find_public_field(self.store, &self.desc, name)
            .map(|def| Field::new(self.store, def))
            .ok_or_else(|| self.no_such_field(name))
    }

    /// Public method with exactly these parameter types, inherited ones included.
    pub fn method(&self, name: Option<&str>, params: &[Class<'_>]) -> Result<Method<'s>> {
        let name = name.ok_or(ReflectError::NullArgument("name"))?;
        let wanted = self.param_refs(params);
        wanted
            .and_then(|wanted| {
                self.methods()
                    .into_iter()
                    .find(|method| method.name() == name && method.def().params == wanted)
            })
            .ok_or_else(|| self.no_such_method(name, params))
    }

    pub fn constructor(&self, params: &[Class<'_>]) -> Result<Constructor<'s>> {
        self.find_constructor(params, true)
    }

    pub fn declared_field(&self, name: Option<&str>) -> Result<Field<'s>> {
        let name = name.ok_or(ReflectError::NullArgument("name"))?;
        self.desc
            .declared_fields()
            .iter()
            .find(|def| def.name == name)
            .map(|def| Field::new(self.store, def.clone()))
            .ok_or_else(|| self.no_such_field(name))
    }

    /// Method declared by this type itself, any visibility. Initializer names never match.
    pub fn declared_method(&self, name: Option<&str>, params: &[Class<'_>]) -> Result<Method<'s>> {
        let name = name.ok_or(ReflectError::NullArgument("name"))?;
        if name == INSTANCE_INIT || name == CLASS_INIT {
            return Err(self.no_such_method(name, params));
        }
        let wanted = self.param_refs(params);
        wanted
            .and_then(|wanted| {
                self.desc
                    .declared_methods()
                    .iter()
                    .find(|def| def.name == name && def.params == wanted)
            })
            .map(|def| Method::new(self.store, def.clone()))
            .ok_or_else(|| self.no_such_method(name, params))
    }

    pub fn declared_constructor(&self, params: &[Class<'_>]) -> Result<Constructor<'s>> {
        self.find_constructor(params, false)
    }

    /// Whether a value of type `other` can be stored in a variable of this type without
    /// conversion. There is no primitive widening: `double` is not assignable from `int`.
    pub fn is_assignable_from(&self, other: Option<&Class<'_>>) -> Result<bool> {
        let other = other.ok_or(ReflectError::NullArgument("cls"))?;
        if !other.belongs_to(self.store) {
            return Ok(false);
        }
        Ok(self.store.is_assignable(&self.desc, &other.desc))
    }

    /// Whether `value` is an instance of this type. Always false for primitives and for values
    /// constructed in another store.
    pub fn is_instance(&self, value: Option<&Instance>) -> bool {
        if self.is_primitive() {
            return false;
        }
        // Instances from another store have no runtime type here.
        match value.and_then(|value| self.store.class_of(value)) {
            Some(runtime) => self.store.is_assignable(&self.desc, &runtime.desc),
            None => false,
        }
    }

    fn self_and_supertypes(&self) -> Vec<Arc<TypeDescriptor>> {
        std::iter::once(self.desc.clone())
            .chain(
                self.store
                    .supertypes(&self.desc)
                    .iter()
                    .map(|id| self.store.descriptor(*id)),
            )
            .collect()
    }

    fn classes_of(&self, ids: &[TypeId]) -> Vec<Class<'s>> {
        ids.iter().map(|id| self.store.class(*id)).collect()
    }

    /// `None` when a parameter belongs to another store and so cannot match anything here.
    fn param_refs(&self, params: &[Class<'_>]) -> Option<Vec<TypeRef>> {
        params
            .iter()
            .map(|param| param.belongs_to(self.store).then(|| param.desc.type_ref()))
            .collect()
    }

    fn find_constructor(&self, params: &[Class<'_>], public_only: bool) -> Result<Constructor<'s>> {
        let wanted = self.param_refs(params);
        wanted
            .and_then(|wanted| {
                self.desc.declared_constructors().iter().find(|def| {
                    def.params == wanted && (!public_only || def.modifiers.is_public())
                })
            })
            .map(|def| Constructor::new(self.store, def.clone()))
            .ok_or_else(|| ReflectError::NoSuchConstructor {
                class: self.name().to_string(),
                signature: param_list(params),
            })
    }

    fn no_such_field(&self, name: &str) -> ReflectError {
        ReflectError::NoSuchField {
            class: self.name().to_string(),
            name: name.to_string(),
        }
    }

    fn no_such_method(&self, name: &str, params: &[Class<'_>]) -> ReflectError {
        ReflectError::NoSuchMethod {
            class: self.name().to_string(),
            signature: format!("{name}{}", param_list(params)),
        }
    }
}

fn param_list(params: &[Class<'_>]) -> String {
    let names: Vec<_> = params.iter().map(Class::type_name).collect();
    format!("({})", names.join(","))
}

fn find_public_field(store: &TypeStore, desc: &TypeDescriptor, name: &str) -> Option<Arc<FieldDef>> {
    if let Some(def) = desc
        .declared_fields()
        .iter()
        .find(|def| def.name == name && def.modifiers.is_public())
    {
        return Some(def.clone());
    }
    for iface in desc.declared_interfaces() {
        if let Some(def) = find_public_field(store, &store.descriptor(*iface), name) {
            return Some(def);
        }
    }
    desc.superclass()
        .and_then(|id| find_public_field(store, &store.descriptor(id), name))
}

impl TypeStore {
    pub(crate) fn is_assignable(&self, target: &TypeDescriptor, source: &TypeDescriptor) -> bool {
        if target.id() == source.id() {
            return true;
        }
        if target.is_primitive() || source.is_primitive() {
            return false;
        }

        let known = self.well_known();
        if target.id() == known.object {
            return true;
        }

        match (target.array(), source.array()) {
            (Some(target), Some(source)) => {
                let target = self.descriptor(target.component);
                let source = self.descriptor(source.component);
                self.is_assignable(&target, &source)
            }
            (None, Some(_)) => target.id() == known.cloneable || target.id() == known.serializable,
            (Some(_), None) => false,
            (None, None) => self.supertypes(source).contains(&target.id()),
        }
    }
}

impl PartialEq for Class<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.store, other.store) && self.id() == other.id()
    }
}

impl Eq for Class<'_> {}

impl Hash for Class<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Display for Class<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_primitive() {
            f.write_str(self.name())
        } else if self.is_interface() {
            write!(f, "interface {}", self.name())
        } else {
            write!(f, "class {}", self.name())
        }
    }
}

impl fmt::Debug for Class<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Class").field(&self.name()).finish()
    }
}
