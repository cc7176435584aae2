use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use nova_classfile::flags::ACC_VARARGS;
use nova_classfile::{parse_array_class_name, ClassStub, FieldType, ReturnType};
use nova_config::StoreConfig;
use parking_lot::RwLock;

use crate::descriptor::{
    ArrayDef, ClassDef, ConstructorDef, DeclaredType, FieldDef, InterfaceDef, MethodDef, TypeKind,
};
use crate::error::{ReflectError, Result};
use crate::jdk::{self, MinimalJdk};
use crate::{
    ChainClassProvider, Class, ClassProvider, Instance, Modifiers, PrimitiveType, TypeDescriptor,
    TypeId, TypeRef,
};

/// Ids of the types the engine itself relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: TypeId,
    pub cloneable: TypeId,
    pub serializable: TypeId,
}

/// Identifies the store an [`Instance`] was constructed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct StoreTag(u64);

impl StoreTag {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        StoreTag(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Canonical registry of resident type descriptors.
///
/// Descriptors are created once, on first resolution, and are never mutated or removed. The
/// store is append-only: class batches and array types are published with an
/// insert-if-absent under a single writer lock, so two threads resolving the same type observe
/// the same descriptor. Readers only hold the lock long enough to clone an `Arc`.
pub struct TypeStore {
    tag: StoreTag,
    provider: Box<dyn ClassProvider>,
    tables: RwLock<Tables>,
    well_known: WellKnownTypes,
    max_array_dimensions: u8,
}

#[derive(Default)]
struct Tables {
    descriptors: Vec<Arc<TypeDescriptor>>,
    by_name: HashMap<String, TypeId>,
    /// Keyed by `(element, dimensions)`.
    arrays: HashMap<(TypeId, u8), TypeId>,
}

impl Tables {
    fn with_primitives() -> Self {
        let mut tables = Tables::default();
        for prim in PrimitiveType::ALL {
            let id = prim.id();
            debug_assert_eq!(id.index(), tables.descriptors.len());
            tables
                .descriptors
                .push(Arc::new(TypeDescriptor::new(id, TypeKind::Primitive(prim))));
        }
        tables
    }

    fn next_id(&self) -> TypeId {
        TypeId(self.descriptors.len() as u32)
    }

    fn intern_array(&mut self, element: TypeId, dimensions: u8) -> TypeId {
        if let Some(id) = self.arrays.get(&(element, dimensions)) {
            return *id;
        }

        let component = if dimensions == 1 {
            element
        } else {
            self.intern_array(element, dimensions - 1)
        };
        let name = format!("[{}", self.descriptor_name(component));
        let id = self.next_id();
        tracing::trace!(name = %name, "synthesized array type");
        self.descriptors.push(Arc::new(TypeDescriptor::new(
            id,
            TypeKind::Array(ArrayDef {
                name,
                component,
                element,
                dimensions,
            }),
        )));
        self.arrays.insert((element, dimensions), id);
        id
    }

    /// The name fragment an array type uses for its component.
    fn descriptor_name(&self, id: TypeId) -> String {
        let desc = &self.descriptors[id.index()];
        match desc.kind() {
            TypeKind::Primitive(prim) => prim.descriptor_char().to_string(),
            TypeKind::Array(def) => def.name.clone(),
            TypeKind::Class(_) | TypeKind::Interface(_) => format!("L{};", desc.name()),
        }
    }
}

static GLOBAL: OnceLock<TypeStore> = OnceLock::new();

impl TypeStore {
    /// Build a store over `provider`, which must itself supply `java.lang.Object`,
    /// `java.lang.Cloneable` and `java.io.Serializable`.
    pub fn new(provider: impl ClassProvider + 'static) -> Result<Self> {
        Self::with_config(provider, &StoreConfig::default())
    }

    /// Build a store over `provider`, falling back to the built-in minimal JDK.
    pub fn with_jdk(provider: impl ClassProvider + 'static) -> Result<Self> {
        Self::new(ChainClassProvider::new().with(provider).with(MinimalJdk::new()))
    }

    /// A store containing only the built-in minimal JDK.
    pub fn with_minimal_jdk() -> Self {
        Self::new(MinimalJdk::new()).expect("built-in JDK stubs are well-formed")
    }

    pub fn with_config(provider: impl ClassProvider + 'static, config: &StoreConfig) -> Result<Self> {
        let placeholder = PrimitiveType::Void.id();
        let mut store = Self {
            tag: StoreTag::next(),
            provider: Box::new(provider),
            tables: RwLock::new(Tables::with_primitives()),
            well_known: WellKnownTypes {
                object: placeholder,
                cloneable: placeholder,
                serializable: placeholder,
            },
            max_array_dimensions: config.max_array_dimensions.max(1),
        };

        let object = store.load_class(jdk::OBJECT)?;
        let cloneable = store.load_class(jdk::CLONEABLE)?;
        let serializable = store.load_class(jdk::SERIALIZABLE)?;
        if store.descriptor(object).is_interface() {
            return Err(ReflectError::IncompatibleClassChange(format!(
                "{} must be a class",
                jdk::OBJECT
            )));
        }
        for (id, name) in [(cloneable, jdk::CLONEABLE), (serializable, jdk::SERIALIZABLE)] {
            if !store.descriptor(id).is_interface() {
                return Err(ReflectError::IncompatibleClassChange(format!(
                    "{name} must be an interface"
                )));
            }
        }
        store.well_known = WellKnownTypes {
            object,
            cloneable,
            serializable,
        };

        for name in &config.preload {
            store.resolve_name(name)?;
        }

        tracing::debug!(
            resident = store.len(),
            preloaded = config.preload.len(),
            "type store ready"
        );
        Ok(store)
    }

    /// Process-wide store backed by the built-in minimal JDK.
    pub fn global() -> &'static TypeStore {
        GLOBAL.get_or_init(TypeStore::with_minimal_jdk)
    }

    pub fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }

    pub fn max_array_dimensions(&self) -> u8 {
        self.max_array_dimensions
    }

    /// Number of resident descriptors (primitives included).
    pub fn len(&self) -> usize {
        self.tables.read().descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a class with this binary name has already been resolved.
    pub fn is_loaded(&self, binary_name: &str) -> bool {
        self.lookup_loaded(binary_name).is_some()
    }

    /// Resolve a class by binary name (`java.util.Map$Entry`) or JVM array name
    /// (`[I`, `[Ljava.lang.String;`), loading it and everything it refers to on first use.
    pub fn for_name(&self, name: &str) -> Result<Class<'_>> {
        let id = self.resolve_name(name)?;
        Ok(self.class(id))
    }

    pub fn primitive(&self, prim: PrimitiveType) -> Class<'_> {
        self.class(prim.id())
    }

    pub fn object(&self) -> Class<'_> {
        self.class(self.well_known.object)
    }

    /// The array type with `dimensions` levels over `component`.
    pub fn array_of(&self, component: &Class<'_>, dimensions: usize) -> Result<Class<'_>> {
        if !component.belongs_to(self) {
            return Err(ReflectError::ClassNotFound(component.name().to_string()));
        }
        let id = self.array_id(component.id(), dimensions)?;
        Ok(self.class(id))
    }

    /// The runtime type of `instance`, or `None` if it was constructed in another store.
    pub fn class_of(&self, instance: &Instance) -> Option<Class<'_>> {
        instance
            .belongs_to(self.tag)
            .then(|| self.class(instance.class_id()))
    }

    pub(crate) fn tag(&self) -> StoreTag {
        self.tag
    }

    pub(crate) fn class(&self, id: TypeId) -> Class<'_> {
        Class::new(self, self.descriptor(id))
    }

    pub(crate) fn descriptor(&self, id: TypeId) -> Arc<TypeDescriptor> {
        self.tables.read().descriptors[id.index()].clone()
    }

    pub(crate) fn resolve_ref(&self, ty: TypeRef) -> TypeId {
        match ty {
            TypeRef::Type(id) => id,
            TypeRef::Array {
                element,
                dimensions,
            } => self.intern_array(element, dimensions),
        }
    }

    pub(crate) fn array_id(&self, component: TypeId, dimensions: usize) -> Result<TypeId> {
        if dimensions == 0 {
            return Ok(component);
        }

        let desc = self.descriptor(component);
        let (element, dimensions) = match desc.kind() {
            TypeKind::Array(def) => {
                let total = dimensions.checked_add(def.dimensions as usize).ok_or(
                    ReflectError::TooManyDimensions {
                        dimensions,
                        limit: self.max_array_dimensions,
                    },
                )?;
                (def.element, total)
            }
            TypeKind::Primitive(PrimitiveType::Void) => {
                return Err(ReflectError::IncompatibleClassChange(
                    "void cannot be an array component".to_string(),
                ))
            }
            _ => (component, dimensions),
        };

        if dimensions > self.max_array_dimensions as usize {
            return Err(ReflectError::TooManyDimensions {
                dimensions,
                limit: self.max_array_dimensions,
            });
        }
        Ok(self.intern_array(element, dimensions as u8))
    }

    fn intern_array(&self, element: TypeId, dimensions: u8) -> TypeId {
        if let Some(id) = self.tables.read().arrays.get(&(element, dimensions)) {
            return *id;
        }
        // Re-checked under the write lock: another thread may have won the race.
        self.tables.write().intern_array(element, dimensions)
    }

    fn lookup_loaded(&self, binary_name: &str) -> Option<TypeId> {
        self.tables.read().by_name.get(binary_name).copied()
    }

    fn resolve_name(&self, name: &str) -> Result<TypeId> {
        let Some(parsed) = parse_array_class_name(name) else {
            return self.load_class(name);
        };
        let ty = parsed.map_err(|_| ReflectError::ClassNotFound(name.to_string()))?;

        let element = match (ty.class_name(), ty.element()) {
            (Some(class), _) => self.load_class(class)?,
            (None, FieldType::Base(base)) => PrimitiveType::from(*base).id(),
            (None, _) => return Err(ReflectError::ClassNotFound(name.to_string())),
        };
        self.array_id(element, ty.dimensions())
    }

    fn load_class(&self, binary_name: &str) -> Result<TypeId> {
        if let Some(id) = self.lookup_loaded(binary_name) {
            return Ok(id);
        }

        let batch = self.collect_batch(binary_name)?;
        self.publish_batch(batch)?;

        self.lookup_loaded(binary_name)
            .ok_or_else(|| ReflectError::ClassNotFound(binary_name.to_string()))
    }

    /// Fetch `root` and every not-yet-resident class it transitively refers to.
    ///
    /// Runs without holding the store lock; the provider may be slow.
    fn collect_batch(&self, root: &str) -> Result<Vec<ClassStub>> {
        let mut queue = VecDeque::from([root.to_string()]);
        let mut seen = HashSet::new();
        let mut stubs = Vec::new();

        while let Some(name) = queue.pop_front() {
            if !seen.insert(name.clone()) || self.is_loaded(&name) {
                continue;
            }

            let stub = self
                .provider
                .lookup_class(&name)
                .filter(|stub| stub.binary_name == name)
                .ok_or_else(|| ReflectError::ClassNotFound(name.clone()))?;
            let referenced = stub
                .referenced_classes()
                .map_err(|source| ReflectError::InvalidStub {
                    class: name.clone(),
                    source,
                })?;

            queue.extend(referenced.into_iter().filter(|r| !seen.contains(r)));
            stubs.push(stub);
        }

        Ok(stubs)
    }

    fn publish_batch(&self, mut stubs: Vec<ClassStub>) -> Result<()> {
        let mut tables = self.tables.write();
        stubs.retain(|stub| !tables.by_name.contains_key(&stub.binary_name));
        if stubs.is_empty() {
            return Ok(());
        }

        let base = tables.descriptors.len();
        let built = {
            let scope = BatchScope::new(&tables, &stubs, base, self.max_array_dimensions);
            scope.check_circularity()?;
            stubs
                .iter()
                .enumerate()
                .map(|(offset, stub)| scope.build(TypeId((base + offset) as u32), stub))
                .collect::<Result<Vec<_>>>()?
        };

        for (stub, desc) in stubs.iter().zip(built) {
            debug_assert_eq!(desc.id(), tables.next_id());
            tables.by_name.insert(stub.binary_name.clone(), desc.id());
            tables.descriptors.push(Arc::new(desc));
        }

        tracing::debug!(
            root = %stubs[0].binary_name,
            classes = stubs.len(),
            resident = tables.descriptors.len(),
            "published class batch"
        );
        Ok(())
    }
}

impl std::fmt::Debug for TypeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeStore")
            .field("resident", &self.len())
            .field("well_known", &self.well_known)
            .finish_non_exhaustive()
    }
}

/// Name resolution while a batch of stubs is turned into descriptors.
///
/// Every id a batch refers to is known up front: either already resident or reserved for a
/// member of the batch, so descriptors can point at each other before any is published.
struct BatchScope<'a> {
    tables: &'a Tables,
    stubs: &'a [ClassStub],
    reserved: HashMap<&'a str, usize>,
    base: usize,
    max_array_dimensions: u8,
}

impl<'a> BatchScope<'a> {
    fn new(tables: &'a Tables, stubs: &'a [ClassStub], base: usize, max_array_dimensions: u8) -> Self {
        let reserved = stubs
            .iter()
            .enumerate()
            .map(|(offset, stub)| (stub.binary_name.as_str(), offset))
            .collect();
        Self {
            tables,
            stubs,
            reserved,
            base,
            max_array_dimensions,
        }
    }

    fn resolve(&self, name: &str) -> Result<TypeId> {
        if let Some(offset) = self.reserved.get(name) {
            return Ok(TypeId((self.base + offset) as u32));
        }
        self.tables
            .by_name
            .get(name)
            .copied()
            .ok_or_else(|| ReflectError::ClassNotFound(name.to_string()))
    }

    fn is_interface(&self, name: &str) -> bool {
        match self.reserved.get(name) {
            Some(offset) => self.stubs[*offset].is_interface(),
            None => self
                .tables
                .by_name
                .get(name)
                .is_some_and(|id| self.tables.descriptors[id.index()].is_interface()),
        }
    }

    fn field_type(&self, ty: &FieldType) -> Result<TypeRef> {
        let element = match (ty.class_name(), ty.element()) {
            (Some(name), _) => self.resolve(name)?,
            (None, FieldType::Base(base)) => PrimitiveType::from(*base).id(),
            (None, other) => {
                return Err(ReflectError::ClassNotFound(format!("{other:?}")));
            }
        };

        let dimensions = ty.dimensions();
        if dimensions == 0 {
            return Ok(TypeRef::Type(element));
        }
        if dimensions > self.max_array_dimensions as usize {
            return Err(ReflectError::TooManyDimensions {
                dimensions,
                limit: self.max_array_dimensions,
            });
        }
        Ok(TypeRef::Array {
            element,
            dimensions: dimensions as u8,
        })
    }

    fn return_type(&self, ty: &ReturnType) -> Result<TypeRef> {
        match ty {
            ReturnType::Void => Ok(TypeRef::Type(PrimitiveType::Void.id())),
            ReturnType::Type(ty) => self.field_type(ty),
        }
    }

    /// Rejects a batch whose supertype graph loops back on itself. Resident classes can never
    /// name a batch member as a supertype, so only batch-internal edges need checking.
    fn check_circularity(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            Active,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.stubs.len()];
        for start in 0..self.stubs.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            // Explicit stack of (node, next edge index) so deep hierarchies cannot overflow.
            let mut stack = vec![(start, 0usize)];
            marks[start] = Mark::Active;
            while let Some((node, edge)) = stack.pop() {
                let supers = self.batch_supertypes(node);
                if edge == supers.len() {
                    marks[node] = Mark::Done;
                    continue;
                }
                stack.push((node, edge + 1));

                let next = supers[edge];
                match marks[next] {
                    Mark::Active => {
                        return Err(ReflectError::ClassCircularity(
                            self.stubs[next].binary_name.clone(),
                        ))
                    }
                    Mark::Unvisited => {
                        marks[next] = Mark::Active;
                        stack.push((next, 0));
                    }
                    Mark::Done => {}
                }
            }
        }
        Ok(())
    }

    fn batch_supertypes(&self, offset: usize) -> Vec<usize> {
        let stub = &self.stubs[offset];
        let superclass = stub.superclass().ok().flatten();
        superclass
            .into_iter()
            .chain(stub.interfaces.iter().map(String::as_str))
            .filter_map(|name| self.reserved.get(name).copied())
            .collect()
    }

    fn build(&self, id: TypeId, stub: &ClassStub) -> Result<TypeDescriptor> {
        let invalid = |source| ReflectError::InvalidStub {
            class: stub.binary_name.clone(),
            source,
        };

        let interfaces = stub
            .interfaces
            .iter()
            .map(|name| {
                if !self.is_interface(name) {
                    return Err(ReflectError::IncompatibleClassChange(format!(
                        "{} cannot implement class {name}",
                        stub.binary_name
                    )));
                }
                self.resolve(name)
            })
            .collect::<Result<Vec<_>>>()?;

        let fields = stub
            .fields
            .iter()
            .map(|field| {
                let ty = field.parsed_descriptor().map_err(invalid)?;
                Ok(Arc::new(FieldDef {
                    name: field.name.clone(),
                    ty: self.field_type(&ty)?,
                    modifiers: Modifiers::for_field(field.access_flags),
                    declaring_type: id,
                }))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut methods = Vec::new();
        let mut constructors = Vec::new();
        for method in &stub.methods {
            if method.is_hidden_initializer() {
                continue;
            }
            let desc = method.parsed_descriptor().map_err(invalid)?;
            let params = desc
                .params
                .iter()
                .map(|p| self.field_type(p))
                .collect::<Result<Vec<_>>>()?;
            let is_varargs = method.access_flags & ACC_VARARGS != 0;

            if method.is_constructor() {
                if stub.is_interface() {
                    continue;
                }
                constructors.push(Arc::new(ConstructorDef {
                    params,
                    modifiers: Modifiers::for_constructor(method.access_flags),
                    declaring_type: id,
                    is_varargs,
                }));
            } else {
                methods.push(Arc::new(MethodDef {
                    name: method.name.clone(),
                    params,
                    return_type: self.return_type(&desc.return_type)?,
                    modifiers: Modifiers::for_method(method.access_flags),
                    declaring_type: id,
                    is_varargs,
                }));
            }
        }

        let decl = DeclaredType {
            name: stub.binary_name.clone(),
            modifiers: Modifiers::for_class(stub.effective_access_flags()),
            interfaces,
            fields,
            methods,
            nested_types: stub
                .member_classes()
                .map(|name| self.resolve(name))
                .collect::<Result<Vec<_>>>()?,
            enclosing_type: stub
                .enclosing_class()
                .map(|name| self.resolve(name))
                .transpose()?,
        };

        let kind = if stub.is_interface() {
            TypeKind::Interface(InterfaceDef { decl })
        } else {
            let superclass = match stub.superclass().map_err(invalid)? {
                Some(name) if self.is_interface(name) => {
                    return Err(ReflectError::IncompatibleClassChange(format!(
                        "{} cannot extend interface {name}",
                        stub.binary_name
                    )))
                }
                Some(name) => Some(self.resolve(name)?),
                None => None,
            };
            TypeKind::Class(ClassDef {
                decl,
                superclass,
                constructors,
            })
        };

        Ok(TypeDescriptor::new(id, kind))
    }
}
