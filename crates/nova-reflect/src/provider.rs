use std::collections::HashMap;

use nova_classfile::ClassStub;

/// Supplies already-parsed class facts by binary name (`java.util.Map$Entry`).
///
/// This is the class-loading seam: implementations may read jars, jmods, or in-memory
/// fixtures. The store calls it outside of any internal lock and may call it more than once for
/// the same name when two threads race on first resolution.
pub trait ClassProvider: Send + Sync {
    fn lookup_class(&self, binary_name: &str) -> Option<ClassStub>;
}

impl<P: ClassProvider + ?Sized> ClassProvider for &P {
    fn lookup_class(&self, binary_name: &str) -> Option<ClassStub> {
        (**self).lookup_class(binary_name)
    }
}

impl<P: ClassProvider + ?Sized> ClassProvider for Box<P> {
    fn lookup_class(&self, binary_name: &str) -> Option<ClassStub> {
        (**self).lookup_class(binary_name)
    }
}

impl<P: ClassProvider + ?Sized> ClassProvider for std::sync::Arc<P> {
    fn lookup_class(&self, binary_name: &str) -> Option<ClassStub> {
        (**self).lookup_class(binary_name)
    }
}

/// Queries each provider in order and returns the first hit.
#[derive(Default)]
pub struct ChainClassProvider {
    providers: Vec<Box<dyn ClassProvider>>,
}

impl ChainClassProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: impl ClassProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn push(&mut self, provider: impl ClassProvider + 'static) {
        self.providers.push(Box::new(provider));
    }
}

impl ClassProvider for ChainClassProvider {
    fn lookup_class(&self, binary_name: &str) -> Option<ClassStub> {
        self.providers
            .iter()
            .find_map(|provider| provider.lookup_class(binary_name))
    }
}

/// In-memory provider keyed by binary name.
#[derive(Debug, Default, Clone)]
pub struct MapClassProvider {
    stubs: HashMap<String, ClassStub>,
}

impl MapClassProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `stub`, replacing any previous stub with the same binary name.
    pub fn insert(&mut self, stub: ClassStub) {
        self.stubs.insert(stub.binary_name.clone(), stub);
    }

    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }
}

impl FromIterator<ClassStub> for MapClassProvider {
    fn from_iter<T: IntoIterator<Item = ClassStub>>(iter: T) -> Self {
        let mut provider = Self::new();
        for stub in iter {
            provider.insert(stub);
        }
        provider
    }
}

impl Extend<ClassStub> for MapClassProvider {
    fn extend<T: IntoIterator<Item = ClassStub>>(&mut self, iter: T) {
        for stub in iter {
            self.insert(stub);
        }
    }
}

impl ClassProvider for MapClassProvider {
    fn lookup_class(&self, binary_name: &str) -> Option<ClassStub> {
        self.stubs.get(binary_name).cloned()
    }
}
