//! Default construction of resident classes.
//!
//! The engine decides *whether* a class may be constructed and with which constructor; running
//! the constructor body belongs to the embedder, reached through [`ConstructorInvoker`].

use std::fmt;

use thiserror::Error;

use crate::error::{ReflectError, Result};
use crate::modifiers::Visibility;
use crate::store::StoreTag;
use crate::{Class, Constructor, Modifiers, TypeId};

/// An object produced by a successful construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instance {
    store: StoreTag,
    class: TypeId,
}

impl Instance {
    /// The runtime type; resolve it with [`crate::TypeStore::class_of`].
    pub fn class_id(&self) -> TypeId {
        self.class
    }

    pub(crate) fn belongs_to(&self, store: StoreTag) -> bool {
        self.store == store
    }
}

/// Freshly allocated storage handed to a constructor body.
#[derive(Debug, PartialEq, Eq)]
pub struct UninitializedInstance {
    store: StoreTag,
    class: TypeId,
}

impl UninitializedInstance {
    pub fn class_id(&self) -> TypeId {
        self.class
    }

    /// Mark construction as complete.
    pub fn initialize(self) -> Instance {
        Instance {
            store: self.store,
            class: self.class,
        }
    }
}

/// A fault raised by code running inside a constructor body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct Thrown {
    pub class_name: String,
    pub message: Option<String>,
}

impl Thrown {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {message}", self.class_name),
            None => f.write_str(&self.class_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorFault {
    /// A checked exception; reported as the cause of an instantiation failure.
    Exception(Thrown),
    /// An unchecked fault; passed through to the caller as-is.
    Unchecked(Thrown),
}

/// Runs a constructor body against freshly allocated storage.
pub trait ConstructorInvoker {
    fn invoke(
        &self,
        ctor: &Constructor<'_>,
        receiver: UninitializedInstance,
    ) -> Result<Instance, ConstructorFault>;
}

impl<F> ConstructorInvoker for F
where
    F: Fn(&Constructor<'_>, UninitializedInstance) -> Result<Instance, ConstructorFault>,
{
    fn invoke(
        &self,
        ctor: &Constructor<'_>,
        receiver: UninitializedInstance,
    ) -> Result<Instance, ConstructorFault> {
        self(ctor, receiver)
    }
}

/// Invoker for constructors with empty bodies.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyBodyInvoker;

impl ConstructorInvoker for EmptyBodyInvoker {
    fn invoke(
        &self,
        _ctor: &Constructor<'_>,
        receiver: UninitializedInstance,
    ) -> Result<Instance, ConstructorFault> {
        Ok(receiver.initialize())
    }
}

impl<'s> Class<'s> {
    /// Create an instance through the zero-argument constructor, as seen from `caller`.
    ///
    /// `caller` of `None` is an unrelated outside caller, which can only reach public
    /// constructors.
    pub fn new_instance(
        &self,
        caller: Option<&Class<'_>>,
        invoker: &dyn ConstructorInvoker,
    ) -> Result<Instance> {
        let instantiation = |cause| ReflectError::Instantiation {
            class: self.name().to_string(),
            cause,
        };

        if self.is_interface()
            || self.is_primitive()
            || self.is_array()
            || self.modifiers().is_abstract()
        {
            tracing::debug!(class = %self.name(), "type is not instantiable");
            return Err(instantiation(None));
        }

        let Some(ctor) = self
            .declared_constructors()
            .into_iter()
            .find(|ctor| ctor.parameter_count() == 0)
        else {
            tracing::debug!(class = %self.name(), "no zero-argument constructor");
            return Err(instantiation(None));
        };

        if !self.can_access(ctor.modifiers(), caller) {
            tracing::debug!(
                class = %self.name(),
                caller = caller.map(Class::name),
                modifiers = %ctor.modifiers(),
                "constructor is not accessible"
            );
            return Err(ReflectError::IllegalAccess {
                member: self.to_string(),
                modifiers: ctor.modifiers().to_string(),
                caller: caller.map_or_else(|| "unnamed caller".to_string(), Class::to_string),
            });
        }

        let receiver = UninitializedInstance {
            store: self.store().tag(),
            class: self.id(),
        };
        match invoker.invoke(&ctor, receiver) {
            Ok(instance)
                if !instance.belongs_to(self.store().tag()) || instance.class != self.id() =>
            {
                tracing::debug!(
                    class = %self.name(),
                    returned = ?instance.class,
                    "constructor returned an instance of another type"
                );
                Err(instantiation(None))
            }
            Ok(instance) => {
                tracing::trace!(class = %self.name(), "instantiated");
                Ok(instance)
            }
            Err(ConstructorFault::Exception(thrown)) => {
                tracing::debug!(class = %self.name(), cause = %thrown, "constructor threw");
                Err(instantiation(Some(thrown)))
            }
            Err(ConstructorFault::Unchecked(thrown)) => {
                tracing::debug!(class = %self.name(), fault = %thrown, "constructor faulted");
                Err(ReflectError::Fault(thrown))
            }
        }
    }

    fn can_access(&self, modifiers: Modifiers, caller: Option<&Class<'_>>) -> bool {
        match (modifiers.visibility(), caller) {
            (Visibility::Public, _) => true,
            (_, None) => false,
            (Visibility::Private, Some(caller)) => {
                caller.top_level_class().name() == self.top_level_class().name()
            }
            (Visibility::Package | Visibility::Protected, Some(caller)) => {
                caller.package_name() == self.package_name()
            }
        }
    }
}
