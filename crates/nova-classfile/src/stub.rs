use crate::descriptor::{parse_field_descriptor, parse_method_descriptor, FieldType, MethodDescriptor};
use crate::error::{Error, Result};
use crate::flags::{ACC_INTERFACE, ACC_SUPER};

/// Name of the instance initializer as it appears in a method table.
pub const INSTANCE_INIT: &str = "<init>";
/// Name of the class initializer as it appears in a method table.
pub const CLASS_INIT: &str = "<clinit>";

const ROOT_CLASS: &str = "java.lang.Object";

/// Declared facts about a single class or interface.
///
/// All class names are binary names (`com.example.Outer$Inner`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassStub {
    pub binary_name: String,
    pub access_flags: u16,
    /// `None` only for `java.lang.Object`. Ignored for interfaces.
    pub super_binary_name: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldStub>,
    /// Every entry of the method table, including `<init>` and `<clinit>`.
    pub methods: Vec<MethodStub>,
    /// Entries of the `InnerClasses` attribute.
    pub inner_classes: Vec<InnerClassInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldStub {
    pub name: String,
    /// JVM descriptor, e.g. `I` or `Ljava/lang/String;`.
    pub descriptor: String,
    pub access_flags: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodStub {
    pub name: String,
    /// JVM method descriptor, e.g. `(Ljava/lang/String;)V`.
    pub descriptor: String,
    pub access_flags: u16,
}

/// One row of an `InnerClasses` attribute (JVMS 4.7.6).
///
/// `outer_class` is `None` for local and anonymous classes; `inner_name` is `None` for anonymous
/// classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClassInfo {
    pub inner_class: String,
    pub outer_class: Option<String>,
    pub inner_name: Option<String>,
    pub access_flags: u16,
}

impl InnerClassInfo {
    /// A member class: lexically enclosed by `outer_class` and named.
    pub fn is_member(&self) -> bool {
        self.outer_class.is_some() && self.inner_name.is_some()
    }
}

impl ClassStub {
    pub fn new(binary_name: impl Into<String>, access_flags: u16) -> Self {
        Self {
            binary_name: binary_name.into(),
            access_flags,
            super_binary_name: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            inner_classes: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags & ACC_INTERFACE != 0
    }

    /// The `InnerClasses` row describing this class itself, if it is a nested class.
    pub fn own_inner_entry(&self) -> Option<&InnerClassInfo> {
        self.inner_classes
            .iter()
            .find(|info| info.inner_class == self.binary_name)
    }

    /// Binary name of the lexically enclosing class for member classes.
    pub fn enclosing_class(&self) -> Option<&str> {
        self.own_inner_entry()
            .filter(|info| info.is_member())
            .and_then(|info| info.outer_class.as_deref())
    }

    /// Member classes declared directly by this class, in attribute order.
    pub fn member_classes(&self) -> impl Iterator<Item = &str> {
        self.inner_classes
            .iter()
            .filter(|info| {
                info.is_member() && info.outer_class.as_deref() == Some(self.binary_name.as_str())
            })
            .map(|info| info.inner_class.as_str())
    }

    /// Class modifiers as reflection reports them.
    ///
    /// A member class takes the flags of its own `InnerClasses` row, which is the only place
    /// `private`, `protected` and `static` can be recorded for a class. `ACC_SUPER` never
    /// surfaces.
    pub fn effective_access_flags(&self) -> u16 {
        let flags = match self.own_inner_entry() {
            Some(info) if info.is_member() => info.access_flags,
            _ => self.access_flags,
        };
        if flags & ACC_INTERFACE != 0 {
            flags
        } else {
            flags & !ACC_SUPER
        }
    }

    /// Superclass binary name as reflection sees it: `None` for interfaces and the root class.
    pub fn superclass(&self) -> Result<Option<&str>> {
        if self.is_interface() || self.binary_name == ROOT_CLASS {
            return Ok(None);
        }
        match self.super_binary_name.as_deref() {
            Some(name) => Ok(Some(name)),
            None => Err(Error::MissingSuperclass(self.binary_name.clone())),
        }
    }

    /// Every class this stub refers to that must be resolvable before it can be published:
    /// supertypes, member types, the enclosing class, and member classes.
    pub fn referenced_classes(&self) -> Result<Vec<String>> {
        if self.binary_name.is_empty() || self.binary_name.starts_with('[') {
            return Err(Error::InvalidClassName(self.binary_name.clone()));
        }

        let mut out = Vec::new();
        if let Some(sup) = self.superclass()? {
            out.push(sup.to_string());
        }
        out.extend(self.interfaces.iter().cloned());
        for field in &self.fields {
            if let Some(name) = field.parsed_descriptor()?.class_name() {
                out.push(name.to_string());
            }
        }
        for method in &self.methods {
            if method.name == CLASS_INIT {
                continue;
            }
            out.extend(method.parsed_descriptor()?.class_names().map(str::to_string));
        }
        if let Some(outer) = self.enclosing_class() {
            out.push(outer.to_string());
        }
        out.extend(self.member_classes().map(str::to_string));
        Ok(out)
    }
}

impl FieldStub {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, access_flags: u16) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            access_flags,
        }
    }

    pub fn parsed_descriptor(&self) -> Result<FieldType> {
        parse_field_descriptor(&self.descriptor)
    }
}

impl MethodStub {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>, access_flags: u16) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            access_flags,
        }
    }

    pub fn parsed_descriptor(&self) -> Result<MethodDescriptor> {
        parse_method_descriptor(&self.descriptor)
    }

    pub fn is_constructor(&self) -> bool {
        self.name == INSTANCE_INIT
    }

    /// `<clinit>` and any other `<...>` name that is not a constructor.
    pub fn is_hidden_initializer(&self) -> bool {
        !self.is_constructor() && self.name.starts_with('<')
    }
}
