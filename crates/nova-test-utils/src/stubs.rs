use nova_classfile::flags::{
    ACC_ABSTRACT, ACC_FINAL, ACC_INTERFACE, ACC_NATIVE, ACC_PRIVATE, ACC_PROTECTED, ACC_PUBLIC,
    ACC_STATIC, ACC_STRICT, ACC_SUPER, ACC_SYNCHRONIZED, ACC_TRANSIENT, ACC_VARARGS, ACC_VOLATILE,
};
use nova_classfile::{
    binary_to_internal, ClassStub, FieldStub, InnerClassInfo, MethodStub, CLASS_INIT,
    INSTANCE_INIT,
};

const OBJECT: &str = "java.lang.Object";

/// Builds a [`ClassStub`] from Java-like declarations.
///
/// Malformed declarations panic: this is test-only code and a bad fixture should fail loudly.
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    stub: ClassStub,
}

impl ClassBuilder {
    /// A `public` class extending `java.lang.Object`.
    pub fn class(binary_name: &str) -> Self {
        let mut stub = ClassStub::new(binary_name, ACC_PUBLIC | ACC_SUPER);
        stub.super_binary_name = Some(OBJECT.to_string());
        Self { stub }
    }

    /// A `public` interface.
    pub fn interface(binary_name: &str) -> Self {
        let mut stub = ClassStub::new(binary_name, ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT);
        stub.super_binary_name = Some(OBJECT.to_string());
        Self { stub }
    }

    /// Replace the declared modifiers, e.g. `"public abstract"`, or `""` for package access.
    pub fn modifiers(mut self, modifiers: &str) -> Self {
        let kind = self.stub.access_flags & (ACC_INTERFACE | ACC_SUPER);
        let mut flags = kind | parse_modifiers(modifiers);
        if kind & ACC_INTERFACE != 0 {
            flags |= ACC_ABSTRACT;
        }
        self.stub.access_flags = flags;
        self
    }

    /// Superclass for a class; an extended interface for an interface.
    pub fn extends(mut self, name: &str) -> Self {
        if self.stub.is_interface() {
            self.stub.interfaces.push(name.to_string());
        } else {
            self.stub.super_binary_name = Some(name.to_string());
        }
        self
    }

    pub fn implements(mut self, name: &str) -> Self {
        self.stub.interfaces.push(name.to_string());
        self
    }

    /// Add a field from a declaration such as `"public static final int MAX"`.
    pub fn field(mut self, decl: &str) -> Self {
        let mut words: Vec<&str> = decl.split_whitespace().collect();
        let (Some(name), Some(ty)) = (words.pop(), words.pop()) else {
            panic!("field declaration needs a type and a name: {decl:?}");
        };
        self.stub.fields.push(FieldStub::new(
            name,
            type_descriptor(ty),
            parse_modifiers(&words.join(" ")),
        ));
        self
    }

    /// Add a method from a declaration such as `"public abstract void run(int, java.lang.String)"`.
    ///
    /// A trailing `...` parameter marks the method as varargs.
    pub fn method(mut self, decl: &str) -> Self {
        let (head, rest) = decl
            .split_once('(')
            .unwrap_or_else(|| panic!("method declaration needs a parameter list: {decl:?}"));
        let params = rest
            .trim()
            .strip_suffix(')')
            .unwrap_or_else(|| panic!("unterminated parameter list: {decl:?}"));

        let mut words: Vec<&str> = head.split_whitespace().collect();
        let (Some(name), Some(ret)) = (words.pop(), words.pop()) else {
            panic!("method declaration needs a return type and a name: {decl:?}");
        };

        let (params, varargs) = method_params(params);
        let mut flags = parse_modifiers(&words.join(" "));
        if varargs {
            flags |= ACC_VARARGS;
        }
        self.stub.methods.push(MethodStub::new(
            name,
            format!("({params}){}", type_descriptor(ret)),
            flags,
        ));
        self
    }

    pub fn constructor(mut self, modifiers: &str, params: &[&str]) -> Self {
        let (params, varargs) = method_params(&params.join(","));
        let mut flags = parse_modifiers(modifiers);
        if varargs {
            flags |= ACC_VARARGS;
        }
        self.stub
            .methods
            .push(MethodStub::new(INSTANCE_INIT, format!("({params})V"), flags));
        self
    }

    pub fn static_initializer(mut self) -> Self {
        self.stub
            .methods
            .push(MethodStub::new(CLASS_INIT, "()V", ACC_STATIC));
        self
    }

    /// Mark this class as a member of `outer`, declared with `modifiers`.
    ///
    /// The class-level flags are lowered the way a compiler writes them: `private` becomes
    /// package access and `protected` becomes `public`; the exact modifiers live in the
    /// `InnerClasses` row.
    pub fn member_of(mut self, outer: &str, modifiers: &str) -> Self {
        let inner_name = self
            .stub
            .binary_name
            .strip_prefix(outer)
            .and_then(|rest| rest.strip_prefix('$'))
            .unwrap_or_else(|| panic!("{} is not nested in {outer}", self.stub.binary_name))
            .to_string();

        let mut flags = parse_modifiers(modifiers);
        if self.stub.is_interface() {
            flags |= ACC_INTERFACE | ACC_ABSTRACT | ACC_STATIC;
        }

        let mut lowered = flags & !(ACC_PRIVATE | ACC_PROTECTED | ACC_STATIC);
        if flags & ACC_PROTECTED != 0 {
            lowered |= ACC_PUBLIC;
        }
        if !self.stub.is_interface() {
            lowered |= ACC_SUPER;
        }
        self.stub.access_flags = lowered;

        self.stub.inner_classes.push(InnerClassInfo {
            inner_class: self.stub.binary_name.clone(),
            outer_class: Some(outer.to_string()),
            inner_name: Some(inner_name),
            access_flags: flags,
        });
        self
    }

    /// Record `inner` as a member class declared by this class.
    pub fn declares(mut self, inner: &str, modifiers: &str) -> Self {
        let inner_name = inner
            .strip_prefix(self.stub.binary_name.as_str())
            .and_then(|rest| rest.strip_prefix('$'))
            .unwrap_or_else(|| panic!("{inner} is not nested in {}", self.stub.binary_name))
            .to_string();
        self.stub.inner_classes.push(InnerClassInfo {
            inner_class: inner.to_string(),
            outer_class: Some(self.stub.binary_name.clone()),
            inner_name: Some(inner_name),
            access_flags: parse_modifiers(modifiers),
        });
        self
    }

    /// Mark this class as a local class named `simple_name`.
    pub fn local(mut self, simple_name: &str) -> Self {
        self.stub.inner_classes.push(InnerClassInfo {
            inner_class: self.stub.binary_name.clone(),
            outer_class: None,
            inner_name: Some(simple_name.to_string()),
            access_flags: 0,
        });
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.stub.inner_classes.push(InnerClassInfo {
            inner_class: self.stub.binary_name.clone(),
            outer_class: None,
            inner_name: None,
            access_flags: 0,
        });
        self
    }

    pub fn build(self) -> ClassStub {
        self.stub
    }
}

impl From<ClassBuilder> for ClassStub {
    fn from(builder: ClassBuilder) -> Self {
        builder.build()
    }
}

/// Access flags for a space-separated list of Java modifier keywords.
pub fn parse_modifiers(modifiers: &str) -> u16 {
    modifiers
        .split_whitespace()
        .map(|keyword| match keyword {
            "public" => ACC_PUBLIC,
            "private" => ACC_PRIVATE,
            "protected" => ACC_PROTECTED,
            "static" => ACC_STATIC,
            "final" => ACC_FINAL,
            "synchronized" => ACC_SYNCHRONIZED,
            "volatile" => ACC_VOLATILE,
            "transient" => ACC_TRANSIENT,
            "native" => ACC_NATIVE,
            "abstract" => ACC_ABSTRACT,
            "strictfp" => ACC_STRICT,
            // Interface methods with bodies carry no extra flag.
            "default" => 0,
            other => panic!("unknown modifier {other:?}"),
        })
        .fold(0, |acc, flag| acc | flag)
}

/// JVM descriptor for a source-level type: `int` → `I`, `java.lang.String[]` →
/// `[Ljava/lang/String;`.
pub fn type_descriptor(ty: &str) -> String {
    let mut base = ty.trim();
    let mut out = String::new();
    while let Some(inner) = base.strip_suffix("[]") {
        out.push('[');
        base = inner.trim_end();
    }

    match base {
        "boolean" => out.push('Z'),
        "byte" => out.push('B'),
        "char" => out.push('C'),
        "short" => out.push('S'),
        "int" => out.push('I'),
        "long" => out.push('J'),
        "float" => out.push('F'),
        "double" => out.push('D'),
        "void" => out.push('V'),
        name => {
            out.push('L');
            out.push_str(&binary_to_internal(name));
            out.push(';');
        }
    }
    out
}

fn method_params(params: &str) -> (String, bool) {
    let params: Vec<&str> = params
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut varargs = false;
    let mut out = String::new();
    for (i, param) in params.iter().enumerate() {
        match param.strip_suffix("...") {
            Some(element) if i + 1 == params.len() => {
                varargs = true;
                out.push('[');
                out.push_str(&type_descriptor(element));
            }
            Some(_) => panic!("only the last parameter may be variadic: {param:?}"),
            None => out.push_str(&type_descriptor(param)),
        }
    }
    (out, varargs)
}
