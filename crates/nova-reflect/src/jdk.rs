//! A tiny built-in slice of the JDK so a store can be used without any external class source.
//!
//! Only the types the engine itself depends on (`Object`, `Cloneable`, `Serializable`) plus a few
//! commonly referenced `java.lang` types are provided.

use nova_classfile::flags::{
    ACC_ABSTRACT, ACC_BRIDGE, ACC_FINAL, ACC_INTERFACE, ACC_NATIVE, ACC_PRIVATE, ACC_PROTECTED,
    ACC_PUBLIC, ACC_STATIC, ACC_SUPER, ACC_SYNTHETIC,
};
use nova_classfile::{ClassStub, FieldStub, MethodStub};

use crate::{ClassProvider, MapClassProvider};

pub const OBJECT: &str = "java.lang.Object";
pub const CLONEABLE: &str = "java.lang.Cloneable";
pub const SERIALIZABLE: &str = "java.io.Serializable";

const PUBLIC_INTERFACE: u16 = ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT;
const PUBLIC_ABSTRACT: u16 = ACC_PUBLIC | ACC_ABSTRACT;
const BRIDGE: u16 = ACC_PUBLIC | ACC_BRIDGE | ACC_SYNTHETIC;

/// [`ClassProvider`] serving the built-in minimal JDK.
#[derive(Debug, Clone)]
pub struct MinimalJdk {
    stubs: MapClassProvider,
}

impl Default for MinimalJdk {
    fn default() -> Self {
        Self::new()
    }
}

impl MinimalJdk {
    pub fn new() -> Self {
        Self {
            stubs: [
                object(),
                interface(CLONEABLE, &[], vec![]),
                interface(SERIALIZABLE, &[], vec![]),
                interface(
                    "java.lang.Runnable",
                    &[],
                    vec![method("run", "()V", PUBLIC_ABSTRACT)],
                ),
                interface(
                    "java.lang.Comparable",
                    &[],
                    vec![method("compareTo", "(Ljava/lang/Object;)I", PUBLIC_ABSTRACT)],
                ),
                interface(
                    "java.lang.CharSequence",
                    &[],
                    vec![
                        method("length", "()I", PUBLIC_ABSTRACT),
                        method("charAt", "(I)C", PUBLIC_ABSTRACT),
                        method("toString", "()Ljava/lang/String;", PUBLIC_ABSTRACT),
                    ],
                ),
                string(),
                number(),
                integer(),
            ]
            .into_iter()
            .collect(),
        }
    }
}

impl ClassProvider for MinimalJdk {
    fn lookup_class(&self, binary_name: &str) -> Option<ClassStub> {
        self.stubs.lookup_class(binary_name)
    }
}

fn method(name: &str, descriptor: &str, flags: u16) -> MethodStub {
    MethodStub::new(name, descriptor, flags)
}

fn field(name: &str, descriptor: &str, flags: u16) -> FieldStub {
    FieldStub::new(name, descriptor, flags)
}

fn interface(name: &str, extends: &[&str], methods: Vec<MethodStub>) -> ClassStub {
    let mut stub = ClassStub::new(name, PUBLIC_INTERFACE);
    stub.super_binary_name = Some(OBJECT.to_string());
    stub.interfaces = extends.iter().map(|s| s.to_string()).collect();
    stub.methods = methods;
    stub
}

fn class(name: &str, flags: u16, superclass: &str, interfaces: &[&str]) -> ClassStub {
    let mut stub = ClassStub::new(name, flags | ACC_SUPER);
    stub.super_binary_name = Some(superclass.to_string());
    stub.interfaces = interfaces.iter().map(|s| s.to_string()).collect();
    stub
}

fn object() -> ClassStub {
    let mut stub = ClassStub::new(OBJECT, ACC_PUBLIC | ACC_SUPER);
    stub.methods = vec![
        method("<init>", "()V", ACC_PUBLIC),
        method("hashCode", "()I", ACC_PUBLIC | ACC_NATIVE),
        method("equals", "(Ljava/lang/Object;)Z", ACC_PUBLIC),
        method("toString", "()Ljava/lang/String;", ACC_PUBLIC),
        method("clone", "()Ljava/lang/Object;", ACC_PROTECTED | ACC_NATIVE),
        method("notify", "()V", ACC_PUBLIC | ACC_FINAL | ACC_NATIVE),
        method("notifyAll", "()V", ACC_PUBLIC | ACC_FINAL | ACC_NATIVE),
        method("wait", "()V", ACC_PUBLIC | ACC_FINAL),
        method("wait", "(J)V", ACC_PUBLIC | ACC_FINAL),
        method("finalize", "()V", ACC_PROTECTED),
    ];
    stub
}

fn string() -> ClassStub {
    let mut stub = class(
        "java.lang.String",
        ACC_PUBLIC | ACC_FINAL,
        OBJECT,
        &[SERIALIZABLE, "java.lang.Comparable", "java.lang.CharSequence"],
    );
    stub.fields = vec![
        field("value", "[B", ACC_PRIVATE | ACC_FINAL),
        field("hash", "I", ACC_PRIVATE),
    ];
    stub.methods = vec![
        method("<init>", "()V", ACC_PUBLIC),
        method("<init>", "([C)V", ACC_PUBLIC),
        method("<init>", "(Ljava/lang/String;)V", ACC_PUBLIC),
        method("length", "()I", ACC_PUBLIC),
        method("isEmpty", "()Z", ACC_PUBLIC),
        method("charAt", "(I)C", ACC_PUBLIC),
        method("equals", "(Ljava/lang/Object;)Z", ACC_PUBLIC),
        method("hashCode", "()I", ACC_PUBLIC),
        method("toString", "()Ljava/lang/String;", ACC_PUBLIC),
        method("compareTo", "(Ljava/lang/String;)I", ACC_PUBLIC),
        method("compareTo", "(Ljava/lang/Object;)I", BRIDGE),
        method("valueOf", "(I)Ljava/lang/String;", ACC_PUBLIC | ACC_STATIC),
        method("<clinit>", "()V", ACC_STATIC),
    ];
    stub
}

fn number() -> ClassStub {
    let mut stub = class(
        "java.lang.Number",
        ACC_PUBLIC | ACC_ABSTRACT,
        OBJECT,
        &[SERIALIZABLE],
    );
    stub.methods = vec![
        method("<init>", "()V", ACC_PUBLIC),
        method("intValue", "()I", PUBLIC_ABSTRACT),
        method("longValue", "()J", PUBLIC_ABSTRACT),
        method("doubleValue", "()D", PUBLIC_ABSTRACT),
    ];
    stub
}

fn integer() -> ClassStub {
    let mut stub = class(
        "java.lang.Integer",
        ACC_PUBLIC | ACC_FINAL,
        "java.lang.Number",
        &["java.lang.Comparable"],
    );
    stub.fields = vec![
        field("MIN_VALUE", "I", ACC_PUBLIC | ACC_STATIC | ACC_FINAL),
        field("MAX_VALUE", "I", ACC_PUBLIC | ACC_STATIC | ACC_FINAL),
        field("value", "I", ACC_PRIVATE | ACC_FINAL),
    ];
    stub.methods = vec![
        method("<init>", "(I)V", ACC_PUBLIC),
        method("intValue", "()I", ACC_PUBLIC),
        method("longValue", "()J", ACC_PUBLIC),
        method("doubleValue", "()D", ACC_PUBLIC),
        method("compareTo", "(Ljava/lang/Integer;)I", ACC_PUBLIC),
        method("compareTo", "(Ljava/lang/Object;)I", BRIDGE),
        method("valueOf", "(I)Ljava/lang/Integer;", ACC_PUBLIC | ACC_STATIC),
        method("<clinit>", "()V", ACC_STATIC),
    ];
    stub
}
