use nova_reflect::PrimitiveType;
use nova_test_utils::ClassBuilder;
use pretty_assertions::assert_eq;

use super::{class, names, store};

fn diamond() -> Vec<ClassBuilder> {
    vec![
        ClassBuilder::interface("p.I").field("public static final int f"),
        ClassBuilder::interface("p.J").extends("p.I"),
        ClassBuilder::interface("p.L").extends("p.I"),
        ClassBuilder::class("p.B").implements("p.J").implements("p.L"),
    ]
}

#[test]
fn diamond_interfaces_are_listed_once() {
    let store = store(diamond());
    let b = class(&store, "p.B");

    assert_eq!(names(&b.interfaces()), vec!["p.J", "p.L"]);
    assert_eq!(
        names(&b.supertypes()),
        vec!["java.lang.Object", "p.J", "p.I", "p.L"]
    );

    let fields: Vec<_> = b
        .fields()
        .iter()
        .map(|f| (f.name().to_string(), f.declaring_class().name().to_string()))
        .collect();
    assert_eq!(fields, vec![("f".to_string(), "p.I".to_string())]);
}

#[test]
fn superclass_chain_precedes_interfaces() {
    let store = store(vec![
        ClassBuilder::class("p.A").implements("java.lang.Runnable"),
        ClassBuilder::class("p.M").extends("p.A"),
        ClassBuilder::interface("p.I"),
        ClassBuilder::class("p.C").extends("p.M").implements("p.I"),
    ]);
    let c = class(&store, "p.C");

    assert_eq!(
        names(&c.supertypes()),
        vec!["p.M", "p.A", "java.lang.Object", "p.I", "java.lang.Runnable"]
    );
    assert_eq!(c.superclass().unwrap().name(), "p.M");
    assert_eq!(names(&c.interfaces()), vec!["p.I"]);
}

#[test]
fn interfaces_do_not_list_the_root_class() {
    let store = store(diamond());
    let j = class(&store, "p.J");

    assert_eq!(names(&j.supertypes()), vec!["p.I"]);
    assert_eq!(j.superclass(), None);
}

#[test]
fn primitives_and_arrays() {
    let store = store(vec![]);
    let int = store.primitive(PrimitiveType::Int);
    let ints = class(&store, "[I");

    assert!(int.supertypes().is_empty());
    assert!(int.interfaces().is_empty());
    assert_eq!(names(&ints.supertypes()), vec!["java.lang.Object"]);
    assert_eq!(
        names(&ints.interfaces()),
        vec!["java.lang.Cloneable", "java.io.Serializable"]
    );
}

#[test]
fn closure_is_stable_across_calls() {
    let store = store(diamond());
    let b = class(&store, "p.B");
    assert_eq!(b.supertypes(), b.supertypes());
    assert_eq!(
        class(&store, "p.B").supertypes(),
        store.for_name("p.B").unwrap().supertypes()
    );
}

#[test]
fn same_named_fields_from_unrelated_interfaces_are_both_listed() {
    let store = store(vec![
        ClassBuilder::interface("p.I").field("public static final int f"),
        ClassBuilder::interface("p.K").field("public static final int f"),
        ClassBuilder::class("p.B").implements("p.I").implements("p.K"),
    ]);
    let b = class(&store, "p.B");

    let fields: Vec<_> = b.fields().iter().map(ToString::to_string).collect();
    assert_eq!(
        fields,
        vec!["public static final int p.I.f", "public static final int p.K.f"]
    );
    assert_eq!(b.field(Some("f")).unwrap().declaring_class().name(), "p.I");
}
