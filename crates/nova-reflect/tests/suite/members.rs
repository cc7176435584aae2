use std::collections::HashSet;

use nova_reflect::{Modifiers, PrimitiveType, ReflectError};
use nova_test_utils::ClassBuilder;
use pretty_assertions::assert_eq;

use super::{class, names, store};

fn base_and_derived() -> Vec<ClassBuilder> {
    vec![
        ClassBuilder::class("p.Base")
            .field("public int count")
            .field("private int secret")
            .constructor("public", &[])
            .constructor("private", &["int"])
            .method("public void run()")
            .method("public java.lang.String describe()")
            .method("protected void hook()")
            .method("private void helper()")
            .method("public static p.Base create()")
            .static_initializer(),
        ClassBuilder::class("p.Derived")
            .extends("p.Base")
            .field("public int count")
            .method("public void run()")
            .method("public void extra(int, java.lang.String)")
            .method("public void log(java.lang.String...)"),
    ]
}

#[test]
fn declared_members_belong_to_their_type() {
    let store = store(base_and_derived());
    let base = class(&store, "p.Base");

    let methods: Vec<_> = base
        .declared_methods()
        .iter()
        .map(|m| m.name().to_string())
        .collect();
    assert_eq!(methods, vec!["run", "describe", "hook", "helper", "create"]);
    assert!(base
        .declared_methods()
        .iter()
        .all(|m| m.declaring_class() == base));

    assert_eq!(base.declared_fields().len(), 2);
    assert!(base
        .declared_fields()
        .iter()
        .all(|f| f.declaring_class() == base));
    assert_eq!(base.declared_constructors().len(), 2);
}

#[test]
fn public_methods_include_inherited_ones_once() {
    let store = store(base_and_derived());
    let derived = class(&store, "p.Derived");
    let methods = derived.methods();

    let mut signatures = HashSet::new();
    for method in &methods {
        assert!(method.modifiers().is_public(), "{method}");
        assert!(
            signatures.insert((method.name().to_string(), method.def().params.clone())),
            "duplicate {method}"
        );
    }

    let mut found: Vec<_> = methods.iter().map(|m| m.name().to_string()).collect();
    found.sort();
    assert_eq!(
        found,
        vec![
            "create", "describe", "equals", "extra", "hashCode", "log", "notify", "notifyAll",
            "run", "toString", "wait", "wait",
        ]
    );

    let run = derived.method(Some("run"), &[]).unwrap();
    assert_eq!(run.declaring_class(), derived);
    let describe = derived.method(Some("describe"), &[]).unwrap();
    assert_eq!(describe.declaring_class().name(), "p.Base");
}

#[test]
fn hidden_fields_are_listed_per_declaring_type() {
    let store = store(base_and_derived());
    let derived = class(&store, "p.Derived");

    let fields: Vec<_> = derived
        .fields()
        .iter()
        .map(|f| format!("{}.{}", f.declaring_class().name(), f.name()))
        .collect();
    assert_eq!(fields, vec!["p.Derived.count", "p.Base.count"]);

    assert_eq!(
        derived.field(Some("count")).unwrap().declaring_class(),
        derived
    );
}

#[test]
fn lookups_report_absent_arguments_and_missing_members() {
    let store = store(base_and_derived());
    let base = class(&store, "p.Base");
    let derived = class(&store, "p.Derived");
    let int = store.primitive(PrimitiveType::Int);

    assert!(matches!(
        derived.field(None),
        Err(ReflectError::NullArgument(_))
    ));
    assert!(matches!(
        derived.method(None, &[]),
        Err(ReflectError::NullArgument(_))
    ));
    assert!(matches!(
        derived.declared_method(None, &[]),
        Err(ReflectError::NullArgument(_))
    ));

    let err = base.field(Some("secret")).unwrap_err();
    assert!(err.is_not_found(), "{err}");
    assert_eq!(err.to_string(), "no such field: p.Base.secret");
    assert_eq!(base.declared_field(Some("secret")).unwrap().name(), "secret");

    assert!(base.method(Some("hook"), &[]).unwrap_err().is_not_found());
    assert_eq!(
        base.declared_method(Some("hook"), &[]).unwrap().modifiers(),
        Modifiers::PROTECTED
    );

    let err = derived.method(Some("extra"), &[int.clone()]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "no such method: p.Derived.extra(int)"
    );
    let string = class(&store, "java.lang.String");
    let extra = derived
        .method(Some("extra"), &[int.clone(), string.clone()])
        .unwrap();
    assert_eq!(extra.parameter_types(), vec![int.clone(), string]);
    assert_eq!(extra.return_type(), store.primitive(PrimitiveType::Void));

    // Methods are not reachable through a subclass's declared table.
    assert!(derived
        .declared_method(Some("describe"), &[])
        .unwrap_err()
        .is_not_found());
}

#[test]
fn initializers_are_never_methods() {
    let store = store(base_and_derived());
    let base = class(&store, "p.Base");

    for name in ["<init>", "<clinit>"] {
        let err = base.declared_method(Some(name), &[]).unwrap_err();
        assert!(
            matches!(err, ReflectError::NoSuchMethod { .. }),
            "{name}: {err}"
        );
    }
    assert!(base.declared_methods().iter().all(|m| !m.name().starts_with('<')));
}

#[test]
fn constructors_are_not_inherited() {
    let store = store(base_and_derived());
    let base = class(&store, "p.Base");
    let derived = class(&store, "p.Derived");
    let int = store.primitive(PrimitiveType::Int);

    assert_eq!(base.constructors().len(), 1);
    assert!(base.constructor(&[]).is_ok());
    assert!(matches!(
        base.constructor(&[int.clone()]),
        Err(ReflectError::NoSuchConstructor { .. })
    ));
    let private = base.declared_constructor(&[int]).unwrap();
    assert_eq!(private.to_string(), "private p.Base(int)");

    assert!(derived.constructors().is_empty());
    assert!(derived.declared_constructors().is_empty());
}

#[test]
fn subinterface_redeclaration_wins() {
    let store = store(vec![
        ClassBuilder::interface("p.Shape")
            .method("public abstract double area()")
            .method("public default java.lang.String label()")
            .method("public static p.Shape unit()"),
        ClassBuilder::interface("p.Polygon")
            .extends("p.Shape")
            .method("public abstract double area()")
            .method("public abstract int sides()"),
        ClassBuilder::class("p.Square")
            .modifiers("public abstract")
            .implements("p.Shape")
            .implements("p.Polygon"),
        ClassBuilder::class("p.Tile")
            .implements("p.Polygon")
            .method("public double area()")
            .method("public int sides()"),
    ]);

    let square = class(&store, "p.Square");
    assert_eq!(
        square.method(Some("area"), &[]).unwrap().declaring_class().name(),
        "p.Polygon"
    );
    assert_eq!(
        square.method(Some("label"), &[]).unwrap().declaring_class().name(),
        "p.Shape"
    );

    // Static interface methods are not inherited, but belong to their own interface.
    assert!(square.method(Some("unit"), &[]).unwrap_err().is_not_found());
    assert!(class(&store, "p.Shape").method(Some("unit"), &[]).is_ok());

    let tile = class(&store, "p.Tile");
    assert_eq!(
        tile.method(Some("area"), &[]).unwrap().declaring_class(),
        tile
    );
}

#[test]
fn interface_methods_exclude_the_root_class() {
    let store = store(vec![]);
    let runnable = class(&store, "java.lang.Runnable");
    let methods: Vec<_> = runnable.methods().iter().map(|m| m.to_string()).collect();
    assert_eq!(methods, vec!["public abstract void java.lang.Runnable.run()"]);
}

#[test]
fn members_render_like_java() {
    let store = store(base_and_derived());
    let integer = class(&store, "java.lang.Integer");
    let string = class(&store, "java.lang.String");
    let derived = class(&store, "p.Derived");

    assert_eq!(
        integer.field(Some("MAX_VALUE")).unwrap().to_string(),
        "public static final int java.lang.Integer.MAX_VALUE"
    );
    assert_eq!(
        string.declared_field(Some("value")).unwrap().to_string(),
        "private final byte[] java.lang.String.value"
    );
    assert_eq!(
        derived.declared_methods()[1].to_string(),
        "public void p.Derived.extra(int,java.lang.String)"
    );

    let log = &derived.declared_methods()[2];
    assert!(log.is_varargs());
    assert_eq!(names(&log.parameter_types()), vec!["[Ljava.lang.String;"]);
    assert_eq!(
        log.to_string(),
        "public void p.Derived.log(java.lang.String[])"
    );
}
