use std::error::Error as _;

use nova_reflect::{
    Constructor, ConstructorFault, ConstructorInvoker, EmptyBodyInvoker, Instance, PrimitiveType,
    ReflectError, Thrown, UninitializedInstance,
};
use nova_test_utils::ClassBuilder;
use pretty_assertions::assert_eq;

use super::{class, store};

fn fixtures() -> Vec<ClassBuilder> {
    vec![
        ClassBuilder::class("p.Widget").constructor("public", &[]),
        ClassBuilder::class("p.Shape")
            .modifiers("public abstract")
            .constructor("public", &[]),
        ClassBuilder::class("p.NoDefault").constructor("public", &["int"]),
        ClassBuilder::class("p.Secret")
            .constructor("private", &[])
            .declares("p.Secret$Helper", "static"),
        ClassBuilder::class("p.Secret$Helper").member_of("p.Secret", "static"),
        ClassBuilder::class("p.Local").constructor("", &[]),
        ClassBuilder::class("p.Guarded").constructor("protected", &[]),
        ClassBuilder::class("p.Other").constructor("public", &[]),
        ClassBuilder::class("q.Foreign"),
    ]
}

/// Fails every construction with a fixed fault.
struct Faulting(ConstructorFault);

impl ConstructorInvoker for Faulting {
    fn invoke(
        &self,
        _ctor: &Constructor<'_>,
        _receiver: UninitializedInstance,
    ) -> Result<Instance, ConstructorFault> {
        Err(self.0.clone())
    }
}

/// Hands back a previously constructed instance instead of the receiver.
struct Substitute(Instance);

impl ConstructorInvoker for Substitute {
    fn invoke(
        &self,
        _ctor: &Constructor<'_>,
        _receiver: UninitializedInstance,
    ) -> Result<Instance, ConstructorFault> {
        Ok(self.0)
    }
}

fn nullary_only(
    ctor: &Constructor<'_>,
    receiver: UninitializedInstance,
) -> Result<Instance, ConstructorFault> {
    assert_eq!(ctor.parameter_count(), 0);
    assert_eq!(ctor.declaring_class().id(), receiver.class_id());
    Ok(receiver.initialize())
}

fn is_instantiation_without_cause(result: Result<Instance, ReflectError>) -> bool {
    matches!(result, Err(ReflectError::Instantiation { cause: None, .. }))
}

#[test]
fn public_nullary_constructor_is_invoked() {
    let store = store(fixtures());
    let widget = class(&store, "p.Widget");

    let instance = widget.new_instance(None, &nullary_only).unwrap();
    assert_eq!(store.class_of(&instance), Some(widget.clone()));
    assert!(widget.is_instance(Some(&instance)));
}

#[test]
fn non_concrete_types_cannot_be_instantiated() {
    let store = store(fixtures());
    let targets = [
        class(&store, "p.Shape"),
        class(&store, "java.lang.Runnable"),
        class(&store, "java.lang.Number"),
        store.primitive(PrimitiveType::Int),
        class(&store, "[Ljava.lang.Object;"),
        class(&store, "p.NoDefault"),
    ];
    for target in targets {
        assert!(
            is_instantiation_without_cause(target.new_instance(None, &EmptyBodyInvoker)),
            "{target}"
        );
    }
}

#[test]
fn private_constructor_is_reachable_only_from_its_nest() {
    let store = store(fixtures());
    let secret = class(&store, "p.Secret");
    let helper = class(&store, "p.Secret$Helper");
    let other = class(&store, "p.Other");

    let err = secret.new_instance(None, &EmptyBodyInvoker).unwrap_err();
    assert!(matches!(err, ReflectError::IllegalAccess { .. }), "{err}");

    let err = secret
        .new_instance(Some(&other), &EmptyBodyInvoker)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "class p.Other cannot access a member of class p.Secret with modifiers \"private\""
    );

    assert!(secret.new_instance(Some(&secret), &EmptyBodyInvoker).is_ok());
    assert!(secret.new_instance(Some(&helper), &EmptyBodyInvoker).is_ok());
}

#[test]
fn package_and_protected_constructors_need_the_same_package() {
    let store = store(fixtures());
    let other = class(&store, "p.Other");
    let foreign = class(&store, "q.Foreign");

    for name in ["p.Local", "p.Guarded"] {
        let target = class(&store, name);
        assert!(target.new_instance(Some(&other), &EmptyBodyInvoker).is_ok(), "{name}");
        assert!(
            matches!(
                target.new_instance(Some(&foreign), &EmptyBodyInvoker),
                Err(ReflectError::IllegalAccess { .. })
            ),
            "{name}"
        );
        assert!(
            matches!(
                target.new_instance(None, &EmptyBodyInvoker),
                Err(ReflectError::IllegalAccess { .. })
            ),
            "{name}"
        );
    }
}

#[test]
fn checked_constructor_fault_becomes_the_cause() {
    let store = store(fixtures());
    let widget = class(&store, "p.Widget");
    let thrown = Thrown::new("java.io.IOException").with_message("disk full");

    let err = widget
        .new_instance(None, &Faulting(ConstructorFault::Exception(thrown.clone())))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "cannot instantiate p.Widget: java.io.IOException: disk full"
    );
    assert_eq!(
        err.source().map(ToString::to_string),
        Some("java.io.IOException: disk full".to_string())
    );
    match err {
        ReflectError::Instantiation { class, cause } => {
            assert_eq!(class, "p.Widget");
            assert_eq!(cause, Some(thrown));
        }
        other => panic!("expected an instantiation failure, got {other:?}"),
    }
}

#[test]
fn unchecked_constructor_fault_passes_through() {
    let store = store(fixtures());
    let widget = class(&store, "p.Widget");
    let thrown = Thrown::new("java.lang.IllegalStateException");

    let err = widget
        .new_instance(None, &Faulting(ConstructorFault::Unchecked(thrown.clone())))
        .unwrap_err();
    assert_eq!(err.to_string(), "java.lang.IllegalStateException");
    assert!(matches!(err, ReflectError::Fault(fault) if fault == thrown));
}

#[test]
fn invoker_must_return_the_receiver_type() {
    let store = store(fixtures());
    let widget = class(&store, "p.Widget");
    let other = class(&store, "p.Other")
        .new_instance(None, &EmptyBodyInvoker)
        .unwrap();

    assert!(is_instantiation_without_cause(
        widget.new_instance(None, &Substitute(other))
    ));

    let foreign_store = super::store(fixtures());
    let foreign = class(&foreign_store, "p.Widget")
        .new_instance(None, &EmptyBodyInvoker)
        .unwrap();
    assert_eq!(foreign.class_id(), widget.id());
    assert!(is_instantiation_without_cause(
        widget.new_instance(None, &Substitute(foreign))
    ));
}
