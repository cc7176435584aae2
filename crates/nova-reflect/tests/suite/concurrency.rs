use std::sync::Barrier;
use std::thread;

use nova_reflect::TypeId;
use nova_test_utils::ClassBuilder;

use super::store;

const THREADS: usize = 8;

fn race<F>(f: F) -> Vec<TypeId>
where
    F: Fn() -> TypeId + Sync,
{
    let barrier = Barrier::new(THREADS);
    thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    f()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    })
}

#[test]
fn racing_array_synthesis_yields_one_descriptor() {
    let store = store(vec![]);
    let before = store.len();

    let ids = race(|| store.for_name("[[[Ljava.lang.Integer;").unwrap().id());
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]), "{ids:?}");

    // Integer itself plus its three array types, plus whatever Integer pulled in.
    let integer_batch = store.len() - before;
    let again = race(|| store.for_name("[[[Ljava.lang.Integer;").unwrap().id());
    assert_eq!(again[0], ids[0]);
    assert_eq!(store.len() - before, integer_batch);
}

#[test]
fn racing_class_loads_publish_each_class_once() {
    const DEPTH: usize = 40;

    let mut stubs = vec![ClassBuilder::class("p.C0")];
    for i in 1..DEPTH {
        stubs.push(ClassBuilder::class(&format!("p.C{i}")).extends(&format!("p.C{}", i - 1)));
    }
    let store = store(stubs);
    let before = store.len();

    let leaf = format!("p.C{}", DEPTH - 1);
    let ids = race(|| store.for_name(&leaf).unwrap().id());
    assert!(ids.windows(2).all(|pair| pair[0] == pair[1]), "{ids:?}");
    assert_eq!(store.len() - before, DEPTH);

    for i in 0..DEPTH {
        assert!(store.is_loaded(&format!("p.C{i}")));
    }
    let leaf = store.for_name(&leaf).unwrap();
    assert_eq!(leaf.supertypes().len(), DEPTH);
}

#[test]
fn supertype_closure_is_shared_across_threads() {
    let store = store(vec![
        ClassBuilder::interface("p.I"),
        ClassBuilder::interface("p.J").extends("p.I"),
        ClassBuilder::class("p.B").implements("p.J"),
    ]);
    let b = store.for_name("p.B").unwrap();

    let firsts = race(|| b.supertypes()[0].id());
    assert!(firsts.iter().all(|id| *id == store.object().id()));
}
