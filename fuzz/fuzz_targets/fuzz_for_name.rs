#![no_main]

use libfuzzer_sys::fuzz_target;
use nova_reflect::TypeStore;

mod utils;

fuzz_target!(|data: &[u8]| {
    let Some(name) = utils::truncate_utf8(data) else {
        return;
    };

    let store = TypeStore::global();
    if let Ok(class) = store.for_name(name) {
        // Anything that resolves must resolve to the same descriptor again.
        let again = store.for_name(name).expect("second resolution failed");
        assert_eq!(class, again);
        assert!(store.object().is_assignable_from(Some(&class)).unwrap_or(false));
    }
});
