#![no_main]

use libfuzzer_sys::fuzz_target;

mod utils;

fuzz_target!(|data: &[u8]| {
    let Some(text) = utils::truncate_utf8(data) else {
        return;
    };

    if let Ok(ty) = nova_classfile::parse_field_descriptor(text) {
        assert!(ty.dimensions() <= text.len());
        assert!(!matches!(ty.element(), nova_classfile::FieldType::Array(_)));
    }
    if let Ok(desc) = nova_classfile::parse_method_descriptor(text) {
        for name in desc.class_names() {
            assert!(!name.is_empty());
        }
    }
    let _ = nova_classfile::parse_array_class_name(text);
});
