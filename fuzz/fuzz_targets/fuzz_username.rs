#![no_main]

use libfuzzer_sys::fuzz_target;
use ldapsync::Username;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        if let Some(name) = Username::canonicalize(raw) {
            assert!(!name.as_str().is_empty());
            assert!(!name.as_str().contains('_'));
        }
    }
});
