#![no_main]

use std::path::Path;

use ledgerpack::parse_fragment;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Malformed fragments are structural errors, never panics
        let _ = parse_fragment(content, Path::new("fuzz.yaml"));
    }
});
