#![no_main]
use libfuzzer_sys::fuzz_target;
use zxml::{from_str, to_string};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(doc) = from_str(s) {
            let text = to_string(&doc);
            let reparsed = from_str(&text).unwrap_or_default();
            assert_eq!(reparsed, doc, "round trip changed the tree:\n{text}");
        }
    }
});
