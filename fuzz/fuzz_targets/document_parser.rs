#![no_main]
use libfuzzer_sys::fuzz_target;
use zxml::Parser;

fuzz_target!(|data: &[u8]| {
    let mut parser = Parser::new();
    if parser.feed_bytes(data).is_ok() {
        let _ = parser.finish();
    }
});
