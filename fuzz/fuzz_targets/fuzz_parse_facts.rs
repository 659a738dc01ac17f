#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz facts parsing and extraction.
///
/// Anything that parses is pushed through the extractor, which must either
/// produce a valid model or report an error.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(facts) = abi_tools::extractor::parse_facts(s) {
            let source = abi_tools::extractor::InMemorySource::new(facts);
            let _ = abi_tools::Extractor::new().extract(&source);
        }
    }
});
