#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz the main dump loading entry point.
///
/// Arbitrary bytes go through format detection, decoding and the model
/// invariant checks. A successful load must compare equal to itself.
fuzz_target!(|data: &[u8]| {
    if let Ok(repr) = abi_tools::dump::deserialize(data) {
        assert!(abi_tools::DiffEngine::new().compare(&repr, &repr).is_empty());
    }
});
