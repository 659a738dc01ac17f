#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz dump format detection.
///
/// Detection must be total: every input maps to some format without panicking.
fuzz_target!(|data: &[u8]| {
    let _ = abi_tools::DumpFormat::detect(data);
});
