#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz the binary decoder behind a valid header.
///
/// Prepends the magic bytes and a supported version so that inputs reach the
/// checksum and payload paths instead of failing on the header.
fuzz_target!(|data: &[u8]| {
    let mut bytes = abi_tools::dump::BINARY_MAGIC.to_vec();
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(data);
    let _ = abi_tools::dump::deserialize_as(&bytes, abi_tools::DumpFormat::Binary);
});
