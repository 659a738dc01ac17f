//! Registry of fundamental types.
//!
//! A type reference that does not name a record or enum in the dump must name
//! one of these. Sizes are recorded only where every mainstream ABI agrees;
//! `long`, `wchar_t`, `long double` and the pointer-sized aliases have none.

/// A fundamental type known to every dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinType {
    pub name: &'static str,
    pub size_bits: Option<u64>,
}

const fn builtin(name: &'static str, size_bits: Option<u64>) -> BuiltinType {
    BuiltinType { name, size_bits }
}

static BUILTINS: &[BuiltinType] = &[
    builtin("void", None),
    builtin("bool", Some(8)),
    builtin("_Bool", Some(8)),
    builtin("char", Some(8)),
    builtin("signed char", Some(8)),
    builtin("unsigned char", Some(8)),
    builtin("wchar_t", None),
    builtin("char8_t", Some(8)),
    builtin("char16_t", Some(16)),
    builtin("char32_t", Some(32)),
    builtin("short", Some(16)),
    builtin("unsigned short", Some(16)),
    builtin("int", Some(32)),
    builtin("unsigned int", Some(32)),
    builtin("long", None),
    builtin("unsigned long", None),
    builtin("long long", Some(64)),
    builtin("unsigned long long", Some(64)),
    builtin("__int128", Some(128)),
    builtin("unsigned __int128", Some(128)),
    builtin("_Float16", Some(16)),
    builtin("__bf16", Some(16)),
    builtin("float", Some(32)),
    builtin("double", Some(64)),
    builtin("long double", None),
    builtin("std::nullptr_t", None),
    builtin("int8_t", Some(8)),
    builtin("uint8_t", Some(8)),
    builtin("int16_t", Some(16)),
    builtin("uint16_t", Some(16)),
    builtin("int32_t", Some(32)),
    builtin("uint32_t", Some(32)),
    builtin("int64_t", Some(64)),
    builtin("uint64_t", Some(64)),
    builtin("size_t", None),
    builtin("ssize_t", None),
    builtin("ptrdiff_t", None),
    builtin("intptr_t", None),
    builtin("uintptr_t", None),
];

/// Alternative spellings a frontend may emit, mapped to the registry name.
static ALIASES: &[(&str, &str)] = &[
    ("signed", "int"),
    ("signed int", "int"),
    ("unsigned", "unsigned int"),
    ("short int", "short"),
    ("signed short", "short"),
    ("signed short int", "short"),
    ("short signed int", "short"),
    ("unsigned short int", "unsigned short"),
    ("short unsigned int", "unsigned short"),
    ("long int", "long"),
    ("signed long", "long"),
    ("signed long int", "long"),
    ("long signed int", "long"),
    ("unsigned long int", "unsigned long"),
    ("long unsigned int", "unsigned long"),
    ("long long int", "long long"),
    ("signed long long", "long long"),
    ("long long signed int", "long long"),
    ("unsigned long long int", "unsigned long long"),
    ("long long unsigned int", "unsigned long long"),
    ("__int128_t", "__int128"),
    ("__uint128_t", "unsigned __int128"),
    ("nullptr_t", "std::nullptr_t"),
    ("decltype(nullptr)", "std::nullptr_t"),
    ("std::size_t", "size_t"),
    ("std::ptrdiff_t", "ptrdiff_t"),
    ("std::int8_t", "int8_t"),
    ("std::uint8_t", "uint8_t"),
    ("std::int16_t", "int16_t"),
    ("std::uint16_t", "uint16_t"),
    ("std::int32_t", "int32_t"),
    ("std::uint32_t", "uint32_t"),
    ("std::int64_t", "int64_t"),
    ("std::uint64_t", "uint64_t"),
    ("std::intptr_t", "intptr_t"),
    ("std::uintptr_t", "uintptr_t"),
];

/// Look up a built-in by its registry name.
pub fn lookup(name: &str) -> Option<&'static BuiltinType> {
    BUILTINS.iter().find(|b| b.name == name)
}

/// True if `name` is a registry name.
pub fn is_builtin(name: &str) -> bool {
    lookup(name).is_some()
}

/// Map any accepted spelling to its registry name.
///
/// Whitespace runs are collapsed first, so `unsigned   long` resolves.
pub fn canonical_name(spelling: &str) -> Option<&'static str> {
    let normalized = spelling.split_whitespace().collect::<Vec<_>>().join(" ");
    if let Some(b) = lookup(&normalized) {
        return Some(b.name);
    }
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, target)| *target)
}

/// Iterate over all registered built-ins.
pub fn all() -> impl Iterator<Item = &'static BuiltinType> {
    BUILTINS.iter()
}
