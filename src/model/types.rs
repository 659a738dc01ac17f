//! Type references and the small enums shared by every entity.

use super::Uid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// cv-qualifiers applied to a type or to one pointer level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Qualifiers {
    pub is_const: bool,
    pub is_volatile: bool,
    pub is_restrict: bool,
}

impl Qualifiers {
    pub const NONE: Self = Self {
        is_const: false,
        is_volatile: false,
        is_restrict: false,
    };

    pub const CONST: Self = Self {
        is_const: true,
        is_volatile: false,
        is_restrict: false,
    };

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.is_const && !self.is_volatile && !self.is_restrict
    }

    fn write_prefix(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            f.write_str("const ")?;
        }
        if self.is_volatile {
            f.write_str("volatile ")?;
        }
        if self.is_restrict {
            f.write_str("restrict ")?;
        }
        Ok(())
    }
}

/// One level of indirection, innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indirection {
    /// `*`, with the qualifiers applying to the pointer itself
    Pointer(Qualifiers),
    /// `&`
    LvalueReference,
    /// `&&`
    RvalueReference,
}

/// A use of a type: a lookup key into the owning dump plus the decorations
/// applied at the use site. Never owns the referenced type.
///
/// Function types (the target of a callback pointer) have no entry of their
/// own. They are spelled structurally in `function`, and `uid` holds the
/// canonical spelling of that signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeReference {
    /// Record, enum, function or built-in UID
    pub uid: Uid,
    /// Qualifiers on the referenced type
    #[serde(default)]
    pub qualifiers: Qualifiers,
    /// Pointer/reference chain, innermost first
    #[serde(default)]
    pub indirection: Vec<Indirection>,
    /// Array extents, outermost first; `None` is an incomplete `[]`
    #[serde(default)]
    pub array_extents: Vec<Option<u64>>,
    /// Signature when the referenced type is a function type
    #[serde(default)]
    pub function: Option<Box<FunctionType>>,
}

impl TypeReference {
    /// Plain, unqualified use of a type.
    pub fn named(uid: impl Into<Uid>) -> Self {
        Self {
            uid: uid.into(),
            qualifiers: Qualifiers::NONE,
            indirection: Vec::new(),
            array_extents: Vec::new(),
            function: None,
        }
    }

    /// Use of a function type. Add `.pointer()` for a callback.
    pub fn function(signature: FunctionType) -> Self {
        Self {
            uid: signature.uid(),
            function: Some(Box::new(signature)),
            ..Self::named("")
        }
    }

    /// True if the referenced type is a function type.
    #[must_use]
    pub fn is_function(&self) -> bool {
        self.function.is_some()
    }

    /// This reference followed by every reference nested in a function
    /// signature, depth first.
    #[must_use]
    pub fn walk(&self) -> Vec<&TypeReference> {
        let mut out = vec![self];
        if let Some(signature) = &self.function {
            for nested in signature.types() {
                out.extend(nested.walk());
            }
        }
        out
    }

    /// Qualify the referenced type with `const`.
    #[must_use]
    pub fn constant(mut self) -> Self {
        self.qualifiers.is_const = true;
        self
    }

    /// Add one unqualified pointer level.
    #[must_use]
    pub fn pointer(mut self) -> Self {
        self.indirection.push(Indirection::Pointer(Qualifiers::NONE));
        self
    }

    /// Add an lvalue reference.
    #[must_use]
    pub fn reference(mut self) -> Self {
        self.indirection.push(Indirection::LvalueReference);
        self
    }

    /// Add an array dimension.
    #[must_use]
    pub fn array(mut self, extent: Option<u64>) -> Self {
        self.array_extents.push(extent);
        self
    }

    /// Number of pointer/reference levels.
    #[must_use]
    pub fn indirection_depth(&self) -> usize {
        self.indirection.len()
    }

    /// True if the value is reached through a pointer or reference, so the
    /// referenced type's layout does not affect the holder's layout.
    #[must_use]
    pub fn is_indirect(&self) -> bool {
        !self.indirection.is_empty()
    }
}

impl TypeReference {
    fn write_declarator(&self, f: &mut fmt::Formatter<'_>, leading_space: bool) -> fmt::Result {
        let mut space = leading_space;
        for level in &self.indirection {
            if space {
                f.write_str(" ")?;
            }
            space = true;
            match level {
                Indirection::Pointer(q) => {
                    f.write_str("*")?;
                    if q.is_const {
                        f.write_str(" const")?;
                    }
                    if q.is_volatile {
                        f.write_str(" volatile")?;
                    }
                    if q.is_restrict {
                        f.write_str(" restrict")?;
                    }
                }
                Indirection::LvalueReference => f.write_str("&")?,
                Indirection::RvalueReference => f.write_str("&&")?,
            }
        }
        for extent in &self.array_extents {
            match extent {
                Some(n) => write!(f, "[{n}]")?,
                None => f.write_str("[]")?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function {
            // C declarator syntax: `void (*)(int)`, `int (&)(void)`
            Some(signature) if !self.indirection.is_empty() || !self.array_extents.is_empty() => {
                write!(f, "{} (", signature.return_type)?;
                self.write_declarator(f, false)?;
                write!(f, ")({})", signature.parameter_list())?;
                signature.write_convention(f)
            }
            _ => {
                self.qualifiers.write_prefix(f)?;
                f.write_str(self.uid.as_str())?;
                self.write_declarator(f, true)
            }
        }
    }
}

/// The type of a function, as reached through a callback pointer or
/// reference. Function declarations carry the same information in
/// [`FunctionDecl`](super::FunctionDecl).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    pub return_type: TypeReference,
    #[serde(default)]
    pub parameters: Vec<TypeReference>,
    #[serde(default)]
    pub variadic: bool,
    #[serde(default)]
    pub calling_convention: CallingConvention,
}

impl FunctionType {
    /// A non-variadic C-convention signature.
    pub fn new(return_type: TypeReference, parameters: Vec<TypeReference>) -> Self {
        Self {
            return_type,
            parameters,
            variadic: false,
            calling_convention: CallingConvention::C,
        }
    }

    #[must_use]
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    #[must_use]
    pub fn with_calling_convention(mut self, convention: CallingConvention) -> Self {
        self.calling_convention = convention;
        self
    }

    /// Canonical spelling, e.g. `int (const char *, ...)`. Two signatures
    /// share a spelling exactly when they are equal.
    #[must_use]
    pub fn uid(&self) -> Uid {
        Uid::new(self.to_string())
    }

    /// Return type first, then the parameters.
    pub fn types(&self) -> impl Iterator<Item = &TypeReference> {
        std::iter::once(&self.return_type).chain(self.parameters.iter())
    }

    fn parameter_list(&self) -> String {
        let mut params: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        if self.variadic {
            params.push("...".to_string());
        }
        params.join(", ")
    }

    fn write_convention(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.calling_convention == CallingConvention::C {
            Ok(())
        } else {
            write!(f, " [{}]", self.calling_convention)
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.return_type, self.parameter_list())?;
        self.write_convention(f)
    }
}

/// Member access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    #[default]
    Public,
    Protected,
    Private,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
        })
    }
}

/// Symbol linkage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Linkage {
    Internal,
    #[default]
    External,
    Weak,
}

impl Linkage {
    /// External and weak symbols are visible to other binaries.
    #[must_use]
    pub const fn is_externally_visible(&self) -> bool {
        matches!(self, Self::External | Self::Weak)
    }
}

impl fmt::Display for Linkage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Weak => "weak",
        })
    }
}

/// Calling convention of a function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallingConvention {
    #[default]
    C,
    StdCall,
    FastCall,
    ThisCall,
    VectorCall,
    RegCall,
    Win64,
    SysV64,
    Aapcs,
    AapcsVfp,
    /// Any convention the frontend reports that has no variant here
    Other(String),
}

impl CallingConvention {
    /// Parse a frontend spelling (`cdecl`, `__stdcall`, `ms_abi`, ...).
    pub fn parse(spelling: &str) -> Self {
        let key = spelling.trim().trim_start_matches('_').to_lowercase();
        match key.as_str() {
            "" | "c" | "cdecl" | "default" => Self::C,
            "stdcall" => Self::StdCall,
            "fastcall" => Self::FastCall,
            "thiscall" => Self::ThisCall,
            "vectorcall" => Self::VectorCall,
            "regcall" => Self::RegCall,
            "win64" | "ms_abi" => Self::Win64,
            "sysv64" | "sysv_abi" | "x86_64_sysv" => Self::SysV64,
            "aapcs" => Self::Aapcs,
            "aapcs_vfp" | "aapcs-vfp" => Self::AapcsVfp,
            _ => Self::Other(spelling.trim().to_string()),
        }
    }
}

impl fmt::Display for CallingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::C => f.write_str("cdecl"),
            Self::StdCall => f.write_str("stdcall"),
            Self::FastCall => f.write_str("fastcall"),
            Self::ThisCall => f.write_str("thiscall"),
            Self::VectorCall => f.write_str("vectorcall"),
            Self::RegCall => f.write_str("regcall"),
            Self::Win64 => f.write_str("win64"),
            Self::SysV64 => f.write_str("sysv64"),
            Self::Aapcs => f.write_str("aapcs"),
            Self::AapcsVfp => f.write_str("aapcs-vfp"),
            Self::Other(name) => f.write_str(name),
        }
    }
}
