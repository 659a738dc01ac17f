//! Functions and global variables.

use super::{Access, CallingConvention, Linkage, TypeReference, Uid};
use serde::{Deserialize, Serialize};

/// Virtual dispatch information for a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VirtualInfo {
    pub vtable_index: u32,
    #[serde(default)]
    pub is_pure: bool,
}

/// A free function or member function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Qualified name plus parameter type list
    pub uid: Uid,
    pub name: String,
    pub return_type: TypeReference,
    #[serde(default)]
    pub parameters: Vec<TypeReference>,
    #[serde(default)]
    pub variadic: bool,
    #[serde(default)]
    pub calling_convention: CallingConvention,
    #[serde(default)]
    pub linkage: Linkage,
    #[serde(default)]
    pub access: Access,
    #[serde(default)]
    pub virtual_info: Option<VirtualInfo>,
    /// Owning record for member functions
    #[serde(default)]
    pub parent: Option<Uid>,
}

impl FunctionDecl {
    /// An external, non-variadic free function. The UID is derived from the
    /// name and the parameter spellings.
    pub fn new(
        name: impl Into<String>,
        return_type: TypeReference,
        parameters: Vec<TypeReference>,
    ) -> Self {
        let name = name.into();
        let spellings: Vec<String> = parameters.iter().map(ToString::to_string).collect();
        Self {
            uid: Uid::for_function(&name, &spellings, false),
            name,
            return_type,
            parameters,
            variadic: false,
            calling_convention: CallingConvention::C,
            linkage: Linkage::External,
            access: Access::Public,
            virtual_info: None,
            parent: None,
        }
    }

    /// Mark as variadic, updating the UID.
    #[must_use]
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        let spellings: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        self.uid = Uid::for_function(&self.name, &spellings, true);
        self
    }

    #[must_use]
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Make this a virtual member of `parent` at `vtable_index`.
    #[must_use]
    pub fn as_virtual_member(mut self, parent: impl Into<Uid>, vtable_index: u32) -> Self {
        self.parent = Some(parent.into());
        self.virtual_info = Some(VirtualInfo {
            vtable_index,
            is_pure: false,
        });
        self
    }

    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.virtual_info.is_some()
    }

    /// Every type this function mentions, return type first.
    pub fn signature_types(&self) -> impl Iterator<Item = &TypeReference> {
        std::iter::once(&self.return_type).chain(self.parameters.iter())
    }
}

/// A global variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalVarDecl {
    pub uid: Uid,
    pub name: String,
    pub type_ref: TypeReference,
    #[serde(default)]
    pub linkage: Linkage,
}

impl GlobalVarDecl {
    pub fn new(name: impl Into<String>, type_ref: TypeReference) -> Self {
        let name = name.into();
        Self {
            uid: Uid::from_name(&name),
            name,
            type_ref,
            linkage: Linkage::External,
        }
    }

    #[must_use]
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_uid_from_parameters() {
        let f = FunctionDecl::new(
            "ns::f",
            TypeReference::named("int"),
            vec![TypeReference::named("char").constant().pointer()],
        );
        assert_eq!(f.uid.as_str(), "ns::f(const char *)");
        assert_eq!(f.variadic().uid.as_str(), "ns::f(const char *, ...)");
    }

    #[test]
    fn test_signature_types_order() {
        let f = FunctionDecl::new(
            "g",
            TypeReference::named("void"),
            vec![TypeReference::named("int"), TypeReference::named("double")],
        );
        let names: Vec<&str> = f.signature_types().map(|t| t.uid.as_str()).collect();
        assert_eq!(names, ["void", "int", "double"]);
    }
}
