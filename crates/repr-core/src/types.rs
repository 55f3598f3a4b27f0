//! Runtime type descriptors
//!
//! Handlers are registered against a [`TypeInfo`]. Every descriptor has a
//! single parent, so a value's type chain runs from its own type up to
//! [`builtins::OBJECT`], most specific first.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_KEY: AtomicU64 = AtomicU64::new(0);

/// Unique key of a type descriptor, used to index handler tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeKey(u64);

/// A runtime type descriptor
///
/// Two descriptors are the same type only if they come from the same
/// [`TypeInfo::new`] call; names may repeat.
#[derive(Clone)]
pub struct TypeInfo(Arc<TypeData>);

struct TypeData {
    key: TypeKey,
    name: String,
    module: Option<String>,
    parent: Option<TypeInfo>,
}

impl TypeInfo {
    /// A new type deriving directly from `object`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::create(name.into(), None, Some(builtins::OBJECT.clone()))
    }

    /// A new type deriving from `parent`.
    pub fn subtype(name: impl Into<String>, parent: &TypeInfo) -> Self {
        Self::create(name.into(), None, Some(parent.clone()))
    }

    fn create(name: String, module: Option<String>, parent: Option<TypeInfo>) -> Self {
        let key = TypeKey(NEXT_KEY.fetch_add(1, Ordering::Relaxed));
        TypeInfo(Arc::new(TypeData {
            key,
            name,
            module,
            parent,
        }))
    }

    /// Same type under a module path. Only affects display names.
    pub fn in_module(self, module: impl Into<String>) -> Self {
        let data = &self.0;
        TypeInfo(Arc::new(TypeData {
            key: data.key,
            name: data.name.clone(),
            module: Some(module.into()),
            parent: data.parent.clone(),
        }))
    }

    pub fn key(&self) -> TypeKey {
        self.0.key
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn module(&self) -> Option<&str> {
        self.0.module.as_deref()
    }

    /// `module.Name`, or just `Name` for builtins and module-less types.
    pub fn qualname(&self) -> String {
        match self.module() {
            Some(module) => format!("{module}.{}", self.name()),
            None => self.name().to_string(),
        }
    }

    pub fn parent(&self) -> Option<&TypeInfo> {
        self.0.parent.as_ref()
    }

    /// This type followed by its ancestors, most specific first.
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    pub fn is_subtype_of(&self, other: &TypeInfo) -> bool {
        self.chain().any(|t| t == other)
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }
}

/// Iterator over a type chain
pub struct Chain<'a> {
    next: Option<&'a TypeInfo>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a TypeInfo;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeInfo({})", self.qualname())
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Descriptors of the built-in value kinds.
pub mod builtins {
    use std::sync::LazyLock;

    use super::TypeInfo;

    /// Root of every chain.
    pub static OBJECT: LazyLock<TypeInfo> =
        LazyLock::new(|| TypeInfo::create("object".into(), None, None));

    pub static NONE: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::new("NoneType"));
    pub static INT: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::new("int"));
    /// `bool` is a subtype of `int`.
    pub static BOOL: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::subtype("bool", &INT));
    pub static FLOAT: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::new("float"));
    pub static STR: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::new("str"));
    pub static BYTES: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::new("bytes"));
    pub static LIST: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::new("list"));
    pub static TUPLE: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::new("tuple"));
    pub static SET: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::new("set"));
    pub static DICT: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::new("dict"));
    pub static TYPE: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::new("type"));
    pub static TAG: LazyLock<TypeInfo> = LazyLock::new(|| TypeInfo::new("Tag"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_chain() {
        let names: Vec<&str> = builtins::BOOL.chain().map(TypeInfo::name).collect();
        assert_eq!(names, ["bool", "int", "object"]);
        assert!(builtins::BOOL.is_subtype_of(&builtins::INT));
        assert!(!builtins::INT.is_subtype_of(&builtins::BOOL));
    }

    #[test]
    fn test_identity_not_name() {
        let a = TypeInfo::new("Point");
        let b = TypeInfo::new("Point");
        assert_ne!(a, b);
        assert_eq!(a.clone().in_module("geometry"), a);
    }

    #[test]
    fn test_qualname() {
        let t = TypeInfo::new("Point").in_module("geometry");
        assert_eq!(t.qualname(), "geometry.Point");
        assert_eq!(builtins::LIST.qualname(), "list");
        assert!(builtins::OBJECT.is_root());
    }
}
