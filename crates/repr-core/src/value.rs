//! The value model
//!
//! Containers are reference counted so that identity survives cloning: two
//! clones of the same list are the same object, which is what cycle
//! detection and reference tracking key on. Scalars have no identity.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use repr_tag::Tag;

use crate::Representable;
use crate::types::{TypeInfo, builtins};

/// Object identity: the address of the shared allocation.
pub type Identity = usize;

/// Upcast helper for [`Object`].
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A user-defined value with its own runtime type.
pub trait Object: AsAny {
    fn type_info(&self) -> TypeInfo;

    /// String form used by the generic fallback, if any.
    fn describe(&self) -> Option<String> {
        None
    }

    /// Opt-in representation hooks.
    fn as_representable(&self) -> Option<&dyn Representable> {
        None
    }
}

/// A record: a typed value with ordered named fields.
#[derive(Clone)]
pub struct Record {
    type_info: TypeInfo,
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(type_info: TypeInfo) -> Self {
        Self {
            type_info,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// Shared, mutable sequence storage.
pub type Items = Rc<RefCell<Vec<Value>>>;

/// A value to represent
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    Bytes(Rc<[u8]>),
    List(Items),
    Tuple(Rc<[Value]>),
    Set(Items),
    Dict(Rc<RefCell<Vec<(Value, Value)>>>),
    /// A type, rendered as its definition.
    Type(TypeInfo),
    /// Markup passed through unchanged.
    Tag(Tag),
    Record(Rc<Record>),
    Object(Rc<dyn Object>),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn bytes(b: &[u8]) -> Self {
        Value::Bytes(Rc::from(b))
    }

    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn tuple<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    pub fn set<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Set(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    pub fn dict<I: IntoIterator<Item = (Value, Value)>>(entries: I) -> Self {
        Value::Dict(Rc::new(RefCell::new(entries.into_iter().collect())))
    }

    pub fn record(record: Record) -> Self {
        Value::Record(Rc::new(record))
    }

    pub fn object<T: Object + 'static>(object: T) -> Self {
        Value::Object(Rc::new(object))
    }

    /// Append to a list or set. Returns `false` for other values.
    pub fn append(&self, item: Value) -> bool {
        match self {
            Value::List(items) | Value::Set(items) => {
                items.borrow_mut().push(item);
                true
            }
            _ => false,
        }
    }

    /// Insert into a dict. Returns `false` for other values.
    pub fn insert(&self, key: Value, value: Value) -> bool {
        match self {
            Value::Dict(entries) => {
                entries.borrow_mut().push((key, value));
                true
            }
            _ => false,
        }
    }

    /// Identity of shared values; `None` for scalars and types.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Value::None | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Type(_) => None,
            Value::Str(s) => Some(Rc::as_ptr(s) as *const u8 as usize),
            Value::Bytes(b) => Some(Rc::as_ptr(b) as *const u8 as usize),
            Value::List(items) | Value::Set(items) => Some(Rc::as_ptr(items) as usize),
            Value::Tuple(items) => Some(Rc::as_ptr(items) as *const Value as usize),
            Value::Dict(entries) => Some(Rc::as_ptr(entries) as usize),
            Value::Tag(tag) => Some(tag.ptr_id()),
            Value::Record(record) => Some(Rc::as_ptr(record) as usize),
            Value::Object(object) => Some(Rc::as_ptr(object) as *const () as usize),
        }
    }

    pub fn type_info(&self) -> TypeInfo {
        match self {
            Value::None => builtins::NONE.clone(),
            Value::Bool(_) => builtins::BOOL.clone(),
            Value::Int(_) => builtins::INT.clone(),
            Value::Float(_) => builtins::FLOAT.clone(),
            Value::Str(_) => builtins::STR.clone(),
            Value::Bytes(_) => builtins::BYTES.clone(),
            Value::List(_) => builtins::LIST.clone(),
            Value::Tuple(_) => builtins::TUPLE.clone(),
            Value::Set(_) => builtins::SET.clone(),
            Value::Dict(_) => builtins::DICT.clone(),
            Value::Type(_) => builtins::TYPE.clone(),
            Value::Tag(_) => builtins::TAG.clone(),
            Value::Record(record) => record.type_info().clone(),
            Value::Object(object) => object.type_info(),
        }
    }

    /// The representation hooks of an object value, if it has any.
    pub fn as_representable(&self) -> Option<&dyn Representable> {
        match self {
            Value::Object(object) => object.as_representable(),
            _ => None,
        }
    }

    /// Downcast an object value.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Object(object) => (**object).as_any().downcast_ref(),
            _ => None,
        }
    }

    /// Snapshot of the elements of a list, set or tuple.
    pub fn items(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items.borrow().clone()),
            Value::Tuple(items) => Some(items.to_vec()),
            _ => None,
        }
    }

    /// Snapshot of the entries of a dict.
    pub fn entries(&self) -> Option<Vec<(Value, Value)>> {
        match self {
            Value::Dict(entries) => Some(entries.borrow().clone()),
            _ => None,
        }
    }

    /// Whether both values are the same object.
    pub fn is(&self, other: &Value) -> bool {
        matches!((self.identity(), other.identity()), (Some(a), Some(b)) if a == b)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write!(f, "bytes({})", b.len()),
            Value::List(items) => write!(f, "list({})", items.try_borrow().map_or(0, |v| v.len())),
            Value::Tuple(items) => write!(f, "tuple({})", items.len()),
            Value::Set(items) => write!(f, "set({})", items.try_borrow().map_or(0, |v| v.len())),
            Value::Dict(entries) => {
                write!(f, "dict({})", entries.try_borrow().map_or(0, |v| v.len()))
            }
            Value::Type(t) => write!(f, "{t:?}"),
            Value::Tag(tag) => write!(f, "{tag:?}"),
            Value::Record(record) => write!(f, "<{}>", record.type_info().qualname()),
            Value::Object(object) => write!(f, "<{}>", object.type_info().qualname()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::str(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(Rc::from(value))
    }
}

impl From<Tag> for Value {
    fn from(value: Tag) -> Self {
        Value::Tag(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::record(value)
    }
}

impl From<TypeInfo> for Value {
    fn from(value: TypeInfo) -> Self {
        Value::Type(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_identity() {
        let a = Value::list([Value::Int(1)]);
        let b = a.clone();
        assert!(a.is(&b));
        assert!(!a.is(&Value::list([Value::Int(1)])));
    }

    #[test]
    fn test_scalars_have_no_identity() {
        assert_eq!(Value::Int(3).identity(), None);
        assert_eq!(Value::None.identity(), None);
        assert!(!Value::Int(3).is(&Value::Int(3)));
        assert!(Value::str("abc").identity().is_some());
    }

    #[test]
    fn test_append_builds_cycle() {
        let x = Value::list([]);
        assert!(x.append(x.clone()));
        let items = x.items().unwrap_or_default();
        assert_eq!(items.len(), 1);
        assert!(items[0].is(&x));
        assert!(!Value::Int(1).append(Value::None));
    }

    #[test]
    fn test_record_fields() {
        let point = TypeInfo::new("Point");
        let record = Record::new(point.clone()).field("x", 1).field("y", 2);
        assert_eq!(record.fields().len(), 2);
        assert!(matches!(record.get("y"), Some(Value::Int(2))));
        assert_eq!(Value::record(record).type_info(), point);
    }
}
