//! Value model for navigation and evaluation
//!
//! This module defines the tagged union every other layer works with:
//! - [`Value`]: null, scalars, bytes, sequences and records
//! - [`ExternalRecord`]: adapter for caller-defined records that are not
//!   modelled by the sum type (looked up by declared or native field name)
//! - [`ValueType`]: inferred or declared type used to filter functions
//!
//! Values are immutable from the resolver's point of view; the caller owns
//! the tree for the duration of a call.

mod convert;
mod types;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use types::ValueType;

/// Ordered key/value record. Keys iterate in lexicographic order.
pub type Record = BTreeMap<String, Value>;

/// Describes one field of an [`ExternalRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Native field name, as the record stores it
    pub name: String,
    /// Declared external name, if the record renames the field
    pub external_name: Option<String>,
    /// Unexported fields are never visible to navigation
    pub exported: bool,
}

impl FieldDescriptor {
    /// Exported field with no declared external name
    pub fn exported(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            external_name: None,
            exported: true,
        }
    }

    /// Exported field with a declared external name
    pub fn renamed(name: impl Into<String>, external_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            external_name: Some(external_name.into()),
            exported: true,
        }
    }

    /// Field that navigation must skip
    pub fn hidden(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            external_name: None,
            exported: false,
        }
    }

    /// Name shown to users: the declared name if any, else the native one
    pub fn visible_name(&self) -> &str {
        self.external_name.as_deref().unwrap_or(&self.name)
    }

    fn matches(&self, key: &str) -> bool {
        self.exported && (self.external_name.as_deref() == Some(key) || self.name == key)
    }
}

/// Name-to-value lookup for records the [`Value`] sum type does not cover.
///
/// Implementors list their fields and return a field's value by its native
/// name. Navigation resolves keys against the declared external name first
/// and the native name second, and never sees unexported fields.
pub trait ExternalRecord: fmt::Debug + Send + Sync {
    /// Type name reported in errors and completion details
    fn type_name(&self) -> &str;

    /// All fields, exported or not, in declaration order
    fn fields(&self) -> Vec<FieldDescriptor>;

    /// Value of the field with the given native name
    fn field_value(&self, name: &str) -> Option<Value>;
}

impl dyn ExternalRecord {
    /// Look up a field by declared external name or native name
    pub fn lookup(&self, key: &str) -> Option<Value> {
        let fields = self.fields();
        let field = fields
            .iter()
            .find(|f| f.exported && f.external_name.as_deref() == Some(key))
            .or_else(|| fields.iter().find(|f| f.matches(key)))?;
        self.field_value(&field.name)
    }

    /// Visible names of exported fields, sorted
    pub fn visible_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .fields()
            .iter()
            .filter(|f| f.exported)
            .map(|f| f.visible_name().to_string())
            .collect();
        names.sort();
        names
    }
}

/// A nested data value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    Sequence(Vec<Value>),
    Record(Record),
    /// Caller-defined record behind the [`ExternalRecord`] adapter
    External(Arc<dyn ExternalRecord>),
}

impl Value {
    /// Short type name used in error messages
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "double",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Sequence(_) => "list",
            Value::Record(_) => "map",
            Value::External(r) => r.type_name(),
        }
    }

    /// Type used for function compatibility
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
            Value::Bytes(_) => ValueType::Bytes,
            Value::Sequence(_) => ValueType::List,
            Value::Record(_) | Value::External(_) => ValueType::Map,
        }
    }

    /// True for values navigation cannot descend into
    pub fn is_scalar(&self) -> bool {
        !matches!(
            self,
            Value::Sequence(_) | Value::Record(_) | Value::External(_)
        )
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Element at `index`, if this is a sequence and the index is in range
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_sequence().and_then(|items| items.get(index))
    }

    /// Child keys for maps (sorted) and external records (sorted visible names)
    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::Record(r) => r.keys().cloned().collect(),
            Value::External(r) => r.visible_names(),
            _ => Vec::new(),
        }
    }

    /// Look up a key on a record or external record
    pub fn get_key(&self, key: &str) -> Option<Value> {
        match self {
            Value::Record(r) => r.get(key).cloned(),
            Value::External(r) => r.lookup(key),
            _ => None,
        }
    }

    /// Length of containers, strings (in chars) and bytes; 0 otherwise
    pub fn len(&self) -> usize {
        match self {
            Value::String(s) => s.chars().count(),
            Value::Bytes(b) => b.len(),
            Value::Sequence(items) => items.len(),
            Value::Record(r) => r.len(),
            Value::External(r) => r.fields().iter().filter(|f| f.exported).count(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::External(a), Value::External(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Account {
        owner: String,
        balance: i64,
        secret: String,
    }

    impl ExternalRecord for Account {
        fn type_name(&self) -> &str {
            "Account"
        }

        fn fields(&self) -> Vec<FieldDescriptor> {
            vec![
                FieldDescriptor::renamed("owner", "ownerName"),
                FieldDescriptor::exported("balance"),
                FieldDescriptor::hidden("secret"),
            ]
        }

        fn field_value(&self, name: &str) -> Option<Value> {
            match name {
                "owner" => Some(Value::from(self.owner.as_str())),
                "balance" => Some(Value::Int(self.balance)),
                "secret" => Some(Value::from(self.secret.as_str())),
                _ => None,
            }
        }
    }

    fn account() -> Value {
        Value::External(Arc::new(Account {
            owner: "alice".to_string(),
            balance: 42,
            secret: "hunter2".to_string(),
        }))
    }

    #[test]
    fn test_external_lookup_by_declared_and_native_name() {
        let acct = account();
        assert_eq!(acct.get_key("ownerName"), Some(Value::from("alice")));
        assert_eq!(acct.get_key("owner"), Some(Value::from("alice")));
        assert_eq!(acct.get_key("balance"), Some(Value::Int(42)));
    }

    #[test]
    fn test_external_skips_hidden_fields() {
        let acct = account();
        assert_eq!(acct.get_key("secret"), None);
        assert_eq!(acct.keys(), vec!["balance".to_string(), "ownerName".to_string()]);
        assert_eq!(acct.len(), 2);
    }

    #[test]
    fn test_value_types() {
        assert_eq!(Value::Int(1).value_type(), ValueType::Int);
        assert_eq!(Value::Float(1.5).value_type(), ValueType::Double);
        assert_eq!(Value::Sequence(vec![]).value_type(), ValueType::List);
        assert_eq!(account().value_type(), ValueType::Map);
        assert_eq!(account().type_name(), "Account");
        assert!(Value::Null.is_scalar());
        assert!(!Value::Record(Record::new()).is_scalar());
    }

    #[test]
    fn test_external_equality_is_identity() {
        let a = account();
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, account());
    }
}
