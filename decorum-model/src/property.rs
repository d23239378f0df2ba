use std::fmt;

use tracing::debug;

use crate::hash;
use crate::{DeclaredType, Error, PropertyDeclaration, Result, Value};

/// Storage cell for one declared property.
///
/// The name and declared type are fixed at construction; the value always
/// conforms to the declared type because every assignment is validated.
#[derive(Debug, Clone)]
pub struct PropertyValue {
    name: String,
    declared_type: DeclaredType,
    value: Value,
}

impl PropertyValue {
    /// Creates a cell holding the empty value of `declared_type`.
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Result<Self> {
        let value = Value::empty(&declared_type)?;
        Ok(Self {
            name: name.into(),
            declared_type,
            value,
        })
    }

    /// Creates a cell holding `value`, rejecting values that do not conform.
    pub fn with_value(
        name: impl Into<String>,
        declared_type: DeclaredType,
        value: Value,
    ) -> Result<Self> {
        let name = name.into();
        check_conforms(&name, &declared_type, &value)?;
        Ok(Self {
            name,
            declared_type,
            value,
        })
    }

    /// Creates a cell seeded with the declaration's default, or with the
    /// empty value when the declaration has none.
    pub fn from_declaration(declaration: &PropertyDeclaration) -> Result<Self> {
        match &declaration.default_value {
            Some(default) => Self::with_value(
                declaration.name.clone(),
                declaration.declared_type.clone(),
                default.clone(),
            ),
            None => Self::new(declaration.name.clone(), declaration.declared_type.clone()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Replaces the value after checking it against the declared type.
    /// On error the cell keeps its previous value.
    pub fn set_value(&mut self, value: Value) -> Result<()> {
        check_conforms(&self.name, &self.declared_type, &value)?;
        self.value = value;
        Ok(())
    }

    /// Compares this cell's value with `other` under the rule of the
    /// declared type.
    pub fn value_equals(&self, other: &Value) -> bool {
        match (&self.declared_type, &self.value, other) {
            (DeclaredType::Sequence(_), Value::Sequence(ours), Value::Sequence(theirs)) => {
                ours.len() == theirs.len() && ours.iter().zip(theirs).all(|(a, b)| a == b)
            }
            (DeclaredType::Sequence(_), _, _) => false,
            (DeclaredType::Scalar(_), ours, theirs) => ours == theirs,
        }
    }

    /// Hash of the value alone. Sequences fold their element hashes in
    /// order; scalars use their natural hash.
    pub fn value_hash_code(&self) -> i32 {
        match (&self.declared_type, &self.value) {
            (DeclaredType::Sequence(_), Value::Sequence(items)) => {
                hash::sequence(items.iter().map(Value::hash_code))
            }
            (_, value) => value.hash_code(),
        }
    }

    /// This cell's contribution to an aggregate decorator hash.
    pub fn hash_code(&self) -> i32 {
        hash::member(&self.name, self.value_hash_code())
    }

    pub fn value_to_string(&self) -> String {
        self.value.to_string()
    }
}

fn check_conforms(name: &str, declared_type: &DeclaredType, value: &Value) -> Result<()> {
    if value.conforms_to(declared_type) {
        return Ok(());
    }
    debug!(property = name, expected = %declared_type, got = %value.kind_label(), "Rejected value");
    Err(Error::invalid(format!(
        "property '{}' is declared as {}, got {} ({})",
        name,
        declared_type,
        value.kind_label(),
        value
    )))
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.value_equals(&other.value)
    }
}

impl Eq for PropertyValue {}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}
