use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::contract;
use crate::{AccessError, Decorator, Error, PropertyStore, PropertyValue, Result, Schema, Value};

/// An immutable decorator value.
///
/// Records are what nested-schema properties hold. They are captured from
/// any [`Decorator`] and follow the same equality, hash and rendering
/// contract as the instance they were captured from.
#[derive(Debug, Clone)]
pub struct DecoratorRecord {
    schema: Arc<Schema>,
    store: PropertyStore,
}

impl DecoratorRecord {
    /// A record holding the schema's defaults.
    pub fn with_defaults(schema: Arc<Schema>) -> Result<Self> {
        let store = PropertyStore::from_schema(&schema)?;
        Ok(Self { schema, store })
    }

    /// A record holding the schema's defaults overridden by `values`.
    pub fn new<I, K, V>(schema: Arc<Schema>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = Self::with_defaults(schema)?;
        for (name, value) in values {
            record.store.set(name.as_ref(), value.into())?;
        }
        Ok(record)
    }

    /// Wraps a store built for `schema`, e.g. a copy of a live instance's
    /// store. Fails when the store's cells do not match the declarations.
    pub fn from_store(schema: Arc<Schema>, store: PropertyStore) -> Result<Self> {
        let matches = store.len() == schema.properties.len()
            && schema.properties.iter().all(|declaration| {
                store
                    .get(&declaration.name)
                    .is_some_and(|cell| *cell.declared_type() == declaration.declared_type)
            });
        if !matches {
            return Err(Error::invalid(format!(
                "store does not match the declarations of '{}'",
                schema.name
            )));
        }
        Ok(Self { schema, store })
    }

    /// Reads every declared property of `decorator` into a new record.
    ///
    /// Fails with `InvalidArgument` when an accessor fails or returns a value
    /// of the wrong shape, and with `InternalInvariantViolation` when an
    /// accessor is inaccessible.
    pub fn capture(decorator: &dyn Decorator) -> Result<Self> {
        if let Some(record) = decorator.as_any().downcast_ref::<DecoratorRecord>() {
            return Ok(record.clone());
        }
        let schema = Arc::clone(decorator.schema());
        let properties = schema
            .properties
            .iter()
            .map(|declaration| {
                let value = contract::read(decorator, &declaration.name)?;
                PropertyValue::with_value(
                    declaration.name.clone(),
                    declaration.declared_type.clone(),
                    value,
                )
            })
            .collect::<Result<Vec<_>>>()?;
        let store = PropertyStore::from_properties(properties)?;
        Ok(Self { schema, store })
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.store.value(name)
    }

    pub fn hash_code(&self) -> i32 {
        self.store.hash_code()
    }
}

impl Decorator for DecoratorRecord {
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn property(&self, name: &str) -> std::result::Result<Value, AccessError> {
        self.store
            .value(name)
            .cloned()
            .ok_or_else(|| AccessError::NoSuchMember(name.to_string()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl PartialEq for DecoratorRecord {
    fn eq(&self, other: &Self) -> bool {
        self.schema.same_type(&other.schema) && self.store == other.store
    }
}

impl Eq for DecoratorRecord {}

impl std::hash::Hash for DecoratorRecord {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for DecoratorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.store.render(&self.schema.name))
    }
}
