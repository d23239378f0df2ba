use std::collections::HashMap;

use crate::{Error, PropertyValue, Result, Schema, Value};

/// Ordered mapping from property name to [`PropertyValue`].
///
/// Iteration follows declaration order, which only matters for rendering;
/// equality and hashing ignore it. The set of names never changes after
/// construction.
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    properties: Vec<PropertyValue>,
    slots: HashMap<String, usize>,
}

impl PropertyStore {
    /// Creates one cell per declaration of `schema`, seeded with defaults.
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let properties = schema
            .properties
            .iter()
            .map(PropertyValue::from_declaration)
            .collect::<Result<Vec<_>>>()?;
        Self::from_properties(properties)
    }

    /// Wraps already-built cells; names must be unique.
    pub fn from_properties(properties: Vec<PropertyValue>) -> Result<Self> {
        let mut slots = HashMap::with_capacity(properties.len());
        for (slot, property) in properties.iter().enumerate() {
            if slots.insert(property.name().to_string(), slot).is_some() {
                return Err(Error::invalid(format!(
                    "property '{}' appears more than once",
                    property.name()
                )));
            }
        }
        Ok(Self { properties, slots })
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Position of `name` in declaration order.
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.slot(name).and_then(|slot| self.properties.get(slot))
    }

    pub fn at(&self, slot: usize) -> Option<&PropertyValue> {
        self.properties.get(slot)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).map(PropertyValue::value)
    }

    /// Assigns `value` to the property `name`.
    ///
    /// Fails with [`Error::InvalidArgument`] when the name is unknown or the
    /// value does not conform; the store is unchanged in both cases.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let slot = self
            .slot(name)
            .ok_or_else(|| Error::invalid(format!("no property named '{name}'")))?;
        self.properties[slot].set_value(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyValue> {
        self.properties.iter()
    }

    /// Detached copy of every cell in declaration order.
    pub fn describe(&self) -> Vec<PropertyValue> {
        self.properties.clone()
    }

    /// Sum of every cell's contribution; independent of order.
    pub fn hash_code(&self) -> i32 {
        self.properties
            .iter()
            .fold(0i32, |acc, property| acc.wrapping_add(property.hash_code()))
    }

    /// Renders `@type_name(a=.., b=..)` in declaration order.
    pub fn render(&self, type_name: &str) -> String {
        let mut out = String::with_capacity(16 + type_name.len());
        out.push('@');
        out.push_str(type_name);
        out.push('(');
        for (i, property) in self.properties.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&property.to_string());
        }
        out.push(')');
        out
    }
}

impl std::ops::Index<usize> for PropertyStore {
    type Output = PropertyValue;

    fn index(&self, slot: usize) -> &PropertyValue {
        &self.properties[slot]
    }
}

impl PartialEq for PropertyStore {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.properties.iter().all(|property| {
                other
                    .get(property.name())
                    .is_some_and(|theirs| property == theirs)
            })
    }
}

impl Eq for PropertyStore {}
