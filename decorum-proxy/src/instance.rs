use std::any::Any;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use decorum_model::{
    AccessError, Decorator, DecoratorRecord, Error, PropertyStore, PropertyValue, Result, Schema,
    Value, contract,
};

use crate::DecoratorProxy;
use crate::dispatch::Member;

/// A decorator value backed by a [`DecoratorProxy`]'s store.
///
/// Equality, hashing and rendering depend only on the schema and the current
/// property values, never on which instance is which. Values are read live:
/// a later [`DecoratorProxy::set_property`] is visible through this instance
/// and through any [`Accessor`] taken from it.
#[derive(Clone)]
pub struct ProducedInstance {
    handler: DecoratorProxy,
}

impl ProducedInstance {
    pub(crate) fn new(handler: DecoratorProxy) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &DecoratorProxy {
        &self.handler
    }

    /// The decorator type of this instance.
    pub fn schema(&self) -> &Arc<Schema> {
        self.handler.schema()
    }

    /// Current value of a declared property.
    pub fn get(&self, name: &str) -> Option<Value> {
        let slot = self.handler.dispatch().property_slot(name)?;
        Some(self.handler.read()[slot].value().clone())
    }

    /// Calls a member by name: a declared property, `annotationType`,
    /// `hashCode` or `toString`.
    ///
    /// `equals` and `describe` resolve but do not produce a [`Value`]; call
    /// [`ProducedInstance::equals`] and [`ProducedInstance::describe`].
    pub fn invoke(&self, member: &str) -> Result<Value> {
        match self.handler.dispatch().resolve(member) {
            Some(Member::Property(slot)) => Ok(self.handler.read()[slot].value().clone()),
            Some(Member::AnnotationType) => Ok(Value::String(self.schema().name.clone())),
            Some(Member::HashCode) => Ok(Value::Int(self.hash_code())),
            Some(Member::ToString) => Ok(Value::String(self.to_string())),
            Some(Member::Equals | Member::Describe) => Err(Error::invalid(format!(
                "member '{}' of decorator '{}' is only callable as a method",
                member,
                self.schema().name
            ))),
            None => Err(Error::invalid(format!(
                "decorator '{}' has no member '{}'",
                self.schema().name,
                member
            ))),
        }
    }

    /// Binds the accessor of a declared property.
    pub fn accessor(&self, name: &str) -> Option<Accessor> {
        let slot = self.handler.dispatch().property_slot(name)?;
        Some(Accessor {
            name: name.to_string(),
            slot,
            store: Arc::clone(self.handler.store()),
        })
    }

    /// Compares with any decorator: another produced instance, a record or
    /// a native value.
    ///
    /// Returns [`Error::InternalInvariantViolation`] only when an accessor
    /// of `other` is defective; every other failure reads as "not equal".
    pub fn equals(&self, other: &dyn Decorator) -> Result<bool> {
        match DecoratorProxy::handler_for(other) {
            Some(theirs) => Ok(self.equals_handler(&theirs)),
            None => contract::equals(self, other),
        }
    }

    fn equals_handler(&self, theirs: &DecoratorProxy) -> bool {
        if self.handler.shares_store_with(theirs) {
            return true;
        }
        if !self.schema().same_type(theirs.schema()) {
            return false;
        }
        // Never hold both locks: two threads comparing in opposite directions
        // would otherwise wait on each other behind queued writers.
        let ours = self.handler.read().clone();
        ours == *theirs.read()
    }

    /// Wrapping sum of every property's `(127 * name_hash) ^ value_hash`.
    pub fn hash_code(&self) -> i32 {
        self.handler.read().hash_code()
    }

    /// Snapshot of every cell in declaration order.
    pub fn describe(&self) -> Vec<PropertyValue> {
        self.handler.describe()
    }

    /// Immutable copy of the current values.
    pub fn snapshot(&self) -> Result<DecoratorRecord> {
        self.handler.snapshot()
    }
}

impl Decorator for ProducedInstance {
    fn schema(&self) -> &Arc<Schema> {
        self.handler.schema()
    }

    fn property(&self, name: &str) -> std::result::Result<Value, AccessError> {
        self.get(name)
            .ok_or_else(|| AccessError::NoSuchMember(name.to_string()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl PartialEq for ProducedInstance {
    fn eq(&self, other: &Self) -> bool {
        self.equals_handler(&other.handler)
    }
}

impl Eq for ProducedInstance {}

impl std::hash::Hash for ProducedInstance {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for ProducedInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.handler.read().render(&self.schema().name))
    }
}

impl fmt::Debug for ProducedInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ProducedInstance")
            .field(&format_args!("{self}"))
            .finish()
    }
}

/// A property accessor bound to one instance.
///
/// Reads the instance's store on every call, so it always observes the
/// latest assignment.
#[derive(Clone)]
pub struct Accessor {
    name: String,
    slot: usize,
    store: Arc<RwLock<PropertyStore>>,
}

impl Accessor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self) -> Value {
        let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
        store[self.slot].value().clone()
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("name", &self.name)
            .field("value", &self.get())
            .finish()
    }
}
