use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use decorum_model::{
    Decorator, DecoratorRecord, Error, PropertyStore, PropertyValue, Result, Schema, Value,
};
use tracing::{debug, trace};

use crate::dispatch::DispatchTable;
use crate::ProducedInstance;

/// Builds and owns one decorator instance.
///
/// The proxy holds the instance's [`PropertyStore`]; the [`ProducedInstance`]
/// returned by [`DecoratorProxy::instance`] and every [`Accessor`] obtained
/// from it read that same store, so assignments made here are observed by
/// all of them. Cloning the proxy yields another handle to the same
/// instance.
///
/// [`Accessor`]: crate::Accessor
#[derive(Clone)]
pub struct DecoratorProxy {
    schema: Arc<Schema>,
    store: Arc<RwLock<PropertyStore>>,
    dispatch: Arc<DispatchTable>,
}

impl DecoratorProxy {
    /// Builds an instance of `schema` with every property at its default.
    ///
    /// Fails with [`Error::InvalidArgument`] if the schema is not valid.
    pub fn new(schema: Arc<Schema>) -> Result<Self> {
        schema.validate()?;
        let store = PropertyStore::from_schema(&schema)?;
        let dispatch = DispatchTable::for_store(&store);
        debug!(schema = %schema.name, properties = store.len(), "Built decorator instance");
        Ok(Self {
            schema,
            store: Arc::new(RwLock::new(store)),
            dispatch: Arc::new(dispatch),
        })
    }

    /// Builds an instance from a JSON schema document.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(Arc::new(Schema::from_json(json)?))
    }

    /// Returns the proxy behind `decorator` if it is an instance produced by
    /// this crate, `None` for any other implementation.
    pub fn handler_for(decorator: &dyn Decorator) -> Option<DecoratorProxy> {
        decorator
            .as_any()
            .downcast_ref::<ProducedInstance>()
            .map(|instance| instance.handler().clone())
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The instance presenting this proxy's properties.
    pub fn instance(&self) -> ProducedInstance {
        ProducedInstance::new(self.clone())
    }

    /// Assigns a property.
    ///
    /// Fails with [`Error::InvalidArgument`] when the schema has no property
    /// `name` or when `value` does not conform to its declared type. The
    /// stored value is unchanged on failure.
    pub fn set_property(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let mut store = self.write();
        if !store.contains(name) {
            return Err(Error::invalid(format!(
                "decorator '{}' does not contain a property named '{}'",
                self.schema.name, name
            )));
        }
        store.set(name, value)?;
        trace!(schema = %self.schema.name, property = name, "Property assigned");
        Ok(())
    }

    /// Current value of a property; `None` when the schema has no such
    /// property.
    pub fn get_property(&self, name: &str) -> Option<Value> {
        self.read().value(name).cloned()
    }

    /// Snapshot of every cell in declaration order.
    pub fn describe(&self) -> Vec<PropertyValue> {
        self.read().describe()
    }

    /// Immutable copy of the current values, usable as the value of a
    /// nested-schema property.
    pub fn snapshot(&self) -> Result<DecoratorRecord> {
        let store = self.read().clone();
        DecoratorRecord::from_store(Arc::clone(&self.schema), store)
    }

    pub(crate) fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    pub(crate) fn store(&self) -> &Arc<RwLock<PropertyStore>> {
        &self.store
    }

    pub(crate) fn shares_store_with(&self, other: &DecoratorProxy) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }

    // Assignments are all-or-nothing, so a poisoned store still holds
    // conforming values.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, PropertyStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PropertyStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for DecoratorProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratorProxy")
            .field("schema", &self.schema.name)
            .field("store", &*self.read())
            .finish()
    }
}
