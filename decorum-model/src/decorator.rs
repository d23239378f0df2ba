use std::any::Any;
use std::sync::Arc;

use crate::{Schema, Value};

/// A value conforming to a decorator [`Schema`].
///
/// Produced instances, [`DecoratorRecord`](crate::DecoratorRecord)s and
/// caller-defined native values all implement this trait, which is what lets
/// them be compared with each other under one contract. Natives typically
/// answer [`Decorator::property`] with a `match` over the schema's property
/// names and implement `PartialEq`, `Hash` and `Display` through
/// [`contract`](crate::contract).
pub trait Decorator: Send + Sync {
    /// The schema this value conforms to.
    fn schema(&self) -> &Arc<Schema>;

    /// Invokes the accessor of property `name`.
    fn property(&self, name: &str) -> Result<Value, AccessError>;

    /// Used to recognise concrete implementations behind a trait object.
    fn as_any(&self) -> &dyn Any;
}

/// Failure raised by a [`Decorator`] accessor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The value has no accessor with that name.
    #[error("no accessor named '{0}'")]
    NoSuchMember(String),

    /// The accessor ran and raised.
    #[error("accessor '{name}' failed: {reason}")]
    Failed { name: String, reason: String },

    /// The accessor could not be invoked at all. This is a defect in the
    /// implementation, not a property of the value.
    #[error("accessor '{name}' is not accessible: {reason}")]
    Inaccessible { name: String, reason: String },
}

impl AccessError {
    /// True for failures that must surface instead of reading as "not equal".
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::Inaccessible { .. })
    }
}
