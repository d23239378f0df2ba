//! Decorator schema model for decorum.
//!
//! Defines the types every decorum instance is built from:
//! - [`Schema`]: a decorator type: full name plus ordered, typed property declarations
//! - [`Value`]: what a property holds (primitives, strings, enums, nested decorators, sequences)
//! - [`PropertyValue`]: one validated cell with its equality, hash and rendering rules
//! - [`PropertyStore`]: the ordered cells of one instance and the aggregate contract
//! - [`Decorator`]: the trait shared by produced instances, records and native values
//! - [`contract`]: equality, hash and rendering for any [`Decorator`]
//!
//! Schemas can also be declared as JSON documents (see [`SchemaDocument`]).

pub mod contract;
mod decorator;
mod document;
pub mod hash;
mod property;
mod record;
mod schema;
mod store;
mod value;

pub use decorator::{AccessError, Decorator};
pub use document::{EnumDocument, PropertyDocument, SchemaDocument, TypeDocument};
pub use property::PropertyValue;
pub use record::DecoratorRecord;
pub use schema::{
    DeclaredType, ElementType, EnumConstant, EnumType, PrimitiveKind, PropertyDeclaration,
    RESERVED_MEMBER_NAMES, Schema,
};
pub use store::PropertyStore;
pub use value::Value;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while declaring schemas or reading and writing properties.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller broke a precondition: invalid schema, unknown property,
    /// value of the wrong type.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A collaborator failed in a way that indicates a defect.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    #[error("schema document error: {0}")]
    Document(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
