//! Equality, hash and rendering for any [`Decorator`].
//!
//! These functions give every conforming value, native or dynamically built,
//! the same answers. Natives implement their std traits through them:
//!
//! ```ignore
//! impl PartialEq for Marker {
//!     fn eq(&self, other: &Self) -> bool {
//!         contract::equals(self, other).unwrap_or(false)
//!     }
//! }
//! ```

use tracing::{debug, warn};

use crate::{Decorator, DecoratorRecord, Error, PropertyDeclaration, PropertyValue, Result, Value};

/// Structural equality of two decorators.
///
/// `Ok(false)` when the schemas differ, when any property differs, or when
/// an accessor of either side fails in an expected way (missing member,
/// raised failure, value of the wrong shape). Inaccessible accessors are
/// defects and return [`Error::InternalInvariantViolation`].
pub fn equals(this: &dyn Decorator, other: &dyn Decorator) -> Result<bool> {
    if std::ptr::addr_eq(this, other) {
        return Ok(true);
    }
    if !this.schema().same_type(other.schema()) {
        return Ok(false);
    }

    for declaration in &this.schema().properties {
        let Some(expected) = cell(this, declaration)? else {
            return Ok(false);
        };
        let Some(actual) = cell(other, declaration)? else {
            return Ok(false);
        };
        if expected != actual {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Wrapping sum of `(127 * name_hash) ^ value_hash` over every property.
pub fn hash_code(decorator: &dyn Decorator) -> Result<i32> {
    Ok(DecoratorRecord::capture(decorator)?.hash_code())
}

/// `@name(a=.., b=..)` in declaration order.
pub fn render(decorator: &dyn Decorator) -> Result<String> {
    Ok(DecoratorRecord::capture(decorator)?.to_string())
}

/// Invokes one accessor, translating its failure into the crate error.
pub(crate) fn read(decorator: &dyn Decorator, name: &str) -> Result<Value> {
    decorator.property(name).map_err(|err| {
        if err.is_defect() {
            warn!(schema = %decorator.schema().name, property = name, error = %err, "Accessor defect");
            Error::InternalInvariantViolation(err.to_string())
        } else {
            Error::invalid(format!(
                "cannot read '{}' of '{}': {}",
                name,
                decorator.schema().name,
                err
            ))
        }
    })
}

/// Reads one property into a typed cell; `None` marks an expected failure.
fn cell(decorator: &dyn Decorator, declaration: &PropertyDeclaration) -> Result<Option<PropertyValue>> {
    let value = match decorator.property(&declaration.name) {
        Ok(value) => value,
        Err(err) if err.is_defect() => {
            warn!(
                schema = %decorator.schema().name,
                property = %declaration.name,
                error = %err,
                "Accessor defect during comparison"
            );
            return Err(Error::InternalInvariantViolation(err.to_string()));
        }
        Err(err) => {
            debug!(
                schema = %decorator.schema().name,
                property = %declaration.name,
                error = %err,
                "Accessor failed during comparison"
            );
            return Ok(None);
        }
    };

    Ok(PropertyValue::with_value(
        declaration.name.clone(),
        declaration.declared_type.clone(),
        value,
    )
    .ok())
}
