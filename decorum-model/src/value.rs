//! Property values and their contract semantics.
//!
//! Equality is structural: floats compare by canonical bit pattern (so every
//! `NaN` equals every other `NaN` while `0.0` and `-0.0` differ), sequences
//! compare element-wise in order, nested decorators recurse into their
//! records. [`Value::hash_code`] agrees with that equality.

use std::fmt;
use std::sync::Arc;

use crate::hash;
use crate::{DecoratorRecord, DeclaredType, ElementType, EnumConstant, Error, PrimitiveKind, Result};

/// A value held by a decorator property.
#[derive(Debug, Clone)]
pub enum Value {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Enum(EnumConstant),
    Decorator(Arc<DecoratorRecord>),
    Sequence(Vec<Value>),
}

impl Value {
    /// The value a property holds when its declaration has no default:
    /// `false`, zero, the empty string, the first enum constant, the nested
    /// schema's defaults, or the empty sequence.
    pub fn empty(declared_type: &DeclaredType) -> Result<Self> {
        match declared_type {
            DeclaredType::Sequence(_) => Ok(Self::Sequence(Vec::new())),
            DeclaredType::Scalar(element) => Self::empty_element(element),
        }
    }

    fn empty_element(element: &ElementType) -> Result<Self> {
        Ok(match element {
            ElementType::Primitive(kind) => match kind {
                PrimitiveKind::Boolean => Self::Boolean(false),
                PrimitiveKind::Byte => Self::Byte(0),
                PrimitiveKind::Short => Self::Short(0),
                PrimitiveKind::Char => Self::Char('\0'),
                PrimitiveKind::Int => Self::Int(0),
                PrimitiveKind::Long => Self::Long(0),
                PrimitiveKind::Float => Self::Float(0.0),
                PrimitiveKind::Double => Self::Double(0.0),
            },
            ElementType::String => Self::String(String::new()),
            ElementType::Enum(enum_type) => Self::Enum(enum_type.first().ok_or_else(|| {
                Error::invalid(format!("enum type '{}' declares no constants", enum_type.name))
            })?),
            ElementType::Decorator(schema) => {
                Self::Decorator(Arc::new(DecoratorRecord::with_defaults(Arc::clone(schema))?))
            }
        })
    }

    /// Returns the primitive kind of a boolean, char or numeric value.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            Self::Boolean(_) => PrimitiveKind::Boolean,
            Self::Byte(_) => PrimitiveKind::Byte,
            Self::Short(_) => PrimitiveKind::Short,
            Self::Char(_) => PrimitiveKind::Char,
            Self::Int(_) => PrimitiveKind::Int,
            Self::Long(_) => PrimitiveKind::Long,
            Self::Float(_) => PrimitiveKind::Float,
            Self::Double(_) => PrimitiveKind::Double,
            _ => return None,
        })
    }

    /// True when this value can be stored in a property of `declared_type`.
    ///
    /// Kinds must match exactly; there is no numeric widening and a scalar
    /// is never accepted where a sequence is declared.
    pub fn conforms_to(&self, declared_type: &DeclaredType) -> bool {
        match (declared_type, self) {
            (DeclaredType::Sequence(element), Self::Sequence(items)) => {
                items.iter().all(|item| item.conforms_to_element(element))
            }
            (DeclaredType::Sequence(_), _) | (DeclaredType::Scalar(_), Self::Sequence(_)) => false,
            (DeclaredType::Scalar(element), value) => value.conforms_to_element(element),
        }
    }

    fn conforms_to_element(&self, element: &ElementType) -> bool {
        match (element, self) {
            (ElementType::Primitive(kind), value) => value.primitive_kind() == Some(*kind),
            (ElementType::String, Self::String(_)) => true,
            (ElementType::Enum(enum_type), Self::Enum(constant)) => constant.is_of(enum_type),
            (ElementType::Decorator(schema), Self::Decorator(record)) => {
                record.schema().same_type(schema)
            }
            _ => false,
        }
    }

    /// The natural hash of this value under the decorator contract.
    pub fn hash_code(&self) -> i32 {
        match self {
            Self::Boolean(v) => hash::boolean(*v),
            Self::Byte(v) => i32::from(*v),
            Self::Short(v) => i32::from(*v),
            Self::Char(v) => *v as i32,
            Self::Int(v) => *v,
            Self::Long(v) => hash::long(*v),
            Self::Float(v) => hash::float(*v),
            Self::Double(v) => hash::double(*v),
            Self::String(v) => hash::string(v),
            Self::Enum(constant) => hash::string(&constant.name),
            Self::Decorator(record) => record.hash_code(),
            Self::Sequence(items) => hash::sequence(items.iter().map(Value::hash_code)),
        }
    }

    /// Short label of the value's shape, used in error messages.
    pub fn kind_label(&self) -> String {
        match self {
            Self::String(_) => "string".to_string(),
            Self::Enum(constant) => constant.type_name.clone(),
            Self::Decorator(record) => format!("@{}", record.schema().name),
            Self::Sequence(items) => match items.first() {
                Some(first) => format!("{}[]", first.kind_label()),
                None => "[]".to_string(),
            },
            primitive => primitive
                .primitive_kind()
                .map(|kind| kind.keyword().to_string())
                .unwrap_or_default(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumConstant> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_decorator(&self) -> Option<&DecoratorRecord> {
        match self {
            Self::Decorator(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => hash::float_bits(*a) == hash::float_bits(*b),
            (Self::Double(a), Self::Double(b)) => hash::double_bits(*a) == hash::double_bits(*b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Decorator(a), Self::Decorator(b)) => Arc::ptr_eq(a, b) || a == b,
            (Self::Sequence(a), Self::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Float(v) if v.is_nan() => f.write_str("NaN"),
            Self::Float(v) if v.is_infinite() => f.write_str(infinity(v.is_sign_negative())),
            Self::Float(v) => floating(f, format!("{v:?}")),
            Self::Double(v) if v.is_nan() => f.write_str("NaN"),
            Self::Double(v) if v.is_infinite() => f.write_str(infinity(v.is_sign_negative())),
            Self::Double(v) => floating(f, format!("{v:?}")),
            Self::String(v) => f.write_str(v),
            Self::Enum(constant) => write!(f, "{constant}"),
            Self::Decorator(record) => write!(f, "{record}"),
            Self::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

fn infinity(negative: bool) -> &'static str {
    if negative { "-Infinity" } else { "Infinity" }
}

/// Finite floats: `Debug` already keeps a fractional digit in plain form
/// (`4.0`); exponent form becomes `<mantissa>.<digits>E<exp>`.
fn floating(f: &mut fmt::Formatter<'_>, repr: String) -> fmt::Result {
    match repr.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => {
            write!(f, "{mantissa}E{exponent}")
        }
        Some((mantissa, exponent)) => write!(f, "{mantissa}.0E{exponent}"),
        None => f.write_str(&repr),
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    char => Char,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    EnumConstant => Enum,
    Arc<DecoratorRecord> => Decorator,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DecoratorRecord> for Value {
    fn from(v: DecoratorRecord) -> Self {
        Self::Decorator(Arc::new(v))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Self::Sequence(items.iter().cloned().map(Into::into).collect())
    }
}
