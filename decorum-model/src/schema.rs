use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::{Error, Result, Value};

/// Member names answered by every produced instance itself; a schema may
/// not declare a property with one of these names.
pub const RESERVED_MEMBER_NAMES: [&str; 5] =
    ["annotationType", "describe", "equals", "hashCode", "toString"];

/// Declares a decorator type: its full name and its ordered properties.
///
/// Schemas are immutable once validated and are shared behind an [`Arc`] by
/// every instance built from them.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Fully qualified type name, e.g. `"com.example.Marker"`.
    pub name: String,
    /// Property declarations in declaration order.
    pub properties: Vec<PropertyDeclaration>,
}

impl Schema {
    /// Builds and validates a schema.
    pub fn new(name: impl Into<String>, properties: Vec<PropertyDeclaration>) -> Result<Self> {
        let schema = Self {
            name: name.into(),
            properties,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Looks up a declaration by property name.
    pub fn property(&self, name: &str) -> Option<&PropertyDeclaration> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Property names in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name.as_str())
    }

    /// Checks the structural rules every schema must satisfy before an
    /// instance can be built from it.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid("schema name must not be empty"));
        }

        let mut seen = HashSet::new();
        for property in &self.properties {
            if property.name.is_empty() {
                return Err(Error::invalid(format!(
                    "schema '{}' declares a property with an empty name",
                    self.name
                )));
            }
            if RESERVED_MEMBER_NAMES.contains(&property.name.as_str()) {
                return Err(Error::invalid(format!(
                    "schema '{}' declares reserved member name '{}'",
                    self.name, property.name
                )));
            }
            if !seen.insert(property.name.as_str()) {
                return Err(Error::invalid(format!(
                    "schema '{}' declares property '{}' more than once",
                    self.name, property.name
                )));
            }

            property.declared_type.element().validate()?;

            if let Some(default) = &property.default_value {
                if !default.conforms_to(&property.declared_type) {
                    return Err(Error::invalid(format!(
                        "default value {} of '{}.{}' is not a {}",
                        default, self.name, property.name, property.declared_type
                    )));
                }
            }
        }
        Ok(())
    }

    /// Returns true when both handles denote the same decorator type.
    pub fn same_type(&self, other: &Schema) -> bool {
        std::ptr::eq(self, other) || self == other
    }
}

/// One named, typed, optionally defaulted member of a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDeclaration {
    pub name: String,
    pub declared_type: DeclaredType,
    pub default_value: Option<Value>,
}

impl PropertyDeclaration {
    /// A declaration without a default value.
    pub fn new(name: impl Into<String>, declared_type: DeclaredType) -> Self {
        Self {
            name: name.into(),
            declared_type,
            default_value: None,
        }
    }

    fn primitive(name: &str, kind: PrimitiveKind) -> Self {
        Self::new(name, DeclaredType::Scalar(ElementType::Primitive(kind)))
    }

    /// Shorthand for a boolean property.
    pub fn boolean(name: &str) -> Self {
        Self::primitive(name, PrimitiveKind::Boolean)
    }

    /// Shorthand for a byte property.
    pub fn byte(name: &str) -> Self {
        Self::primitive(name, PrimitiveKind::Byte)
    }

    /// Shorthand for a short property.
    pub fn short(name: &str) -> Self {
        Self::primitive(name, PrimitiveKind::Short)
    }

    /// Shorthand for a char property.
    pub fn char(name: &str) -> Self {
        Self::primitive(name, PrimitiveKind::Char)
    }

    /// Shorthand for an int property.
    pub fn int(name: &str) -> Self {
        Self::primitive(name, PrimitiveKind::Int)
    }

    /// Shorthand for a long property.
    pub fn long(name: &str) -> Self {
        Self::primitive(name, PrimitiveKind::Long)
    }

    /// Shorthand for a float property.
    pub fn float(name: &str) -> Self {
        Self::primitive(name, PrimitiveKind::Float)
    }

    /// Shorthand for a double property.
    pub fn double(name: &str) -> Self {
        Self::primitive(name, PrimitiveKind::Double)
    }

    /// Shorthand for a string property.
    pub fn string(name: &str) -> Self {
        Self::new(name, DeclaredType::Scalar(ElementType::String))
    }

    /// Shorthand for an enumerated property.
    pub fn enumeration(name: &str, enum_type: Arc<EnumType>) -> Self {
        Self::new(name, DeclaredType::Scalar(ElementType::Enum(enum_type)))
    }

    /// Shorthand for a nested decorator property.
    pub fn decorator(name: &str, schema: Arc<Schema>) -> Self {
        Self::new(name, DeclaredType::Scalar(ElementType::Decorator(schema)))
    }

    /// Shorthand for a sequence property of the given element type.
    pub fn sequence(name: &str, element: ElementType) -> Self {
        Self::new(name, DeclaredType::Sequence(element))
    }

    /// Attaches a default value. Conformance is checked by
    /// [`Schema::validate`].
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// The type of a property: a single element or a sequence of elements.
///
/// Sequences do not nest.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredType {
    Scalar(ElementType),
    Sequence(ElementType),
}

impl DeclaredType {
    /// The scalar type, or the element type of a sequence.
    pub fn element(&self) -> &ElementType {
        match self {
            Self::Scalar(element) | Self::Sequence(element) => element,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(element) => write!(f, "{element}"),
            Self::Sequence(element) => write!(f, "{element}[]"),
        }
    }
}

/// Anything a property (or a sequence element) can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    Primitive(PrimitiveKind),
    String,
    Enum(Arc<EnumType>),
    Decorator(Arc<Schema>),
}

impl ElementType {
    fn validate(&self) -> Result<()> {
        match self {
            Self::Primitive(_) | Self::String => Ok(()),
            Self::Enum(enum_type) => enum_type.validate(),
            Self::Decorator(schema) => schema.validate(),
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => write!(f, "{kind}"),
            Self::String => f.write_str("string"),
            Self::Enum(enum_type) => f.write_str(&enum_type.name),
            Self::Decorator(schema) => write!(f, "@{}", schema.name),
        }
    }
}

/// Boolean, character and numeric property types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    /// Lower-case keyword used in documents and messages.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A closed enumeration: full type name plus its constants in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: String,
    pub constants: Vec<String>,
}

impl EnumType {
    /// Builds and validates an enum type.
    pub fn new<I, S>(name: impl Into<String>, constants: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let enum_type = Self {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        };
        enum_type.validate()?;
        Ok(enum_type)
    }

    /// Returns the constant with the given name, if declared.
    pub fn constant(&self, name: &str) -> Option<EnumConstant> {
        self.contains(name).then(|| EnumConstant {
            type_name: self.name.clone(),
            name: name.to_string(),
        })
    }

    /// The first declared constant; used as the empty value.
    pub fn first(&self) -> Option<EnumConstant> {
        self.constants.first().and_then(|c| self.constant(c))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constants.iter().any(|c| c == name)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid("enum type name must not be empty"));
        }
        if self.constants.is_empty() {
            return Err(Error::invalid(format!(
                "enum type '{}' declares no constants",
                self.name
            )));
        }
        let mut seen = HashSet::new();
        for constant in &self.constants {
            if !seen.insert(constant.as_str()) {
                return Err(Error::invalid(format!(
                    "enum type '{}' declares constant '{}' more than once",
                    self.name, constant
                )));
            }
        }
        Ok(())
    }
}

/// One constant of an [`EnumType`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumConstant {
    pub type_name: String,
    pub name: String,
}

impl EnumConstant {
    /// True when this constant belongs to `enum_type`.
    pub fn is_of(&self, enum_type: &EnumType) -> bool {
        self.type_name == enum_type.name && enum_type.contains(&self.name)
    }
}

impl fmt::Display for EnumConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
