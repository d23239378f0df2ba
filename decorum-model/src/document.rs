//! JSON declarations of decorator schemas.
//!
//! A document names the decorator type and lists its properties. Types are
//! written as a keyword (`"int"`, `"string"`, ...) or as a single-key object
//! for enums, nested decorators and sequences:
//!
//! ```json
//! {
//!   "name": "com.example.Marker",
//!   "properties": [
//!     { "name": "string", "type": "string", "default": "x" },
//!     { "name": "integer", "type": { "sequence": "int" } }
//!   ]
//! }
//! ```
//!
//! Defaults are plain JSON and are converted against the declared type.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::{
    DeclaredType, DecoratorRecord, ElementType, EnumType, Error, PrimitiveKind,
    PropertyDeclaration, Result, Schema, Value,
};

/// Serialized form of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDocument>,
}

/// Serialized form of a [`PropertyDeclaration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: TypeDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Json>,
}

/// Serialized form of a declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDocument {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    String,
    Enum(EnumDocument),
    Decorator(Box<SchemaDocument>),
    Sequence(Box<TypeDocument>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDocument {
    pub name: String,
    pub constants: Vec<String>,
}

impl Schema {
    /// Parses and validates a JSON schema document.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        Self::try_from(&document)
    }

    /// Pretty-printed JSON document of this schema.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn to_document(&self) -> SchemaDocument {
        SchemaDocument {
            name: self.name.clone(),
            properties: self
                .properties
                .iter()
                .map(|p| PropertyDocument {
                    name: p.name.clone(),
                    declared_type: TypeDocument::from(&p.declared_type),
                    default: p.default_value.as_ref().map(Value::to_json),
                })
                .collect(),
        }
    }
}

impl TryFrom<&SchemaDocument> for Schema {
    type Error = Error;

    fn try_from(document: &SchemaDocument) -> Result<Self> {
        let properties = document
            .properties
            .iter()
            .map(|p| {
                let declared_type = p.declared_type.to_declared_type()?;
                let default_value = p
                    .default
                    .as_ref()
                    .map(|json| Value::from_json(&declared_type, json))
                    .transpose()
                    .map_err(|err| {
                        Error::invalid(format!(
                            "default of '{}.{}': {}",
                            document.name, p.name, err
                        ))
                    })?;
                Ok(PropertyDeclaration {
                    name: p.name.clone(),
                    declared_type,
                    default_value,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Schema::new(document.name.clone(), properties)
    }
}

impl TypeDocument {
    fn to_declared_type(&self) -> Result<DeclaredType> {
        match self {
            Self::Sequence(element) => match element.as_ref() {
                Self::Sequence(_) => Err(Error::invalid("sequences of sequences are not supported")),
                element => Ok(DeclaredType::Sequence(element.to_element_type()?)),
            },
            scalar => Ok(DeclaredType::Scalar(scalar.to_element_type()?)),
        }
    }

    fn to_element_type(&self) -> Result<ElementType> {
        let kind = match self {
            Self::Boolean => PrimitiveKind::Boolean,
            Self::Byte => PrimitiveKind::Byte,
            Self::Short => PrimitiveKind::Short,
            Self::Char => PrimitiveKind::Char,
            Self::Int => PrimitiveKind::Int,
            Self::Long => PrimitiveKind::Long,
            Self::Float => PrimitiveKind::Float,
            Self::Double => PrimitiveKind::Double,
            Self::String => return Ok(ElementType::String),
            Self::Enum(e) => {
                return Ok(ElementType::Enum(Arc::new(EnumType::new(
                    e.name.clone(),
                    e.constants.iter().cloned(),
                )?)));
            }
            Self::Decorator(schema) => {
                return Ok(ElementType::Decorator(Arc::new(Schema::try_from(
                    schema.as_ref(),
                )?)));
            }
            Self::Sequence(_) => return Err(Error::invalid("sequence used as an element type")),
        };
        Ok(ElementType::Primitive(kind))
    }
}

impl From<&DeclaredType> for TypeDocument {
    fn from(declared_type: &DeclaredType) -> Self {
        match declared_type {
            DeclaredType::Scalar(element) => Self::from(element),
            DeclaredType::Sequence(element) => Self::Sequence(Box::new(Self::from(element))),
        }
    }
}

impl From<&ElementType> for TypeDocument {
    fn from(element: &ElementType) -> Self {
        match element {
            ElementType::Primitive(kind) => match kind {
                PrimitiveKind::Boolean => Self::Boolean,
                PrimitiveKind::Byte => Self::Byte,
                PrimitiveKind::Short => Self::Short,
                PrimitiveKind::Char => Self::Char,
                PrimitiveKind::Int => Self::Int,
                PrimitiveKind::Long => Self::Long,
                PrimitiveKind::Float => Self::Float,
                PrimitiveKind::Double => Self::Double,
            },
            ElementType::String => Self::String,
            ElementType::Enum(e) => Self::Enum(EnumDocument {
                name: e.name.clone(),
                constants: e.constants.clone(),
            }),
            ElementType::Decorator(schema) => Self::Decorator(Box::new(schema.to_document())),
        }
    }
}

impl Value {
    /// Converts plain JSON into a value of `declared_type`.
    ///
    /// Integers are range checked, `char` takes a one-character string, enum
    /// constants are given by name and nested decorators by an object whose
    /// keys override the nested schema's defaults.
    pub fn from_json(declared_type: &DeclaredType, json: &Json) -> Result<Self> {
        match declared_type {
            DeclaredType::Sequence(element) => {
                let items = json.as_array().ok_or_else(|| mismatch(declared_type, json))?;
                items
                    .iter()
                    .map(|item| element_from_json(element, item))
                    .collect::<Result<Vec<_>>>()
                    .map(Self::Sequence)
            }
            DeclaredType::Scalar(element) => element_from_json(element, json),
        }
    }

    /// Plain JSON form; nested decorators become objects of their properties.
    /// Non-finite floats have no JSON form and become `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Self::Boolean(v) => Json::from(*v),
            Self::Byte(v) => Json::from(*v),
            Self::Short(v) => Json::from(*v),
            Self::Char(v) => Json::from(v.to_string()),
            Self::Int(v) => Json::from(*v),
            Self::Long(v) => Json::from(*v),
            Self::Float(v) => Json::from(f64::from(*v)),
            Self::Double(v) => Json::from(*v),
            Self::String(v) => Json::from(v.as_str()),
            Self::Enum(constant) => Json::from(constant.name.as_str()),
            Self::Decorator(record) => Json::Object(
                record
                    .store()
                    .iter()
                    .map(|p| (p.name().to_string(), p.value().to_json()))
                    .collect(),
            ),
            Self::Sequence(items) => Json::Array(items.iter().map(Value::to_json).collect()),
        }
    }
}

fn element_from_json(element: &ElementType, json: &Json) -> Result<Value> {
    let value = match element {
        ElementType::Primitive(kind) => match kind {
            PrimitiveKind::Boolean => json.as_bool().map(Value::Boolean),
            PrimitiveKind::Byte => json
                .as_i64()
                .and_then(|v| i8::try_from(v).ok())
                .map(Value::Byte),
            PrimitiveKind::Short => json
                .as_i64()
                .and_then(|v| i16::try_from(v).ok())
                .map(Value::Short),
            PrimitiveKind::Char => json.as_str().and_then(single_char).map(Value::Char),
            PrimitiveKind::Int => json
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Value::Int),
            PrimitiveKind::Long => json.as_i64().map(Value::Long),
            PrimitiveKind::Float => json
                .as_f64()
                .map(|v| v as f32)
                .filter(|v| v.is_finite())
                .map(Value::Float),
            PrimitiveKind::Double => json.as_f64().map(Value::Double),
        },
        ElementType::String => json.as_str().map(Value::from),
        ElementType::Enum(enum_type) => json
            .as_str()
            .and_then(|name| enum_type.constant(name))
            .map(Value::Enum),
        ElementType::Decorator(schema) => {
            let Some(object) = json.as_object() else {
                return Err(mismatch(element, json));
            };
            let mut values = Vec::with_capacity(object.len());
            for (name, item) in object {
                let declaration = schema.property(name).ok_or_else(|| {
                    Error::invalid(format!(
                        "decorator '{}' does not contain a property named '{}'",
                        schema.name, name
                    ))
                })?;
                values.push((name.as_str(), Value::from_json(&declaration.declared_type, item)?));
            }
            return DecoratorRecord::new(Arc::clone(schema), values).map(Value::from);
        }
    };
    value.ok_or_else(|| mismatch(element, json))
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn mismatch(expected: &dyn std::fmt::Display, json: &Json) -> Error {
    Error::invalid(format!("expected {expected}, got JSON {json}"))
}
