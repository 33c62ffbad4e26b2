//! Built-in scalar types of the markdown dialect

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A primitive `Type:` value. Names are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    String,
    Integer,
    Float,
    Number,
    Boolean,
    Identifier,
    Bytes,
    Date,
    DateTime,
}

impl PrimitiveType {
    pub const ALL: &'static [PrimitiveType] = &[
        PrimitiveType::String,
        PrimitiveType::Integer,
        PrimitiveType::Float,
        PrimitiveType::Number,
        PrimitiveType::Boolean,
        PrimitiveType::Identifier,
        PrimitiveType::Bytes,
        PrimitiveType::Date,
        PrimitiveType::DateTime,
    ];

    /// Canonical spelling used when rendering the dialect back.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Float => "float",
            PrimitiveType::Number => "number",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Identifier => "Identifier",
            PrimitiveType::Bytes => "bytes",
            PrimitiveType::Date => "date",
            PrimitiveType::DateTime => "datetime",
        }
    }

    pub fn parse(name: &str) -> Option<PrimitiveType> {
        let lowered = name.trim().to_ascii_lowercase();
        let primitive = match lowered.as_str() {
            "string" | "str" => PrimitiveType::String,
            "integer" | "int" => PrimitiveType::Integer,
            "float" | "double" => PrimitiveType::Float,
            "number" => PrimitiveType::Number,
            "boolean" | "bool" => PrimitiveType::Boolean,
            "identifier" => PrimitiveType::Identifier,
            "bytes" => PrimitiveType::Bytes,
            "date" => PrimitiveType::Date,
            "datetime" => PrimitiveType::DateTime,
            _ => return None,
        };
        Some(primitive)
    }

    pub fn is_primitive(name: &str) -> bool {
        Self::parse(name).is_some()
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrimitiveType::parse(s).ok_or_else(|| format!("'{s}' is not a primitive type"))
    }
}
