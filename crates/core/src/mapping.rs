//! Type mapping from React `PropTypes` names to Java types.
//!
//! The vocabulary is closed: a declared type outside [`PropType`] is an
//! [`UnsupportedTypeError`], never a best-effort guess. Adding a type means one
//! new variant, one row in each match below and, if it needs special handling
//! on either side of the wire, one [`PropKind`].

use std::fmt;
use std::str::FromStr;

/// A declared prop type that has a Java counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropType {
    String,
    Number,
    Bool,
    Func,
    Object,
    Array,
    Symbol,
    Element,
}

/// How a prop crosses between server and client. Exactly one kind per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    /// Plain value carried in shared state
    Value,
    /// Client callback routed to a server-side `JavaScriptFunction`
    Function,
    /// String on the server, `Symbol` on the client
    Symbol,
    /// Nested component rendered by the client runtime
    Element,
}

/// Raised for any declared type outside the supported table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported type: {0}")]
pub struct UnsupportedTypeError(pub String);

impl UnsupportedTypeError {
    /// The declared type name that could not be mapped.
    pub fn type_name(&self) -> &str {
        &self.0
    }
}

impl PropType {
    /// Every supported type, in table order.
    pub const ALL: [PropType; 8] = [
        PropType::String,
        PropType::Number,
        PropType::Bool,
        PropType::Func,
        PropType::Object,
        PropType::Array,
        PropType::Symbol,
        PropType::Element,
    ];

    /// The `PropTypes` validator name, e.g. `bool` or `func`.
    pub fn declared_name(self) -> &'static str {
        match self {
            PropType::String => "string",
            PropType::Number => "number",
            PropType::Bool => "bool",
            PropType::Func => "func",
            PropType::Object => "object",
            PropType::Array => "array",
            PropType::Symbol => "symbol",
            PropType::Element => "element",
        }
    }

    /// Java type used for fields, getters, setters and constructor parameters.
    pub fn target_type(self) -> &'static str {
        match self {
            PropType::String | PropType::Symbol => "String",
            PropType::Number => "double",
            PropType::Bool => "boolean",
            PropType::Func => "JavaScriptFunction",
            PropType::Object => "elemental.json.JsonObject",
            PropType::Array => "elemental.json.JsonArray",
            PropType::Element => "io.vrgen.runtime.ReactComponent",
        }
    }

    pub fn kind(self) -> PropKind {
        match self {
            PropType::Func => PropKind::Function,
            PropType::Symbol => PropKind::Symbol,
            PropType::Element => PropKind::Element,
            PropType::String
            | PropType::Number
            | PropType::Bool
            | PropType::Object
            | PropType::Array => PropKind::Value,
        }
    }
}

impl FromStr for PropType {
    type Err = UnsupportedTypeError;

    fn from_str(declared: &str) -> Result<Self, Self::Err> {
        PropType::ALL
            .into_iter()
            .find(|ty| ty.declared_name() == declared)
            .ok_or_else(|| UnsupportedTypeError(declared.to_string()))
    }
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.declared_name())
    }
}

/// Map a declared type name to its supported [`PropType`].
pub fn map_type(declared: &str) -> Result<PropType, UnsupportedTypeError> {
    declared.parse()
}
