//! Value types for opcell
//!
//! This module defines the tagged container used as the engine's generic
//! result slot. An operation engine stores whatever its work callback
//! produced as a [`Value`]; typed wrappers interpret that slot as a
//! statically-known shape through the [`ResultValue`] trait.
//!
//! ## Equality Rules
//!
//! - Different variants are NEVER equal (no type coercion)
//! - `Int(1)` != `UInt(1)` != `Float(1.0)`
//! - `String("abc")` != `Bytes([97, 98, 99])`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`

use serde::{Deserialize, Serialize};

/// Tagged result container.
///
/// This is the only value model the engine knows about. The variants cover
/// the result shapes produced by the operation callbacks in practice:
/// nothing, flags, counts, handles, text, raw buffers and collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// No result stored (the slot's initial state, and the result of
    /// operations that only signal completion).
    Empty,

    /// Boolean flag.
    Bool(bool),

    /// 64-bit signed integer.
    Int(i64),

    /// 64-bit unsigned integer (counts, opaque handles).
    UInt(u64),

    /// 64-bit IEEE-754 floating point.
    Float(f64),

    /// UTF-8 encoded string.
    String(String),

    /// Arbitrary binary data. NOT equivalent to `String` - distinct type.
    Bytes(Vec<u8>),

    /// Ordered sequence of values.
    Array(Vec<Value>),
}

impl Value {
    /// Returns the variant name as a string (for error messages).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Empty => "Empty",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::UInt(_) => "UInt",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Array(_) => "Array",
        }
    }

    /// Check if this value is the empty slot.
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as u64.
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::UInt(u) => Some(*u),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get as string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as byte slice.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get as a value slice.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Empty
    }
}

/// A result shape that can round-trip through the engine's [`Value`] slot.
///
/// Typed operation wrappers are parameterized over an implementor of this
/// trait; the work callback's output is packed with [`into_value`] and the
/// wrapper's result accessor unpacks it with [`from_value`].
///
/// [`into_value`]: ResultValue::into_value
/// [`from_value`]: ResultValue::from_value
pub trait ResultValue: Sized + Send + 'static {
    /// Variant name this shape packs into (for error messages).
    fn type_name() -> &'static str;

    /// Pack into the tagged container.
    fn into_value(self) -> Value;

    /// Unpack from the tagged container; `None` on variant mismatch.
    fn from_value(value: &Value) -> Option<Self>;
}

impl ResultValue for () {
    fn type_name() -> &'static str {
        "Empty"
    }

    fn into_value(self) -> Value {
        Value::Empty
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Empty => Some(()),
            _ => None,
        }
    }
}

impl ResultValue for bool {
    fn type_name() -> &'static str {
        "Bool"
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl ResultValue for i64 {
    fn type_name() -> &'static str {
        "Int"
    }

    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }
}

impl ResultValue for u32 {
    fn type_name() -> &'static str {
        "UInt"
    }

    fn into_value(self) -> Value {
        Value::UInt(u64::from(self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_uint().and_then(|u| u32::try_from(u).ok())
    }
}

impl ResultValue for u64 {
    fn type_name() -> &'static str {
        "UInt"
    }

    fn into_value(self) -> Value {
        Value::UInt(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_uint()
    }
}

impl ResultValue for f64 {
    fn type_name() -> &'static str {
        "Float"
    }

    fn into_value(self) -> Value {
        Value::Float(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_float()
    }
}

impl ResultValue for String {
    fn type_name() -> &'static str {
        "String"
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl ResultValue for Vec<u8> {
    fn type_name() -> &'static str {
        "Bytes"
    }

    fn into_value(self) -> Value {
        Value::Bytes(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bytes().map(<[u8]>::to_vec)
    }
}

impl ResultValue for Vec<Value> {
    fn type_name() -> &'static str {
        "Array"
    }

    fn into_value(self) -> Value {
        Value::Array(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_array().map(<[Value]>::to_vec)
    }
}
