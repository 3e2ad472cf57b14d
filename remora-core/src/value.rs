//! Dynamic field payloads.

use alloc::sync::Arc;

use bytes::Bytes;

use crate::kind::Kind;
use crate::message::DynamicMessage;

/// One set field's payload.
///
/// A slot in a [`DynamicMessage`] holds the `Value` last written to it. Kind
/// agreement between a payload and the field's declared [`Kind`] is checked at
/// write time by [`DynamicMessage::set`], so a well-formed message never holds
/// a payload its schema did not declare.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Payload of a [`Kind::Bool`] field.
    Bool(bool),
    /// Payload of a [`Kind::Int32`] field.
    I32(i32),
    /// Payload of a [`Kind::Int64`] field.
    I64(i64),
    /// Payload of a [`Kind::UInt32`] field.
    U32(u32),
    /// Payload of a [`Kind::UInt64`] field.
    U64(u64),
    /// Payload of a [`Kind::Float`] field.
    F32(f32),
    /// Payload of a [`Kind::Double`] field.
    F64(f64),
    /// Payload of a [`Kind::String`] field.
    String(String),
    /// Payload of a [`Kind::Bytes`] field.
    Bytes(Bytes),
    /// Payload of a [`Kind::Enum`] field: the numeric tag of the chosen value.
    Enum(i32),
    /// Payload of a [`Kind::Message`] field: the owned nested instance.
    Message(DynamicMessage),
}

impl Value {
    /// Lowercase name of the payload's kind, as used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::I32(_) => "int32",
            Value::I64(_) => "int64",
            Value::U32(_) => "uint32",
            Value::U64(_) => "uint64",
            Value::F32(_) => "float",
            Value::F64(_) => "double",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Enum(_) => "enum",
            Value::Message(_) => "message",
        }
    }

    /// Whether this payload agrees with the declared kind `kind`.
    ///
    /// Scalar payloads agree with their own kind tag only. An `Enum` payload
    /// agrees with any enum kind (the tag is not required to name a declared
    /// value). A `Message` payload agrees with a message kind only when it is
    /// an instance of the declared descriptor, so a nested slot can never hold
    /// a message of the wrong schema.
    pub fn matches(&self, kind: &Kind) -> bool {
        match (self, kind) {
            (Value::Bool(_), Kind::Bool) => true,
            (Value::I32(_), Kind::Int32) => true,
            (Value::I64(_), Kind::Int64) => true,
            (Value::U32(_), Kind::UInt32) => true,
            (Value::U64(_), Kind::UInt64) => true,
            (Value::F32(_), Kind::Float) => true,
            (Value::F64(_), Kind::Double) => true,
            (Value::String(_), Kind::String) => true,
            (Value::Bytes(_), Kind::Bytes) => true,
            (Value::Enum(_), Kind::Enum(_)) => true,
            (Value::Message(message), Kind::Message(declared)) => {
                Arc::ptr_eq(message.descriptor(), declared) || message.descriptor() == declared
            }
            _ => false,
        }
    }

    /// The boolean payload, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The int32 payload, if this is one.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(value) => Some(*value),
            _ => None,
        }
    }

    /// The int64 payload, if this is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(value) => Some(*value),
            _ => None,
        }
    }

    /// The uint32 payload, if this is one.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::U32(value) => Some(*value),
            _ => None,
        }
    }

    /// The uint64 payload, if this is one.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U64(value) => Some(*value),
            _ => None,
        }
    }

    /// The float payload, if this is one.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::F32(value) => Some(*value),
            _ => None,
        }
    }

    /// The double payload, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(value) => Some(*value),
            _ => None,
        }
    }

    /// The text payload, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// The bytes payload, if this is one.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(value) => Some(value),
            _ => None,
        }
    }

    /// The enum payload's numeric tag, if this is one.
    pub fn as_enum(&self) -> Option<i32> {
        match self {
            Value::Enum(number) => Some(*number),
            _ => None,
        }
    }

    /// The nested message payload, if this is one.
    pub fn as_message(&self) -> Option<&DynamicMessage> {
        match self {
            Value::Message(message) => Some(message),
            _ => None,
        }
    }
}
