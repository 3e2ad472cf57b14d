//! Declared field kinds.

use alloc::sync::Arc;
use core::fmt;

use crate::descriptor::{EnumDescriptor, MessageDescriptor};

/// The declared type tag of a schema field.
///
/// `Enum` and `Message` carry the descriptor of the type they reference, so
/// resolving a field is enough to coerce into it or traverse through it;
/// there is no separate type registry to consult.
#[derive(Clone, Debug, PartialEq)]
pub enum Kind {
    /// `true` / `false`.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// UTF-8 text.
    String,
    /// Arbitrary binary data.
    Bytes,
    /// A value of the referenced enumeration.
    Enum(Arc<EnumDescriptor>),
    /// A nested message of the referenced type.
    Message(Arc<MessageDescriptor>),
    /// Legacy group field. Unsupported: accessors refuse it, population
    /// reports it, the dumper skips it.
    Group,
}

impl Kind {
    /// Lowercase name of the kind, as used in diagnostics and dumps.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Bool => "bool",
            Kind::Int32 => "int32",
            Kind::Int64 => "int64",
            Kind::UInt32 => "uint32",
            Kind::UInt64 => "uint64",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::String => "string",
            Kind::Bytes => "bytes",
            Kind::Enum(_) => "enum",
            Kind::Message(_) => "message",
            Kind::Group => "group",
        }
    }

    /// True for every kind holding a single scalar payload: everything
    /// except `Message` and `Group`.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Kind::Message(_) | Kind::Group)
    }

    /// True if this is a nested-message kind.
    pub fn is_message(&self) -> bool {
        matches!(self, Kind::Message(_))
    }

    /// True if this is an enumeration kind.
    pub fn is_enum(&self) -> bool {
        matches!(self, Kind::Enum(_))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
