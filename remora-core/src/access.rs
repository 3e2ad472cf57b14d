//! The typed accessor family: per-kind get/set helpers addressed by field
//! name.
//!
//! Every accessor resolves the field by exact name on each call and checks the
//! declared kind before touching the slot. Failures are folded into the return
//! value: setters answer `false`, getters answer the kind's zero value.
//! Callers that want the distinction between "absent", "wrong kind", and
//! "unset" use [`DynamicMessage::set`] and [`DynamicMessage::value`] directly.
//!
//! The `get_*_or_set` variants initialize a field that was never assigned.
//! Presence is taken from the slot, not from value comparison, so a field
//! explicitly set to zero is returned as zero and left alone.

use bytes::Bytes;

use crate::kind::Kind;
use crate::message::DynamicMessage;
use crate::value::Value;

macro_rules! scalar_accessors {
    ($($kind_name:literal, $kind:ident, $value:ident, $ty:ty, $zero:expr =>
        ($set:ident, $get:ident, $get_or_set:ident);)*) => {
        impl DynamicMessage {
            $(
                #[doc = concat!("Writes `value` into the ", $kind_name, " field named `name`.")]
                #[doc = ""]
                #[doc = concat!(
                    "Returns `false`, leaving the message untouched, when no field has that ",
                    "exact name or the field is not declared ", $kind_name, ".",
                )]
                pub fn $set(&mut self, name: &str, value: $ty) -> bool {
                    match self.descriptor.field_with_index(name) {
                        Some((index, field)) if matches!(field.kind(), Kind::$kind) => {
                            self.slots[index] = Some(Value::$value(value));
                            true
                        }
                        _ => false,
                    }
                }

                #[doc = concat!("Reads the ", $kind_name, " field named `name`.")]
                #[doc = ""]
                #[doc = concat!(
                    "Returns `", stringify!($zero), "` when the field is absent, declared ",
                    "with another kind, or unset.",
                )]
                pub fn $get(&self, name: &str) -> $ty {
                    match self.descriptor.field_with_index(name) {
                        Some((index, field)) if matches!(field.kind(), Kind::$kind) => {
                            match &self.slots[index] {
                                Some(Value::$value(value)) => *value,
                                _ => $zero,
                            }
                        }
                        _ => $zero,
                    }
                }

                #[doc = concat!(
                    "Reads the ", $kind_name, " field named `name`, first initializing it ",
                    "to `default` if it was never assigned.",
                )]
                #[doc = ""]
                #[doc = concat!(
                    "A field explicitly set to `", stringify!($zero), "` is returned as-is; ",
                    "only a truly unset field receives the default. Absent or ",
                    "differently-kinded fields return `", stringify!($zero),
                    "` without writing.",
                )]
                pub fn $get_or_set(&mut self, name: &str, default: $ty) -> $ty {
                    match self.descriptor.field_with_index(name) {
                        Some((index, field)) if matches!(field.kind(), Kind::$kind) => {
                            match &self.slots[index] {
                                Some(Value::$value(value)) => *value,
                                Some(_) => $zero,
                                None => {
                                    self.slots[index] = Some(Value::$value(default));
                                    default
                                }
                            }
                        }
                        _ => $zero,
                    }
                }
            )*
        }
    };
}

scalar_accessors! {
    "bool",   Bool,   Bool, bool, false => (set_bool,   get_bool,   get_bool_or_set);
    "int32",  Int32,  I32,  i32,  0     => (set_int32,  get_int32,  get_int32_or_set);
    "int64",  Int64,  I64,  i64,  0     => (set_int64,  get_int64,  get_int64_or_set);
    "uint32", UInt32, U32,  u32,  0     => (set_uint32, get_uint32, get_uint32_or_set);
    "uint64", UInt64, U64,  u64,  0     => (set_uint64, get_uint64, get_uint64_or_set);
    "float",  Float,  F32,  f32,  0.0   => (set_float,  get_float,  get_float_or_set);
    "double", Double, F64,  f64,  0.0   => (set_double, get_double, get_double_or_set);
}

impl DynamicMessage {
    /// Writes text into the string- or bytes-kind field named `name`.
    ///
    /// String and bytes fields take the same accessors; a bytes field stores
    /// the UTF-8 bytes of the text. Returns `false`, leaving the message
    /// untouched, when the field is absent or declared with any other kind.
    pub fn set_string(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.descriptor.field_with_index(name) {
            Some((index, field)) => match field.kind() {
                Kind::String => {
                    self.slots[index] = Some(Value::String(value.into()));
                    true
                }
                Kind::Bytes => {
                    self.slots[index] = Some(Value::Bytes(Bytes::from(value.into().into_bytes())));
                    true
                }
                _ => false,
            },
            None => false,
        }
    }

    /// Reads the string- or bytes-kind field named `name` as text.
    ///
    /// Bytes payloads are converted with lossy UTF-8. Returns the empty string
    /// when the field is absent, declared with another kind, or unset.
    pub fn get_string(&self, name: &str) -> String {
        match self.descriptor.field_with_index(name) {
            Some((index, field)) if matches!(field.kind(), Kind::String | Kind::Bytes) => {
                match &self.slots[index] {
                    Some(Value::String(value)) => value.clone(),
                    Some(Value::Bytes(value)) => String::from_utf8_lossy(value).into_owned(),
                    _ => String::new(),
                }
            }
            _ => String::new(),
        }
    }

    /// Reads the string- or bytes-kind field named `name`, first initializing
    /// it to `default` if it was never assigned.
    ///
    /// A field explicitly set to the empty string is returned as-is; only a
    /// truly unset field receives the default. Absent or differently-kinded
    /// fields return the empty string without writing.
    pub fn get_string_or_set(&mut self, name: &str, default: impl Into<String>) -> String {
        match self.descriptor.field_with_index(name) {
            Some((index, field)) if matches!(field.kind(), Kind::String | Kind::Bytes) => {
                let is_bytes = matches!(field.kind(), Kind::Bytes);
                match &self.slots[index] {
                    Some(Value::String(value)) => value.clone(),
                    Some(Value::Bytes(value)) => String::from_utf8_lossy(value).into_owned(),
                    Some(_) => String::new(),
                    None => {
                        let default = default.into();
                        self.slots[index] = Some(if is_bytes {
                            Value::Bytes(Bytes::from(default.clone().into_bytes()))
                        } else {
                            Value::String(default.clone())
                        });
                        default
                    }
                }
            }
            _ => String::new(),
        }
    }

    /// Writes the enum value numbered `number` into the enum-kind field named
    /// `name`.
    ///
    /// Returns `true` whenever the field exists and is enum-kind. The write
    /// itself only happens when `number` names a declared value of the field's
    /// enumeration; an unknown number leaves the field unchanged, yet the call
    /// still reports success because the field's kind matched.
    pub fn set_enum(&mut self, name: &str, number: i32) -> bool {
        match self.descriptor.field_with_index(name) {
            Some((index, field)) => match field.kind() {
                Kind::Enum(values) => {
                    if values.value_by_number(number).is_some() {
                        self.slots[index] = Some(Value::Enum(number));
                    }
                    true
                }
                _ => false,
            },
            None => false,
        }
    }

    /// Reads the numeric tag of the enum-kind field named `name`.
    ///
    /// Returns `0` when the field is absent, declared with another kind, or
    /// unset.
    pub fn get_enum(&self, name: &str) -> i32 {
        match self.descriptor.field_with_index(name) {
            Some((index, field)) if field.kind().is_enum() => match &self.slots[index] {
                Some(Value::Enum(number)) => *number,
                _ => 0,
            },
            _ => 0,
        }
    }

    /// Reads the numeric tag of the enum-kind field named `name`, first
    /// initializing it to `default_number` if it was never assigned.
    ///
    /// Like [`DynamicMessage::set_enum`], the initializing write only happens
    /// when `default_number` names a declared value; otherwise the field stays
    /// unset and the call returns `0`. Absent or differently-kinded fields
    /// return `0` without writing.
    pub fn get_enum_or_set(&mut self, name: &str, default_number: i32) -> i32 {
        match self.descriptor.field_with_index(name) {
            Some((index, field)) => match field.kind() {
                Kind::Enum(values) => match &self.slots[index] {
                    Some(Value::Enum(number)) => *number,
                    Some(_) => 0,
                    None => {
                        if values.value_by_number(default_number).is_some() {
                            self.slots[index] = Some(Value::Enum(default_number));
                            default_number
                        } else {
                            0
                        }
                    }
                },
                _ => 0,
            },
            None => 0,
        }
    }

    /// The symbolic name of the tag `number` within the enumeration referenced
    /// by the enum-kind field named `name`.
    ///
    /// `None` when the field is absent, not enum-kind, or the enumeration
    /// declares no value with that number.
    pub fn enum_alias(&self, name: &str, number: i32) -> Option<&str> {
        let values = self.descriptor.field(name)?.enum_descriptor()?;
        values.value_by_number(number).map(|value| value.name())
    }
}
