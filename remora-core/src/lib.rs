#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod access;
mod descriptor;
mod kind;
mod message;
mod value;

pub use descriptor::{
    EnumDescriptor, EnumDescriptorBuilder, EnumValue, FieldDescriptor, MessageDescriptor,
    MessageDescriptorBuilder, SchemaError,
};
pub use kind::Kind;
pub use message::{AccessError, DynamicMessage};
pub use value::Value;
