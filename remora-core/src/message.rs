//! The mutable message instance.

use alloc::sync::Arc;
use core::fmt;

use crate::descriptor::MessageDescriptor;
use crate::kind::Kind;
use crate::value::Value;

/// Errors raised by the slot-level write path, [`DynamicMessage::set`].
///
/// The by-name typed accessors never surface these; they fold every failure
/// into their `false`/zero-value contract instead.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AccessError {
    /// The slot index is past the message's field count.
    OutOfRange {
        /// The requested index.
        index: usize,
        /// How many fields the message declares.
        field_count: usize,
    },
    /// The payload's kind does not agree with the field's declared kind.
    KindMismatch {
        /// The field's declared name.
        field: String,
        /// The field's declared kind.
        declared: &'static str,
        /// The kind of the rejected payload.
        payload: &'static str,
    },
    /// A message payload is an instance of a different schema than the
    /// message-kind field declares.
    SchemaMismatch {
        /// The field's declared name.
        field: String,
        /// The name of the declared message type.
        declared: String,
        /// The name of the payload's message type.
        payload: String,
    },
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::OutOfRange { index, field_count } => {
                write!(
                    f,
                    "field index {index} out of range for a message with {field_count} fields"
                )
            }
            AccessError::KindMismatch {
                field,
                declared,
                payload,
            } => {
                write!(
                    f,
                    "field `{field}' is declared {declared}, payload is {payload}"
                )
            }
            AccessError::SchemaMismatch {
                field,
                declared,
                payload,
            } => {
                write!(
                    f,
                    "field `{field}' holds `{declared}' messages, payload is a `{payload}' message"
                )
            }
        }
    }
}

impl core::error::Error for AccessError {}

/// A mutable instance of one message schema.
///
/// The message holds one slot per declared field, `None` until the field is
/// assigned, so a field explicitly set to its zero value stays distinguishable
/// from a field nobody ever wrote. Instances are created and dropped by the
/// caller and hold no state between calls; nothing here locks, and concurrent
/// mutation of a single instance must be excluded by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicMessage {
    pub(crate) descriptor: Arc<MessageDescriptor>,
    pub(crate) slots: Vec<Option<Value>>,
}

impl DynamicMessage {
    /// Creates an instance of `descriptor` with every field unset.
    pub fn new(descriptor: &Arc<MessageDescriptor>) -> Self {
        Self {
            descriptor: Arc::clone(descriptor),
            slots: vec![None; descriptor.field_count()],
        }
    }

    /// The schema this instance belongs to.
    pub fn descriptor(&self) -> &Arc<MessageDescriptor> {
        &self.descriptor
    }

    /// Whether the field at `index` has been assigned.
    pub fn has(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// The payload of the field at `index`, when assigned.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.slots.get(index)?.as_ref()
    }

    /// The payload of the field named `name` (exact match), when assigned.
    pub fn value_by_name(&self, name: &str) -> Option<&Value> {
        self.value(self.descriptor.index_of(name)?)
    }

    /// Writes `value` into the slot at `index`.
    ///
    /// Fails, leaving the message untouched, when the index is past the field
    /// count or the payload does not agree with the field's declared kind.
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), AccessError> {
        let field_count = self.slots.len();
        let Some(field) = self.descriptor.field_at(index) else {
            return Err(AccessError::OutOfRange { index, field_count });
        };
        if let (Value::Message(message), Kind::Message(declared)) = (&value, field.kind()) {
            let actual = message.descriptor();
            if !(Arc::ptr_eq(actual, declared) || actual == declared) {
                return Err(AccessError::SchemaMismatch {
                    field: field.name().to_owned(),
                    declared: declared.name().to_owned(),
                    payload: actual.name().to_owned(),
                });
            }
        }
        if !value.matches(field.kind()) {
            return Err(AccessError::KindMismatch {
                field: field.name().to_owned(),
                declared: field.kind().name(),
                payload: value.kind_name(),
            });
        }
        self.slots[index] = Some(value);
        Ok(())
    }

    /// Clears the field at `index`, returning the payload it held.
    ///
    /// `None` for out-of-range indices and for fields that were already unset.
    pub fn clear(&mut self, index: usize) -> Option<Value> {
        self.slots.get_mut(index)?.take()
    }

    /// Mutable access to the nested message owned by the message-kind field at
    /// `index`, constructing an empty instance on first access.
    ///
    /// `None` for out-of-range indices and for fields of any other kind.
    pub fn nested_message_mut(&mut self, index: usize) -> Option<&mut DynamicMessage> {
        let nested = self.descriptor.field_at(index)?.message_descriptor()?.clone();
        let slot = &mut self.slots[index];
        if slot.is_none() {
            *slot = Some(Value::Message(DynamicMessage::new(&nested)));
        }
        match slot {
            Some(Value::Message(message)) => Some(message),
            _ => None,
        }
    }

    /// The nested message owned by the message-kind field at `index`, when one
    /// has been constructed. Never constructs.
    pub fn nested_message(&self, index: usize) -> Option<&DynamicMessage> {
        match self.value(index)? {
            Value::Message(message) => Some(message),
            _ => None,
        }
    }
}
