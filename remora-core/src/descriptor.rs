//! Schema descriptors: the read-only field layout of messages and the value
//! sets of enumerations.
//!
//! Descriptors are built once through their builders and shared via [`Arc`].
//! Each message descriptor carries two lookup tables, exact name and
//! ASCII-lowercase-folded name, so resolving a key during population is an
//! indexed lookup, not a per-call scan.

use alloc::sync::Arc;
use core::fmt;

use indexmap::IndexMap;

use crate::kind::Kind;
use crate::message::DynamicMessage;

/// Errors raised while building a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// A descriptor, field, or enumeration value was given an empty name.
    EmptyName,
    /// Two fields of one message share a name.
    DuplicateField {
        /// The offending field name.
        name: String,
    },
    /// Two values of one enumeration share a name.
    DuplicateValue {
        /// The offending value name.
        name: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::EmptyName => write!(f, "descriptor names must be non-empty"),
            SchemaError::DuplicateField { name } => {
                write!(f, "duplicate field `{name}'")
            }
            SchemaError::DuplicateValue { name } => {
                write!(f, "duplicate enumeration value `{name}'")
            }
        }
    }
}

impl core::error::Error for SchemaError {}

/// Per-field metadata: the declared name and kind.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    kind: Kind,
}

impl FieldDescriptor {
    /// The field's declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's declared kind.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// The enumeration this field references, for enum-kind fields.
    pub fn enum_descriptor(&self) -> Option<&Arc<EnumDescriptor>> {
        match &self.kind {
            Kind::Enum(values) => Some(values),
            _ => None,
        }
    }

    /// The message type this field references, for message-kind fields.
    pub fn message_descriptor(&self) -> Option<&Arc<MessageDescriptor>> {
        match &self.kind {
            Kind::Message(nested) => Some(nested),
            _ => None,
        }
    }
}

/// The field layout of one message type, in declaration order.
#[derive(Debug, PartialEq)]
pub struct MessageDescriptor {
    name: String,
    /// Declaration order and exact-name lookup in one table.
    fields: IndexMap<String, FieldDescriptor>,
    /// ASCII-lowercase-folded name to field index. On fold collisions the
    /// first declared field wins.
    folded: IndexMap<String, usize>,
}

impl MessageDescriptor {
    /// Starts building a message descriptor named `name`.
    pub fn builder(name: impl Into<String>) -> MessageDescriptorBuilder {
        MessageDescriptorBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// The message type's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Iterates the fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    /// Looks up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Looks up a field by exact name together with its declaration index.
    pub fn field_with_index(&self, name: &str) -> Option<(usize, &FieldDescriptor)> {
        self.fields
            .get_full(name)
            .map(|(index, _, field)| (index, field))
    }

    /// Folded-name variant of [`MessageDescriptor::field_with_index`].
    pub fn field_with_index_folded(&self, name: &str) -> Option<(usize, &FieldDescriptor)> {
        let index = self.index_of_folded(name)?;
        self.field_at(index).map(|field| (index, field))
    }

    /// Looks up a field by ASCII-case-folded name.
    ///
    /// The query is folded before the lookup, so `"PORT"`, `"Port"`, and
    /// `"port"` all resolve the same field.
    pub fn field_folded(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field_at(self.index_of_folded(name)?)
    }

    /// The field at position `index` in declaration order.
    pub fn field_at(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get_index(index).map(|(_, field)| field)
    }

    /// The declaration-order index of the field named `name` (exact match).
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.get_index_of(name)
    }

    /// The declaration-order index of the field whose folded name matches
    /// the folded query.
    pub fn index_of_folded(&self, name: &str) -> Option<usize> {
        self.folded.get(&name.to_ascii_lowercase()).copied()
    }

    /// Creates a fresh, fully-unset instance of this message type.
    pub fn new_message(self: &Arc<Self>) -> DynamicMessage {
        DynamicMessage::new(self)
    }
}

/// Builder for [`MessageDescriptor`].
#[derive(Debug)]
pub struct MessageDescriptorBuilder {
    name: String,
    fields: Vec<(String, Kind)>,
}

impl MessageDescriptorBuilder {
    /// Declares a field. Declaration order is preserved and is the order the
    /// dumper walks.
    pub fn field(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.fields.push((name.into(), kind));
        self
    }

    /// Builds the final descriptor, constructing both lookup tables.
    pub fn build(self) -> Result<Arc<MessageDescriptor>, SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        let mut fields = IndexMap::with_capacity(self.fields.len());
        let mut folded = IndexMap::with_capacity(self.fields.len());
        for (name, kind) in self.fields {
            if name.is_empty() {
                return Err(SchemaError::EmptyName);
            }
            let index = fields.len();
            let descriptor = FieldDescriptor {
                name: name.clone(),
                kind,
            };
            if fields.insert(name.clone(), descriptor).is_some() {
                return Err(SchemaError::DuplicateField { name });
            }
            folded.entry(name.to_ascii_lowercase()).or_insert(index);
        }
        Ok(Arc::new(MessageDescriptor {
            name: self.name,
            fields,
            folded,
        }))
    }
}

/// One named value of an enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    name: String,
    number: i32,
}

impl EnumValue {
    /// The value's symbolic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value's numeric tag.
    pub fn number(&self) -> i32 {
        self.number
    }
}

/// The value set of one enumeration type, in declaration order.
#[derive(Debug, PartialEq)]
pub struct EnumDescriptor {
    name: String,
    /// Declaration order and by-name lookup in one table.
    values: IndexMap<String, EnumValue>,
    /// Numeric tag to value index. Aliased numbers resolve to the first
    /// declared value.
    by_number: IndexMap<i32, usize>,
}

impl EnumDescriptor {
    /// Starts building an enumeration descriptor named `name`.
    pub fn builder(name: impl Into<String>) -> EnumDescriptorBuilder {
        EnumDescriptorBuilder {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// The enumeration's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterates the values in declaration order.
    pub fn values(&self) -> impl Iterator<Item = &EnumValue> {
        self.values.values()
    }

    /// Looks up a value by exact symbolic name.
    pub fn value(&self, name: &str) -> Option<&EnumValue> {
        self.values.get(name)
    }

    /// Looks up a value by numeric tag. For aliased numbers the first
    /// declared value wins.
    pub fn value_by_number(&self, number: i32) -> Option<&EnumValue> {
        let index = *self.by_number.get(&number)?;
        self.values.get_index(index).map(|(_, value)| value)
    }

    /// The dotted `Enumeration.Value` rendering of the value numbered
    /// `number`, used by the dumper.
    pub fn full_name_of(&self, number: i32) -> Option<String> {
        self.value_by_number(number)
            .map(|value| format!("{}.{}", self.name, value.name))
    }
}

/// Builder for [`EnumDescriptor`].
#[derive(Debug)]
pub struct EnumDescriptorBuilder {
    name: String,
    values: Vec<(String, i32)>,
}

impl EnumDescriptorBuilder {
    /// Declares a named value. Duplicate numbers are allowed (aliases);
    /// duplicate names are not.
    pub fn value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push((name.into(), number));
        self
    }

    /// Builds the final descriptor, constructing both lookup tables.
    pub fn build(self) -> Result<Arc<EnumDescriptor>, SchemaError> {
        if self.name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        let mut values = IndexMap::with_capacity(self.values.len());
        let mut by_number = IndexMap::with_capacity(self.values.len());
        for (name, number) in self.values {
            if name.is_empty() {
                return Err(SchemaError::EmptyName);
            }
            let index = values.len();
            let value = EnumValue {
                name: name.clone(),
                number,
            };
            if values.insert(name.clone(), value).is_some() {
                return Err(SchemaError::DuplicateValue { name });
            }
            by_number.entry(number).or_insert(index);
        }
        Ok(Arc::new(EnumDescriptor {
            name: self.name,
            values,
            by_number,
        }))
    }
}
