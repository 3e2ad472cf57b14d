//! The recursive message dump and its per-field text conversion.

use remora_core::{DynamicMessage, FieldDescriptor, Kind, Value};

/// Formats a [`DynamicMessage`] as tab-indented text.
///
/// Fields come out in schema-declaration order, one per line. Scalar fields
/// render as `` `name' = `value' ``; message-kind fields render a
/// `` [message] `name' `` header followed by the nested dump one tab deeper.
/// Group-kind fields produce no output at all.
///
/// Unset fields read through to their zero values, and an unset nested
/// message dumps as an empty instance of its schema, so the dump always shows
/// the full field layout.
#[derive(Debug, Clone)]
pub struct Dumper {
    initial_indent: usize,
    max_depth: Option<usize>,
}

impl Default for Dumper {
    fn default() -> Self {
        Self {
            initial_indent: 0,
            max_depth: None,
        }
    }
}

impl Dumper {
    /// Create a new Dumper with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of tabs in front of the top-level fields.
    pub fn with_initial_indent(mut self, indent: usize) -> Self {
        self.initial_indent = indent;
        self
    }

    /// Set the maximum number of nested-message levels to render.
    ///
    /// A nested message past the limit keeps its header line but renders a
    /// single `...` line in place of its fields. Depth is otherwise
    /// unbounded, which is fine for schemas you control and pathological for
    /// ones you do not.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Format a message to a string.
    pub fn dump(&self, message: &DynamicMessage) -> String {
        let mut out = String::new();
        self.dump_into(message, self.initial_indent, 0, &mut out);
        out
    }

    fn dump_into(&self, message: &DynamicMessage, indent: usize, depth: usize, out: &mut String) {
        for (index, field) in message.descriptor().fields().enumerate() {
            match field.kind() {
                Kind::Group => continue,
                Kind::Message(nested) => {
                    push_tabs(out, indent);
                    out.push_str("[message] `");
                    out.push_str(field.name());
                    out.push_str("'\n");
                    if self.max_depth.is_some_and(|max| depth + 1 > max) {
                        push_tabs(out, indent + 1);
                        out.push_str("...\n");
                        continue;
                    }
                    match message.nested_message(index) {
                        Some(inner) => self.dump_into(inner, indent + 1, depth + 1, out),
                        None => self.dump_into(&nested.new_message(), indent + 1, depth + 1, out),
                    }
                }
                _ => {
                    push_tabs(out, indent);
                    out.push('`');
                    out.push_str(field.name());
                    out.push_str("' = `");
                    out.push_str(&scalar_text(message, index, field));
                    out.push_str("'\n");
                }
            }
        }
    }
}

/// Dumps `message` with the default settings.
pub fn dump(message: &DynamicMessage) -> String {
    Dumper::new().dump(message)
}

/// The text a single field renders as, addressed by exact name.
///
/// Scalar kinds use their plain text form (see [`Dumper`] for what unset
/// fields show); enum kinds render the dotted `Enumeration.Value` full name,
/// or the bare number when the tag names no declared value; message kinds
/// return the nested dump indented one tab. `None` for fields the message
/// does not declare and for group-kind fields.
pub fn field_text(message: &DynamicMessage, name: &str) -> Option<String> {
    let (index, field) = message.descriptor().field_with_index(name)?;
    match field.kind() {
        Kind::Group => None,
        Kind::Message(nested) => {
            let dumper = Dumper::new().with_initial_indent(1);
            Some(match message.nested_message(index) {
                Some(inner) => dumper.dump(inner),
                None => dumper.dump(&nested.new_message()),
            })
        }
        _ => Some(scalar_text(message, index, field)),
    }
}

fn push_tabs(out: &mut String, count: usize) {
    for _ in 0..count {
        out.push('\t');
    }
}

/// Plain text form of the scalar field at `index`; unset slots render the
/// kind's zero value.
fn scalar_text(message: &DynamicMessage, index: usize, field: &FieldDescriptor) -> String {
    let value = message.value(index);
    match field.kind() {
        Kind::Bool => value.and_then(Value::as_bool).unwrap_or(false).to_string(),
        Kind::Int32 => value.and_then(Value::as_i32).unwrap_or(0).to_string(),
        Kind::Int64 => value.and_then(Value::as_i64).unwrap_or(0).to_string(),
        Kind::UInt32 => value.and_then(Value::as_u32).unwrap_or(0).to_string(),
        Kind::UInt64 => value.and_then(Value::as_u64).unwrap_or(0).to_string(),
        Kind::Float => value.and_then(Value::as_f32).unwrap_or(0.0).to_string(),
        Kind::Double => value.and_then(Value::as_f64).unwrap_or(0.0).to_string(),
        Kind::String => value.and_then(Value::as_str).unwrap_or("").to_owned(),
        Kind::Bytes => value
            .and_then(Value::as_bytes)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default(),
        Kind::Enum(values) => {
            let number = value.and_then(Value::as_enum).unwrap_or(0);
            values
                .full_name_of(number)
                .unwrap_or_else(|| number.to_string())
        }
        // Both callers branch on the kind before getting here.
        Kind::Message(_) | Kind::Group => unreachable!(),
    }
}
