//! The populate pass: kind-directed coercion of `key=value` tokens into a
//! [`DynamicMessage`].

use alloc::sync::Arc;
use core::fmt::Display;
use core::str::FromStr;

use bytes::Bytes;
use remora_core::{DynamicMessage, FieldDescriptor, Kind, MessageDescriptor, Value};

use crate::error::{PopulateError, PopulateErrorKind, PopulateErrorWithInput};
use crate::report::{PopulateReport, TokenOutcome, TokenReport, closest_field};
use crate::span::Span;

/// What to do when a numeric value fails to parse.
///
/// Everything else a token can get wrong is a per-token skip either way; only
/// the numeric kinds distinguish "the field is unknown" from "the field is
/// known and the value is garbage", and this policy decides whether the
/// latter aborts the pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConversionPolicy {
    /// Abort the pass with a [`PopulateError`] pointing at the bad value.
    #[default]
    Fail,
    /// Record [`TokenOutcome::ConversionFailed`] and keep going.
    Skip,
}

/// Populates a [`DynamicMessage`] from `key=value` tokens.
///
/// Each token is resolved against the message's schema and its value coerced
/// by the field's declared kind. Tokens that address nothing, or values no
/// coercion accepts, are recorded and skipped rather than failing the pass;
/// see [`TokenOutcome`] for the full taxonomy. Dotted keys like
/// `bind.port=80` descend through message-kind fields, constructing empty
/// nested instances along the way.
///
/// ```
/// use remora_args::Populator;
/// use remora_core::{Kind, MessageDescriptor};
///
/// let schema = MessageDescriptor::builder("Config")
///     .field("host", Kind::String)
///     .field("port", Kind::UInt32)
///     .build()?;
/// let mut message = schema.new_message();
///
/// let report = Populator::new().populate(&mut message, &["host=db", "port=5432"])?;
/// assert!(report.is_clean());
/// assert_eq!(message.get_string("host"), "db");
/// assert_eq!(message.get_uint32("port"), 5432);
/// # Ok::<(), Box<dyn core::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Populator {
    case_insensitive: bool,
    policy: ConversionPolicy,
}

impl Populator {
    /// A populator with exact-name matching and [`ConversionPolicy::Fail`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve keys against ASCII-lowercase-folded field names instead of
    /// exact ones. Off by default.
    pub fn case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// What to do when a numeric value fails to parse. Defaults to
    /// [`ConversionPolicy::Fail`].
    pub fn on_conversion_error(mut self, policy: ConversionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Applies `args`, each expected to be a bare `key=value` token, to
    /// `message` in order.
    ///
    /// Later tokens overwrite earlier ones addressing the same field. The
    /// report lists every token and what became of it; `Err` only happens for
    /// a failed numeric conversion under [`ConversionPolicy::Fail`].
    pub fn populate(
        &self,
        message: &mut DynamicMessage,
        args: &[&str],
    ) -> Result<PopulateReport, PopulateErrorWithInput> {
        let mut context = Context::new(args, self.case_insensitive, self.policy);
        context.work_add_input(message)
    }

    /// Applies a command line: keeps only the tokens starting with `--`,
    /// strips that prefix, and populates from what remains.
    ///
    /// Dropped tokens do not appear in the report. The caller passes the
    /// arguments without the program name; see [`Populator::populate_std_args`]
    /// for the all-in-one version.
    pub fn populate_cli<I>(
        &self,
        message: &mut DynamicMessage,
        argv: I,
    ) -> Result<PopulateReport, PopulateErrorWithInput>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let kept: Vec<String> = argv
            .into_iter()
            .filter_map(|arg| arg.as_ref().strip_prefix("--").map(str::to_owned))
            .collect();
        let args: Vec<&str> = kept.iter().map(String::as_str).collect();
        self.populate(message, &args)
    }

    /// [`Populator::populate_cli`] over this process's own arguments.
    pub fn populate_std_args(
        &self,
        message: &mut DynamicMessage,
    ) -> Result<PopulateReport, PopulateErrorWithInput> {
        self.populate_cli(message, std::env::args().skip(1))
    }
}

struct Context<'input> {
    args: &'input [&'input str],
    index: usize,
    case_insensitive: bool,
    policy: ConversionPolicy,
    /// Byte offset of each arg in `flattened_args`.
    arg_indices: Vec<usize>,
    /// All args joined with single spaces. Error spans index into this.
    flattened_args: String,
}

impl<'input> Context<'input> {
    fn new(args: &'input [&'input str], case_insensitive: bool, policy: ConversionPolicy) -> Self {
        let mut arg_indices = Vec::with_capacity(args.len());
        let mut flattened_args = String::new();
        for arg in args {
            arg_indices.push(flattened_args.len());
            flattened_args.push_str(arg);
            flattened_args.push(' ');
        }
        tracing::trace!("flattened args: {flattened_args:?}");
        tracing::trace!("arg_indices: {arg_indices:?}");

        Self {
            args,
            index: 0,
            case_insensitive,
            policy,
            arg_indices,
            flattened_args,
        }
    }

    fn work_add_input(
        &mut self,
        message: &mut DynamicMessage,
    ) -> Result<PopulateReport, PopulateErrorWithInput> {
        self.work(message).map_err(|inner| PopulateErrorWithInput {
            inner,
            flattened_args: self.flattened_args.clone(),
        })
    }

    fn work(&mut self, message: &mut DynamicMessage) -> Result<PopulateReport, PopulateError> {
        let mut tokens = Vec::with_capacity(self.args.len());
        while self.index < self.args.len() {
            let raw = self.args[self.index];
            let outcome = self.apply_token(message, raw)?;
            tracing::trace!("token {}: {raw:?} -> {outcome}", self.index);
            tokens.push(TokenReport {
                index: self.index,
                raw: raw.to_owned(),
                outcome,
            });
            self.index += 1;
        }
        Ok(PopulateReport::new(tokens))
    }

    fn apply_token(
        &self,
        message: &mut DynamicMessage,
        raw: &str,
    ) -> Result<TokenOutcome, PopulateError> {
        let Some((key, value)) = split_token(raw) else {
            return Ok(TokenOutcome::NotKeyValue);
        };
        let value_span = Span::new(self.arg_indices[self.index] + key.len() + 1, value.len());

        let segments: Vec<&str> = key.split('.').collect();
        let Some((&last, parents)) = segments.split_last() else {
            // split always yields at least one segment
            unreachable!()
        };

        let mut current = message;
        for &segment in parents {
            let descriptor = Arc::clone(current.descriptor());
            let Some((field_index, field)) = self.resolve(&descriptor, segment) else {
                return Ok(TokenOutcome::UnknownField {
                    suggestion: closest_field(&descriptor, segment),
                });
            };
            if !field.kind().is_message() {
                return Ok(TokenOutcome::NotAMessage);
            }
            tracing::trace!("descending into `{}'", field.name());
            let Some(nested) = current.nested_message_mut(field_index) else {
                // resolve just confirmed the field is message-kind
                unreachable!()
            };
            current = nested;
        }

        let descriptor = Arc::clone(current.descriptor());
        let Some((field_index, field)) = self.resolve(&descriptor, last) else {
            return Ok(TokenOutcome::UnknownField {
                suggestion: closest_field(&descriptor, last),
            });
        };
        self.coerce(current, field_index, field, value, value_span)
    }

    fn resolve<'d>(
        &self,
        descriptor: &'d MessageDescriptor,
        key: &str,
    ) -> Option<(usize, &'d FieldDescriptor)> {
        if self.case_insensitive {
            descriptor.field_with_index_folded(key)
        } else {
            descriptor.field_with_index(key)
        }
    }

    fn coerce(
        &self,
        message: &mut DynamicMessage,
        field_index: usize,
        field: &FieldDescriptor,
        value: &str,
        value_span: Span,
    ) -> Result<TokenOutcome, PopulateError> {
        match field.kind() {
            Kind::Bool => {
                // Anything that is not true/1 writes an explicit false, so a
                // bool token always assigns its field.
                let truthy = matches!(value.to_ascii_lowercase().as_str(), "true" | "1");
                write_value(message, field_index, Value::Bool(truthy));
                Ok(TokenOutcome::Applied)
            }
            Kind::Int32 => {
                self.coerce_parsed(message, field_index, field, value, value_span, Value::I32)
            }
            Kind::Int64 => {
                self.coerce_parsed(message, field_index, field, value, value_span, Value::I64)
            }
            Kind::UInt32 => {
                self.coerce_parsed(message, field_index, field, value, value_span, Value::U32)
            }
            Kind::UInt64 => {
                self.coerce_parsed(message, field_index, field, value, value_span, Value::U64)
            }
            Kind::Float => {
                self.coerce_parsed(message, field_index, field, value, value_span, Value::F32)
            }
            Kind::Double => {
                self.coerce_parsed(message, field_index, field, value, value_span, Value::F64)
            }
            Kind::String => {
                write_value(message, field_index, Value::String(value.to_owned()));
                Ok(TokenOutcome::Applied)
            }
            Kind::Bytes => {
                write_value(
                    message,
                    field_index,
                    Value::Bytes(Bytes::copy_from_slice(value.as_bytes())),
                );
                Ok(TokenOutcome::Applied)
            }
            Kind::Enum(values) => {
                let chosen = values
                    .value(value)
                    .or_else(|| values.value(&value.to_ascii_lowercase()))
                    .or_else(|| values.value(&value.to_ascii_uppercase()))
                    .or_else(|| {
                        // Last resort: the bare tag number. A failed parse
                        // here is the final fallback missing its match, not a
                        // conversion error.
                        let number = value.parse::<i32>().ok()?;
                        values.value_by_number(number)
                    });
                match chosen {
                    Some(chosen) => {
                        let number = chosen.number();
                        write_value(message, field_index, Value::Enum(number));
                        Ok(TokenOutcome::Applied)
                    }
                    None => {
                        tracing::trace!(
                            "no value of `{}' matches {value:?}",
                            values.name()
                        );
                        Ok(TokenOutcome::EnumUnmatched)
                    }
                }
            }
            Kind::Message(_) => Ok(TokenOutcome::MessageNeedsPath),
            Kind::Group => Ok(TokenOutcome::GroupUnsupported),
        }
    }

    fn coerce_parsed<T: FromStr>(
        &self,
        message: &mut DynamicMessage,
        field_index: usize,
        field: &FieldDescriptor,
        value: &str,
        value_span: Span,
        wrap: fn(T) -> Value,
    ) -> Result<TokenOutcome, PopulateError>
    where
        T::Err: Display,
    {
        match value.parse::<T>() {
            Ok(parsed) => {
                write_value(message, field_index, wrap(parsed));
                Ok(TokenOutcome::Applied)
            }
            Err(err) => {
                tracing::trace!("`{}' rejects {value:?}: {err}", field.name());
                match self.policy {
                    ConversionPolicy::Fail => Err(PopulateError::new(
                        PopulateErrorKind::Conversion {
                            field: field.name().to_owned(),
                            kind: field.kind().name(),
                            detail: err.to_string(),
                        },
                        value_span,
                    )),
                    ConversionPolicy::Skip => Ok(TokenOutcome::ConversionFailed {
                        detail: err.to_string(),
                    }),
                }
            }
        }
    }
}

/// Writes a payload built from the field's own declared kind.
fn write_value(message: &mut DynamicMessage, index: usize, value: Value) {
    let Ok(()) = message.set(index, value) else {
        // the payload kind was taken from the field being written
        unreachable!()
    };
}

/// Splits `key=value` at the first `=`. A token with no `=`, or with `=` as
/// its first byte, is not a key=value token.
fn split_token(raw: &str) -> Option<(&str, &str)> {
    let pos = raw.find('=').filter(|pos| *pos > 0)?;
    Some((&raw[..pos], &raw[pos + 1..]))
}

#[test]
fn test_split_token() {
    assert_eq!(split_token("ababa"), None);
    assert_eq!(split_token("=bar"), None);
    assert_eq!(split_token("foo=bar"), Some(("foo", "bar")));
    assert_eq!(split_token("foo="), Some(("foo", "")));
    assert_eq!(split_token("a=b=c"), Some(("a", "b=c")));
}
