//! The fatal-failure side of population. Per-token skips are not errors;
//! they are reported as [`crate::TokenOutcome`] values.

use core::fmt;

use miette::{Diagnostic, LabeledSpan};

use crate::span::Span;

/// A populate failure with the flattened input attached, so that it can be
/// formatted nicely.
#[derive(Debug)]
pub struct PopulateErrorWithInput {
    /// The inner error.
    pub(crate) inner: PopulateError,

    /// All input tokens joined by a space.
    pub(crate) flattened_args: String,
}

impl PopulateErrorWithInput {
    /// The error itself, spanned into [`PopulateErrorWithInput::input`].
    pub fn inner(&self) -> &PopulateError {
        &self.inner
    }

    /// The flattened input the error's span indexes into.
    pub fn input(&self) -> &str {
        &self.flattened_args
    }
}

impl fmt::Display for PopulateErrorWithInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not populate the message from arguments")
    }
}

impl core::error::Error for PopulateErrorWithInput {}

impl Diagnostic for PopulateErrorWithInput {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        None
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        None
    }

    fn url<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        None
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.flattened_args)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        Some(Box::new(core::iter::once(LabeledSpan::new(
            Some(self.inner.kind.to_string()),
            self.inner.span.start,
            self.inner.span.len(),
        ))))
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        None
    }

    fn diagnostic_source(&self) -> Option<&dyn Diagnostic> {
        None
    }
}

/// A populate failure (without the input attached).
#[derive(Debug, Clone)]
pub struct PopulateError {
    /// Where the offending value sits in the flattened input.
    pub span: Span,

    /// The specific failure.
    pub kind: PopulateErrorKind,
}

impl PopulateError {
    /// Creates a new populate error.
    pub fn new(kind: PopulateErrorKind, span: Span) -> Self {
        Self { span, kind }
    }
}

impl fmt::Display for PopulateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.kind,
            self.span.start,
            self.span.start + self.span.len()
        )
    }
}

impl core::error::Error for PopulateError {}

/// The failures that abort a populate pass.
///
/// Everything recoverable is reported per token instead; see
/// [`crate::TokenOutcome`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum PopulateErrorKind {
    /// A value could not be converted to the field's declared kind, and the
    /// conversion policy said to abort.
    Conversion {
        /// The resolved field's declared name.
        field: String,
        /// The declared kind's name.
        kind: &'static str,
        /// The parse failure text.
        detail: String,
    },
}

impl fmt::Display for PopulateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopulateErrorKind::Conversion {
                field,
                kind,
                detail,
            } => {
                write!(f, "invalid {kind} value for field `{field}': {detail}")
            }
        }
    }
}
