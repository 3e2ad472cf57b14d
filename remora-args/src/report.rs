//! Per-token accounting of a populate pass.

use core::fmt;

use remora_core::MessageDescriptor;

/// What a populate pass did with one input token.
///
/// Only [`TokenOutcome::Applied`] wrote a field. Everything else recorded a
/// skip; none of these are errors, because the contract is best-effort per
/// token. The one fatal condition, a failed numeric conversion under
/// [`crate::ConversionPolicy::Fail`], aborts the pass instead of producing
/// an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TokenOutcome {
    /// The value was coerced and written into the addressed field.
    ///
    /// For bool fields this covers garbage values too: anything that is not
    /// `true`/`1` writes an explicit `false`.
    Applied,
    /// The token has no `=` past its first byte. A leading `=` counts as
    /// missing, matching the tools this format comes from.
    NotKeyValue,
    /// A key segment named no field of the message it was resolved against.
    UnknownField {
        /// The closest declared field name, when one is close enough to
        /// look like a typo.
        suggestion: Option<String>,
    },
    /// An interior segment of a dotted key resolved to a field that is not
    /// message-kind, so there is nothing to descend into.
    NotAMessage,
    /// The key stopped at a message-kind field; a dotted path to one of its
    /// fields is needed.
    MessageNeedsPath,
    /// Group-kind fields are never populated.
    GroupUnsupported,
    /// No symbolic or numeric enumeration value matched; the field keeps
    /// its prior value.
    EnumUnmatched,
    /// The value failed its numeric conversion and the policy said to
    /// continue.
    ConversionFailed {
        /// The parse failure text.
        detail: String,
    },
}

impl fmt::Display for TokenOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenOutcome::Applied => write!(f, "applied"),
            TokenOutcome::NotKeyValue => write!(f, "not a key=value token"),
            TokenOutcome::UnknownField {
                suggestion: Some(suggestion),
            } => {
                write!(f, "unknown field (did you mean `{suggestion}'?)")
            }
            TokenOutcome::UnknownField { suggestion: None } => write!(f, "unknown field"),
            TokenOutcome::NotAMessage => {
                write!(f, "path segment does not name a message field")
            }
            TokenOutcome::MessageNeedsPath => {
                write!(f, "message field needs a dotted path to one of its fields")
            }
            TokenOutcome::GroupUnsupported => write!(f, "group fields are not populated"),
            TokenOutcome::EnumUnmatched => write!(f, "no enumeration value matched"),
            TokenOutcome::ConversionFailed { detail } => {
                write!(f, "conversion failed: {detail}")
            }
        }
    }
}

/// One input token and what the populate pass did with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReport {
    /// Position of the token in the input sequence.
    pub index: usize,

    /// The raw token text, after any `--` stripping.
    pub raw: String,

    /// What happened.
    pub outcome: TokenOutcome,
}

/// Everything a populate pass did, one record per token, in application
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateReport {
    tokens: Vec<TokenReport>,
}

impl PopulateReport {
    pub(crate) fn new(tokens: Vec<TokenReport>) -> Self {
        Self { tokens }
    }

    /// Per-token records, in application order.
    pub fn tokens(&self) -> &[TokenReport] {
        &self.tokens
    }

    /// How many tokens wrote a field.
    pub fn applied(&self) -> usize {
        self.tokens
            .iter()
            .filter(|token| matches!(token.outcome, TokenOutcome::Applied))
            .count()
    }

    /// How many tokens were recorded without writing anything.
    pub fn skipped(&self) -> usize {
        self.tokens.len() - self.applied()
    }

    /// Whether every token was applied.
    pub fn is_clean(&self) -> bool {
        self.skipped() == 0
    }
}

/// The declared field name closest to `key`, when something scores above the
/// similarity floor.
pub(crate) fn closest_field(descriptor: &MessageDescriptor, key: &str) -> Option<String> {
    const SIMILARITY_THRESHOLD: f64 = 0.6;

    let mut best_match: Option<(&str, f64)> = None;
    for field in descriptor.fields() {
        let similarity = strsim::jaro_winkler(key, field.name());
        if similarity >= SIMILARITY_THRESHOLD
            && best_match.is_none_or(|(_, best)| similarity > best)
        {
            best_match = Some((field.name(), similarity));
        }
    }
    best_match.map(|(name, _)| name.to_owned())
}

#[test]
fn test_closest_field() {
    use remora_core::Kind;

    let schema = MessageDescriptor::builder("Config")
        .field("port", Kind::UInt32)
        .field("hostname", Kind::String)
        .build()
        .unwrap();

    assert_eq!(closest_field(&schema, "prot"), Some("port".to_owned()));
    assert_eq!(closest_field(&schema, "hostnme"), Some("hostname".to_owned()));
    assert_eq!(closest_field(&schema, "zzz"), None);
}
