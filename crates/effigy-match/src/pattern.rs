//! Polymorphic argument patterns.
//!
//! A pattern is constructed ad hoc per query call and dispatches on its
//! own kind, never on the observed value:
//!
//! ```text
//! Any            ← matches every observed value
//! Regex          ← substring match against a text value
//! Seq            ← pairwise match against a sequence, order-sensitive
//! Predicate      ← arbitrary check over the observed value
//! Literal        ← structural equality
//! ```
//!
//! Matching has no side effects and no failure mode: an unmatchable
//! comparison is `false`, not an error. Only construction can fail
//! (an invalid regular expression).

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Predicate form: an arbitrary check over the observed value.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// An expected-argument pattern.
#[derive(Clone)]
pub enum Pattern {
    /// The universal wildcard.
    Any,

    /// Succeeds when the observed value is text and the pattern occurs
    /// anywhere within it. Non-text values never match.
    Regex(Regex),

    /// Succeeds when the observed value is a sequence of the same length
    /// and every position matches pairwise.
    Seq(Vec<Pattern>),

    /// Succeeds when the check returns true for the observed value.
    Predicate(Predicate),

    /// Succeeds on structural equality with the observed value.
    Literal(Value),
}

/// The wildcard pattern, usable anywhere an expected argument is accepted.
pub const ANYTHING: Pattern = Pattern::Any;

impl Pattern {
    /// Compile a regular-expression pattern.
    ///
    /// Construction may fail; matching never does.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Regex(Regex::new(pattern)?))
    }

    /// A literal-equality pattern.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// A predicate pattern from any check over the observed value.
    pub fn predicate(check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(check))
    }

    /// An ordered sequence of sub-patterns.
    pub fn seq(patterns: impl IntoIterator<Item = Pattern>) -> Self {
        Self::Seq(patterns.into_iter().collect())
    }
}

impl From<Regex> for Pattern {
    fn from(re: Regex) -> Self {
        Self::Regex(re)
    }
}

impl From<Value> for Pattern {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Any => write!(f, "Any"),
            Pattern::Regex(re) => write!(f, "Regex({:?})", re.as_str()),
            Pattern::Seq(patterns) => f.debug_tuple("Seq").field(patterns).finish(),
            Pattern::Predicate(_) => write!(f, "Predicate(..)"),
            Pattern::Literal(value) => write!(f, "Literal({value})"),
        }
    }
}

/// Decide whether an observed value satisfies an expected pattern.
pub fn matches(expected: &Pattern, observed: &Value) -> bool {
    match expected {
        Pattern::Any => true,
        Pattern::Regex(re) => observed.as_str().is_some_and(|text| re.is_match(text)),
        Pattern::Seq(patterns) => observed
            .as_array()
            .is_some_and(|items| matches_all(patterns, items)),
        Pattern::Predicate(check) => check(observed),
        Pattern::Literal(value) => value == observed,
    }
}

/// The sequence rule applied to an argument tuple: length equality plus a
/// pairwise match at every position.
pub fn matches_all(patterns: &[Pattern], tuple: &[Value]) -> bool {
    patterns.len() == tuple.len()
        && patterns
            .iter()
            .zip(tuple)
            .all(|(pattern, value)| matches(pattern, value))
}
