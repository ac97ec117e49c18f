// vim: tw=80
//! Argument matchers and their composition.
//!
//! A [`Matcher`] is a named predicate over a [`Value`]: it reports whether
//! a value satisfies it, optionally declares the value kind it accepts
//! (consulted when a [`MethodMatcher`] is built against a method
//! signature), and renders itself for error messages.
//!
//! Composition: [`and_m`]/[`or_m`] short-circuit and render as
//! parenthesized infix (`(A & B)`, `(A | B)`); the zero-clause forms have
//! defined identities — an empty AND is logically true and renders as
//! `"true"`, an empty OR is logically false and renders as `"false"`.

use std::fmt;
use std::sync::{Arc, Mutex};

use predicates::prelude::Predicate;
use regex::Regex;

use crate::call::MethodCall;
use crate::descriptor::MethodDescriptor;
use crate::error::UsageError;
use crate::value::{Value, ValueType};

/// A named predicate over a single argument value.
pub trait Matcher: fmt::Display + Send + Sync {
    fn matches(&self, value: &Value) -> bool;

    /// The value kind this matcher accepts, or `None` when it is
    /// kind-agnostic.  Checked against the declared parameter kind when
    /// the matcher is bound to a method signature.
    fn accepted_type(&self) -> Option<ValueType> {
        None
    }
}

/// A boxed matcher, as stored in a [`MethodMatcher`].
pub type ArgMatcher = Box<dyn Matcher>;

/// The kinds a declared parameter of kind `wide` admits from a matcher,
/// including one-directional numeric widening: a narrower actual kind
/// unifies with a wider declared kind, never the reverse.
fn widened_sources(wide: ValueType) -> &'static [ValueType] {
    match wide {
        ValueType::Long => &[ValueType::Long, ValueType::Int],
        ValueType::Float => &[ValueType::Float, ValueType::Double],
        ValueType::Short => &[ValueType::Short, ValueType::Int],
        ValueType::Byte => &[ValueType::Byte, ValueType::Int],
        ValueType::Bool => &[ValueType::Bool],
        ValueType::Int => &[ValueType::Int],
        ValueType::Double => &[ValueType::Double],
        ValueType::Void => &[],
        ValueType::Str => &[ValueType::Str],
        ValueType::List => &[ValueType::List],
        ValueType::Set => &[ValueType::Set],
        ValueType::Map => &[ValueType::Map],
    }
}

struct EqMatcher {
    expected: Value,
}

impl Matcher for EqMatcher {
    fn matches(&self, value: &Value) -> bool {
        *value == self.expected
    }

    fn accepted_type(&self) -> Option<ValueType> {
        self.expected.kind()
    }
}

impl fmt::Display for EqMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expected)
    }
}

/// Matches a value equal to `expected`.
pub fn eq_m(expected: Value) -> ArgMatcher {
    Box::new(EqMatcher { expected })
}

struct AnyMatcher;

impl Matcher for AnyMatcher {
    fn matches(&self, _value: &Value) -> bool {
        true
    }
}

impl fmt::Display for AnyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<any>")
    }
}

/// Matches any value, including null.
pub fn any_m() -> ArgMatcher {
    Box::new(AnyMatcher)
}

struct ClassMatcher {
    primary: ValueType,
    accepts: &'static [ValueType],
}

impl Matcher for ClassMatcher {
    fn matches(&self, value: &Value) -> bool {
        match value.kind() {
            Some(k) => self.accepts.contains(&k),
            // Null is not an instance of any kind.
            None => false,
        }
    }

    fn accepted_type(&self) -> Option<ValueType> {
        Some(self.primary)
    }
}

impl fmt::Display for ClassMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .accepts
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "<any:{names}>")
    }
}

/// Matches any non-null value of exactly the given kind.
pub fn type_m(kind: ValueType) -> ArgMatcher {
    Box::new(ClassMatcher {
        primary: kind,
        accepts: widened_sources(kind),
    })
}

/// Matches any `Int`.
pub fn any_int() -> ArgMatcher {
    type_m(ValueType::Int)
}

/// Matches any `Long`, also accepting an `Int` value (numeric widening).
pub fn any_long() -> ArgMatcher {
    type_m(ValueType::Long)
}

/// Matches any `Short`, also accepting an `Int` value.
pub fn any_short() -> ArgMatcher {
    type_m(ValueType::Short)
}

/// Matches any `Byte`, also accepting an `Int` value.
pub fn any_byte() -> ArgMatcher {
    type_m(ValueType::Byte)
}

/// Matches any `Float`, also accepting a `Double` value.
pub fn any_float() -> ArgMatcher {
    type_m(ValueType::Float)
}

/// Matches any `Double`.
pub fn any_double() -> ArgMatcher {
    type_m(ValueType::Double)
}

/// Matches any `Bool`.
pub fn any_bool() -> ArgMatcher {
    type_m(ValueType::Bool)
}

/// Matches any string.
pub fn any_str() -> ArgMatcher {
    type_m(ValueType::Str)
}

struct RegexMatcher {
    // Anchored form of `pattern`; the raw pattern is kept for rendering.
    re: Regex,
    pattern: String,
}

impl Matcher for RegexMatcher {
    fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Str(s) => self.re.is_match(s),
            _ => false,
        }
    }

    fn accepted_type(&self) -> Option<ValueType> {
        Some(ValueType::Str)
    }
}

impl fmt::Display for RegexMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "regexp(\"{}\")", self.pattern)
    }
}

/// Matches strings that match `pattern` in its entirety.
///
/// An invalid pattern is a usage error.
pub fn regexp_m(pattern: &str) -> Result<ArgMatcher, UsageError> {
    let re = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
        UsageError::new(format!("Invalid regex pattern \"{pattern}\": {e}"))
    })?;
    Ok(Box::new(RegexMatcher {
        re,
        pattern: pattern.to_owned(),
    }))
}

/// Matches strings containing `substring`.  Renders as
/// `regexp(".*substring.*")`, with regex metacharacters escaped.
pub fn contains_m(substring: &str) -> ArgMatcher {
    let pattern = format!(".*{}.*", regex::escape(substring));
    let re = Regex::new(&format!("^(?:{pattern})$"))
        .expect("escaped pattern is always valid");
    Box::new(RegexMatcher { re, pattern })
}

struct AndMatcher {
    clauses: Vec<ArgMatcher>,
}

impl Matcher for AndMatcher {
    fn matches(&self, value: &Value) -> bool {
        self.clauses.iter().all(|m| m.matches(value))
    }
}

impl fmt::Display for AndMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            // Identity of AND.
            return f.write_str("true");
        }
        let body = self
            .clauses
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" & ");
        write!(f, "({body})")
    }
}

/// Matches values satisfying every clause.  `and_m(vec![])` matches
/// everything and renders as `"true"`.
pub fn and_m(clauses: Vec<ArgMatcher>) -> ArgMatcher {
    Box::new(AndMatcher { clauses })
}

struct OrMatcher {
    clauses: Vec<ArgMatcher>,
}

impl Matcher for OrMatcher {
    fn matches(&self, value: &Value) -> bool {
        self.clauses.iter().any(|m| m.matches(value))
    }
}

impl fmt::Display for OrMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.clauses.is_empty() {
            // Identity of OR.
            return f.write_str("false");
        }
        let body = self
            .clauses
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" | ");
        write!(f, "({body})")
    }
}

/// Matches values satisfying at least one clause.  `or_m(vec![])`
/// matches nothing and renders as `"false"`.
pub fn or_m(clauses: Vec<ArgMatcher>) -> ArgMatcher {
    Box::new(OrMatcher { clauses })
}

struct NotMatcher {
    inner: ArgMatcher,
}

impl Matcher for NotMatcher {
    fn matches(&self, value: &Value) -> bool {
        !self.inner.matches(value)
    }

    fn accepted_type(&self) -> Option<ValueType> {
        self.inner.accepted_type()
    }
}

impl fmt::Display for NotMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not({})", self.inner)
    }
}

/// Inverts a matcher.
pub fn not_m(inner: ArgMatcher) -> ArgMatcher {
    Box::new(NotMatcher { inner })
}

struct PredMatcher {
    pred: Box<dyn Predicate<Value> + Send + Sync>,
}

impl Matcher for PredMatcher {
    fn matches(&self, value: &Value) -> bool {
        self.pred.eval(value)
    }
}

impl fmt::Display for PredMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pred)
    }
}

/// Wraps any [`predicates`] crate predicate over [`Value`] as a matcher.
pub fn pred_m<P>(pred: P) -> ArgMatcher
where
    P: Predicate<Value> + Send + Sync + 'static,
{
    Box::new(PredMatcher {
        pred: Box::new(pred),
    })
}

/// An externally-owned, single-use capture slot.
///
/// A captor's matcher records the last value it evaluated so the test can
/// extract an actual call argument afterwards.  The slot is single-use:
/// [`Captor::take`] yields the value once and `None` thereafter.  It is
/// not meant to be shared across threads within one assertion.
#[derive(Clone, Default)]
pub struct Captor {
    slot: Arc<Mutex<Option<Value>>>,
}

impl Captor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A matcher that captures every evaluated value and matches any.
    pub fn matcher(&self) -> ArgMatcher {
        self.capturing(any_m())
    }

    /// A matcher that captures every evaluated value and delegates the
    /// match decision.
    pub fn capturing(&self, delegate: ArgMatcher) -> ArgMatcher {
        Box::new(CaptureMatcher {
            slot: self.slot.clone(),
            delegate,
        })
    }

    /// Extract the captured value.  Single-use: a second call returns
    /// `None` until the matcher evaluates another value.
    pub fn take(&self) -> Option<Value> {
        self.slot.lock().unwrap().take()
    }
}

struct CaptureMatcher {
    slot: Arc<Mutex<Option<Value>>>,
    delegate: ArgMatcher,
}

impl Matcher for CaptureMatcher {
    fn matches(&self, value: &Value) -> bool {
        *self.slot.lock().unwrap() = Some(value.clone());
        self.delegate.matches(value)
    }

    fn accepted_type(&self) -> Option<ValueType> {
        self.delegate.accepted_type()
    }
}

impl fmt::Display for CaptureMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "capture({})", self.delegate)
    }
}

/// A method identity bound to one matcher per parameter.
pub struct MethodMatcher {
    method: Arc<MethodDescriptor>,
    matchers: Vec<ArgMatcher>,
}

impl MethodMatcher {
    /// Bind `matchers` to `method`.  The matcher count must equal the
    /// method's arity, and each matcher's accepted kind (when declared)
    /// must unify with the corresponding parameter kind.
    pub fn new(
        method: Arc<MethodDescriptor>,
        matchers: Vec<ArgMatcher>,
    ) -> Result<Self, UsageError> {
        if matchers.len() != method.arity() {
            return Err(UsageError::new(format!(
                "Expected {} argument matchers for {} but got {}",
                method.arity(),
                method.name(),
                matchers.len()
            )));
        }
        for (i, (m, param)) in
            matchers.iter().zip(method.params()).enumerate()
        {
            if let Some(accepted) = m.accepted_type() {
                if !widened_sources(*param).contains(&accepted) {
                    return Err(UsageError::new(format!(
                        "Argument {} of {} is declared as {} but the \
                         matcher accepts {}",
                        i,
                        method.name(),
                        param,
                        accepted
                    )));
                }
            }
        }
        Ok(MethodMatcher { method, matchers })
    }

    pub fn method(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }

    /// Whether a recorded call has this method identity and an argument
    /// vector satisfying every bound matcher.
    pub fn matches(&self, call: &MethodCall) -> bool {
        call.method().name() == self.method.name()
            && call
                .args()
                .iter()
                .zip(&self.matchers)
                .all(|(arg, m)| m.matches(arg))
    }
}

impl fmt::Display for MethodMatcher {
    /// Renders as `method(matcher, ...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self
            .matchers
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}({})", self.method.name(), args)
    }
}
