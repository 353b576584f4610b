//! Declarative Validation Rules
//!
//! The rule vocabulary used by every endpoint rule set. Each rule is a variant
//! of [`Rule`] and is evaluated against a single field of a request, with the
//! whole field map available for cross-field checks. Rules never stop one
//! another: the engine runs every applicable check and collects one
//! [`ValidationError`] per failing check.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

static NUMERIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?([0-9]*[.])?[0-9]+$").expect("numeric regex is valid"));

/// Validation result type for composable validation chains
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A single rule violation: the offending field and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationError {
    /// Creates a ValidationError with the provided field name, error code, and message.
    ///
    /// # Examples
    ///
    /// ```
    /// let err = ValidationError::new("username", "REQUIRED", "Username is required");
    /// assert_eq!(err.field, "username");
    /// assert_eq!(err.code, "REQUIRED");
    /// ```
    pub fn new(field: &str, code: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Core validation rule trait
pub trait ValidationRule<T> {
    fn validate(&self, value: &T, field_name: &str) -> ValidationResult<()>;
}

/// The value under validation together with its sibling fields.
#[derive(Debug, Clone, Copy)]
pub struct FieldInput<'a> {
    pub value: Option<&'a Value>,
    pub fields: &'a Map<String, Value>,
}

impl<'a> FieldInput<'a> {
    pub fn new(field_name: &str, fields: &'a Map<String, Value>) -> Self {
        Self {
            value: fields.get(field_name),
            fields,
        }
    }

    /// A field is present when its key exists with a non-null value.
    pub fn is_present(&self) -> bool {
        !matches!(self.value, None | Some(Value::Null))
    }

    fn text(&self) -> Cow<'a, str> {
        value_text(self.value)
    }
}

/// Renders a request value the way a string-based validator sees it.
///
/// Absent and `null` values read as the empty string; numbers and booleans
/// read as their literal text.
pub fn value_text(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(Value::Bool(b)) => Cow::Owned(b.to_string()),
        Some(Value::Array(items)) => Cow::Owned(
            items
                .iter()
                .map(|item| value_text(Some(item)).into_owned())
                .join(","),
        ),
        Some(other @ Value::Object(_)) => Cow::Owned(other.to_string()),
    }
}

/// Reads a request value as an integer.
///
/// JSON numbers must be whole; strings must parse as a signed integer.
pub fn integer_value(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok().filter(|_| !s.trim().is_empty()),
        _ => None,
    }
}

/// Reads the leading integer of a request value's text.
///
/// Leading whitespace and one sign are skipped, then digits are read up to the
/// first non-digit. No digits at all reads as `None`.
pub fn leading_integer_value(value: Option<&Value>) -> Option<i64> {
    let text = value_text(value);
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let magnitude = digits.parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Reads a request value as a number (integer or decimal).
pub fn numeric_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if NUMERIC_REGEX.is_match(s) => s.parse::<f64>().ok(),
        _ => None,
    }
}

/// Parses an ISO-8601 calendar date or date-time into its calendar date.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 date-times and offset-less date-times.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// The rule vocabulary.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Absent fields skip every other check on the same field.
    Optional,
    /// Fails when the field is absent or the empty string.
    Required,
    /// Fails when the field holds anything but letters (the empty string included).
    Alphabetic,
    /// Fails when the rendered text is shorter than `n` characters.
    MinLength(usize),
    /// Fails when the pattern finds no match in the rendered text.
    Matches(Regex),
    /// Fails when the field is not an integer, or is below `min`.
    Integer { min: Option<i64> },
    /// Fails when the field is not a number.
    Numeric,
    /// Fails when the field is not a JSON string.
    Text,
    /// Fails when the field is not one of the allowed values.
    OneOf(&'static [&'static str]),
    /// Fails when the field is not an ISO-8601 date.
    Date,
    /// Fails when this date is not strictly after the date held by another field.
    After(&'static str),
}

impl Rule {
    /// Stable machine-readable code reported with each violation.
    pub fn code(&self) -> &'static str {
        match self {
            Rule::Optional => "OPTIONAL",
            Rule::Required => "REQUIRED",
            Rule::Alphabetic => "NOT_ALPHABETIC",
            Rule::MinLength(_) => "TOO_SHORT",
            Rule::Matches(_) => "PATTERN_MISMATCH",
            Rule::Integer { .. } => "NOT_INTEGER",
            Rule::Numeric => "NOT_NUMERIC",
            Rule::Text => "NOT_STRING",
            Rule::OneOf(_) => "INVALID_VALUE",
            Rule::Date => "INVALID_DATE",
            Rule::After(_) => "NOT_AFTER",
        }
    }

    /// Message used when a check carries no message of its own.
    pub fn default_message(&self, field_name: &str) -> String {
        match self {
            Rule::Optional => format!("{} is optional", field_name),
            Rule::Required => format!("{} is required", field_name),
            Rule::Alphabetic => format!("{} must contain only letters", field_name),
            Rule::MinLength(min) => format!("{} must be at least {} characters", field_name, min),
            Rule::Matches(re) => format!("{} must match {}", field_name, re.as_str()),
            Rule::Integer { min: Some(min) } => {
                format!("{} must be an integer of at least {}", field_name, min)
            }
            Rule::Integer { min: None } => format!("{} must be an integer", field_name),
            Rule::Numeric => format!("{} must be numeric", field_name),
            Rule::Text => format!("{} must be a string", field_name),
            Rule::OneOf(allowed) => {
                format!("{} must be one of: {}", field_name, allowed.join(", "))
            }
            Rule::Date => format!("{} must be a valid date", field_name),
            Rule::After(other) => format!("{} must be after {}", field_name, other),
        }
    }

    fn passes(&self, input: &FieldInput<'_>) -> bool {
        match self {
            Rule::Optional => true,
            Rule::Required => !input.text().is_empty(),
            Rule::Alphabetic => {
                let text = input.text();
                !text.is_empty() && text.chars().all(|c| c.is_ascii_alphabetic())
            }
            Rule::MinLength(min) => input.text().chars().count() >= *min,
            Rule::Matches(re) => re.is_match(&input.text()),
            Rule::Integer { min } => integer_value(input.value)
                .is_some_and(|n| min.map_or(true, |min| n >= min)),
            Rule::Numeric => numeric_value(input.value).is_some(),
            Rule::Text => matches!(input.value, Some(Value::String(_))),
            Rule::OneOf(allowed) => allowed.contains(&input.text().as_ref()),
            Rule::Date => parse_iso_date(&input.text()).is_some(),
            Rule::After(other) => {
                let this = parse_iso_date(&input.text());
                let other = parse_iso_date(&value_text(input.fields.get(*other)));
                // Unparseable dates are reported by `Rule::Date`, not here.
                match (this, other) {
                    (Some(this), Some(other)) => this > other,
                    _ => true,
                }
            }
        }
    }
}

impl<'a> ValidationRule<FieldInput<'a>> for Rule {
    fn validate(&self, value: &FieldInput<'a>, field_name: &str) -> ValidationResult<()> {
        if self.passes(value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                field_name,
                self.code(),
                &self.default_message(field_name),
            ))
        }
    }
}

/// A rule paired with the message reported when it fails.
#[derive(Debug, Clone)]
pub struct Check {
    pub rule: Rule,
    pub message: Option<&'static str>,
}

impl Check {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            message: None,
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl From<Rule> for Check {
    fn from(rule: Rule) -> Self {
        Check::new(rule)
    }
}

impl<'a> ValidationRule<FieldInput<'a>> for Check {
    fn validate(&self, value: &FieldInput<'a>, field_name: &str) -> ValidationResult<()> {
        self.rule.validate(value, field_name).map_err(|mut error| {
            if let Some(message) = self.message {
                error.message = message.to_string();
            }
            error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(rule: Rule, value: Value) -> bool {
        let fields = match json!({ "field": value }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        rule.validate(&FieldInput::new("field", &fields), "field")
            .is_ok()
    }

    fn check_absent(rule: Rule) -> bool {
        let fields = Map::new();
        rule.validate(&FieldInput::new("field", &fields), "field")
            .is_ok()
    }

    #[test]
    fn test_required() {
        assert!(check(Rule::Required, json!("value")));
        assert!(check(Rule::Required, json!(0)));
        assert!(!check(Rule::Required, json!("")));
        assert!(!check(Rule::Required, Value::Null));
        assert!(!check_absent(Rule::Required));
    }

    #[test]
    fn test_alphabetic() {
        assert!(check(Rule::Alphabetic, json!("Test")));
        assert!(!check(Rule::Alphabetic, json!("Zoë")));
        assert!(!check(Rule::Alphabetic, json!("Test1")));
        assert!(!check(Rule::Alphabetic, json!("O'Neil")));
        assert!(!check(Rule::Alphabetic, json!("Mary Ann")));
        assert!(!check(Rule::Alphabetic, json!("")));
    }

    #[test]
    fn test_min_length_counts_characters() {
        assert!(check(Rule::MinLength(8), json!("Test1234")));
        assert!(!check(Rule::MinLength(8), json!("Test123")));
        assert!(!check_absent(Rule::MinLength(1)));
    }

    #[test]
    fn test_matches_searches_anywhere() {
        let rule = Rule::Matches(Regex::new("[0-9]").expect("regex"));
        assert!(check(rule.clone(), json!("abc1def")));
        assert!(!check(rule, json!("abcdef")));
    }

    #[test]
    fn test_integer() {
        assert!(check(Rule::Integer { min: None }, json!(42)));
        assert!(check(Rule::Integer { min: None }, json!("42")));
        assert!(check(Rule::Integer { min: None }, json!("-3")));
        assert!(check(Rule::Integer { min: None }, json!(7.0)));
        assert!(!check(Rule::Integer { min: None }, json!(7.5)));
        assert!(!check(Rule::Integer { min: None }, json!("7.5")));
        assert!(!check(Rule::Integer { min: None }, json!("abc")));
        assert!(!check(Rule::Integer { min: None }, json!("")));
        assert!(!check(Rule::Integer { min: None }, Value::Null));
    }

    #[test]
    fn test_integer_minimum() {
        assert!(check(Rule::Integer { min: Some(0) }, json!("0")));
        assert!(check(Rule::Integer { min: Some(0) }, json!("10")));
        assert!(!check(Rule::Integer { min: Some(0) }, json!("-1")));
    }

    #[test]
    fn test_numeric() {
        assert!(check(Rule::Numeric, json!(10)));
        assert!(check(Rule::Numeric, json!(10.5)));
        assert!(check(Rule::Numeric, json!("10.5")));
        assert!(check(Rule::Numeric, json!("-.5")));
        assert!(!check(Rule::Numeric, json!("ten")));
        assert!(!check(Rule::Numeric, json!("1e5")));
        assert!(!check(Rule::Numeric, json!(true)));
    }

    #[test]
    fn test_text() {
        assert!(check(Rule::Text, json!("name")));
        assert!(check(Rule::Text, json!("")));
        assert!(!check(Rule::Text, json!(3)));
        assert!(!check_absent(Rule::Text));
    }

    #[test]
    fn test_one_of() {
        const ORDERS: &[&str] = &["asc", "desc"];
        assert!(check(Rule::OneOf(ORDERS), json!("asc")));
        assert!(!check(Rule::OneOf(ORDERS), json!("ASC")));
        assert!(!check(Rule::OneOf(ORDERS), json!("sideways")));
    }

    #[test]
    fn test_date() {
        assert!(check(Rule::Date, json!("2023-01-31")));
        assert!(check(Rule::Date, json!("2023-01-31T10:00:00Z")));
        assert!(check(Rule::Date, json!("2023-01-31T10:00:00")));
        assert!(!check(Rule::Date, json!("2023-02-30")));
        assert!(!check(Rule::Date, json!("31/01/2023")));
        assert!(!check(Rule::Date, json!("")));
    }

    #[test]
    fn test_after_is_strict() {
        let fields = match json!({ "start_date": "2023-01-10", "end_date": "2023-01-10" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let rule = Rule::After("start_date");
        let same_day = rule.validate(&FieldInput::new("end_date", &fields), "end_date");
        assert_eq!(same_day.unwrap_err().code, "NOT_AFTER");

        let fields = match json!({ "start_date": "2023-01-10", "end_date": "2023-01-11" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert!(rule
            .validate(&FieldInput::new("end_date", &fields), "end_date")
            .is_ok());
    }

    #[test]
    fn test_after_ignores_unparseable_counterpart() {
        let fields = match json!({ "end_date": "2023-01-11" }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert!(Rule::After("start_date")
            .validate(&FieldInput::new("end_date", &fields), "end_date")
            .is_ok());
    }

    #[test]
    fn test_check_message_overrides_default() {
        let fields = Map::new();
        let input = FieldInput::new("username", &fields);

        let default = Check::new(Rule::Required).validate(&input, "username");
        assert_eq!(default.unwrap_err().message, "username is required");

        let custom = Check::new(Rule::Required)
            .with_message("Username is required")
            .validate(&input, "username");
        assert_eq!(custom.unwrap_err().message, "Username is required");
    }

    #[test]
    fn test_value_text_rendering() {
        assert_eq!(value_text(None), "");
        assert_eq!(value_text(Some(&Value::Null)), "");
        assert_eq!(value_text(Some(&json!(12))), "12");
        assert_eq!(value_text(Some(&json!(["a", 1]))), "a,1");
    }
}
