//! Uniform field access over JSON bodies and query strings.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::{
    error::{ServiceError, ServiceResult},
    functional::{
        validation_engine::{RuleSet, ValidationEngine},
        validation_rules::{integer_value, leading_integer_value, numeric_value, value_text},
    },
};

static ENGINE: Lazy<ValidationEngine> = Lazy::new(ValidationEngine::new);

/// The fields of one request, as read by the validation engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestFields(Map<String, Value>);

impl RequestFields {
    /// Reads a JSON body. Bodies that are not JSON objects carry no fields.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(map)) => Self(map),
            Ok(_) => Self::default(),
            Err(e) => {
                if !body.is_empty() {
                    log::debug!("Ignoring unparseable request body: {}", e);
                }
                Self::default()
            }
        }
    }

    pub fn from_query(query: &HashMap<String, String>) -> Self {
        Self(
            query
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect(),
        )
    }

    /// The field as text; absent and `null` read as the empty string.
    pub fn text(&self, field: &str) -> Cow<'_, str> {
        value_text(self.0.get(field))
    }

    /// The field as text, or `None` when absent or `null`.
    pub fn text_opt(&self, field: &str) -> Option<String> {
        match self.0.get(field) {
            None | Some(Value::Null) => None,
            value => Some(value_text(value).into_owned()),
        }
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        integer_value(self.0.get(field))
    }

    /// The integer prefix of the field's text, so `"7.5"` and `"10abc"` read
    /// as 7 and 10.
    pub fn leading_integer(&self, field: &str) -> Option<i64> {
        leading_integer_value(self.0.get(field))
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        numeric_value(self.0.get(field))
    }

    /// Runs `rule_set` over these fields, failing with the full violation list.
    pub fn validate(&self, rule_set: &RuleSet) -> ServiceResult<()> {
        ENGINE
            .validate(rule_set, &self.0)
            .into_result()
            .map_err(ServiceError::validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_object() {
        let fields = RequestFields::from_body(br#"{"username":"bob","kills":3}"#);
        assert_eq!(fields.text("username"), "bob");
        assert_eq!(fields.integer("kills"), Some(3));
    }

    #[test]
    fn test_from_body_non_object_or_garbage_is_empty() {
        assert_eq!(RequestFields::from_body(b"[1,2]"), RequestFields::default());
        assert_eq!(RequestFields::from_body(b"not json"), RequestFields::default());
        assert_eq!(RequestFields::from_body(b""), RequestFields::default());
    }

    #[test]
    fn test_from_query_values_are_strings() {
        let mut query = HashMap::new();
        query.insert("limit".to_string(), "10".to_string());
        let fields = RequestFields::from_query(&query);
        assert_eq!(fields.text("limit"), "10");
        assert_eq!(fields.integer("limit"), Some(10));
    }

    #[test]
    fn test_leading_integer_reads_prefix() {
        let fields = RequestFields::from_body(br#"{"a":"7.5","b":"10abc","c":"abc","d":12.9,"e":" -3"}"#);
        assert_eq!(fields.leading_integer("a"), Some(7));
        assert_eq!(fields.leading_integer("b"), Some(10));
        assert_eq!(fields.leading_integer("c"), None);
        assert_eq!(fields.leading_integer("d"), Some(12));
        assert_eq!(fields.leading_integer("e"), Some(-3));
        assert_eq!(fields.leading_integer("missing"), None);
    }

    #[test]
    fn test_text_opt_treats_null_as_absent() {
        let fields = RequestFields::from_body(br#"{"a":null,"b":""}"#);
        assert_eq!(fields.text_opt("a"), None);
        assert_eq!(fields.text_opt("b"), Some(String::new()));
        assert_eq!(fields.text_opt("c"), None);
    }
}
