//! Rule Set Validation Engine
//!
//! Evaluates a named [`RuleSet`] against a request's field map. Every check of
//! every field runs; the outcome carries the violations in rule-set order and
//! a request is valid iff that list is empty.

use serde_json::{Map, Value};

use crate::functional::validation_rules::{
    Check, FieldInput, Rule, ValidationError, ValidationRule,
};

/// Validation pipeline configuration
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Stop on first validation error
    pub fail_fast: bool,
    /// Maximum number of validation errors to collect
    pub max_errors: Option<usize>,
}

impl Default for ValidationConfig {
    /// Collect every violation.
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_errors: None,
        }
    }
}

/// The ordered checks bound to one field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub field: &'static str,
    pub checks: Vec<Check>,
}

impl FieldRules {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            checks: Vec::new(),
        }
    }

    /// Adds a check reported with the rule's default message.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.checks.push(Check::new(rule));
        self
    }

    /// Adds a check reported with `message` when it fails.
    pub fn rule_with(mut self, rule: Rule, message: &'static str) -> Self {
        self.checks.push(Check::new(rule).with_message(message));
        self
    }

    /// Marks the field optional: when absent, none of its checks run.
    pub fn optional(self) -> Self {
        self.rule(Rule::Optional)
    }

    pub fn is_optional(&self) -> bool {
        self.checks
            .iter()
            .any(|check| matches!(check.rule, Rule::Optional))
    }
}

/// An ordered mapping from field name to rules, bound to one endpoint.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub name: &'static str,
    pub fields: Vec<FieldRules>,
}

impl RuleSet {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, rules: FieldRules) -> Self {
        self.fields.push(rules);
        self
    }
}

/// Validation result with detailed error collection
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    /// Collection of validation errors
    pub errors: Vec<ValidationError>,
    /// Whether validation passed
    pub is_valid: bool,
}

impl ValidationOutcome {
    pub fn success() -> Self {
        Self {
            errors: Vec::new(),
            is_valid: true,
        }
    }

    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Converts the outcome into a `Result`, yielding the violations on failure.
    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Data-driven validation engine
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: ValidationConfig,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    fn is_saturated(&self, errors: &[ValidationError]) -> bool {
        if errors.is_empty() {
            return false;
        }
        self.config.fail_fast || self.config.max_errors.is_some_and(|max| errors.len() >= max)
    }

    /// Runs one field's checks, appending each violation to `errors`.
    pub fn validate_field(
        &self,
        rules: &FieldRules,
        fields: &Map<String, Value>,
        errors: &mut Vec<ValidationError>,
    ) {
        let input = FieldInput::new(rules.field, fields);
        if rules.is_optional() && !input.is_present() {
            return;
        }

        for check in &rules.checks {
            if let Err(error) = check.validate(&input, rules.field) {
                errors.push(error);
                if self.is_saturated(errors) {
                    return;
                }
            }
        }
    }

    /// Evaluates every field of `rule_set` against `fields`.
    pub fn validate(&self, rule_set: &RuleSet, fields: &Map<String, Value>) -> ValidationOutcome {
        let mut errors = Vec::new();

        for rules in &rule_set.fields {
            self.validate_field(rules, fields, &mut errors);
            if self.is_saturated(&errors) {
                break;
            }
        }

        if errors.is_empty() {
            ValidationOutcome::success()
        } else {
            log::debug!(
                "Rule set '{}' rejected request: {:?}",
                rule_set.name,
                errors
            );
            ValidationOutcome::failure(errors)
        }
    }
}
