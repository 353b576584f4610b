use once_cell::sync::OnceCell;

use crate::{
    constants,
    error::ServiceResult,
    functional::{
        validation_engine::{FieldRules, RuleSet},
        validation_rules::Rule,
    },
    models::request::RequestFields,
};

/// Create/update statistic. `date` is only required here; its format is
/// checked when the row is built.
pub fn statistic_rules() -> RuleSet {
    RuleSet::new("statistic")
        .field(
            FieldRules::new("user_id")
                .rule_with(Rule::Integer { min: None }, constants::MESSAGE_USER_ID_INTEGER),
        )
        .field(FieldRules::new("kills").rule_with(Rule::Numeric, constants::MESSAGE_KILLS_NUMERIC))
        .field(FieldRules::new("date").rule_with(Rule::Required, constants::MESSAGE_DATE_REQUIRED))
}

pub fn date_range_rules() -> RuleSet {
    RuleSet::new("statistic_date_range")
        .field(
            FieldRules::new("start_date")
                .rule_with(Rule::Required, constants::MESSAGE_START_DATE_REQUIRED)
                .rule_with(Rule::Date, constants::MESSAGE_START_DATE_INVALID),
        )
        .field(
            FieldRules::new("end_date")
                .optional()
                .rule_with(Rule::Date, constants::MESSAGE_END_DATE_INVALID)
                .rule_with(Rule::After("start_date"), constants::MESSAGE_END_DATE_AFTER_START),
        )
}

pub fn date_rules() -> RuleSet {
    RuleSet::new("statistic_date").field(
        FieldRules::new("date")
            .rule_with(Rule::Required, constants::MESSAGE_DATE_REQUIRED)
            .rule_with(Rule::Date, constants::MESSAGE_DATE_INVALID),
    )
}

pub fn validate_statistic(fields: &RequestFields) -> ServiceResult<()> {
    static RULES: OnceCell<RuleSet> = OnceCell::new();
    fields.validate(RULES.get_or_init(statistic_rules))
}

pub fn validate_date_range(fields: &RequestFields) -> ServiceResult<()> {
    static RULES: OnceCell<RuleSet> = OnceCell::new();
    fields.validate(RULES.get_or_init(date_range_rules))
}

pub fn validate_date(fields: &RequestFields) -> ServiceResult<()> {
    static RULES: OnceCell<RuleSet> = OnceCell::new();
    fields.validate(RULES.get_or_init(date_rules))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> RequestFields {
        RequestFields::from_body(json.as_bytes())
    }

    fn violation_codes(result: ServiceResult<()>) -> Vec<(String, String)> {
        result
            .err()
            .and_then(|e| {
                e.violations().map(|v| {
                    v.iter()
                        .map(|v| (v.field.clone(), v.code.clone()))
                        .collect()
                })
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_valid_statistic() {
        assert!(validate_statistic(&body(r#"{"user_id":1,"kills":10,"date":"2023-01-01"}"#)).is_ok());
        assert!(
            validate_statistic(&body(r#"{"user_id":"1","kills":"2.5","date":"2023-01-01"}"#))
                .is_ok()
        );
    }

    #[test]
    fn test_statistic_reports_every_field() {
        let fields = violation_codes(validate_statistic(&RequestFields::default()))
            .into_iter()
            .map(|(field, _)| field)
            .collect::<Vec<_>>();
        assert_eq!(fields, vec!["user_id", "kills", "date"]);
    }

    #[test]
    fn test_statistic_rejects_non_numeric_kills() {
        let violations =
            violation_codes(validate_statistic(&body(r#"{"user_id":1.5,"kills":"lots","date":"x"}"#)));
        assert_eq!(
            violations,
            vec![
                ("user_id".to_string(), "NOT_INTEGER".to_string()),
                ("kills".to_string(), "NOT_NUMERIC".to_string()),
            ]
        );
    }

    #[test]
    fn test_date_range_end_is_optional() {
        assert!(validate_date_range(&body(r#"{"start_date":"2023-01-01"}"#)).is_ok());
        assert!(validate_date_range(
            &body(r#"{"start_date":"2023-01-01","end_date":"2023-01-31"}"#)
        )
        .is_ok());
    }

    #[test]
    fn test_date_range_end_must_be_strictly_after_start() {
        let same_day = violation_codes(validate_date_range(&body(
            r#"{"start_date":"2023-01-01","end_date":"2023-01-01"}"#,
        )));
        assert_eq!(same_day, vec![("end_date".to_string(), "NOT_AFTER".to_string())]);

        let earlier = violation_codes(validate_date_range(&body(
            r#"{"start_date":"2023-02-01","end_date":"2023-01-01"}"#,
        )));
        assert_eq!(earlier, vec![("end_date".to_string(), "NOT_AFTER".to_string())]);
    }

    #[test]
    fn test_date_range_requires_valid_start() {
        let violations = violation_codes(validate_date_range(&RequestFields::default()));
        assert_eq!(
            violations,
            vec![
                ("start_date".to_string(), "REQUIRED".to_string()),
                ("start_date".to_string(), "INVALID_DATE".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_by_date() {
        assert!(validate_date(&body(r#"{"date":"2023-01-01"}"#)).is_ok());
        assert!(validate_date(&body(r#"{"date":"01/01/2023"}"#)).is_err());
        assert!(validate_date(&RequestFields::default()).is_err());
    }
}
