use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

use crate::{
    constants,
    error::ServiceResult,
    functional::{
        validation_engine::{FieldRules, RuleSet},
        validation_rules::Rule,
    },
    models::{
        request::RequestFields,
        user::{SortOrder, UserSortField},
    },
};

// At least one capital letter and one digit, in either order.
static PASSWORD_STRENGTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)[A-Z].*[0-9]|[0-9].*[A-Z]").expect("password regex is valid")
});

static PHONE_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+32 [0-9]{3} [0-9]{2} [0-9]{2} [0-9]{2}$").expect("phone regex is valid")
});

/// Create/update user: the full field set, every time.
pub fn user_rules() -> RuleSet {
    RuleSet::new("user")
        .field(
            FieldRules::new("username").rule_with(Rule::Required, constants::MESSAGE_USERNAME_REQUIRED),
        )
        .field(
            FieldRules::new("password")
                .rule_with(Rule::MinLength(8), constants::MESSAGE_PASSWORD_LENGTH)
                .rule_with(
                    Rule::Matches(PASSWORD_STRENGTH.clone()),
                    constants::MESSAGE_PASSWORD_STRENGTH,
                ),
        )
        .field(
            FieldRules::new("first_name")
                .rule_with(Rule::Required, constants::MESSAGE_FIRST_NAME_REQUIRED)
                .rule_with(Rule::Alphabetic, constants::MESSAGE_FIRST_NAME_ALPHA),
        )
        .field(
            FieldRules::new("last_name")
                .rule_with(Rule::Required, constants::MESSAGE_LAST_NAME_REQUIRED)
                .rule_with(Rule::Alphabetic, constants::MESSAGE_LAST_NAME_ALPHA),
        )
}

pub fn user_details_rules() -> RuleSet {
    RuleSet::new("user_details")
        .field(
            FieldRules::new("username")
                .optional()
                .rule_with(Rule::Text, constants::MESSAGE_USERNAME_STRING),
        )
        .field(
            FieldRules::new("first_name")
                .optional()
                .rule_with(Rule::Text, constants::MESSAGE_FIRST_NAME_STRING),
        )
        .field(
            FieldRules::new("last_name")
                .optional()
                .rule_with(Rule::Text, constants::MESSAGE_LAST_NAME_STRING),
        )
}

pub fn user_sort_rules() -> RuleSet {
    RuleSet::new("user_sort")
        .field(
            FieldRules::new("sort_by")
                .optional()
                .rule_with(Rule::OneOf(UserSortField::ALLOWED), constants::MESSAGE_INVALID_SORT_FIELD),
        )
        .field(
            FieldRules::new("order")
                .optional()
                .rule_with(Rule::OneOf(SortOrder::ALLOWED), constants::MESSAGE_INVALID_SORT_ORDER),
        )
}

pub fn kills_threshold_rules() -> RuleSet {
    RuleSet::new("kills_threshold").field(
        FieldRules::new("kills")
            .rule_with(Rule::Integer { min: Some(0) }, constants::MESSAGE_KILLS_THRESHOLD),
    )
}

pub fn phone_rules() -> RuleSet {
    RuleSet::new("phone").field(
        FieldRules::new("phone").rule_with(
            Rule::Matches(PHONE_FORMAT.clone()),
            constants::MESSAGE_PHONE_FORMAT,
        ),
    )
}

pub fn validate_user(fields: &RequestFields) -> ServiceResult<()> {
    static RULES: OnceCell<RuleSet> = OnceCell::new();
    fields.validate(RULES.get_or_init(user_rules))
}

pub fn validate_user_details(fields: &RequestFields) -> ServiceResult<()> {
    static RULES: OnceCell<RuleSet> = OnceCell::new();
    fields.validate(RULES.get_or_init(user_details_rules))
}

pub fn validate_user_sort(fields: &RequestFields) -> ServiceResult<()> {
    static RULES: OnceCell<RuleSet> = OnceCell::new();
    fields.validate(RULES.get_or_init(user_sort_rules))
}

pub fn validate_kills_threshold(fields: &RequestFields) -> ServiceResult<()> {
    static RULES: OnceCell<RuleSet> = OnceCell::new();
    fields.validate(RULES.get_or_init(kills_threshold_rules))
}

pub fn validate_phone(fields: &RequestFields) -> ServiceResult<()> {
    static RULES: OnceCell<RuleSet> = OnceCell::new();
    fields.validate(RULES.get_or_init(phone_rules))
}
