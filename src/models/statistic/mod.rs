//! Statistic Module
//!
//! Per-user kill counts by calendar day, their write payload, and the query
//! shapes the statistics routes hand to storage.

use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};
use crate::functional::validation_rules::parse_iso_date;
use crate::models::request::RequestFields;
use crate::schema::statistics;

pub mod operations;
pub mod validators;

const MESSAGE_INCORRECT_DATE: &str = "Incorrect date value";
const MESSAGE_INCORRECT_INTEGER: &str = "Incorrect integer value";

#[derive(Queryable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = statistics)]
pub struct Statistic {
    pub id: i32,
    pub user_id: i32,
    pub kills: i32,
    pub date: NaiveDate,
}

#[derive(Insertable, AsChangeset, Deserialize, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = statistics)]
pub struct NewStatistic {
    pub user_id: i32,
    pub kills: i32,
    pub date: NaiveDate,
}

impl NewStatistic {
    /// Converts fields that passed the statistic rule set into a typed row.
    ///
    /// The rule set only asks for `date` to be present, so a date that does
    /// not parse is rejected here the way the relational store would reject it.
    pub fn from_fields(fields: &RequestFields) -> ServiceResult<Self> {
        let user_id = fields
            .integer("user_id")
            .and_then(|value| i32::try_from(value).ok())
            .ok_or_else(|| column_error(MESSAGE_INCORRECT_INTEGER, "user_id"))?;

        let kills = fields
            .number("kills")
            .map(f64::round)
            .filter(|value| *value >= i32::MIN as f64 && *value <= i32::MAX as f64)
            .map(|value| value as i32)
            .ok_or_else(|| column_error(MESSAGE_INCORRECT_INTEGER, "kills"))?;

        let date = parse_iso_date(&fields.text("date"))
            .ok_or_else(|| column_error(MESSAGE_INCORRECT_DATE, "date"))?;

        Ok(Self {
            user_id,
            kills,
            date,
        })
    }

    pub fn into_statistic(self, id: i32) -> Statistic {
        Statistic {
            id,
            user_id: self.user_id,
            kills: self.kills,
            date: self.date,
        }
    }
}

fn column_error(message: &str, column: &str) -> ServiceError {
    ServiceError::internal_server_error(format!("{} for column '{}'", message, column))
        .with_tag("statistic")
}

/// Statistic search predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatisticQuery {
    /// `None` stands for a value that did not parse as an integer.
    Page {
        limit: Option<i64>,
        offset: Option<i64>,
    },
    Date(NaiveDate),
    /// Both bounds inclusive.
    DateRange { start: NaiveDate, end: NaiveDate },
}

impl StatisticQuery {
    /// Whether `statistic` falls under a date predicate. Pages match everything.
    pub fn matches(&self, statistic: &Statistic) -> bool {
        match self {
            StatisticQuery::Page { .. } => true,
            StatisticQuery::Date(date) => statistic.date == *date,
            StatisticQuery::DateRange { start, end } => {
                statistic.date >= *start && statistic.date <= *end
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn test_from_fields_accepts_strings_and_numbers() {
        let fields =
            RequestFields::from_body(br#"{"user_id":"7","kills":10,"date":"2023-01-01"}"#);
        let statistic = NewStatistic::from_fields(&fields).expect("valid statistic");
        assert_eq!(
            statistic,
            NewStatistic {
                user_id: 7,
                kills: 10,
                date: day("2023-01-01"),
            }
        );
    }

    #[test]
    fn test_fractional_kills_are_rounded() {
        let fields =
            RequestFields::from_body(br#"{"user_id":1,"kills":"2.6","date":"2023-01-01"}"#);
        assert_eq!(NewStatistic::from_fields(&fields).map(|s| s.kills).ok(), Some(3));
    }

    #[test]
    fn test_unparseable_date_is_a_storage_error() {
        let fields = RequestFields::from_body(br#"{"user_id":1,"kills":1,"date":"yesterday"}"#);
        let error = NewStatistic::from_fields(&fields).unwrap_err();
        assert!(matches!(error, ServiceError::InternalServerError { .. }));
        assert!(error.to_string().contains(MESSAGE_INCORRECT_DATE));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let query = StatisticQuery::DateRange {
            start: day("2023-01-01"),
            end: day("2023-01-31"),
        };
        let at = |date: &str| Statistic {
            id: 1,
            user_id: 1,
            kills: 0,
            date: day(date),
        };
        assert!(query.matches(&at("2023-01-01")));
        assert!(query.matches(&at("2023-01-31")));
        assert!(!query.matches(&at("2023-02-01")));
    }
}
