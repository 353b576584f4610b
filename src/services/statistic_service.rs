//! Statistic Service
//!
//! Resource operations for kill statistics.

use chrono::{NaiveDate, Utc};

use crate::{
    constants,
    error::{FunctionalErrorHandling, ServiceError, ServiceResult},
    functional::validation_rules::parse_iso_date,
    models::{
        request::RequestFields,
        statistic::{validators, NewStatistic, Statistic, StatisticQuery},
    },
    storage::Storage,
};

pub async fn create(fields: &RequestFields, storage: &dyn Storage) -> ServiceResult<i32> {
    validators::validate_statistic(fields)?;
    let statistic = NewStatistic::from_fields(fields)?;
    storage
        .create_statistic(statistic)
        .await
        .log_error("statistic_service::create")
}

pub async fn update(id: i32, fields: &RequestFields, storage: &dyn Storage) -> ServiceResult<u64> {
    validators::validate_statistic(fields)?;
    let statistic = NewStatistic::from_fields(fields)?;
    storage
        .update_statistic(id, statistic)
        .await
        .log_error("statistic_service::update")
}

pub async fn delete(id: i32, storage: &dyn Storage) -> ServiceResult<u64> {
    storage
        .delete_statistic(id)
        .await
        .log_error("statistic_service::delete")
}

pub async fn list_all(storage: &dyn Storage) -> ServiceResult<Vec<Statistic>> {
    storage
        .list_statistics()
        .await
        .log_error("statistic_service::list_all")
}

/// `limit`/`offset` are read by their integer prefix; bounds are the store's business.
pub async fn paginate(query: &RequestFields, storage: &dyn Storage) -> ServiceResult<Vec<Statistic>> {
    let page = StatisticQuery::Page {
        limit: query.leading_integer("limit"),
        offset: query.leading_integer("offset"),
    };
    storage
        .query_statistics(page)
        .await
        .log_error("statistic_service::paginate")
}

/// Resolves the inclusive range for a date-range search.
///
/// `end_date` defaults to today (UTC). An effective end before the start is a
/// client error even when the end was defaulted.
pub fn effective_range(query: &RequestFields, today: NaiveDate) -> ServiceResult<(NaiveDate, NaiveDate)> {
    let start = parse_iso_date(&query.text("start_date"))
        .ok_or_else(|| ServiceError::bad_request(constants::MESSAGE_START_DATE_INVALID))?;
    let end = match query.text_opt("end_date") {
        Some(end) => parse_iso_date(&end)
            .ok_or_else(|| ServiceError::bad_request(constants::MESSAGE_END_DATE_INVALID))?,
        None => today,
    };

    if end < start {
        return Err(ServiceError::bad_request(constants::MESSAGE_END_BEFORE_START)
            .with_tag("statistic")
            .with_detail(format!("start={} end={}", start, end)));
    }
    Ok((start, end))
}

pub async fn search_by_date_range(
    query: &RequestFields,
    storage: &dyn Storage,
) -> ServiceResult<Vec<Statistic>> {
    validators::validate_date_range(query)?;
    let (start, end) = effective_range(query, Utc::now().date_naive())?;
    storage
        .query_statistics(StatisticQuery::DateRange { start, end })
        .await
        .log_error("statistic_service::search_by_date_range")
}

pub async fn search_by_date(
    query: &RequestFields,
    storage: &dyn Storage,
) -> ServiceResult<Vec<Statistic>> {
    validators::validate_date(query)?;
    let date = parse_iso_date(&query.text("date"))
        .ok_or_else(|| ServiceError::bad_request(constants::MESSAGE_DATE_INVALID))?;
    storage
        .query_statistics(StatisticQuery::Date(date))
        .await
        .log_error("statistic_service::search_by_date")
}
