//! Diesel operations for the statistics table.

use diesel::prelude::*;

use crate::{
    config::db::Connection,
    error::{ServiceError, ServiceResult},
    models::statistic::{NewStatistic, Statistic, StatisticQuery},
    schema::statistics::dsl::*,
    storage::page_bounds,
};

fn storage_error(action: &'static str) -> impl FnOnce(diesel::result::Error) -> ServiceError {
    move |err| {
        log::error!("Failed to {}: {}", action, err);
        ServiceError::internal_server_error(err.to_string())
            .with_tag("statistic")
            .with_detail(action)
    }
}

pub fn create_statistic(new_statistic: NewStatistic, conn: &mut Connection) -> ServiceResult<i32> {
    diesel::insert_into(statistics)
        .values(&new_statistic)
        .returning(id)
        .get_result::<i32>(conn)
        .map_err(storage_error("create statistic"))
}

pub fn update_statistic(
    statistic_id: i32,
    changes: NewStatistic,
    conn: &mut Connection,
) -> ServiceResult<usize> {
    diesel::update(statistics.find(statistic_id))
        .set(&changes)
        .execute(conn)
        .map_err(storage_error("update statistic"))
}

pub fn delete_statistic(statistic_id: i32, conn: &mut Connection) -> ServiceResult<usize> {
    diesel::delete(statistics.find(statistic_id))
        .execute(conn)
        .map_err(storage_error("delete statistic"))
}

pub fn find_all_statistics(conn: &mut Connection) -> ServiceResult<Vec<Statistic>> {
    statistics
        .load::<Statistic>(conn)
        .map_err(storage_error("list statistics"))
}

pub fn query_statistics(
    predicate: StatisticQuery,
    conn: &mut Connection,
) -> ServiceResult<Vec<Statistic>> {
    match predicate {
        StatisticQuery::Page { limit, offset } => {
            let (limit, offset) = page_bounds(limit, offset)?;
            statistics
                .order(id.asc())
                .limit(limit)
                .offset(offset)
                .load::<Statistic>(conn)
                .map_err(storage_error("paginate statistics"))
        }
        StatisticQuery::Date(day) => statistics
            .filter(date.eq(day))
            .load::<Statistic>(conn)
            .map_err(storage_error("search statistics by date")),
        StatisticQuery::DateRange { start, end } => statistics
            .filter(date.between(start, end))
            .load::<Statistic>(conn)
            .map_err(storage_error("search statistics by date range")),
    }
}

pub fn delete_statistics_of_user(owner: i32, conn: &mut Connection) -> ServiceResult<usize> {
    diesel::delete(statistics.filter(user_id.eq(owner)))
        .execute(conn)
        .map_err(storage_error("delete statistics of user"))
}
