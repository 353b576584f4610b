pub mod request;
pub mod statistic;
pub mod user;
