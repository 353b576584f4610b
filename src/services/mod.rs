pub mod functional_patterns;
pub mod self_test_service;
pub mod statistic_service;
pub mod user_service;
