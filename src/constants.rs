// Messages returned to clients
pub const MESSAGE_USER_UPDATED: &str = "User updated";
pub const MESSAGE_USER_DELETED: &str = "User deleted";
pub const MESSAGE_USERS_DELETED: &str = "Users deleted";
pub const MESSAGE_STATISTIC_CREATED: &str = "Statistic created";
pub const MESSAGE_STATISTIC_UPDATED: &str = "Statistic updated";
pub const MESSAGE_STATISTIC_DELETED: &str = "Statistic deleted";
pub const MESSAGE_SERVER_RUNNING: &str = "Server is running";
pub const MESSAGE_LOCALHOST_ONLY: &str =
    "Forbidden: This endpoint can only be accessed from localhost";
pub const MESSAGE_END_BEFORE_START: &str = "End date must be more recent than start date";

// Validation messages
pub const MESSAGE_USERNAME_REQUIRED: &str = "Username is required";
pub const MESSAGE_PASSWORD_LENGTH: &str = "Password must be at least 8 characters long";
pub const MESSAGE_PASSWORD_STRENGTH: &str =
    "Password must contain at least one capital letter and one number";
pub const MESSAGE_FIRST_NAME_REQUIRED: &str = "First name is required";
pub const MESSAGE_FIRST_NAME_ALPHA: &str = "First name cannot contain numbers";
pub const MESSAGE_LAST_NAME_REQUIRED: &str = "Last name is required";
pub const MESSAGE_LAST_NAME_ALPHA: &str = "Last name cannot contain numbers";
pub const MESSAGE_USERNAME_STRING: &str = "Username must be a string";
pub const MESSAGE_FIRST_NAME_STRING: &str = "First name must be a string";
pub const MESSAGE_LAST_NAME_STRING: &str = "Last name must be a string";
pub const MESSAGE_INVALID_SORT_FIELD: &str = "Invalid sort field";
pub const MESSAGE_INVALID_SORT_ORDER: &str = "Invalid sort order";
pub const MESSAGE_KILLS_THRESHOLD: &str = "Kills must be a positive integer";
pub const MESSAGE_PHONE_FORMAT: &str = "Phone number must be in the format +32 444 44 44 44";
pub const MESSAGE_USER_ID_INTEGER: &str = "User ID must be an integer";
pub const MESSAGE_KILLS_NUMERIC: &str = "Kills must be numeric";
pub const MESSAGE_DATE_REQUIRED: &str = "Date is required";
pub const MESSAGE_DATE_INVALID: &str = "Date must be a valid date";
pub const MESSAGE_START_DATE_REQUIRED: &str = "Start date is required";
pub const MESSAGE_START_DATE_INVALID: &str = "Start date must be a valid date";
pub const MESSAGE_END_DATE_INVALID: &str = "End date must be a valid date";
pub const MESSAGE_END_DATE_AFTER_START: &str = "End date must be after start date";

// Self-test harness
pub const SELF_TEST_ERROR_SENTINEL: &str = "Error";

// Environment keys
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_STORAGE_BACKEND: &str = "STORAGE_BACKEND";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
pub const ENV_DB_POOL_SIZE: &str = "DB_POOL_SIZE";
pub const ENV_SELF_TEST_BASE_URL: &str = "SELF_TEST_BASE_URL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_POOL_SIZE: u32 = 10;
