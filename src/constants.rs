/// Upstream and scoring constants shared across the crate

// Codeforces public API root
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://codeforces.com/api";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 30;

// Single bulk fetch: first row and how many rows to ask for
pub const STANDINGS_FIRST_ROW: u32 = 1;
pub const DEFAULT_STANDINGS_COUNT: u32 = 30_000;

pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Status value the upstream envelope carries on success
pub const UPSTREAM_STATUS_OK: &str = "OK";

/// Lowercase contest-name fragments that mark a penalty-based contest
pub const DEFAULT_PENALTY_MARKERS: [&str; 3] = ["edu", "div.3", "div.4"];

/// 20 minutes per rejected attempt on a solved problem
pub const WRONG_ATTEMPT_PENALTY_SECONDS: u64 = 20 * 60;

/// Separator the upstream expects between handles in the `handles` parameter
pub const HANDLE_SEPARATOR: &str = ";";

pub const CONFIG_PATH_ENV: &str = "CF_STANDINGS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const METRICS_ADDR_ENV: &str = "CF_STANDINGS_METRICS_ADDR";
pub const DEFAULT_METRICS_ADDR: &str = "127.0.0.1:9898";
