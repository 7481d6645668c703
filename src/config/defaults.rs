//! Default configuration values

/// User agent sent with every download request
pub const USER_AGENT: &str = "Emanator";

/// Maximum number of download retry attempts
pub const MAX_DOWNLOAD_RETRIES: u32 = 3;

/// Base delay for exponential backoff between download attempts (ms)
pub const RETRY_BASE_DELAY_MS: u64 = 1000;

/// Upper bound for the backoff delay (ms)
pub const RETRY_MAX_DELAY_MS: u64 = 30_000;

/// Minimum interval between progress redraws (ms)
pub const PROGRESS_THROTTLE_MS: u64 = 250;

/// Downloads finishing faster than this never show a progress bar (ms)
pub const PROGRESS_DELAY_MS: u64 = 1000;

/// Suffix of every configuration layer file
pub const CONFIG_EXTENSION: &str = "conf";

/// Name of the local override layer
pub const LOCAL_LAYER: &str = "local";

/// Key holding the download list used by `emanator batch`
pub const BATCH_DOWNLOADS_KEY: &str = "downloads";
