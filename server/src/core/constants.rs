// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display and platform directories)
pub const APP_NAME: &str = "ShopDesk";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "shopdesk";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".shopdesk";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "shopdesk.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "SHOPDESK_CONFIG";

// =============================================================================
// Environment Variables - Debug
// =============================================================================

/// Environment variable for debug mode
pub const ENV_DEBUG: &str = "SHOPDESK_DEBUG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "SHOPDESK_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "SHOPDESK_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "SHOPDESK_LOG";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5480;

// =============================================================================
// Environment Variables - Storage
// =============================================================================

/// Environment variable to override data directory
pub const ENV_DATA_DIR: &str = "SHOPDESK_DATA_DIR";

/// Environment variable for an explicit database file path
pub const ENV_DATABASE_PATH: &str = "SHOPDESK_DATABASE_PATH";

/// Environment variable for the connection pool size
pub const ENV_DATABASE_MAX_CONNECTIONS: &str = "SHOPDESK_DATABASE_MAX_CONNECTIONS";

// =============================================================================
// Analytics
// =============================================================================

/// Environment variable for the period used when a request names none
pub const ENV_ANALYTICS_DEFAULT_PERIOD: &str = "SHOPDESK_ANALYTICS_DEFAULT_PERIOD";

// =============================================================================
// SQLite Database
// =============================================================================

/// SQLite database filename
pub const SQLITE_DB_FILENAME: &str = "shopdesk.db";

/// SQLite connection pool max connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 30;

/// SQLite cache size (negative = KB, so -64000 = 64MB)
pub const SQLITE_CACHE_SIZE: &str = "-64000";

/// SQLite WAL auto-checkpoint threshold (pages, ~4MB at 1000)
pub const SQLITE_WAL_AUTOCHECKPOINT: &str = "1000";

/// WAL checkpoint interval in seconds (5 minutes)
pub const SQLITE_CHECKPOINT_INTERVAL_SECS: u64 = 300;

// =============================================================================
// Request Body Limits
// =============================================================================

/// Default body limit for admin API requests (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// =============================================================================
// Shutdown
// =============================================================================

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
