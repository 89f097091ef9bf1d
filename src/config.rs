//! Runtime configuration

/// Default number of concurrent VPC teardowns
pub const DEFAULT_MAX_WORKERS: usize = 20;

/// Settings for one sweep of the account
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Upper bound on concurrent VPC teardowns
    pub max_workers: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}
