use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_MAX_NAME_LEN: usize = 64;
pub const DEFAULT_MAX_HOSTS_PER_PATTERN: u64 = 1 << 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub no_banner: bool,
    /// 0 prints everything, 1 drops decoration, 2 only prints results.
    pub quiet: u8,
    pub verbosity: u8,
    /// Upper bound for a single HTTP request.
    pub request_timeout: Duration,
    /// Upper bound for one runner step, which may span several requests.
    pub step_timeout: Duration,
    pub max_name_len: usize,
    /// Host patterns denoting more concrete hosts than this are refused.
    pub max_hosts_per_pattern: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            no_banner: false,
            quiet: 0,
            verbosity: 0,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            step_timeout: DEFAULT_STEP_TIMEOUT,
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_hosts_per_pattern: DEFAULT_MAX_HOSTS_PER_PATTERN,
        }
    }
}
