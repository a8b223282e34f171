//! Subscriber setup. Logs go to stderr so JSON on stdout stays parseable.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NM_LOG";
const DEFAULT_FILTER: &str = "warn";

/// First valid directive string wins: flag, then `NM_LOG`, then config.
fn pick_filter(flag: Option<&str>, env: Option<&str>, config: Option<&str>) -> EnvFilter {
    [flag, env, config]
        .into_iter()
        .flatten()
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init(flag: Option<&str>, config: Option<&str>) {
    let env = std::env::var(LOG_ENV).ok();
    let filter = pick_filter(flag, env.as_deref(), config);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
