//! Logging setup for the `wampsub` binary and tests.

use std::str::FromStr;

use tracing::Level;

/// Level for a configured name such as `"debug"` or `"WARN"`.
pub fn parse_level(name: &str) -> Option<Level> {
    match name.trim() {
        "warning" => Some(Level::WARN),
        other => Level::from_str(other).ok(),
    }
}

/// Install the global fmt subscriber at the configured `log.level` and return
/// the level in effect. An unknown name runs at `info` and says so.
///
/// Safe to call repeatedly; only the first call installs a subscriber.
pub fn init(level: &str) -> Level {
    let parsed = parse_level(level);
    let effective = parsed.unwrap_or(Level::INFO);

    let installed = tracing_subscriber::fmt()
        .with_max_level(effective)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed && parsed.is_none() {
        tracing::warn!("unknown log level {level:?}, using {effective}");
    }
    effective
}
