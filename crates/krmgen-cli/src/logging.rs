//! Log subscriber setup

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level named on the command line; anything unrecognised means `debug`
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::DEBUG)
}

/// Install the stderr subscriber; `RUST_LOG` wins over `level` when set
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(parse_level(level).into()));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    if tracing_subscriber::registry().with(filter).with(layer).try_init().is_err() {
        tracing::debug!("log subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("info"), LevelFilter::INFO);
        assert_eq!(parse_level("WARN"), LevelFilter::WARN);
        assert_eq!(parse_level(" error "), LevelFilter::ERROR);
        assert_eq!(parse_level("off"), LevelFilter::OFF);
        assert_eq!(parse_level("loud"), LevelFilter::DEBUG);
    }
}
