use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Default directives for the human-readable format.
const DEFAULT_FILTER: &str = "info,tower_http=info,sea_orm=warn";
/// Auth rejections are logged at debug under `service::auth`; JSON output keeps them.
const JSON_FILTER: &str = "info,service::auth=debug,sea_orm=warn";

fn filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Pick the subscriber from the `server.log_json` switch.
pub fn init_logging(json: bool) {
    if json {
        init_logging_json();
    } else {
        init_logging_default();
    }
}

/// Compact single-line events on stdout. `RUST_LOG` overrides the filter.
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(filter(DEFAULT_FILTER))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// One JSON object per event, with targets, for log shippers.
pub fn init_logging_json() {
    // 请求级别的 span 由 tower_http 输出；RUST_LOG 可覆盖，例如 RUST_LOG=warn,service::auth=debug
    let _ = fmt()
        .with_env_filter(filter(JSON_FILTER))
        .with_target(true)
        .json()
        .with_writer(io::stdout)
        .try_init();
}
