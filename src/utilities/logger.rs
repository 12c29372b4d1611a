//! Logging setup for library consumers.
//!
//! The engine logs through the `log` facade. Hosts that do not install their
//! own logger can call [`init_logging`] to get `env_logger` output that
//! honors `RUST_LOG`.

use chrono::Local;
use std::io::Write;

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Install `env_logger` with timestamped, level-tagged lines.
///
/// `verbose` lowers the default level to `debug`. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { DEFAULT_FILTER };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}][{}][{}]: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(true);
        init_logging(false);
        log::debug!("logger initialized");
    }
}
