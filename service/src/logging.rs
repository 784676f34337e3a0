//! Terminal logging for the login host.
//!
//! Login steps log through the `log` facade from `seznam_auth` and `web`. The
//! HTTP stack underneath (hyper, reqwest, rustls) is only shown at `TRACE`,
//! where a failing token exchange can be followed down to the connection.

use crate::config::Config;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Dependency modules muted below `TRACE`.
const HTTP_STACK_MODULES: &[&str] = &["hyper", "reqwest", "rustls", "tower", "axum", "mio"];

pub struct Logger {}

impl Logger {
    /// Installs the global terminal logger at `config.log_level_filter`.
    pub fn init_logger(config: &Config) {
        TermLogger::init(
            config.log_level_filter,
            Self::log_config(config.log_level_filter),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        )
        .expect("Failed to start simplelog");
    }

    fn log_config(level: LevelFilter) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        for module in Self::muted_modules(level) {
            builder.add_filter_ignore_str(module);
        }

        builder.build()
    }

    fn muted_modules(level: LevelFilter) -> &'static [&'static str] {
        if level == LevelFilter::Trace {
            &[]
        } else {
            HTTP_STACK_MODULES
        }
    }
}
