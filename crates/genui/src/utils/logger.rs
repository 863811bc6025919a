use std::io::Write;

use genui_config::logger::{LoggerConfig, LoggerFormat};
use tracing_subscriber::EnvFilter;

const WHITELISTED_CRATES: &[&str] = &["genui", "genui_core", "genui_config"];

pub(crate) fn default_env_filter(level: &str) -> String {
    let mut filters: Vec<String> = WHITELISTED_CRATES
        .iter()
        .map(|crate_name| format!("{crate_name}={level}"))
        .collect();

    // Set default level for all other crates to warn
    filters.insert(0, "warn".to_string());

    filters.join(",")
}

fn level_str(verbose: u8, quiet: bool, default: &'static str) -> &'static str {
    if quiet {
        "warn"
    } else if verbose == 0 {
        default
    } else if verbose == 1 {
        "debug"
    } else {
        "trace"
    }
}

/// Logger for one-shot commands
pub(crate) fn init_cli_logger(verbose: u8, quiet: bool) {
    let level_str = level_str(verbose, quiet, "info");

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_env_filter(level_str)),
    );

    // For INFO and below, only include/colorize WARN and ERROR levels
    if ["info", "warn", "error"].contains(&level_str) {
        builder.format(|buf, record| {
            if record.level() == tracing::log::Level::Info {
                writeln!(buf, "{}", record.args())
            } else {
                let log_style = buf.default_level_style(record.level());
                writeln!(
                    buf,
                    "{log_style}[{}]{log_style:#} {}",
                    record.level(),
                    record.args()
                )
            }
        });
    }

    if let Err(e) = builder.try_init() {
        eprintln!("genui: Failed initializing env_logger: {e:?}");
    }
}

/// Tracing subscriber for `serve` and `backend`, shaped by the config's
/// logger section. `-v`/`-q` override the configured level.
pub(crate) fn init_server_logger(cfg: &LoggerConfig, verbose: u8, quiet: bool) {
    if !cfg.enabled {
        return;
    }

    let level = level_str(verbose, quiet, cfg.level.as_str());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_env_filter(level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(cfg.colors);

    let res = match cfg.format {
        LoggerFormat::Compact => builder.compact().try_init(),
        LoggerFormat::Pretty => builder.pretty().try_init(),
        LoggerFormat::Json => builder.json().try_init(),
    };

    if let Err(e) = res {
        eprintln!("genui: Failed initializing tracing subscriber: {e:?}");
    }
}
