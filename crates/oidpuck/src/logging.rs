use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Overrides `--log-level` with full filter directives, e.g.
/// `OIDPUCK_LOG=oidpuck_frame=trace`.
pub const LOG_ENV: &str = "OIDPUCK_LOG";

/// Crates whose events follow `--log-level`. Everything else stays at warn.
const OWN_TARGETS: [&str; 3] = ["oidpuck", "oidpuck_frame", "oidpuck_transport"];

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn default_directives(level: LogLevel) -> String {
    let base = match level {
        LogLevel::Error => "error",
        _ => "warn",
    };
    let mut directives = base.to_string();
    for target in OWN_TARGETS {
        directives.push_str(&format!(",{target}={}", level.as_directive()));
    }
    directives
}

/// Directives from the environment when they parse, else the level defaults.
fn filter_directives(level: LogLevel, env: Option<&str>) -> String {
    match env {
        Some(directives) if EnvFilter::try_new(directives).is_ok() => directives.to_string(),
        _ => default_directives(level),
    }
}

/// Logs go to stderr so stdout stays parseable in every output format.
pub fn init_logging(format: LogFormat, level: LogLevel) {
    let env = std::env::var(LOG_ENV).ok();
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(filter_directives(level, env.as_deref())))
        .with_ansi(false)
        .with_target(false);

    match format {
        LogFormat::Text => {
            let _ = builder.try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
