use log::LevelFilter;
use simplelog::*;
use std::fs::File;
use std::path::PathBuf;

/// Logging configuration for the Inkwell client.
///
/// Logs always go to a file; the terminal belongs to the UI.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Master switch to enable/disable all logging
    pub enabled: bool,
    pub log_file: PathBuf,
    pub clear_on_startup: bool,
    pub features: LogFeatures,
    pub level: LevelFilter,
}

/// Per-category switches. Each category is a log target.
#[derive(Debug, Clone)]
pub struct LogFeatures {
    pub api_calls: bool,
    pub key_events: bool,
    pub rendering: bool,
    pub session: bool,
    pub comments: bool,
    pub general: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: PathBuf::from("inkwell_debug.log"),
            clear_on_startup: true,
            features: LogFeatures::default(),
            level: LevelFilter::Info,
        }
    }
}

impl Default for LogFeatures {
    fn default() -> Self {
        Self {
            api_calls: true,
            key_events: false,
            rendering: false,
            session: true,
            comments: true,
            general: true,
        }
    }
}

impl LogFeatures {
    fn all(on: bool) -> Self {
        Self {
            api_calls: on,
            key_events: on,
            rendering: on,
            session: on,
            comments: on,
            general: on,
        }
    }

    /// Log targets whose category is switched off
    pub fn disabled_targets(&self) -> Vec<&'static str> {
        [
            ("api_calls", self.api_calls),
            ("key_events", self.key_events),
            ("rendering", self.rendering),
            ("session", self.session),
            ("comments", self.comments),
            ("general", self.general),
        ]
        .into_iter()
        .filter(|(_, on)| !on)
        .map(|(target, _)| target)
        .collect()
    }
}

impl LogConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Only warnings and errors
    pub fn minimal() -> Self {
        Self {
            level: LevelFilter::Warn,
            features: LogFeatures::all(false),
            ..Default::default()
        }
    }

    /// Everything, down to trace level
    pub fn verbose() -> Self {
        Self {
            level: LevelFilter::Trace,
            features: LogFeatures::all(true),
            ..Default::default()
        }
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    if !config.enabled {
        let _ = WriteLogger::init(LevelFilter::Off, Config::default(), std::io::sink());
        return Ok(());
    }

    if config.clear_on_startup {
        let _ = File::create(&config.log_file)?;
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_rfc3339()
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("cookie_store");
    for target in config.features.disabled_targets() {
        builder.add_filter_ignore_str(target);
    }
    let log_config = builder
        .set_time_offset_to_local()
        .unwrap_or_else(|builder| builder)
        .build();

    WriteLogger::init(config.level, log_config, log_file)?;

    log::info!("Logging initialized: file={}, level={:?}", config.log_file.display(), config.level);
    log::debug!("Log features: {:?}", config.features);

    Ok(())
}

/// Log a key event
#[macro_export]
macro_rules! log_key_event {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.key_events {
            log::debug!(target: "key_events", $($arg)*);
        }
    };
}

/// Log a rendering pass
#[macro_export]
macro_rules! log_rendering {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.rendering {
            log::trace!(target: "rendering", $($arg)*);
        }
    };
}

/// Log an outgoing API request
#[macro_export]
macro_rules! log_api_call {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.api_calls {
            log::debug!(target: "api_calls", $($arg)*);
        }
    };
}

/// Log a comment thread event
#[macro_export]
macro_rules! log_comments {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.comments {
            log::debug!(target: "comments", $($arg)*);
        }
    };
}

/// Macro for general debug logging
#[macro_export]
macro_rules! log_debug {
    ($config:expr, $($arg:tt)*) => {
        if $config.enabled && $config.features.general {
            log::debug!(target: "general", $($arg)*);
        }
    };
}
