use log::LevelFilter;

use crate::config;

/// Load and validate settings. Problems fall back to defaults; the message is
/// returned so it can be logged once logging is up.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                config::Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        // Config is optional; failures should not prevent the player from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}

/// Install the colog logger. `RONDO_LOG` takes precedence over the configured level.
pub fn init_logging(settings: &config::LoggingSettings) -> Option<String> {
    let (level, warning) = match settings.level.parse::<LevelFilter>() {
        Ok(level) => (level, None),
        Err(_) => (
            LevelFilter::Info,
            Some(format!("unknown log level `{}`, using info", settings.level)),
        ),
    };

    let mut clog = colog::default_builder();
    clog.filter(None, level);
    clog.parse_env("RONDO_LOG");
    clog.init();

    warning
}
