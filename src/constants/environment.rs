use lazy_static::lazy_static;
use log::LevelFilter;

lazy_static! {
    pub static ref APP_ENV: Environment = Environment::new();
}

pub struct Environment {
    pub config: EnvConfig,
}

impl Environment {
    #[must_use]
    pub const fn new() -> Self {
        const IS_DEBUG: bool = cfg!(debug_assertions);

        Self {
            config: EnvConfig::new(IS_DEBUG),
        }
    }
}

pub struct EnvConfig {
    pub log_level: LevelFilter,
    /// Log every byte put on the wire together with its acknowledgment.
    pub show_wire_bytes: bool,
}

impl EnvConfig {
    #[must_use]
    pub const fn new(is_debug: bool) -> Self {
        if is_debug {
            return Self {
                log_level: LevelFilter::Debug,
                show_wire_bytes: true,
            };
        }

        Self {
            log_level: LevelFilter::Info,
            show_wire_bytes: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_build_traces_the_wire() {
        let config = EnvConfig::new(true);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert!(config.show_wire_bytes);
    }

    #[test]
    fn test_release_build_stays_quiet() {
        let config = EnvConfig::new(false);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert!(!config.show_wire_bytes);
    }

    #[test]
    fn test_app_env_follows_build_profile() {
        assert_eq!(APP_ENV.config.show_wire_bytes, cfg!(debug_assertions));
    }
}
