use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

#[derive(Debug, Clone, Parser)]
#[command(name = "items-api", version, about = "JSON CRUD service for to-do items")]
pub struct Cli {
    /// Path to the YAML configuration file. A missing file means built-in defaults.
    #[arg(short, long, env = "CONFIG_PATH", default_value = "config.yaml")]
    pub config: PathBuf,

    /// Override `server.port`.
    #[arg(short, long, env = "ITEMS_PORT")]
    pub port: Option<u16>,

    /// Override `server.bind_address`.
    #[arg(short, long, env = "ITEMS_BIND")]
    pub bind: Option<String>,
}

impl Cli {
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref bind) = self.bind {
            config.server.bind_address = bind.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_server_section() {
        let cli = Cli::parse_from(["items-api", "--port", "9001", "--bind", "127.0.0.1"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.bind_address, "127.0.0.1");
    }

    #[test]
    fn absent_flags_leave_config_untouched() {
        let cli = Cli::parse_from(["items-api", "--config", "custom.yaml"]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(cli.config, PathBuf::from("custom.yaml"));
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn port_flag_rescues_invalid_file_port() {
        let cli = Cli::parse_from(["items-api", "--port", "9000"]);
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        cli.apply_overrides(&mut config);
        config.validate().expect("overridden port is valid");
        assert_eq!(config.server.port, 9000);
    }
}
