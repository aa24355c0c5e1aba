pub use self::parser::{Config, DatabaseConfig, DbType, LogFormat, LoggingConfig, ServerConfig};
pub use self::validator::ConfigError;

mod parser;
mod validator;
