use clap::{Parser, builder::BoolishValueParser};
use sqlite_store::schema::DEFAULT_DB_PATH;
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_BACKUP_DIR: &str = ".";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;
const DEFAULT_MCP_HTTP_ADDR: &str = "127.0.0.1:4030";

#[derive(Parser, Debug)]
#[command(name = "sqlite-mcpd", version, about = "SQLite MCP daemon.")]
struct CliArgs {
    #[arg(long, env = "SQLITE_MCP_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db_path: String,

    #[arg(long, env = "SQLITE_MCP_BACKUP_DIR", default_value = DEFAULT_BACKUP_DIR)]
    backup_dir: String,

    #[arg(
        long,
        env = "SQLITE_MCP_BUSY_TIMEOUT_MS",
        default_value_t = DEFAULT_BUSY_TIMEOUT_MS
    )]
    busy_timeout_ms: u64,

    #[arg(
        long = "stdio",
        env = "SQLITE_MCP_ENABLE_STDIO",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    enable_stdio: bool,

    #[arg(long, env = "SQLITE_MCP_HTTP_ADDR", default_value = DEFAULT_MCP_HTTP_ADDR)]
    mcp_http_addr: SocketAddr,

    #[arg(
        long,
        env = "SQLITE_MCP_STATEFUL",
        default_value_t = true,
        value_parser = BoolishValueParser::new()
    )]
    mcp_stateful: bool,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct SqliteMcpConfig {
    pub db_path: PathBuf,
    pub backup_dir: PathBuf,
    pub busy_timeout: Duration,
    pub enable_stdio: bool,
    pub mcp_http_addr: SocketAddr,
    pub mcp_stateful: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value:?}")
            }
        }
    }
}

impl Error for ConfigError {}

impl SqliteMcpConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for SqliteMcpConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.db_path.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "SQLITE_MCP_DB_PATH",
                value: args.db_path,
            });
        }
        if args.backup_dir.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "SQLITE_MCP_BACKUP_DIR",
                value: args.backup_dir,
            });
        }

        Ok(Self {
            db_path: PathBuf::from(args.db_path),
            backup_dir: PathBuf::from(args.backup_dir),
            busy_timeout: Duration::from_millis(args.busy_timeout_ms),
            enable_stdio: args.enable_stdio,
            mcp_http_addr: args.mcp_http_addr,
            mcp_stateful: args.mcp_stateful,
        })
    }
}
