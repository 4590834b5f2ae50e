use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "svcprobed", version, about = "Service status daemon")]
pub struct Cli {
    /// Directory for daily rolling log files (console only when unset)
    #[arg(long, env = "SVCPROBE_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the status API
    Serve(ServeOpts),
    /// Encrypt a client secret for the services file
    Encrypt(EncryptOpts),
    /// Print a fresh secret key
    Keygen,
}

#[derive(clap::Args)]
pub struct ServeOpts {
    #[arg(long, env = "SVCPROBE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(short, long, env = "SVCPROBE_PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "SVCPROBE_SERVICES_FILE", default_value = "config/services.json")]
    pub services_file: PathBuf,

    /// A file named after a service in this directory marks it disabled
    #[arg(long, env = "SVCPROBE_DISABLED_DIR")]
    pub disabled_dir: Option<PathBuf>,

    /// 64 hex characters; required for `encrypted:` client secrets
    #[arg(long, env = "SVCPROBE_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    #[arg(long, env = "SVCPROBE_CONNECT_TIMEOUT_MS", default_value_t = 1000)]
    pub connect_timeout_ms: u64,

    #[arg(long, env = "SVCPROBE_READ_TIMEOUT_MS", default_value_t = 1000)]
    pub read_timeout_ms: u64,
}

#[derive(clap::Args)]
pub struct EncryptOpts {
    #[arg(long, env = "SVCPROBE_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    pub plaintext: String,
}
