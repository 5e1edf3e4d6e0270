use crate::messages::{ErrorPolicy, Locale};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "github-explorer")]
#[command(about = "GitHub Explorer - Look up repositories, keep a list of them and browse their open issues")]
#[command(version)]
pub struct Cli {
    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = crate::github::API_BASE_URL)]
    pub api_url: String,

    /// Personal access token sent with every request
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Where the repository list is persisted
    #[arg(long, env = "EXPLORER_STORAGE", value_enum, default_value_t = StorageKind::File)]
    pub storage: StorageKind,

    /// Directory for the file storage backend
    #[arg(long, env = "EXPLORER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// SurrealDB connection URL
    #[arg(long, env = "DB_URL", default_value = "ws://localhost:8000")]
    pub db_url: String,

    /// SurrealDB username
    #[arg(long, env = "DB_USER", default_value = "root")]
    pub db_user: String,

    /// SurrealDB password
    #[arg(long, env = "DB_PASS", default_value = "root", hide_env_values = true)]
    pub db_pass: String,

    /// SurrealDB namespace
    #[arg(long, env = "DB_NAMESPACE", default_value = "explorer")]
    pub db_namespace: String,

    /// SurrealDB database
    #[arg(long, env = "DB_DATABASE", default_value = "explorer")]
    pub db_database: String,

    /// Language of the lookup messages
    #[arg(long, env = "EXPLORER_LOCALE", value_enum, default_value_t = Locale::En)]
    pub locale: Locale,

    /// Whether lookup failures share one message or get one per cause
    #[arg(long, env = "EXPLORER_ERROR_MESSAGES", value_enum, default_value_t = ErrorPolicy::Uniform)]
    pub error_messages: ErrorPolicy,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Look up a repository and add it to the list
    Add {
        /// Repository as owner/name
        repository: String,
    },
    /// Show the list of repositories looked up so far
    List,
    /// Show a repository's counters and open issues
    Show {
        /// Repository as owner/name
        repository: String,
    },
    /// Serve the list and detail views over HTTP
    Serve {
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 3333)]
        port: u16,

        /// Address to bind
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1")]
        bind: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    File,
    Memory,
    Surreal,
}
