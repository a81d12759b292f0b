use clap::Parser;
use serde_json::Value;
use std::net::SocketAddr;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The sqlite filename, or `:memory:` for a throwaway database.
    #[arg(short = 'n', long, value_name = "DATABASE_NAME")]
    pub db_name: String,
    /// If specified, this sql is run on program startup. Several files can be given separated by `;`.
    #[arg(long, value_name = "DATABASE_STARTUP_SCRIPT", value_parser = crate::args::validation::check_readable_file)]
    pub db_startup_script: Option<String>,
    /// Members and caddies to upsert on startup.
    #[arg(
        long,
        value_name = "ROSTER_JSON",
        value_parser = crate::args::validation::check_readable_file_and_json
    )]
    pub db_populate_json: Option<Value>,
    #[arg(short = 'b', long, value_name = "ADDRESS", default_value = "0.0.0.0:8081")]
    pub bind: SocketAddr,
    /// Minutes a caddie stays tied to one tee time.
    #[arg(long, value_name = "MINUTES", default_value_t = 240)]
    pub round_minutes: i64,
    /// Used when `RUST_LOG` is not set.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
    #[arg(long)]
    pub log_json: bool,
}

#[derive(Debug, Clone)]
pub struct CleanArgs {
    pub db_name: String,
    pub db_startup_script: Option<String>,
    pub db_populate_json: Option<Value>,
    pub combined_sql_script: String,
    pub bind: SocketAddr,
    pub round_minutes: i64,
    pub log_level: String,
    pub log_json: bool,
}
