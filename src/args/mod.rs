use clap::Parser;
use std::fs;

pub mod types;
pub mod validation;

pub use types::{Args, CleanArgs};

/// Parses and validates the command line. Logging should be up before the
/// result is turned into [`CleanArgs`] so unreadable scripts get reported.
///
/// # Errors
///
/// Will return `Err` if the arguments are invalid
pub fn args_checks() -> Result<Args, String> {
    let args = Args::parse();
    args.validate()?;
    Ok(args)
}

impl CleanArgs {
    #[must_use]
    pub fn new(args: Args) -> Self {
        let mut combined_sql_script = String::new();
        if let Some(db_startup_script) = &args.db_startup_script {
            for file in db_startup_script.split(';') {
                let file = file.trim();
                if file.is_empty() {
                    continue;
                }

                match fs::read_to_string(file) {
                    Ok(script) => {
                        combined_sql_script.push_str(&script);
                        // push a newline just in case
                        combined_sql_script.push('\n');
                    }
                    Err(e) => {
                        tracing::warn!(file, error = %e, "failed to read sql startup script");
                    }
                }
            }
        }
        CleanArgs {
            db_name: args.db_name,
            db_startup_script: args.db_startup_script,
            db_populate_json: args.db_populate_json,
            combined_sql_script,
            bind: args.bind,
            round_minutes: args.round_minutes,
            log_level: args.log_level.to_ascii_lowercase(),
            log_json: args.log_json,
        }
    }
}
