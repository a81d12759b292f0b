use rusty_teesheet::args::{self, CleanArgs};
use rusty_teesheet::controller::seed;
use rusty_teesheet::storage::{SqliteStorage, Storage};
use rusty_teesheet::{ClubContext, ServiceSettings, logging, router};

use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[actix_web::main]
async fn main() -> Result<(), BoxError> {
    let args = args::args_checks()?;
    logging::init_logging(&args.log_level, args.log_json)?;
    let args = CleanArgs::new(args);

    let storage = Arc::new(SqliteStorage::open(&args.db_name)?);
    run_startup_tasks(&args, storage.as_ref()).await?;

    let ctx = ClubContext::new(
        storage,
        ServiceSettings {
            round_minutes: args.round_minutes,
        },
    );
    let ctx = Data::new(ctx);

    tracing::info!(bind = %args.bind, db = %args.db_name, "tee sheet listening");
    HttpServer::new(move || {
        App::new()
            .app_data(ctx.clone())
            .wrap(Logger::default())
            .configure(router::configure)
    })
    .bind(args.bind)?
    .run()
    .await?;
    Ok(())
}

async fn run_startup_tasks(args: &CleanArgs, storage: &dyn Storage) -> Result<(), BoxError> {
    storage.apply_schema().await?;

    if !args.combined_sql_script.trim().is_empty() {
        storage.execute_batch(&args.combined_sql_script).await?;
        tracing::info!(scripts = ?args.db_startup_script, "startup sql applied");
    }

    if let Some(json_data) = &args.db_populate_json {
        seed::seed_roster(storage, json_data).await?;
    }

    Ok(())
}
