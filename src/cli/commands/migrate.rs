use anyhow::Context;

use crate::config::config;
use crate::database::DatabaseManager;

pub async fn handle() -> anyhow::Result<()> {
    let db = DatabaseManager::connect(&config().database)
        .await
        .context("failed to connect to database")?;

    db.migrate().await.context("failed to apply migrations")?;
    db.close().await;

    println!("Migrations applied");
    Ok(())
}
