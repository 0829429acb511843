//! `db` command handlers.

/// # Errors
///
/// Returns an error if the `SELECT 1` round trip fails.
pub(crate) async fn run_db_ping(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    nextcoffee_db::ping(pool).await?;
    println!("database: ok");
    Ok(())
}

/// # Errors
///
/// Returns an error if any migration fails to apply.
pub(crate) async fn run_db_migrate(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let applied = nextcoffee_db::run_migrations(pool).await?;
    tracing::info!(applied, "migrations complete");
    if applied == 0 {
        println!("database is up to date");
    } else {
        println!("applied {applied} migration(s)");
    }
    Ok(())
}
