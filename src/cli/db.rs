use tokio::process::Command;

use crate::{
    core::db::{init_pool, run_migrations},
    settings::Config,
};

async fn sqlx_cli(args: &[&str]) -> anyhow::Result<()> {
    let status = Command::new("sqlx").args(args).status().await?;
    if !status.success() {
        anyhow::bail!("sqlx {} exited with {}", args.join(" "), status);
    }
    Ok(())
}

pub async fn db_generate(migration_name: &str) -> anyhow::Result<()> {
    sqlx_cli(&["migrate", "add", migration_name, "-r"]).await
}

pub async fn db_list(config: &Config) -> anyhow::Result<()> {
    sqlx_cli(&["migrate", "info", "-D", &config.database_url]).await
}

/// Apply pending migrations with the set embedded in the binary.
pub async fn db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = init_pool(config).await?;
    run_migrations(&pool).await
}

pub async fn db_revert(config: &Config) -> anyhow::Result<()> {
    sqlx_cli(&["migrate", "revert", "-D", &config.database_url]).await
}
