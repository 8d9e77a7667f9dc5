//! User management command handlers

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_create_user(
    config: &Config,
    username: &str,
    password: &str,
    staff: bool,
) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    if store.get_user_by_username(username).await?.is_some() {
        anyhow::bail!("User '{username}' already exists");
    }

    let user = store
        .create_user(username, password, staff, &config.security)
        .await?;

    println!("Created user {} (id {})", user.username, user.id);
    if user.is_staff {
        println!("  Role: staff");
    }
    println!("  API key: {}", user.api_key);

    Ok(())
}
