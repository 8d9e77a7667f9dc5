//! Stats command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_stats(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let cards = store.count_cards().await?;
    let users = store.count_users().await?;
    let categories = store.count_categories().await?;
    let tags = store.count_tags().await?;

    println!("Catalog statistics");
    println!("{:-<30}", "");
    println!("{:<12}{:>18}", "Cards", cards);
    println!("{:<12}{:>18}", "Users", users);
    println!("{:<12}{:>18}", "Categories", categories);
    println!("{:<12}{:>18}", "Tags", tags);

    Ok(())
}
