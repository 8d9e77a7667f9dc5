use cardbox::db::Store;
use cardbox::domain::CardId;
use cardbox::models::card::CardInput;
use cardbox::services::{IncrementOutcome, ViewCounter};
use futures::future::join_all;
use std::path::PathBuf;

struct TempDb {
    path: PathBuf,
}

impl TempDb {
    fn new() -> Self {
        let path = std::env::temp_dir().join(format!("cardbox-test-{}.db", uuid::Uuid::new_v4()));
        Self { path }
    }

    fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut name = self.path.clone().into_os_string();
            name.push(suffix);
            let _ = std::fs::remove_file(PathBuf::from(name));
        }
    }
}

async fn seeded_card(store: &Store) -> i32 {
    let admin = store.get_user_by_username("admin").await.unwrap().unwrap();
    let category = store.create_category("Rust", "rust").await.unwrap();
    let input = CardInput {
        question: "Counted?".to_string(),
        answer: "Yes".to_string(),
        category_id: category.id,
        tags: vec![],
    };
    store.create_card(&input, admin.id).await.unwrap().id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_increments_are_not_lost() {
    let db = TempDb::new();
    let store = Store::with_pool_options(&db.url(), 8, 1).await.unwrap();
    let id = seeded_card(&store).await;
    let counter = ViewCounter::new(store.clone());

    let handles: Vec<_> = (0..100)
        .map(|_| counter.spawn_increment(CardId::new(id)))
        .collect();
    let outcomes = join_all(handles).await;

    assert!(
        outcomes
            .into_iter()
            .all(|o| o.unwrap() == IncrementOutcome::Counted)
    );

    let card = store.get_card(id).await.unwrap().unwrap();
    assert_eq!(card.views, 100);
}

#[tokio::test]
async fn test_increment_of_missing_card_is_reported() {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let counter = ViewCounter::new(store);

    assert_eq!(
        counter.increment(CardId::new(4242)).await,
        IncrementOutcome::Missing
    );
}

#[tokio::test]
async fn test_increment_leaves_other_fields_alone() {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let id = seeded_card(&store).await;
    let before = store.get_card(id).await.unwrap().unwrap();

    let counter = ViewCounter::new(store.clone());
    assert_eq!(
        counter.increment(CardId::new(id)).await,
        IncrementOutcome::Counted
    );

    let after = store.get_card(id).await.unwrap().unwrap();
    assert_eq!(after.views, before.views + 1);
    assert_eq!(after.question, before.question);
    assert_eq!(after.upload_date, before.upload_date);
    assert_eq!(after.status, before.status);
}
