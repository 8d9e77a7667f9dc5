use cardbox::config::Config;
use cardbox::db::Store;
use cardbox::domain::catalog::{CatalogParams, CatalogScope};
use cardbox::models::card::CardInput;
use cardbox::services::UserInfo;
use cardbox::state::SharedState;

struct Fixture {
    state: SharedState,
    admin: UserInfo,
    category_id: i32,
}

async fn setup(config: Config) -> Fixture {
    let store = Store::new("sqlite::memory:").await.unwrap();
    let admin = store.get_user_by_username("admin").await.unwrap().unwrap();
    let category = store.create_category("Rust", "rust").await.unwrap();

    Fixture {
        state: SharedState::with_store(config, store),
        admin: UserInfo::from(admin),
        category_id: category.id,
    }
}

impl Fixture {
    async fn add_card(&self, question: &str, answer: &str, tags: &[&str]) -> i32 {
        let input = CardInput {
            question: question.to_string(),
            answer: answer.to_string(),
            category_id: self.category_id,
            tags: tags.iter().map(ToString::to_string).collect(),
        };
        self.state
            .store
            .create_card(&input, self.admin.id.value())
            .await
            .unwrap()
            .id
    }
}

fn params(pairs: &[(&str, &str)]) -> CatalogParams {
    let mut p = CatalogParams::default();
    for (k, v) in pairs {
        let v = Some((*v).to_string());
        match *k {
            "sort" => p.sort = v,
            "order" => p.order = v,
            "search_query" => p.search_query = v,
            "page" => p.page = v,
            "status" => p.status = v,
            "has_code" => p.has_code = v,
            other => panic!("unknown param {other}"),
        }
    }
    p
}

fn ids(page: &cardbox::api::CatalogPageDto) -> Vec<i32> {
    page.cards.iter().map(|c| c.id).collect()
}

#[tokio::test]
async fn test_search_matches_question_answer_or_tag_once() {
    let fx = setup(Config::default()).await;
    let a = fx.add_card("How does Tokio schedule tasks?", "Work stealing", &[]).await;
    let b = fx.add_card("Runtime?", "Use TOKIO::main", &["async"]).await;
    let c = fx.add_card("Borrowing?", "Shared or unique", &[]).await;
    let d = fx.add_card("Channels?", "mpsc", &["tokio", "tokio-util"]).await;

    let page = fx
        .state
        .catalog_service
        .list_cards(
            CatalogScope::All,
            &params(&[("search_query", "tok(io|en)"), ("sort", "id"), ("order", "asc")]),
        )
        .await
        .unwrap();

    assert_eq!(ids(&page), vec![a, b, d]);
    assert_eq!(ids(&page).iter().filter(|&&id| id == d).count(), 1);
    assert!(!ids(&page).contains(&c));
    assert_eq!(page.page.total_items, 3);
    assert_eq!(page.search_query, "tok(io|en)");
}

#[tokio::test]
async fn test_invalid_pattern_matches_literally() {
    let fx = setup(Config::default()).await;
    let hit = fx.add_card("What does vec![(] do?", "Nothing good", &[]).await;
    fx.add_card("Other", "Unrelated", &[]).await;

    let page = fx
        .state
        .catalog_service
        .list_cards(CatalogScope::All, &params(&[("search_query", "![(  ")]))
        .await
        .unwrap();

    assert_eq!(page.search_query, "![(");
    assert_eq!(ids(&page), vec![hit]);
}

#[tokio::test]
async fn test_page_numbers_are_clamped() {
    let fx = setup(Config::default()).await;
    for i in 0..35 {
        fx.add_card(&format!("Question {i:02}?"), "Answer", &[]).await;
    }

    let service = &fx.state.catalog_service;

    let first = service
        .list_cards(CatalogScope::All, &params(&[]))
        .await
        .unwrap();
    assert_eq!(first.cards.len(), 30);
    assert_eq!(first.page.number, 1);
    assert_eq!(first.page.total_pages, 2);
    assert!(first.page.has_next);
    assert!(!first.page.has_previous);

    let beyond = service
        .list_cards(CatalogScope::All, &params(&[("page", "5")]))
        .await
        .unwrap();
    let last = service
        .list_cards(CatalogScope::All, &params(&[("page", "last")]))
        .await
        .unwrap();
    assert_eq!(beyond.page.number, 2);
    assert_eq!(beyond.cards.len(), 5);
    assert_eq!(ids(&beyond), ids(&last));
    assert!(!beyond.page.has_next);

    let huge = service
        .list_cards(
            CatalogScope::All,
            &params(&[("page", "99999999999999999999999")]),
        )
        .await
        .unwrap();
    assert_eq!(huge.page.number, 2);
    assert_eq!(ids(&huge), ids(&last));

    for junk in ["abc", "0", "-3"] {
        let page = service
            .list_cards(CatalogScope::All, &params(&[("page", junk)]))
            .await
            .unwrap();
        assert_eq!(page.page.number, 1, "page={junk}");
        assert_eq!(ids(&page), ids(&first));
    }

    let searched = service
        .list_cards(
            CatalogScope::All,
            &params(&[("search_query", "question"), ("page", "9")]),
        )
        .await
        .unwrap();
    assert_eq!(searched.page.number, 2);
    assert_eq!(searched.cards.len(), 5);
}

#[tokio::test]
async fn test_counts_are_served_from_cache_until_expiry() {
    let fx = setup(Config::default()).await;
    fx.add_card("First?", "one", &[]).await;

    let site = fx.state.catalog_service.site_context().await.unwrap();
    assert_eq!(site.cards_count, 1);

    fx.add_card("Second?", "two", &[]).await;

    let site = fx.state.catalog_service.site_context().await.unwrap();
    assert_eq!(site.cards_count, 1);
    assert_eq!(fx.state.store.count_cards().await.unwrap(), 2);
}

#[tokio::test]
async fn test_disabled_cache_always_recomputes() {
    let mut config = Config::default();
    config.cache.enabled = false;
    let fx = setup(config).await;

    let site = fx.state.catalog_service.site_context().await.unwrap();
    assert_eq!(site.cards_count, 0);

    fx.add_card("First?", "one", &[]).await;

    let site = fx.state.catalog_service.site_context().await.unwrap();
    assert_eq!(site.cards_count, 1);
}

#[tokio::test]
async fn test_sort_by_views() {
    let fx = setup(Config::default()).await;
    let quiet = fx.add_card("Quiet?", "q", &[]).await;
    let busy = fx.add_card("Busy?", "b", &[]).await;

    for _ in 0..3 {
        assert!(fx.state.store.increment_card_views(busy).await.unwrap());
    }

    let page = fx
        .state
        .catalog_service
        .list_cards(CatalogScope::All, &params(&[("sort", "views")]))
        .await
        .unwrap();
    assert_eq!(page.sort, "views");
    assert_eq!(ids(&page), vec![busy, quiet]);
    assert_eq!(page.cards[0].views, 3);

    let page = fx
        .state
        .catalog_service
        .list_cards(
            CatalogScope::All,
            &params(&[("sort", "VIEWS"), ("order", "asc")]),
        )
        .await
        .unwrap();
    assert_eq!(ids(&page), vec![quiet, busy]);
}
