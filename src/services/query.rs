//! Turns a [`QuerySpec`] into a typed card query and a search matcher.
//!
//! Scope and the exact-match filters run in SQL. The free-text pattern is a
//! regular expression, which SQLite cannot evaluate, so it is applied to the
//! loaded candidates by [`SearchMatcher`].

use regex::{Regex, RegexBuilder};
use sea_orm::{
    ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, Select, sea_query::Query,
};
use tracing::debug;

use crate::constants::catalog::CODE_FENCE;
use crate::domain::catalog::{CatalogScope, QuerySpec, SortDirection, SortField};
use crate::entities::{card_tags, cards, categories, prelude::*};
use crate::models::card::Card;

const REGEX_SIZE_LIMIT: usize = 1 << 20;

#[must_use]
pub const fn sort_column(field: SortField) -> cards::Column {
    match field {
        SortField::Id => cards::Column::Id,
        SortField::Question => cards::Column::Question,
        SortField::Answer => cards::Column::Answer,
        SortField::Category => cards::Column::CategoryId,
        SortField::Status => cards::Column::Status,
        SortField::Views => cards::Column::Views,
        SortField::UploadDate => cards::Column::UploadDate,
        SortField::Author => cards::Column::AuthorId,
    }
}

const fn sort_order(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Ascending => Order::Asc,
        SortDirection::Descending => Order::Desc,
    }
}

pub struct QueryComposer;

impl QueryComposer {
    /// Scoped, filtered and ordered select. Search is not part of it.
    #[must_use]
    pub fn compose(spec: &QuerySpec) -> Select<cards::Entity> {
        let mut select = Cards::find();

        select = match &spec.scope {
            CatalogScope::All => select,
            CatalogScope::Category(slug) => select.filter(
                cards::Column::CategoryId.in_subquery(
                    Query::select()
                        .column(categories::Column::Id)
                        .from(Categories)
                        .and_where(categories::Column::Slug.eq(slug.as_str()))
                        .to_owned(),
                ),
            ),
            CatalogScope::Tag(tag_id) => select.filter(
                cards::Column::Id.in_subquery(
                    Query::select()
                        .column(card_tags::Column::CardId)
                        .from(CardTags)
                        .and_where(card_tags::Column::TagId.eq(tag_id.value()))
                        .to_owned(),
                ),
            ),
            CatalogScope::Author(user_id) => {
                select.filter(cards::Column::AuthorId.eq(user_id.value()))
            }
        };

        if let Some(status) = spec.status {
            select = select.filter(cards::Column::Status.eq(status));
        }

        select = match spec.has_code {
            Some(true) => select.filter(cards::Column::Answer.contains(CODE_FENCE)),
            Some(false) => {
                select.filter(cards::Column::Answer.not_like(format!("%{CODE_FENCE}%")))
            }
            None => select,
        };

        let order = sort_order(spec.direction);
        select
            .order_by(sort_column(spec.sort), order.clone())
            .order_by(cards::Column::Id, order)
    }
}

/// Case-insensitive match against question, answer and tag names.
#[derive(Debug, Clone)]
pub enum SearchMatcher {
    Pattern(Regex),
    /// Used when the pattern is not a valid regular expression.
    Literal(String),
}

impl SearchMatcher {
    /// `None` for an empty pattern, which means no filtering.
    #[must_use]
    pub fn new(pattern: &str) -> Option<Self> {
        if pattern.is_empty() {
            return None;
        }

        let matcher = match RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
        {
            Ok(regex) => Self::Pattern(regex),
            Err(e) => {
                debug!(error = %e, "Search pattern is not a valid regex, matching literally");
                Self::Literal(pattern.to_lowercase())
            }
        };

        Some(matcher)
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Pattern(regex) => regex.is_match(text),
            Self::Literal(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }

    #[must_use]
    pub fn matches(&self, card: &Card) -> bool {
        self.is_match(&card.question)
            || self.is_match(&card.answer)
            || card.tags.iter().any(|tag| self.is_match(&tag.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TagId, UserId};
    use crate::entities::cards::CardStatus;
    use crate::models::card::TagRef;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(spec: &QuerySpec) -> String {
        QueryComposer::compose(spec).build(DbBackend::Sqlite).to_string()
    }

    fn card(question: &str, answer: &str, tags: &[&str]) -> Card {
        Card {
            id: 1,
            question: question.to_string(),
            answer: answer.to_string(),
            category: None,
            tags: tags
                .iter()
                .enumerate()
                .map(|(i, name)| TagRef {
                    id: i as i32 + 1,
                    name: (*name).to_string(),
                })
                .collect(),
            status: CardStatus::Unchecked,
            views: 0,
            upload_date: "2024-01-01T00:00:00.000000Z".to_string(),
            author_id: 1,
            author: None,
        }
    }

    #[test]
    fn test_default_order_is_upload_date_desc() {
        let sql = sql(&QuerySpec::default());
        assert!(sql.contains(r#"ORDER BY "cards"."upload_date" DESC, "cards"."id" DESC"#), "{sql}");
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_sort_field_maps_to_column() {
        let spec = QuerySpec {
            sort: SortField::Category,
            direction: SortDirection::Ascending,
            ..QuerySpec::default()
        };
        assert!(sql(&spec).contains(r#"ORDER BY "cards"."category_id" ASC"#));
    }

    #[test]
    fn test_scopes_use_exact_matches() {
        let by_slug = sql(&QuerySpec {
            scope: CatalogScope::Category("rust-basics".to_string()),
            ..QuerySpec::default()
        });
        assert!(by_slug.contains(r#""slug" = 'rust-basics'"#), "{by_slug}");
        assert!(!by_slug.contains("LIKE"));

        let by_tag = sql(&QuerySpec {
            scope: CatalogScope::Tag(TagId::new(4)),
            ..QuerySpec::default()
        });
        assert!(by_tag.contains(r#""tag_id" = 4"#), "{by_tag}");

        let by_author = sql(&QuerySpec {
            scope: CatalogScope::Author(UserId::new(9)),
            ..QuerySpec::default()
        });
        assert!(by_author.contains(r#""cards"."author_id" = 9"#), "{by_author}");
    }

    #[test]
    fn test_optional_filters() {
        let spec = QuerySpec {
            status: Some(CardStatus::Checked),
            has_code: Some(false),
            ..QuerySpec::default()
        };
        let sql = sql(&spec);
        assert!(sql.contains(r#""cards"."status" = 1"#), "{sql}");
        assert!(sql.contains("NOT LIKE '%```%'"), "{sql}");
    }

    #[test]
    fn test_empty_pattern_has_no_matcher() {
        assert!(SearchMatcher::new("").is_none());
    }

    #[test]
    fn test_matcher_unions_fields() {
        let matcher = SearchMatcher::new("foo").unwrap();

        assert!(matcher.matches(&card("What is FOO?", "bar", &[])));
        assert!(matcher.matches(&card("q", "a foo b", &[])));
        assert!(matcher.matches(&card("q", "a", &["misc", "Foo"])));
        assert!(!matcher.matches(&card("q", "a", &["bar"])));
    }

    #[test]
    fn test_matcher_uses_regex_semantics() {
        let matcher = SearchMatcher::new("^how .* work").unwrap();
        assert!(matcher.matches(&card("How does borrowing work?", "", &[])));
        assert!(!matcher.matches(&card("Explain how it works", "", &[])));
    }

    #[test]
    fn test_invalid_regex_matches_literally() {
        let matcher = SearchMatcher::new("vec![").unwrap();
        assert!(matches!(matcher, SearchMatcher::Literal(_)));
        assert!(matcher.matches(&card("Q", "use VEC![1, 2]", &[])));
        assert!(!matcher.matches(&card("Q", "use vec(", &[])));
    }
}
