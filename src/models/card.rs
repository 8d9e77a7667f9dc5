use serde::{Deserialize, Serialize};

use crate::constants::catalog::CODE_FENCE;
use crate::entities::cards::CardStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRef {
    pub id: i32,
    pub name: String,
}

/// A card with its category, tags and author resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: i32,
    pub question: String,
    pub answer: String,
    pub category: Option<CategoryRef>,
    pub tags: Vec<TagRef>,
    pub status: CardStatus,
    pub views: i64,
    pub upload_date: String,
    pub author_id: i32,
    pub author: Option<String>,
}

impl Card {
    #[must_use]
    pub fn has_code(&self) -> bool {
        answer_has_code(&self.answer)
    }
}

#[must_use]
pub fn answer_has_code(answer: &str) -> bool {
    answer.contains(CODE_FENCE)
}

/// Writable fields of a card.
#[derive(Debug, Clone)]
pub struct CardInput {
    pub question: String,
    pub answer: String,
    pub category_id: i32,
    pub tags: Vec<String>,
}

impl CardInput {
    /// Trimmed, non-empty, de-duplicated tag names in input order.
    #[must_use]
    pub fn tag_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.tags.len());
        for raw in &self.tags {
            let name = raw.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_names_normalized() {
        let input = CardInput {
            question: "q".into(),
            answer: "a".into(),
            category_id: 1,
            tags: vec![" rust ".into(), "".into(), "rust".into(), "sql".into()],
        };
        assert_eq!(input.tag_names(), vec!["rust", "sql"]);
    }

    #[test]
    fn test_answer_has_code() {
        assert!(answer_has_code("see\n```rust\nfn main() {}\n```"));
        assert!(!answer_has_code("plain `inline` text"));
    }
}
