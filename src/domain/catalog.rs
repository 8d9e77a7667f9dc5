//! Request-scoped description of a catalog listing.
//!
//! Raw query-string values are normalized here once. Anything that is not
//! recognized falls back to a default instead of producing an error, so a
//! listing request can never fail because of its parameters.

use std::num::IntErrorKind;

use serde::Deserialize;

use super::{TagId, UserId};
use crate::entities::cards::CardStatus;

/// Columns a listing may be ordered by.
///
/// Only these map to query columns; see [`SortField::from_param`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    Question,
    Answer,
    Category,
    Status,
    Views,
    #[default]
    UploadDate,
    Author,
}

impl SortField {
    pub const ALL: [Self; 8] = [
        Self::Id,
        Self::Question,
        Self::Answer,
        Self::Category,
        Self::Status,
        Self::Views,
        Self::UploadDate,
        Self::Author,
    ];

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(raw))
    }

    /// Unknown or missing names become the default field.
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse).unwrap_or_default()
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Question => "question",
            Self::Answer => "answer",
            Self::Category => "category",
            Self::Status => "status",
            Self::Views => "views",
            Self::UploadDate => "upload_date",
            Self::Author => "author",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// Only `asc` (any case) selects ascending order.
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("asc") => Self::Ascending,
            _ => Self::Descending,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Which subset of cards a listing starts from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogScope {
    #[default]
    All,
    Category(String),
    Tag(TagId),
    Author(UserId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Number(u64),
    Last,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::Number(1)
    }
}

impl PageRequest {
    /// `last`, or a positive integer. A number too large for `u64` is the
    /// last page. Anything else is page 1.
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim) else {
            return Self::default();
        };

        if raw.eq_ignore_ascii_case("last") {
            return Self::Last;
        }

        match raw.parse::<u64>() {
            Ok(n) if n > 0 => Self::Number(n),
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => Self::Last,
            _ => Self::default(),
        }
    }
}

/// Query-string parameters of a listing, as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogParams {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search_query: Option<String>,
    pub page: Option<String>,
    pub status: Option<String>,
    pub has_code: Option<String>,
}

/// A validated listing request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuerySpec {
    pub scope: CatalogScope,
    pub sort: SortField,
    pub direction: SortDirection,
    /// Trimmed and length-capped. Empty means no search.
    pub search: String,
    pub status: Option<CardStatus>,
    pub has_code: Option<bool>,
    pub page: PageRequest,
}

impl QuerySpec {
    #[must_use]
    pub fn from_params(scope: CatalogScope, params: &CatalogParams, max_search_length: usize) -> Self {
        let search = params
            .search_query
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .chars()
            .take(max_search_length)
            .collect();

        let has_code = match params
            .has_code
            .as_deref()
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("yes" | "true" | "1") => Some(true),
            Some("no" | "false" | "0") => Some(false),
            _ => None,
        };

        Self {
            scope,
            sort: SortField::from_param(params.sort.as_deref()),
            direction: SortDirection::from_param(params.order.as_deref()),
            search,
            status: params.status.as_deref().and_then(CardStatus::parse),
            has_code,
            page: PageRequest::from_param(params.page.as_deref()),
        }
    }

    #[must_use]
    pub fn has_search(&self) -> bool {
        !self.search.is_empty()
    }
}
