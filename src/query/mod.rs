use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::record::Record;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown sort key '{value}' for {kind} records, expected one of: {expected}")]
    UnknownSortKey {
        kind: &'static str,
        value: String,
        expected: String,
    },

    #[error("unknown sort order '{value}', expected asc or desc")]
    UnknownSortOrder { value: String },

    #[error("invalid page size {value}, expected positive integer")]
    InvalidPageSize { value: usize },

    #[error("unknown record kind '{value}', expected case or gazette")]
    UnknownRecordKind { value: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" | "oldest" => Ok(Self::Ascending),
            "desc" | "descending" | "newest" => Ok(Self::Descending),
            _ => Err(QueryError::UnknownSortOrder {
                value: value.to_string(),
            }),
        }
    }
}

/// What the user currently wants to see: search term, ordering and page cursor.
///
/// Updates go through the `with_*` methods, which return a new value. Changing
/// the term, sort key, sort order or page size moves the cursor back to page 1.
pub struct QuerySpec<R: Record> {
    search_term: String,
    sort_key: R::SortKey,
    sort_order: SortOrder,
    page: usize,
    page_size: NonZeroUsize,
}

// Bounds live on `R::SortKey`, not on `R`.
impl<R: Record> Clone for QuerySpec<R> {
    fn clone(&self) -> Self {
        Self {
            search_term: self.search_term.clone(),
            sort_key: self.sort_key,
            sort_order: self.sort_order,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

impl<R: Record> fmt::Debug for QuerySpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuerySpec")
            .field("search_term", &self.search_term)
            .field("sort_key", &self.sort_key)
            .field("sort_order", &self.sort_order)
            .field("page", &self.page)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl<R: Record> PartialEq for QuerySpec<R> {
    fn eq(&self, other: &Self) -> bool {
        self.search_term == other.search_term
            && self.sort_key == other.sort_key
            && self.sort_order == other.sort_order
            && self.page == other.page
            && self.page_size == other.page_size
    }
}

impl<R: Record> Eq for QuerySpec<R> {}

impl<R: Record> Default for QuerySpec<R> {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            sort_key: R::SortKey::default(),
            sort_order: SortOrder::default(),
            page: 1,
            page_size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl<R: Record> QuerySpec<R> {
    pub fn new(
        search_term: &str,
        sort_key: R::SortKey,
        sort_order: SortOrder,
        page: usize,
        page_size: usize,
    ) -> Result<Self, QueryError> {
        let page_size =
            NonZeroUsize::new(page_size).ok_or(QueryError::InvalidPageSize { value: page_size })?;
        Ok(Self {
            search_term: search_term.to_string(),
            sort_key,
            sort_order,
            page: page.max(1),
            page_size,
        })
    }

    /// Builds a query from user-facing strings, rejecting unknown sort keys and orders.
    pub fn parse(
        search_term: &str,
        sort_key: &str,
        sort_order: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Self, QueryError> {
        let sort_key = sort_key.parse::<R::SortKey>()?;
        let sort_order = sort_order.parse::<SortOrder>()?;
        Self::new(search_term, sort_key, sort_order, page, page_size)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort_key(&self) -> R::SortKey {
        self.sort_key
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn with_search_term(&self, search_term: &str) -> Self {
        if search_term == self.search_term {
            return self.clone();
        }
        Self {
            search_term: search_term.to_string(),
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_sort_key(&self, sort_key: R::SortKey) -> Self {
        if sort_key == self.sort_key {
            return self.clone();
        }
        Self {
            sort_key,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_sort_order(&self, sort_order: SortOrder) -> Self {
        if sort_order == self.sort_order {
            return self.clone();
        }
        Self {
            sort_order,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_page_size(&self, page_size: NonZeroUsize) -> Self {
        if page_size == self.page_size {
            return self.clone();
        }
        Self {
            page_size,
            page: 1,
            ..self.clone()
        }
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }
}

impl<R: Record> Serialize for QuerySpec<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("QuerySpec", 5)?;
        s.serialize_field("search_term", &self.search_term)?;
        s.serialize_field("sort_key", &self.sort_key.to_string())?;
        s.serialize_field("sort_order", &self.sort_order)?;
        s.serialize_field("page", &self.page)?;
        s.serialize_field("page_size", &self.page_size.get())?;
        s.end()
    }
}
