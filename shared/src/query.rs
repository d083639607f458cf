//! Image list query: pagination and sort parameters
//!
//! Raw query-string values arrive as strings so that a malformed value can be
//! reported as a validation error instead of an extractor rejection.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::Image;

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    CreatedAt,
    Likes,
    FileName,
}

impl SortBy {
    /// Parse a `sortBy` value; unknown names yield `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "createdAt" => Some(Self::CreatedAt),
            "likes" => Some(Self::Likes),
            "fileName" => Some(Self::FileName),
            _ => None,
        }
    }

    /// Column name in the `uploaded_images` table
    pub const fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Likes => "likes",
            Self::FileName => "file_name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// `GET /api/images` query string, as received
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Validated list query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListQuery {
    /// `None` returns every remaining row
    pub limit: Option<i64>,
    pub offset: i64,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl ListQuery {
    pub fn new(limit: Option<i64>, offset: i64) -> Self {
        Self {
            limit,
            offset,
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort_by: SortBy, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }
}

impl TryFrom<ListParams> for ListQuery {
    type Error = AppError;

    fn try_from(params: ListParams) -> Result<Self, Self::Error> {
        let limit = parse_count("limit", params.limit.as_deref())?;
        let offset = parse_count("offset", params.offset.as_deref())?.unwrap_or(0);

        // An unknown column resets the whole sort to the default, order included.
        let (sort_by, sort_order) = match params.sort_by.as_deref().map(SortBy::parse) {
            None => (
                SortBy::default(),
                params
                    .sort_order
                    .as_deref()
                    .and_then(SortOrder::parse)
                    .unwrap_or_default(),
            ),
            Some(None) => (SortBy::default(), SortOrder::default()),
            Some(Some(sort_by)) => (
                sort_by,
                params
                    .sort_order
                    .as_deref()
                    .and_then(SortOrder::parse)
                    .unwrap_or_default(),
            ),
        };

        Ok(Self {
            limit,
            offset,
            sort_by,
            sort_order,
        })
    }
}

fn parse_count(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(value) if value >= 0 => Ok(Some(value)),
        _ => Err(
            AppError::validation(format!("{field} must be a non-negative integer"))
                .with_detail("field", field)
                .with_detail("value", raw),
        ),
    }
}

/// `GET /api/images` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageListResponse {
    pub rows: Vec<Image>,
    /// Count of all non-deleted records, not just this page
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn params(
        limit: Option<&str>,
        offset: Option<&str>,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
    ) -> ListParams {
        ListParams {
            limit: limit.map(Into::into),
            offset: offset.map(Into::into),
            sort_by: sort_by.map(Into::into),
            sort_order: sort_order.map(Into::into),
        }
    }

    #[test]
    fn test_defaults() {
        let q = ListQuery::try_from(ListParams::default()).unwrap();
        assert_eq!(q.limit, None);
        assert_eq!(q.offset, 0);
        assert_eq!(q.sort_by, SortBy::CreatedAt);
        assert_eq!(q.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_recognized_sort() {
        let q = ListQuery::try_from(params(Some("9"), Some("18"), Some("likes"), Some("asc")))
            .unwrap();
        assert_eq!(q.limit, Some(9));
        assert_eq!(q.offset, 18);
        assert_eq!(q.sort_by, SortBy::Likes);
        assert_eq!(q.sort_order, SortOrder::Asc);

        let q = ListQuery::try_from(params(None, None, Some("fileName"), None)).unwrap();
        assert_eq!(q.sort_by, SortBy::FileName);
        assert_eq!(q.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_unknown_sort_by_falls_back_to_created_at_desc() {
        let q = ListQuery::try_from(params(None, None, Some("title"), Some("asc"))).unwrap();
        assert_eq!(q.sort_by, SortBy::CreatedAt);
        assert_eq!(q.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_unknown_sort_order_means_desc() {
        let q = ListQuery::try_from(params(None, None, Some("likes"), Some("up"))).unwrap();
        assert_eq!(q.sort_by, SortBy::Likes);
        assert_eq!(q.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_rejects_bad_counts() {
        let err = ListQuery::try_from(params(Some("-1"), None, None, None)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.unwrap().get("field").unwrap(), "limit");

        let err = ListQuery::try_from(params(None, Some("ten"), None, None)).unwrap_err();
        assert_eq!(err.details.unwrap().get("field").unwrap(), "offset");
    }

    #[test]
    fn test_blank_counts_are_absent() {
        let q = ListQuery::try_from(params(Some(""), Some(" "), None, None)).unwrap();
        assert_eq!(q.limit, None);
        assert_eq!(q.offset, 0);
    }

    #[test]
    fn test_sort_sql() {
        assert_eq!(SortBy::Likes.column(), "likes");
        assert_eq!(SortBy::FileName.column(), "file_name");
        assert_eq!(SortOrder::Asc.sql(), "ASC");
    }
}
