use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Uniform JSON envelope returned by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip)]
    status: Option<u16>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            count: None,
            pagination: None,
            status: None,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: Some(StatusCode::CREATED.as_u16()),
            ..Self::ok(data)
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// List payload with `count` set to the number of returned items.
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len() as u64;
        Self::ok(items).with_count(count)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self
            .status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

/// Empty `data` object, serialized as `{}`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Empty {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PageRef {
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

impl Pagination {
    /// `prev` exists iff `page > 1`; `next` exists iff `page * limit < total`.
    pub fn compute(page: u64, limit: u64, total: u64) -> Self {
        let end = page.saturating_mul(limit);
        Self {
            next: (end < total).then_some(PageRef {
                page: page + 1,
                limit,
            }),
            prev: (page > 1).then_some(PageRef {
                page: page - 1,
                limit,
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number (default 1)
    pub page: Option<u64>,
    /// Page size (default 10, max 100)
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn page(&self) -> u64 {
        self.page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u64 {
        self.limit
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT)
    }

    pub fn offset(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_first_page() {
        let p = Pagination::compute(1, 10, 25);
        assert_eq!(p.next, Some(PageRef { page: 2, limit: 10 }));
        assert_eq!(p.prev, None);
    }

    #[test]
    fn test_pagination_last_page() {
        let p = Pagination::compute(3, 10, 25);
        assert_eq!(p.next, None);
        assert_eq!(p.prev, Some(PageRef { page: 2, limit: 10 }));
    }

    #[test]
    fn test_pagination_exact_boundary() {
        // 2 * 10 == 20, nothing left after page 2
        let p = Pagination::compute(2, 10, 20);
        assert_eq!(p.next, None);
        assert!(p.prev.is_some());

        let p = Pagination::compute(1, 10, 0);
        assert_eq!(p, Pagination::default());
    }

    #[test]
    fn test_page_query_defaults_and_clamp() {
        let q = PageQuery::default();
        assert_eq!((q.page(), q.limit(), q.offset()), (1, 10, 0));

        let q = PageQuery {
            page: Some(0),
            limit: Some(500),
        };
        assert_eq!((q.page(), q.limit()), (1, MAX_LIMIT));

        let q = PageQuery {
            page: Some(3),
            limit: Some(5),
        };
        assert_eq!(q.offset(), 10);
    }

    #[test]
    fn test_envelope_omits_absent_fields() {
        let json = serde_json::to_value(ApiResponse::ok(Empty {})).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": {} }));

        let json = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(json["count"], 3);
        assert!(json.get("pagination").is_none());
    }
}
