//! Query parameters for listing endpoints.
//!
//! Listing endpoints accept `search`, `page` and `limit`. The raw values are
//! captured as strings so that a malformed number is reported as a
//! validation failure by the request pipeline instead of being rejected by
//! the HTTP extractor before authentication has run.
//!
//! # Example
//!
//! ```ignore
//! // GET /v1/admin/getall?search=ann&page=3&limit=20
//! let page = query.page()?;
//! assert_eq!(page.offset, 40); // (page - 1) * limit
//! ```

use serde::Deserialize;
use utoipa::IntoParams;

use crate::rules::RuleViolation;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Free-text search forwarded to the backend
    pub search: Option<String>,
    /// Page number (1-indexed, default: 1)
    #[param(value_type = Option<u64>)]
    pub page: Option<String>,
    /// Items per page (default: 10)
    #[param(value_type = Option<u64>)]
    pub limit: Option<String>,
    /// Owner filter (task listing only)
    pub user_id: Option<String>,
}

/// Validated paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
}

fn parse_non_negative(field: &'static str, raw: Option<&str>, default: u64) -> Result<u64, RuleViolation> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => value
            .parse::<u64>()
            .map_err(|_| RuleViolation::new(field, "must be a non-negative integer")),
    }
}

impl ListQuery {
    pub fn page(&self) -> Result<Page, RuleViolation> {
        let page = parse_non_negative("page", self.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_non_negative("limit", self.limit.as_deref(), DEFAULT_LIMIT)?;
        let offset = page.max(1).saturating_sub(1).saturating_mul(limit);

        Ok(Page {
            page,
            limit,
            offset,
        })
    }

    pub fn search(&self) -> String {
        self.search.clone().unwrap_or_default()
    }

    pub fn owner_id(&self) -> String {
        self.user_id.clone().unwrap_or_default()
    }
}
