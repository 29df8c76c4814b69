use std::collections::HashSet;

use common::TeamId;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

/// Pagination metadata included in list responses.
#[derive(Serialize, utoipa::ToSchema)]
pub struct Pagination {
    /// Current page number (1-based).
    #[schema(example = 1)]
    pub page: u64,
    /// Number of items per page.
    #[schema(example = 20)]
    pub per_page: u64,
    /// Total number of matching items across all pages.
    #[schema(example = 47)]
    pub total: u64,
    /// Total number of pages.
    #[schema(example = 3)]
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// `?page=&per_page=` query parameters.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// Page number (1-indexed).
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page (1-100, default 20).
    #[param(example = 20)]
    pub per_page: Option<u64>,
}

impl PageQuery {
    /// Page clamped to at least 1, page size clamped to 1..=100.
    pub fn resolve(&self) -> (u64, u64) {
        let page = Ord::max(self.page.unwrap_or(1), 1);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }
}

/// Validate a submitted team order (non-empty, no duplicates). Size and
/// membership are checked by the domain.
pub fn validate_team_order(teams: &[TeamId]) -> Result<(), AppError> {
    if teams.is_empty() {
        return Err(AppError::Validation("teams must not be empty".into()));
    }
    let mut seen = HashSet::new();
    for id in teams {
        if !seen.insert(id) {
            return Err(AppError::Validation(format!(
                "Duplicate team {id} in ranking"
            )));
        }
    }
    Ok(())
}
