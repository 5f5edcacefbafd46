use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{data_loader::data_loader::DataLoader, database::models::user::AuthorSummary, error::AppError};

pub const PATH: &str = "/api/users/subscriptions";
pub const DEFAULT_PAGE_SIZE: i64 = 6;

#[derive(Deserialize, Debug, Default, Clone)]
pub struct SubscriptionsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub recipes_limit: Option<usize>,
}

impl SubscriptionsQuery {
    fn page_size(&self) -> i64 {
        self.limit
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    fn link(&self, page: i64) -> String {
        let mut link = format!("{PATH}?page={page}&limit={}", self.page_size());
        if let Some(recipes_limit) = self.recipes_limit {
            link.push_str(&format!("&recipes_limit={recipes_limit}"));
        }
        link
    }
}

/// Paginated envelope, `next` and `previous` link to the neighbouring pages.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Authors followed by `viewer_id`, one page at a time.
pub fn list(
    loader: &dyn DataLoader,
    viewer_id: i32,
    query: &SubscriptionsQuery,
) -> Result<Page<AuthorSummary>, AppError> {
    let page = query.page.unwrap_or(1);
    let limit = query.page_size();
    let offset = page
        .checked_sub(1)
        .filter(|index| *index >= 0)
        .and_then(|index| index.checked_mul(limit))
        .ok_or(AppError::NotFound("page"))?;

    let (count, results) = loader.load_subscriptions(viewer_id, limit, offset, query.recipes_limit)?;

    // Page 1 always exists, even when the user follows nobody
    if page > 1 && results.is_empty() {
        return Err(AppError::NotFound("page"));
    }

    trace!(viewer_id, page, count, "Listed subscriptions");

    let next = (offset + (results.len() as i64) < count).then(|| query.link(page + 1));
    let previous = (page > 1).then(|| query.link(page - 1));

    Ok(Page {
        count,
        next,
        previous,
        results,
    })
}
