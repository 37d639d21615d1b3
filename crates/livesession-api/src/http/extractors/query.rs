//! Query parameter extractors for list endpoints.
//!
//! Missing values fall back to the service defaults in the handlers.

use serde::Deserialize;

/// `?limit&offset` paging.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?limit` for the recent-transcripts window.
#[derive(Debug, Deserialize, Default)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// `?transcript_limit` for restoration context.
#[derive(Debug, Deserialize, Default)]
pub struct ContextQuery {
    pub transcript_limit: Option<i64>,
}
