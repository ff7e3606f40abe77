//! Latest predictive insights, refreshed by refetching

use crate::config::FeedConfig;
use crate::models::AiInsight;

/// Default number of insights kept
pub const DEFAULT_LIMIT: usize = 10;

/// Newest-first insights. The backend join (machine name) is only available
/// on a full read, so every change event triggers a refetch via [`InsightFeed::replace`].
#[derive(Debug, Clone, PartialEq)]
pub struct InsightFeed {
    limit: usize,
    insights: Vec<AiInsight>,
}

impl Default for InsightFeed {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl InsightFeed {
    /// Create an empty feed keeping at most `limit` insights
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            insights: Vec::new(),
        }
    }

    /// Create an empty feed sized by the feed configuration
    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.insight_limit)
    }

    /// Replace with a refetched page, ordered newest first and capped
    pub fn replace(&mut self, mut rows: Vec<AiInsight>) {
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(self.limit);
        self.insights = rows;
    }

    /// Insights, newest first
    pub fn as_slice(&self) -> &[AiInsight] {
        &self.insights
    }

    /// Whether no insights are held
    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }
}
