//! Suggestion sources
//!
//! A source maps a query (the text typed after `@`) to an ordered list of
//! candidates. From the coordinator's point of view it is an opaque async
//! lookup: it may be slow, it may fail, and several calls for different
//! queries may be in flight at once. Ranking is entirely the source's job.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::trace;

use crate::error::Result;

/// Trait for looking up mention candidates
#[async_trait]
pub trait SuggestionSource<T: Send + 'static>: Send + Sync {
    /// Fetch candidates for `query`
    ///
    /// # Arguments
    /// * `query` - Text after the trigger, possibly empty
    ///
    /// # Returns
    /// * `Result<Vec<T>>` - Candidates in display order, or a failure
    async fn fetch(&self, query: &str) -> Result<Vec<T>>;
}

#[async_trait]
impl<T, S> SuggestionSource<T> for Arc<S>
where
    T: Send + 'static,
    S: SuggestionSource<T> + ?Sized,
{
    async fn fetch(&self, query: &str) -> Result<Vec<T>> {
        (**self).fetch(query).await
    }
}

type FetchFn<T> = dyn Fn(String) -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync;

/// Source backed by an async closure.
///
/// ```
/// use mentionkit::suggest::{FnSource, SuggestionSource};
///
/// # tokio_test::block_on(async {
/// let source = FnSource::new(|query: String| async move {
///     Ok(vec![format!("{query}1"), format!("{query}2")])
/// });
/// assert_eq!(source.fetch("al").await.unwrap(), vec!["al1", "al2"]);
/// # });
/// ```
pub struct FnSource<T> {
    fetch: Box<FetchFn<T>>,
}

impl<T: Send + 'static> FnSource<T> {
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        Self {
            fetch: Box::new(move |query| f(query).boxed()),
        }
    }
}

#[async_trait]
impl<T: Send + 'static> SuggestionSource<T> for FnSource<T> {
    async fn fetch(&self, query: &str) -> Result<Vec<T>> {
        (self.fetch)(query.to_string()).await
    }
}

/// In-memory source filtering a fixed candidate list.
///
/// Candidates whose display string starts with the query (ignoring case)
/// are returned in the list's own order. An empty query matches everything.
pub struct StaticSource<T> {
    candidates: Vec<T>,
    display: Arc<dyn Fn(&T) -> String + Send + Sync>,
    latency: Option<Duration>,
    limit: Option<usize>,
}

impl<T: Clone + Send + Sync + 'static> StaticSource<T> {
    /// Create a new static source
    ///
    /// # Arguments
    /// * `candidates` - All candidates, in the order they should be offered
    /// * `display` - Text matched against the query
    pub fn new<D>(candidates: Vec<T>, display: D) -> Self
    where
        D: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            candidates,
            display: Arc::new(display),
            latency: None,
            limit: None,
        }
    }

    /// Delay every answer, to mimic a remote directory.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Return at most `limit` matches.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn filter_by_prefix(&self, query: &str) -> Vec<T> {
        let needle = query.to_lowercase();
        let matches = self
            .candidates
            .iter()
            .filter(|c| (self.display)(c).to_lowercase().starts_with(&needle))
            .cloned();

        match self.limit {
            Some(limit) => matches.take(limit).collect(),
            None => matches.collect(),
        }
    }
}

impl StaticSource<String> {
    /// Static source over plain names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(Into::into).collect(), String::clone)
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> SuggestionSource<T> for StaticSource<T> {
    async fn fetch(&self, query: &str) -> Result<Vec<T>> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let found = self.filter_by_prefix(query);
        trace!("static source matched {} candidates for '@{}'", found.len(), query);
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MentionError, SourceError};
    use tokio_test::{assert_err, assert_ok};

    #[derive(Debug, Clone, PartialEq)]
    struct User {
        id: &'static str,
        name: &'static str,
    }

    fn users() -> StaticSource<User> {
        StaticSource::new(
            vec![
                User { id: "1", name: "john" },
                User { id: "2", name: "Joanna" },
                User { id: "3", name: "alice" },
                User { id: "4", name: "jo" },
            ],
            |u: &User| u.name.to_string(),
        )
    }

    #[tokio::test]
    async fn test_static_prefix_keeps_order() {
        let found = assert_ok!(users().fetch("jo").await);
        let ids: Vec<_> = found.iter().map(|u| u.id).collect();
        // No reordering: "jo" is an exact match but stays last.
        assert_eq!(ids, vec!["1", "2", "4"]);
    }

    #[tokio::test]
    async fn test_static_empty_query_matches_all() {
        let found = assert_ok!(users().fetch("").await);
        assert_eq!(found.len(), 4);
    }

    #[tokio::test]
    async fn test_static_case_insensitive() {
        let found = assert_ok!(users().fetch("JOA").await);
        assert_eq!(found, vec![User { id: "2", name: "Joanna" }]);
    }

    #[tokio::test]
    async fn test_static_limit() {
        let found = assert_ok!(users().with_limit(2).fetch("j").await);
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_static_no_match() {
        let source = StaticSource::from_names(["alpha", "beta"]);
        assert!(assert_ok!(source.fetch("z").await).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_static_latency() {
        let source = StaticSource::from_names(["alpha"]).with_latency(Duration::from_secs(5));
        let started = tokio::time::Instant::now();
        let found = assert_ok!(source.fetch("a").await);
        assert_eq!(found, vec!["alpha".to_string()]);
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_fn_source_failure() {
        let source: FnSource<String> = FnSource::new(|query: String| async move {
            Err(SourceError::FetchFailed {
                query,
                reason: "offline".to_string(),
            }
            .into())
        });
        let err = assert_err!(source.fetch("al").await);
        assert!(matches!(err, MentionError::Source(SourceError::FetchFailed { .. })));
    }

    #[tokio::test]
    async fn test_arc_source_delegates() {
        let source = Arc::new(StaticSource::from_names(["bob", "carol"]));
        let found = assert_ok!(SuggestionSource::<String>::fetch(&source, "c").await);
        assert_eq!(found, vec!["carol".to_string()]);
    }
}
