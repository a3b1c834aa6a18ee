//! Automatic pagination over paged search endpoints.
//!
//! Search actions return one page per call together with a `paging`
//! block. A [`PaginatedRequest`] walks pages lazily: page `p + 1` is only
//! requested once the caller has consumed page `p` and more results
//! remain (`pageIndex * pageSize < total`).
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//!
//! let mut projects = sonar.projects().search().query("backend").items();
//! while let Some(project) = projects.try_next().await? {
//!     println!("{}", project.key);
//! }
//!
//! // Or drain everything at once
//! let all = sonar.projects().search().collect_all().await?;
//! ```

use std::fmt;

use futures::future::{self, BoxFuture};
use futures::stream::{self, BoxStream};
use futures::{FutureExt, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::clients::api::ApiError;
use crate::request::builder::{Endpoint, ExecutorFuture, RequestBuilder};
use crate::request::params::{ParamMap, ParamValue};
use crate::request::rules::{validate, Rule, ValidationError};

/// Page index parameter.
pub const PAGE_PARAM: &str = "p";

/// Page size parameter.
pub const PAGE_SIZE_PARAM: &str = "ps";

/// The `paging` block of a paged response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// 1-based index of this page.
    pub page_index: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Total number of results across all pages.
    pub total: u64,
}

impl Paging {
    /// Returns `true` if results remain after this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        u64::from(self.page_index) * u64::from(self.page_size) < self.total
    }

    /// Returns the index of the following page, if any.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        if self.has_more() {
            self.page_index.checked_add(1)
        } else {
            None
        }
    }
}

/// A response that carries one page of items.
pub trait Paginated {
    /// The element type of the page.
    type Item: Send + 'static;

    /// Returns the paging block.
    fn paging(&self) -> &Paging;

    /// Returns the number of items on this page.
    fn item_count(&self) -> usize;

    /// Consumes the page, returning its items.
    fn into_items(self) -> Vec<Self::Item>;
}

/// An [`Endpoint`] that returns [`Paginated`] responses.
pub trait PaginatedEndpoint: Endpoint {
    /// Page size sent when the caller does not choose one.
    const DEFAULT_PAGE_SIZE: u32 = 100;

    /// Largest page size the server accepts.
    const MAX_PAGE_SIZE: u32 = 500;
}

enum Walk {
    Start,
    Next(u32),
    Done,
}

/// A request builder for a paged endpoint.
///
/// Wraps a [`RequestBuilder`] and adds page selection plus lazy traversal
/// of every page ([`pages`](Self::pages)) or every item
/// ([`items`](Self::items)).
///
/// The `p` and `ps` parameters are always sent; `ps` falls back to the
/// endpoint default.
pub struct PaginatedRequest<E: Endpoint> {
    builder: RequestBuilder<E>,
}

impl<E: Endpoint> Clone for PaginatedRequest<E> {
    fn clone(&self) -> Self {
        Self {
            builder: self.builder.clone(),
        }
    }
}

impl<E: Endpoint> fmt::Debug for PaginatedRequest<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatedRequest")
            .field("builder", &self.builder)
            .finish()
    }
}

impl<E> PaginatedRequest<E>
where
    E: PaginatedEndpoint,
    E::Response: Paginated,
{
    /// Wraps `builder`.
    #[must_use]
    pub const fn new(builder: RequestBuilder<E>) -> Self {
        Self { builder }
    }

    /// Selects the first page to fetch (1-based).
    #[must_use]
    pub fn page(self, page: u32) -> Self {
        self.param(PAGE_PARAM, page)
    }

    /// Sets the page size, at most the endpoint maximum.
    #[must_use]
    pub fn page_size(self, size: u32) -> Self {
        self.param(PAGE_SIZE_PARAM, size)
    }

    /// Stores `value` under `key`, replacing any previous value.
    #[must_use]
    pub fn param(self, key: &str, value: impl Into<ParamValue>) -> Self {
        Self::new(self.builder.param(key, value))
    }

    /// Stores `value` under `key` if it is `Some`.
    #[must_use]
    pub fn param_opt<V: Into<ParamValue>>(self, key: &str, value: Option<V>) -> Self {
        Self::new(self.builder.param_opt(key, value))
    }

    /// Appends `value` to the comma-separated list under `key`.
    #[must_use]
    pub fn append(self, key: &str, value: impl Into<String>) -> Self {
        Self::new(self.builder.append(key, value))
    }

    /// Appends `value` to the repeated-key list under `key`.
    #[must_use]
    pub fn append_multi(self, key: &str, value: impl Into<String>) -> Self {
        Self::new(self.builder.append_multi(key, value))
    }

    /// Removes `key` from the map.
    #[must_use]
    pub fn clear(self, key: &str) -> Self {
        Self::new(self.builder.clear(key))
    }

    /// Returns the accumulated parameters.
    #[must_use]
    pub const fn params(&self) -> &ParamMap {
        self.builder.params()
    }

    /// Checks the parameters against the endpoint rules and the page bounds.
    ///
    /// # Errors
    ///
    /// Returns the first rule violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.cursor().map(|_| ())
    }

    /// Fetches the selected page only.
    ///
    /// # Errors
    ///
    /// The future resolves to a validation error or to the executor's error.
    pub fn execute(&self) -> ExecutorFuture<E::Response> {
        match self.cursor() {
            Ok((page, size)) => self.fetch(page, size),
            Err(error) => Box::pin(future::ready(Err(error.into()))),
        }
    }

    /// Returns a lazy stream of pages, starting at the selected page.
    ///
    /// The stream ends after the last page, after an empty page, or after
    /// the first error.
    #[must_use]
    pub fn pages(&self) -> BoxStream<'static, Result<E::Response, ApiError>> {
        stream::try_unfold((self.clone(), Walk::Start), |(request, walk)| {
            request.advance(walk)
        })
        .boxed()
    }

    /// Returns a lazy stream of every item across all remaining pages.
    #[must_use]
    pub fn items(
        &self,
    ) -> BoxStream<'static, Result<<E::Response as Paginated>::Item, ApiError>> {
        self.pages()
            .map_ok(|page| stream::iter(page.into_items().into_iter().map(Ok::<_, ApiError>)))
            .try_flatten()
            .boxed()
    }

    /// Fetches every remaining page and returns all items in order.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; items already fetched are dropped.
    pub fn collect_all(
        &self,
    ) -> BoxFuture<'static, Result<Vec<<E::Response as Paginated>::Item>, ApiError>> {
        self.items().try_collect::<Vec<_>>().boxed()
    }

    fn page_rules() -> [Rule; 2] {
        [
            Rule::Range {
                key: PAGE_PARAM,
                min: 1,
                max: i64::from(u32::MAX),
            },
            Rule::Range {
                key: PAGE_SIZE_PARAM,
                min: 1,
                max: i64::from(E::MAX_PAGE_SIZE),
            },
        ]
    }

    /// Validates the parameters and returns the starting page and page size.
    fn cursor(&self) -> Result<(u32, u32), ValidationError> {
        let params = self.builder.params();
        validate(&Self::page_rules(), params)?;
        self.builder.validate()?;
        let page = int_param(params, PAGE_PARAM).unwrap_or(1);
        let size = int_param(params, PAGE_SIZE_PARAM).unwrap_or(E::DEFAULT_PAGE_SIZE);
        Ok((page, size))
    }

    fn fetch(&self, page: u32, size: u32) -> ExecutorFuture<E::Response> {
        tracing::debug!("Fetching page {} of {} (page size {})", page, E::PATH, size);
        let mut params = self.builder.params().clone();
        params.set(PAGE_PARAM, page);
        params.set(PAGE_SIZE_PARAM, size);
        self.builder.execute_with(params)
    }

    async fn advance(self, walk: Walk) -> Result<Option<(E::Response, (Self, Walk))>, ApiError> {
        let (start, size) = self.cursor()?;
        let page = match walk {
            Walk::Start => start,
            Walk::Next(page) => page,
            Walk::Done => return Ok(None),
        };

        let response = self.fetch(page, size).await?;
        let next = Self::next_walk(&response, page);
        Ok(Some((response, (self, next))))
    }

    fn next_walk(response: &E::Response, requested: u32) -> Walk {
        if response.item_count() == 0 {
            tracing::debug!("Page {} of {} is empty, stopping", requested, E::PATH);
            return Walk::Done;
        }
        match response.paging().next_page() {
            // A server echoing a stale pageIndex must not make the walk loop
            Some(next) if next > requested => Walk::Next(next),
            _ => Walk::Done,
        }
    }
}

fn int_param(params: &ParamMap, key: &str) -> Option<u32> {
    match params.get(key) {
        Some(ParamValue::Int(value)) => u32::try_from(*value).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpMethod;
    use crate::request::rules::ValidationReason;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Deserialize)]
    struct NumberPage {
        paging: Paging,
        numbers: Vec<u64>,
    }

    impl Paginated for NumberPage {
        type Item = u64;

        fn paging(&self) -> &Paging {
            &self.paging
        }

        fn item_count(&self) -> usize {
            self.numbers.len()
        }

        fn into_items(self) -> Vec<u64> {
            self.numbers
        }
    }

    struct Numbers;

    impl Endpoint for Numbers {
        type Response = NumberPage;
        const METHOD: HttpMethod = HttpMethod::Get;
        const PATH: &'static str = "api/numbers/search";
    }

    impl PaginatedEndpoint for Numbers {
        const DEFAULT_PAGE_SIZE: u32 = 2;
        const MAX_PAGE_SIZE: u32 = 3;
    }

    /// Serves `total` consecutive numbers, recording every requested page.
    fn numbers(total: u64) -> (PaginatedRequest<Numbers>, Arc<Mutex<Vec<u32>>>) {
        let requested = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requested);
        let builder = RequestBuilder::from_fn(move |params: ParamMap| {
            let page = int_param(&params, PAGE_PARAM).unwrap();
            let size = int_param(&params, PAGE_SIZE_PARAM).unwrap();
            log.lock().unwrap().push(page);
            let first = u64::from(page - 1) * u64::from(size);
            let last = (first + u64::from(size)).min(total);
            async move {
                Ok(NumberPage {
                    paging: Paging {
                        page_index: page,
                        page_size: size,
                        total,
                    },
                    numbers: (first..last).collect(),
                })
            }
        });
        (PaginatedRequest::new(builder), requested)
    }

    #[test]
    fn test_has_more() {
        let paging = Paging {
            page_index: 1,
            page_size: 100,
            total: 250,
        };
        assert!(paging.has_more());
        assert_eq!(paging.next_page(), Some(2));

        let last = Paging {
            page_index: 3,
            page_size: 100,
            total: 250,
        };
        assert!(!last.has_more());
        assert_eq!(last.next_page(), None);
    }

    #[test]
    fn test_has_more_does_not_overflow() {
        let paging = Paging {
            page_index: u32::MAX,
            page_size: u32::MAX,
            total: u64::MAX,
        };
        assert!(paging.has_more());
    }

    #[test]
    fn test_paging_deserializes_camel_case() {
        let paging: Paging =
            serde_json::from_str(r#"{"pageIndex":2,"pageSize":50,"total":120}"#).unwrap();
        assert_eq!(paging.page_index, 2);
        assert_eq!(paging.page_size, 50);
        assert_eq!(paging.total, 120);
    }

    #[tokio::test]
    async fn test_collect_all_walks_every_page() {
        let (request, requested) = numbers(5);
        let all = request.collect_all().await.unwrap();

        assert_eq!(all, vec![0, 1, 2, 3, 4]);
        assert_eq!(*requested.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_exact_multiple_stops_without_extra_request() {
        let (request, requested) = numbers(4);
        let all = request.collect_all().await.unwrap();

        assert_eq!(all.len(), 4);
        assert_eq!(*requested.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_pages_are_fetched_lazily() {
        let (request, requested) = numbers(100);
        let mut items = request.items();

        assert_eq!(items.try_next().await.unwrap(), Some(0));
        assert_eq!(items.try_next().await.unwrap(), Some(1));
        assert_eq!(*requested.lock().unwrap(), vec![1]);

        drop(items);
        assert_eq!(requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_walk_starts_at_selected_page() {
        let (request, requested) = numbers(6);
        let all = request.page(2).collect_all().await.unwrap();

        assert_eq!(all, vec![2, 3, 4, 5]);
        assert_eq!(*requested.lock().unwrap(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_execute_fetches_single_page() {
        let (request, requested) = numbers(10);
        let page = request.page_size(3).execute().await.unwrap();

        assert_eq!(page.numbers, vec![0, 1, 2]);
        assert_eq!(page.paging.total, 10);
        assert_eq!(*requested.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_empty_result_yields_nothing() {
        let (request, requested) = numbers(0);
        let all = request.collect_all().await.unwrap();

        assert!(all.is_empty());
        assert_eq!(*requested.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_page_size_above_maximum_is_rejected() {
        let (request, requested) = numbers(10);
        let error = request.page_size(4).collect_all().await.unwrap_err();

        match error {
            ApiError::Validation(e) => {
                assert_eq!(e.reason, ValidationReason::OutOfRange);
                assert_eq!(e.parameter, "ps");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(requested.lock().unwrap().is_empty());
    }

    #[test]
    fn test_page_zero_is_rejected() {
        let (request, _) = numbers(10);
        let error = request.page(0).validate().unwrap_err();
        assert_eq!(error.reason, ValidationReason::OutOfRange);
        assert_eq!(error.parameter, "p");
    }

    #[tokio::test]
    async fn test_error_ends_the_stream() {
        let calls = Arc::new(Mutex::new(0_u32));
        let counter = Arc::clone(&calls);
        let builder = RequestBuilder::<Numbers>::from_fn(move |params: ParamMap| {
            let page = int_param(&params, PAGE_PARAM).unwrap();
            *counter.lock().unwrap() += 1;
            async move {
                if page == 1 {
                    Ok(NumberPage {
                        paging: Paging {
                            page_index: 1,
                            page_size: 2,
                            total: 6,
                        },
                        numbers: vec![0, 1],
                    })
                } else {
                    Err(ApiError::from_status(500, vec![], None))
                }
            }
        });

        let results: Vec<_> = PaginatedRequest::new(builder).pages().collect().await;

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().status(), Some(500));
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_stale_page_index_stops_the_walk() {
        let calls = Arc::new(Mutex::new(0_u32));
        let counter = Arc::clone(&calls);
        let builder = RequestBuilder::<Numbers>::from_fn(move |_| {
            *counter.lock().unwrap() += 1;
            async {
                Ok(NumberPage {
                    paging: Paging {
                        page_index: 0,
                        page_size: 2,
                        total: 10,
                    },
                    numbers: vec![0, 1],
                })
            }
        });

        let all = PaginatedRequest::new(builder).collect_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_default_page_size_within_maximum() {
        assert!(Numbers::DEFAULT_PAGE_SIZE <= Numbers::MAX_PAGE_SIZE);
    }
}
