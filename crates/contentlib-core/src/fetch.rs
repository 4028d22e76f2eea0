//! Reusable "fetch on mount" state for screens.
//!
//! Every screen that shows upstream data keeps the same three pieces of
//! state: a loading flag, an error message and the payload. [`Fetcher`]
//! owns that state and drives it from a [`Query`], which names the resource
//! and knows how to pull it out of a [`ContentSource`].
//!
//! Each load is stamped with a sequence number. Only the most recently
//! started load may write its result; a slower, older response that lands
//! after a newer one is discarded, so changing the identifier mid-flight can
//! never leave stale data on screen.

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::model::{ContentItem, ContentKey};
use crate::privacy::PrivacyPolicy;
use crate::source::ContentSource;

/// Snapshot of a screen's fetch state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<T>,
}

/// What a screen should render for a [`FetchState`].
#[derive(Debug, PartialEq, Eq)]
pub enum View<'a, T> {
    Loading,
    Failed(&'a str),
    Ready(&'a T),
}

impl<T> FetchState<T> {
    /// Three-way render branch. `not_found` is shown when loading finished
    /// without an error but also without data.
    pub fn view<'a>(&'a self, not_found: &'a str) -> View<'a, T> {
        if self.loading {
            View::Loading
        } else if let Some(error) = &self.error {
            View::Failed(error)
        } else if let Some(data) = &self.data {
            View::Ready(data)
        } else {
            View::Failed(not_found)
        }
    }
}

/// Proof that a load was started; hand it back to [`Fetcher::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
struct Slot<T> {
    state: FetchState<T>,
    latest: u64,
}

/// Loading/error/data state with stale-response protection.
///
/// The ticket counter lives under the same lock as the state, so issuing a
/// ticket and checking one can never interleave.
#[derive(Debug)]
pub struct Fetcher<T> {
    slot: Mutex<Slot<T>>,
}

impl<T> Default for Fetcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Fetcher<T> {
    /// Screens start out loading: the first fetch is issued on mount.
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                state: FetchState {
                    loading: true,
                    error: None,
                    data: None,
                },
                latest: 0,
            }),
        }
    }

    /// Start a load: set loading, clear the error, and issue a new ticket.
    /// Any ticket issued earlier becomes stale.
    pub async fn begin(&self) -> Ticket {
        let mut slot = self.slot.lock().await;
        slot.latest = slot.latest.wrapping_add(1);
        slot.state.loading = true;
        slot.state.error = None;
        Ticket(slot.latest)
    }

    /// Record the outcome of the load behind `ticket`.
    ///
    /// Returns `false` (and changes nothing) when a newer load has started
    /// since. Otherwise stores the data or the error and clears loading.
    pub async fn finish(&self, ticket: Ticket, result: Result<T, String>) -> bool {
        let mut slot = self.slot.lock().await;
        if ticket.0 != slot.latest {
            debug!(ticket = ticket.0, latest = slot.latest, "discarding stale fetch result");
            return false;
        }
        match result {
            Ok(data) => slot.state.data = Some(data),
            Err(message) => slot.state.error = Some(message),
        }
        slot.state.loading = false;
        true
    }

    /// Run `query` against `source` and record the result.
    ///
    /// Failures are turned into the query's human-readable message; the
    /// return value is the same as [`finish`](Self::finish).
    pub async fn load<Q>(&self, source: &dyn ContentSource, query: &Q) -> bool
    where
        Q: Query<Output = T>,
    {
        let ticket = self.begin().await;
        let result = query.run(source).await.map_err(|err| {
            warn!(resource = Q::RESOURCE, error = %err, "fetch failed");
            err.describe(Q::RESOURCE)
        });
        self.finish(ticket, result).await
    }
}

impl<T: Clone> Fetcher<T> {
    /// Copy of the current state for rendering.
    pub async fn snapshot(&self) -> FetchState<T> {
        self.slot.lock().await.state.clone()
    }
}

/// A resource a screen can fetch, parameterized by its identifier.
#[async_trait::async_trait]
pub trait Query: Send + Sync {
    type Output: Send;

    /// Resource name used in user-facing error messages.
    const RESOURCE: &'static str;

    /// Fetch and unwrap the resource.
    ///
    /// # Errors
    ///
    /// Returns the source's error, or [`FetchError::Rejected`] when the
    /// envelope does not report success.
    async fn run(&self, source: &dyn ContentSource) -> Result<Self::Output, FetchError>;
}

/// One page of the listing plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub items: Vec<ContentItem>,
    pub count: Option<u64>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// The homepage listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { page: 1 }
    }
}

#[async_trait::async_trait]
impl Query for ListQuery {
    type Output = Listing;
    const RESOURCE: &'static str = "case studies";

    async fn run(&self, source: &dyn ContentSource) -> Result<Listing, FetchError> {
        let mut envelope = source.list(self.page.max(1)).await?;
        let count = envelope.count.take();
        let next = envelope.next.take();
        let previous = envelope.previous.take();
        Ok(Listing {
            items: envelope.into_data()?,
            count,
            next,
            previous,
        })
    }
}

/// A detail screen's item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuery(pub ContentKey);

#[async_trait::async_trait]
impl Query for ItemQuery {
    type Output = ContentItem;
    const RESOURCE: &'static str = "case study";

    async fn run(&self, source: &dyn ContentSource) -> Result<ContentItem, FetchError> {
        source.item(&self.0).await?.into_data()
    }
}

/// The privacy policy page. `None` means the upstream has no policy content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrivacyQuery;

#[async_trait::async_trait]
impl Query for PrivacyQuery {
    type Output = Option<PrivacyPolicy>;
    const RESOURCE: &'static str = "privacy policy";

    async fn run(&self, source: &dyn ContentSource) -> Result<Option<PrivacyPolicy>, FetchError> {
        let data = source.privacy_policy().await?.into_data()?;
        Ok(PrivacyPolicy::from_data(&data))
    }
}
