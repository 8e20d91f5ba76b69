//! The store and its actions.
//!
//! Each action follows the same shape:
//! 1. mark the slice pending (or refuse, under `RejectWhilePending`)
//! 2. await the API call
//! 3. apply exactly one success or failure, unless the slice was abandoned
//!    in the meantime
//!
//! Dropping an action's future before step 3 releases the slice, so a
//! timed-out request never leaves it pending.
//!
//! Transitions are applied through a `tokio::sync::watch` channel, so each
//! one atomically replaces the slice and wakes subscribers. No lock is held
//! across an await.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use bazaar_core::BrandId;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::resource::Ticket;
use super::state::{
    AdminState, BrandCreate, BrandDelete, BrandDetails, BrandUpdate, Brands, Orders,
    ProductUpload, Products, Slice,
};
use super::{GENERIC_FAILURE, StoreError, SubmissionPolicy, UPLOAD_FAILURE};
use crate::api::{ApiClient, ApiError};
use crate::forms::{BrandPatch, NewBrand, UploadBatch};

/// How a dispatched request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    /// Success was applied to the slice.
    Fulfilled,
    /// Failure was applied; the slice error holds this message.
    Rejected(String),
    /// The slice was abandoned while the request was in flight.
    Discarded,
}

impl Settled {
    #[must_use]
    pub const fn is_fulfilled(&self) -> bool {
        matches!(self, Self::Fulfilled)
    }
}

/// Injectable container for the admin state.
///
/// Cheap to clone; clones share state and API client.
#[derive(Clone)]
pub struct AdminStore {
    inner: Arc<AdminStoreInner>,
}

struct AdminStoreInner {
    api: ApiClient,
    state: watch::Sender<AdminState>,
    policy: SubmissionPolicy,
}

impl std::fmt::Debug for AdminStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminStore")
            .field("api", &self.inner.api)
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}

impl AdminStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(api: ApiClient, policy: SubmissionPolicy) -> Self {
        Self {
            inner: Arc::new(AdminStoreInner {
                api,
                state: watch::Sender::new(AdminState::default()),
                policy,
            }),
        }
    }

    /// The API client actions are dispatched through.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn policy(&self) -> SubmissionPolicy {
        self.inner.policy
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> AdminState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AdminState> {
        self.inner.state.subscribe()
    }

    // =========================================================================
    // Brands
    // =========================================================================

    /// Fetch the admin brand list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyPending` if the policy refuses the request.
    pub async fn fetch_brands(&self) -> Result<Settled, StoreError> {
        let api = &self.inner.api;
        self.dispatch::<Brands, _>(async { Ok((api.admin_brands().await?, false)) }, GENERIC_FAILURE)
            .await
    }

    /// Fetch one brand into the details slice.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyPending` if the policy refuses the request.
    pub async fn fetch_brand_details(&self, id: &BrandId) -> Result<Settled, StoreError> {
        let api = &self.inner.api;
        self.dispatch::<BrandDetails, _>(async { Ok((api.brand(id).await?, false)) }, GENERIC_FAILURE)
            .await
    }

    /// Create a brand. On success the create flag is raised until
    /// [`AdminStore::reset`] is called for [`BrandCreate`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyPending` if the policy refuses the request.
    pub async fn create_brand(&self, brand: &NewBrand) -> Result<Settled, StoreError> {
        let api = &self.inner.api;
        self.dispatch::<BrandCreate, _>(
            async {
                let response = api.create_brand(brand).await?;
                Ok((response.brand, response.success))
            },
            GENERIC_FAILURE,
        )
        .await
    }

    /// Update a brand. The update flag mirrors the server's `success`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyPending` if the policy refuses the request.
    pub async fn update_brand(
        &self,
        id: &BrandId,
        patch: &BrandPatch,
    ) -> Result<Settled, StoreError> {
        let api = &self.inner.api;
        self.dispatch::<BrandUpdate, _>(
            async {
                let ack = api.update_brand(id, patch).await?;
                Ok((ack.success, ack.success))
            },
            GENERIC_FAILURE,
        )
        .await
    }

    /// Delete a brand. The delete flag mirrors the server's `success`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyPending` if the policy refuses the request.
    pub async fn delete_brand(&self, id: &BrandId) -> Result<Settled, StoreError> {
        let api = &self.inner.api;
        self.dispatch::<BrandDelete, _>(
            async {
                let ack = api.delete_brand(id).await?;
                Ok((ack.success, ack.success))
            },
            GENERIC_FAILURE,
        )
        .await
    }

    /// Forget the brand held in the details slice.
    pub fn remove_brand_details(&self) {
        self.inner
            .state
            .send_if_modified(|state| state.brand_details.clear_data());
    }

    // =========================================================================
    // Orders & products
    // =========================================================================

    /// Fetch the admin order list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyPending` if the policy refuses the request.
    pub async fn fetch_orders(&self) -> Result<Settled, StoreError> {
        let api = &self.inner.api;
        self.dispatch::<Orders, _>(async { Ok((api.admin_orders().await?, false)) }, GENERIC_FAILURE)
            .await
    }

    /// Fetch the admin product list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyPending` if the policy refuses the request.
    pub async fn fetch_products(&self) -> Result<Settled, StoreError> {
        let api = &self.inner.api;
        self.dispatch::<Products, _>(
            async { Ok((api.admin_products().await?, false)) },
            GENERIC_FAILURE,
        )
        .await
    }

    /// Submit a batch of spreadsheet rows.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyPending` if the policy refuses the request.
    pub async fn upload_products(&self, batch: &UploadBatch) -> Result<Settled, StoreError> {
        let api = &self.inner.api;
        self.dispatch::<ProductUpload, _>(
            async {
                let receipt = api.upload_products(batch).await?;
                let success = receipt.success;
                Ok((receipt, success))
            },
            UPLOAD_FAILURE,
        )
        .await
    }

    // =========================================================================
    // Generic transitions
    // =========================================================================

    /// Lower the success flag of slice `S`.
    pub fn reset<S: Slice>(&self) {
        self.inner
            .state
            .send_if_modified(|state| S::select(state).reset());
    }

    /// Drop the error of every slice.
    pub fn clear_errors(&self) {
        self.inner.state.send_if_modified(AdminState::clear_errors);
    }

    /// Stop waiting for requests in flight on slice `S`; their completions
    /// will be discarded.
    pub fn abandon<S: Slice>(&self) {
        let was_pending = self
            .inner
            .state
            .send_if_modified(|state| S::select(state).abandon());
        if was_pending {
            debug!(slice = S::NAME, "Abandoned in-flight request");
        }
    }

    /// Run `call` against slice `S`.
    #[instrument(skip(self, call), fields(slice = S::NAME))]
    async fn dispatch<S, Fut>(&self, call: Fut, fallback: &str) -> Result<Settled, StoreError>
    where
        S: Slice,
        Fut: Future<Output = Result<(S::Data, bool), ApiError>>,
    {
        let ticket = self.begin::<S>()?;
        let guard = InFlight::<S>::new(self, ticket);
        let outcome = call.await;
        guard.disarm();
        Ok(self.complete::<S>(ticket, outcome, fallback))
    }

    fn begin<S: Slice>(&self) -> Result<Ticket, StoreError> {
        let policy = self.inner.policy;
        let mut ticket = None;
        self.inner.state.send_if_modified(|state| {
            ticket = S::select(state).request(policy);
            ticket.is_some()
        });

        ticket.ok_or_else(|| {
            warn!(slice = S::NAME, %policy, "Request refused while another is pending");
            StoreError::AlreadyPending(S::NAME)
        })
    }

    fn complete<S: Slice>(
        &self,
        ticket: Ticket,
        outcome: Result<(S::Data, bool), ApiError>,
        fallback: &str,
    ) -> Settled {
        let settled = match &outcome {
            Ok(_) => Settled::Fulfilled,
            Err(e) => Settled::Rejected(e.user_message(fallback)),
        };

        let message = match &settled {
            Settled::Rejected(message) => message.clone(),
            _ => String::new(),
        };
        let applied = self.inner.state.send_if_modified(|state| {
            let slice = S::select(state);
            match outcome {
                Ok((data, flag)) => slice.succeed(ticket, data, flag),
                Err(_) => slice.fail(ticket, message),
            }
        });

        if !applied {
            debug!(slice = S::NAME, "Discarded completion of abandoned request");
            return Settled::Discarded;
        }

        match &settled {
            Settled::Fulfilled => info!(slice = S::NAME, "Request fulfilled"),
            Settled::Rejected(message) => warn!(slice = S::NAME, error = %message, "Request rejected"),
            Settled::Discarded => {}
        }
        settled
    }
}

/// Releases slice `S` if a dispatch is dropped between `begin` and
/// `complete`, e.g. by a timeout or a losing `select!` branch.
struct InFlight<'a, S: Slice> {
    store: &'a AdminStore,
    ticket: Ticket,
    armed: bool,
    _slice: PhantomData<S>,
}

impl<'a, S: Slice> InFlight<'a, S> {
    const fn new(store: &'a AdminStore, ticket: Ticket) -> Self {
        Self {
            store,
            ticket,
            armed: true,
            _slice: PhantomData,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<S: Slice> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let ticket = self.ticket;
        let released = self
            .store
            .inner
            .state
            .send_if_modified(|state| S::select(state).release(ticket));
        if released {
            debug!(slice = S::NAME, "Released slice of dropped request");
        }
    }
}
