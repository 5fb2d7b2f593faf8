//! Form controller - draft, validation, submission and local merge.
//!
//! One controller backs one form instance. While a submission is in flight any
//! further submit on the same controller is suppressed without touching the network.

use super::drafts::{Draft, FormMode};
use super::list_state::ListState;
use crate::api::{RemoteClient, Transport};
use crate::entities::Record;
use crate::errors::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Outcome of a submit that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission<T> {
    /// The request went out and its result was applied
    Applied(T),
    /// Another submission was already in flight; nothing was sent
    Suppressed,
}

impl<T> Submission<T> {
    /// The applied value, if any.
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Suppressed => None,
        }
    }
}

/// At-most-one-in-flight flag.
#[derive(Debug, Default)]
pub struct SingleFlight {
    busy: AtomicBool,
}

/// Releases a [`SingleFlight`] when dropped.
#[derive(Debug)]
pub struct FlightGuard<'a> {
    busy: &'a AtomicBool,
}

impl SingleFlight {
    /// Marks the flag busy, or returns `None` if it already is.
    pub fn try_begin(&self) -> Option<FlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard { busy: &self.busy })
    }

    /// Whether a flight is in progress.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Controller for a create or edit form.
#[derive(Debug)]
pub struct FormController<D> {
    draft: Mutex<D>,
    mode: FormMode,
    numeric_years: bool,
    flight: SingleFlight,
}

impl<D: Draft> FormController<D> {
    /// Empty create form.
    #[must_use]
    pub fn create() -> Self {
        Self::with_mode(FormMode::Create, D::default())
    }

    /// Edit form for the record with `key`, prefilled with `draft`.
    pub fn edit(key: impl Into<String>, draft: D) -> Self {
        Self::with_mode(FormMode::Update { key: key.into() }, draft)
    }

    fn with_mode(mode: FormMode, draft: D) -> Self {
        Self {
            draft: Mutex::new(draft),
            mode,
            numeric_years: false,
            flight: SingleFlight::default(),
        }
    }

    /// Translates year codes to the numeric server form in outgoing payloads.
    #[must_use]
    pub fn with_numeric_years(mut self, numeric_years: bool) -> Self {
        self.numeric_years = numeric_years;
        self
    }

    /// Create or update.
    pub const fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Whether a submission is in flight (the submit control is disabled).
    pub fn is_submitting(&self) -> bool {
        self.flight.is_busy()
    }

    /// Copy of the current draft.
    pub async fn draft(&self) -> D {
        self.draft.lock().await.clone()
    }

    /// Edits the draft in place.
    pub async fn update_draft(&self, edit: impl FnOnce(&mut D) + Send) {
        edit(&mut *self.draft.lock().await);
    }

    /// Clears the draft back to its default.
    pub async fn reset(&self) {
        *self.draft.lock().await = D::default();
    }

    /// Validates the draft, sends it, and applies the server's record to `list`.
    ///
    /// Validation failures return before any request is made. On any failure the draft
    /// is kept so the admin can fix it and retry. On success the draft is reset.
    pub async fn submit<T: Transport>(
        &self,
        client: &RemoteClient<T>,
        list: &ListState<D::Output>,
    ) -> Result<Submission<D::Output>> {
        let Some(_guard) = self.flight.try_begin() else {
            debug!("Submit suppressed: {} form already in flight", D::Output::LABEL);
            return Ok(Submission::Suppressed);
        };

        let draft = self.draft().await;
        draft.validate(&self.mode)?;
        let payload = draft.payload(&self.mode, self.numeric_years)?;

        let result = match &self.mode {
            FormMode::Create => client.create::<D::Output>(payload).await,
            FormMode::Update { key } => client.update::<D::Output>(key, payload).await,
        };
        let record = result.inspect_err(|e| {
            warn!("{} form submission failed, draft kept: {}", D::Output::LABEL, e);
        })?;

        list.upsert(record.clone()).await;
        self.reset().await;
        info!("{} {} saved", D::Output::LABEL, record.key());
        Ok(Submission::Applied(record))
    }
}
