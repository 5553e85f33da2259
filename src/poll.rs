// Consumer side of the status endpoint: strict response decoding and
// last-response-wins ordering for overlapping polls.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::StatusResponse;

/// Why a poll produced no status update. Never applied as a partial update.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("API error: {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decodes a status response. Anything but 200 with a well-formed body is a fetch failure.
pub fn decode_status_response(
    status_code: u16,
    body: &[u8],
) -> Result<StatusResponse, FetchError> {
    if status_code != 200 {
        return Err(FetchError::Status(status_code));
    }
    Ok(serde_json::from_slice(body)?)
}

/// Orders concurrent polls by issue time rather than arrival time.
///
/// Each poll takes a ticket from [`begin`](Self::begin) before it is sent. A
/// completion is applied only if its ticket is newer than the last applied one,
/// so a slow response that lands after a fresher one is dropped.
#[derive(Debug)]
pub struct ResponseSequencer<T> {
    next_ticket: AtomicU64,
    latest: Mutex<Option<(u64, T)>>,
}

impl<T> Default for ResponseSequencer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResponseSequencer<T> {
    pub fn new() -> Self {
        Self {
            next_ticket: AtomicU64::new(1),
            latest: Mutex::new(None),
        }
    }

    /// Ticket for a poll about to be issued. Strictly increasing.
    pub fn begin(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::Relaxed)
    }

    /// Offers a completed poll. Returns true if it became the current value.
    pub fn complete(&self, ticket: u64, value: T) -> bool {
        let mut latest = match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some((applied, _)) = latest.as_ref()
            && *applied >= ticket
        {
            tracing::debug!(ticket, applied = *applied, "dropping superseded response");
            return false;
        }
        *latest = Some((ticket, value));
        true
    }

    /// Ticket of the value currently held, if any.
    pub fn applied_ticket(&self) -> Option<u64> {
        let latest = match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        latest.as_ref().map(|(t, _)| *t)
    }
}

impl<T: Clone> ResponseSequencer<T> {
    pub fn latest(&self) -> Option<T> {
        let latest = match self.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        latest.as_ref().map(|(_, v)| v.clone())
    }
}
