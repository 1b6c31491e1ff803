//! Visitor cart id and the cart lines with a mutation in flight.
//!
//! Shopify owns the cart itself. The session only remembers which cart
//! belongs to the visitor. Lines with a quantity mutation waiting on Shopify
//! are tracked server-side in [`PendingRegistry`], keyed by cart and line, so
//! overlapping requests for one cart each update only their own entry. A
//! render that happens before Shopify answers shows those lines as
//! [`LineState::Pending`] with their controls disabled.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use tower_sessions::Session;
use uncmfrt_core::{LineState, MutationId};

use crate::middleware::session::keys;
use crate::shopify::types::Cart;

/// Seconds an unanswered mutation keeps its line locked.
///
/// Entries are cleared when their request finishes or is dropped; this bounds
/// the lock if that never happens.
pub const PENDING_TTL_SECONDS: i64 = 30;

/// A quantity mutation Shopify has not answered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMutation {
    pub id: MutationId,
    pub started_at: DateTime<Utc>,
}

impl PendingMutation {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.started_at) < TimeDelta::seconds(PENDING_TTL_SECONDS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LineKey {
    cart_id: String,
    line_id: String,
}

impl LineKey {
    fn new(cart_id: &str, line_id: &str) -> Self {
        Self {
            cart_id: cart_id.to_string(),
            line_id: line_id.to_string(),
        }
    }
}

/// Cart lines with a mutation in flight, keyed by cart and line id.
#[derive(Debug, Default)]
pub struct PendingLines(HashMap<LineKey, PendingMutation>);

impl PendingLines {
    /// Start a mutation for a line.
    ///
    /// Returns `None` while an earlier mutation for the line is still live;
    /// mutations against a pending line are not queued.
    pub fn begin(&mut self, cart_id: &str, line_id: &str, now: DateTime<Utc>) -> Option<MutationId> {
        if self.state_for(cart_id, line_id, now).is_pending() {
            return None;
        }

        let mutation = PendingMutation {
            id: MutationId::new(),
            started_at: now,
        };
        self.0.insert(LineKey::new(cart_id, line_id), mutation);
        Some(mutation.id)
    }

    /// Clear a line if its entry still belongs to `id`.
    pub fn finish(&mut self, cart_id: &str, line_id: &str, id: MutationId) -> bool {
        let key = LineKey::new(cart_id, line_id);
        if self.0.get(&key).is_some_and(|m| m.id == id) {
            self.0.remove(&key);
            true
        } else {
            false
        }
    }

    /// State of a line at `now`.
    #[must_use]
    pub fn state_for(&self, cart_id: &str, line_id: &str, now: DateTime<Utc>) -> LineState {
        match self.0.get(&LineKey::new(cart_id, line_id)) {
            Some(mutation) if mutation.is_live(now) => LineState::Pending(mutation.id),
            _ => LineState::Confirmed,
        }
    }

    /// Drop entries older than [`PENDING_TTL_SECONDS`].
    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.0.retain(|_, mutation| mutation.is_live(now));
    }

    /// Mark the lines of `cart` that have a live mutation.
    pub fn apply(&self, cart: &mut Cart, now: DateTime<Utc>) {
        for line in &mut cart.lines {
            line.state = self.state_for(&cart.id, &line.id, now);
        }
    }
}

/// Pending lines shared by every request of the process.
///
/// Each begin or finish takes the lock for a single map operation, so
/// concurrent mutations on one cart never overwrite each other's entries.
#[derive(Debug, Clone, Default)]
pub struct PendingRegistry {
    lines: Arc<Mutex<PendingLines>>,
}

impl PendingRegistry {
    // The map holds plain values and is never left half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, PendingLines> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a mutation for a line.
    ///
    /// Returns `None` if the line is already pending. The entry is cleared
    /// when the returned guard is finished or dropped.
    #[must_use]
    pub fn begin(&self, cart_id: &str, line_id: &str) -> Option<LineMutation> {
        let now = Utc::now();
        let mut lines = self.lock();
        lines.prune(now);
        let id = lines.begin(cart_id, line_id, now)?;
        Some(LineMutation {
            registry: self.clone(),
            key: LineKey::new(cart_id, line_id),
            id,
        })
    }

    /// Mark the lines of `cart` that have a mutation in flight.
    pub fn apply(&self, cart: &mut Cart) {
        self.lock().apply(cart, Utc::now());
    }
}

/// A line mutation waiting on Shopify.
///
/// Dropping the guard clears the line, so a request cancelled mid-flight
/// does not leave it locked.
#[derive(Debug)]
pub struct LineMutation {
    registry: PendingRegistry,
    key: LineKey,
    id: MutationId,
}

impl LineMutation {
    #[must_use]
    pub const fn id(&self) -> MutationId {
        self.id
    }

    /// Shopify answered; the line reflects Shopify's state again.
    pub fn finish(self) {
        drop(self);
    }
}

impl Drop for LineMutation {
    fn drop(&mut self) {
        self.registry
            .lock()
            .finish(&self.key.cart_id, &self.key.line_id, self.id);
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart ID from the session.
pub async fn cart_id(session: &Session) -> Option<String> {
    session
        .get::<String>(keys::CART_ID)
        .await
        .ok()
        .flatten()
}

/// Set the cart ID in the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_cart_id(
    session: &Session,
    cart_id: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART_ID, cart_id).await
}
