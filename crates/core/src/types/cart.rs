//! Cart line quantities and the state of in-flight line mutations.
//!
//! Shopify owns cart consistency. The storefront only needs to know how many
//! units a line holds, which quantities the `-`/`+` controls should submit,
//! and whether a mutation against the line is still waiting for Shopify to
//! answer.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of units on a cart line.
///
/// Always zero or above. Quantities coming from the Storefront API are signed
/// integers and are clamped on the way in with [`Quantity::from_api`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// A quantity of zero. Submitting it for a line removes the line.
    pub const ZERO: Self = Self(0);

    /// Create a quantity from an unsigned value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Clamp a signed API quantity into range.
    #[must_use]
    pub fn from_api(value: i64) -> Self {
        Self(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Whether this quantity means "remove the line".
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Quantity as the signed integer the Storefront API expects.
    #[must_use]
    pub fn to_api(self) -> i64 {
        i64::from(self.0)
    }

    /// Target submitted by the decrease control: `max(0, q - 1)`.
    ///
    /// Decreasing a single unit yields zero, which is a removal request.
    #[must_use]
    pub const fn decrement_target(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Target submitted by the increase control: `q + 1`.
    #[must_use]
    pub const fn increment_target(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Both targets offered by a line's quantity controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityTargets {
    /// Quantity submitted by the decrease control.
    pub decrement: Quantity,
    /// Quantity submitted by the increase control.
    pub increment: Quantity,
}

impl QuantityTargets {
    /// Compute the targets for a line currently holding `quantity` units.
    #[must_use]
    pub const fn for_quantity(quantity: Quantity) -> Self {
        Self {
            decrement: quantity.decrement_target(),
            increment: quantity.increment_target(),
        }
    }
}

/// Identifier for a single submitted line mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutationId(Uuid);

impl MutationId {
    /// Generate a new random mutation ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MutationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for MutationId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Whether Shopify has confirmed the latest mutation against a cart line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineState {
    /// The line reflects Shopify's state.
    #[default]
    Confirmed,
    /// A mutation was submitted and has not been answered yet.
    Pending(MutationId),
}

impl LineState {
    /// Whether a mutation against the line is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Whether quantity controls may submit new mutations.
    ///
    /// Pending lines are read-only so mutations never compound.
    #[must_use]
    pub const fn controls_enabled(&self) -> bool {
        !self.is_pending()
    }
}
