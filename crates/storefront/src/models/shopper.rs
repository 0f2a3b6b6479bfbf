//! Server-side shopper state.
//!
//! The session only carries the shopper ID. Cart and checkout draft live
//! here behind their own locks, so two requests from one browser change
//! them one at a time instead of each saving a whole session record over
//! the other.

use std::sync::{Mutex, MutexGuard, PoisonError};

use florist_core::{Cart, CheckoutDraft, CheckoutFlow};

/// Everything the shop keeps for one browser session.
pub struct Shopper {
    cart: Mutex<Cart>,
    draft: Mutex<CheckoutDraft>,
    checkout: CheckoutFlow,
}

impl Shopper {
    #[must_use]
    pub fn new(checkout: CheckoutFlow) -> Self {
        Self {
            cart: Mutex::new(Cart::new()),
            draft: Mutex::new(CheckoutDraft::new()),
            checkout,
        }
    }

    /// A copy of the cart as it is right now.
    #[must_use]
    pub fn cart(&self) -> Cart {
        lock(&self.cart).clone()
    }

    /// Run `f` on the cart while holding its lock.
    pub fn update_cart<T>(&self, f: impl FnOnce(&mut Cart) -> T) -> T {
        f(&mut lock(&self.cart))
    }

    #[must_use]
    pub fn draft(&self) -> CheckoutDraft {
        lock(&self.draft).clone()
    }

    /// Run `f` on the checkout draft while holding its lock.
    pub fn update_draft<T>(&self, f: impl FnOnce(&mut CheckoutDraft) -> T) -> T {
        f(&mut lock(&self.draft))
    }

    /// The shopper's checkout flow; one submit at a time.
    #[must_use]
    pub const fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }
}

// Cart and draft edits are single calls that leave the value whole.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
