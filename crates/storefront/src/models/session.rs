//! Session keys.
//!
//! The session holds only the shopper ID; the cart and checkout draft it
//! points at are kept in [`AppState`](crate::state::AppState).

use std::sync::Arc;

use tower_sessions::Session;
use uuid::Uuid;

use super::Shopper;
use crate::error::Result;
use crate::state::AppState;

/// Session keys for shopper state.
pub mod keys {
    /// Key for the ID of the shopper's server-side state.
    pub const SHOPPER_ID: &str = "shopper_id";
}

/// The session's shopper ID, if one was ever assigned.
pub async fn shopper_id(session: &Session) -> Result<Option<String>> {
    Ok(session.get::<String>(keys::SHOPPER_ID).await?)
}

/// The session's shopper ID, assigning one on first use.
pub async fn ensure_shopper_id(session: &Session) -> Result<String> {
    if let Some(id) = shopper_id(session).await? {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    session.insert(keys::SHOPPER_ID, &id).await?;
    Ok(id)
}

/// The session's live shopper entry, without creating one.
pub async fn existing_shopper(state: &AppState, session: &Session) -> Result<Option<Arc<Shopper>>> {
    Ok(match shopper_id(session).await? {
        Some(id) => state.find_shopper(&id).await,
        None => None,
    })
}
