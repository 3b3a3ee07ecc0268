//! Notification records emitted by mutating operations.
//!
//! Events are recorded on the handle only after the underlying state change
//! has committed; a failed operation leaves no trace here. The embedding host
//! drains them after each call and forwards them to whatever log or
//! subscription channel it maintains.
use fvm_shared::ActorID;

use crate::types::TokenID;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectionEvent {
    /// A token changed hands. Newly created tokens carry `from: None`, the
    /// no-owner sentinel.
    Transfer {
        from: Option<ActorID>,
        to: ActorID,
        token_id: TokenID,
    },
    /// The administrative capability moved to a new principal.
    OwnershipTransferred { previous: ActorID, new: ActorID },
    /// The royalty rate changed.
    RoyaltiesSet { percentage: u64 },
    /// The royalty payout receiver changed.
    RoyaltiesReceiverSet { receiver: ActorID },
}
