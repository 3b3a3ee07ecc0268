//! Interfaces and types for the collection's public surface
use fvm_ipld_bitfield::BitField;
use fvm_ipld_encoding::tuple::*;
use fvm_shared::econ::TokenAmount;
use fvm_shared::ActorID;

use crate::interface::InterfaceId;
use crate::state::Cursor;

pub type TokenID = u64;

/// Multiple token IDs are represented as a BitField encoded with RLE+ the index of each set bit
/// corresponds to a TokenID.
pub type TokenSet = BitField;

/// A trait to be implemented by hosts exposing the collection's operation surface.
pub trait NFTCollection {
    /// A descriptive name for the collection.
    fn name(&self) -> String;

    /// An abbreviated name for tokens in this collection.
    fn symbol(&self) -> String;

    /// The hard cap on the number of tokens that can ever be minted.
    fn max_supply(&self) -> u64;

    /// Gets the number of tokens minted so far.
    fn total_supply(&self) -> u64;

    /// Gets the number of tokens held by a particular principal, zero if it holds none.
    fn balance_of(&self, owner: ActorID) -> u64;

    /// Returns the owner of the token specified by `token_id`.
    fn owner_of(&self, token_id: TokenID) -> ActorID;

    /// Gets a link to the off-system metadata for a given token.
    fn token_uri(&self, token_id: TokenID) -> String;

    /// Creates new tokens under sequentially assigned ids, owned by
    /// [`initial_owner`][`MintParams::initial_owner`]. Gated to the collection owner.
    fn mint(&self, params: MintParams) -> MintReturn;

    /// Reports the royalty receiver and amount payable on a sale.
    fn royalty_info(&self, params: RoyaltyInfoParams) -> RoyaltiesReturn;

    /// Replaces the royalty rate. Gated to the collection owner.
    fn set_royalties(&self, percentage: u64);

    /// Replaces the royalty receiver. Gated to the collection owner.
    fn set_royalties_receiver(&self, receiver: ActorID);

    /// Returns the principal holding the administrative capability.
    fn owner(&self) -> ActorID;

    /// Hands the administrative capability to a new principal. Gated to the
    /// collection owner.
    fn transfer_ownership(&self, new_owner: ActorID);

    /// Query whether the collection supports a given capability set.
    fn supports_interface(&self, interface_id: InterfaceId) -> bool;

    /// Gets a page of all the token ids in the collection.
    fn list_tokens(&self, params: ListTokensParams) -> ListTokensReturn;

    /// Gets a page of the token ids owned by a specific principal.
    fn list_owned_tokens(&self, params: ListOwnedTokensParams) -> ListTokensReturn;
}

#[derive(Serialize_tuple, Deserialize_tuple, Clone, Debug)]
pub struct MintParams {
    pub initial_owner: ActorID,
    pub quantity: u64,
}

/// Return value after a successful mint.
#[derive(Serialize_tuple, Deserialize_tuple, Clone, Debug)]
pub struct MintReturn {
    /// The new balance of the owner address.
    pub balance: u64,
    /// The new total supply.
    pub supply: u64,
    /// List of the tokens that were minted.
    pub token_ids: Vec<TokenID>,
}

/// Intermediate data used to construct the return data after a mint commits.
#[derive(Clone, Debug)]
pub struct MintIntermediate {
    /// Receiving address used for querying balance.
    pub to: ActorID,
    /// List of the newly minted tokens.
    pub token_ids: Vec<TokenID>,
}

#[derive(Serialize_tuple, Deserialize_tuple, Clone, Debug)]
pub struct RoyaltyInfoParams {
    pub token_id: TokenID,
    pub sale_price: TokenAmount,
}

/// The royalty payable on a sale: who collects, and how much.
#[derive(Serialize_tuple, Deserialize_tuple, PartialEq, Clone, Debug)]
pub struct RoyaltiesReturn {
    pub receiver: ActorID,
    pub amount: TokenAmount,
}

#[derive(Serialize_tuple, Deserialize_tuple, Clone, Debug)]
pub struct ListTokensParams {
    /// [`Cursor`] from a previous page, empty meaning start of list.
    pub cursor: Option<Cursor>,
    /// Maximum number of ids to return, with zero meaning no limit.
    pub limit: u64,
}

#[derive(Serialize_tuple, Deserialize_tuple, Clone, Debug)]
pub struct ListTokensReturn {
    pub tokens: TokenSet,
    /// [`Cursor`] to resume from, present when further pages remain.
    pub next_cursor: Option<Cursor>,
}

#[derive(Serialize_tuple, Deserialize_tuple, Clone, Debug)]
pub struct ListOwnedTokensParams {
    pub owner: ActorID,
    /// [`Cursor`] from a previous page, empty meaning start of list.
    pub cursor: Option<Cursor>,
    /// Maximum number of ids to return, with zero meaning no limit.
    pub limit: u64,
}
