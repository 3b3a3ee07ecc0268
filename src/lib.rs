//! A capped-supply collection of unique, non-fungible tokens with per-sale
//! royalty reporting.
//!
//! The collection is opinionated towards a single administrative owner:
//! minting, royalty configuration and ownership hand-over are gated to that
//! principal while every query is open. Token ids are assigned sequentially
//! from zero, the supply is hard-capped, and tokens are never burned, so the
//! supply counter doubles as the next id.
//!
//! State lives in IPLD structures behind a [`Blockstore`] and every mutating
//! operation is applied through an atomic transaction scope: either the whole
//! operation commits or the state is left untouched.

use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use fvm_shared::econ::TokenAmount;
use fvm_shared::error::ExitCode;
use fvm_shared::ActorID;
use thiserror::Error;

use crate::events::CollectionEvent;
use crate::interface::InterfaceId;
use crate::state::{CollectionState, Cursor, StateError, StateInvariantError, StateSummary};
use crate::types::{ListTokensReturn, MintReturn, RoyaltiesReturn, TokenID};

pub mod events;
pub mod interface;
pub mod state;
pub mod types;

/// A descriptive name for the collection.
pub const NAME: &str = "Drunk Robots Genesis Zero";
/// An abbreviated name for tokens in the collection.
pub const SYMBOL: &str = "DR0";
/// Hard cap on the number of tokens that can ever be minted.
pub const MAX_SUPPLY: u64 = 50;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("error in underlying state {0}")]
    CollectionState(#[from] StateError),
}

pub type Result<T> = std::result::Result<T, CollectionError>;

impl From<&CollectionError> for ExitCode {
    fn from(error: &CollectionError) -> Self {
        match error {
            CollectionError::CollectionState(state_error) => match state_error {
                StateError::IpldAmt(_) | StateError::IpldHamt(_) => ExitCode::USR_SERIALIZATION,
                StateError::TokenNotFound(_) => ExitCode::USR_NOT_FOUND,
                StateError::NotCollectionOwner { .. } => ExitCode::USR_FORBIDDEN,
                StateError::MaxSupplyExceeded { .. }
                | StateError::InvalidQuantity
                | StateError::InvalidRoyalties(_)
                | StateError::InvalidCursor => ExitCode::USR_ILLEGAL_ARGUMENT,
                StateError::InvariantFailed(_) => ExitCode::USR_ILLEGAL_STATE,
            },
        }
    }
}

/// A helper handle for [`CollectionState`] that couples it to a blockstore and
/// records the notifications each operation produces.
pub struct Collection<'st, BS>
where
    BS: Blockstore,
{
    store: BS,
    state: &'st mut CollectionState,
    events: Vec<CollectionEvent>,
}

impl<'st, BS> Collection<'st, BS>
where
    BS: Blockstore,
{
    /// Wrap an instance of the state-tree in a handle for higher-level operations.
    pub fn wrap(store: BS, state: &'st mut CollectionState) -> Self {
        Self { store, state, events: Vec::new() }
    }

    /// Flush state and return Cid for root.
    pub fn flush(&mut self) -> Result<Cid> {
        Ok(self.state.save(&self.store)?)
    }

    /// Opens an atomic transaction on the collection state which allows a closure to make
    /// multiple modifications to the state tree.
    ///
    /// If the closure returns an error, the transaction is dropped atomically and no change is
    /// observed on the collection state.
    pub fn transaction<F, Res>(&mut self, f: F) -> Result<Res>
    where
        F: FnOnce(&mut CollectionState, &BS) -> Result<Res>,
    {
        let mut mutable_state = self.state.clone();
        let res = f(&mut mutable_state, &self.store)?;
        // if closure didn't error save state
        *self.state = mutable_state;
        Ok(res)
    }

    /// Check the underlying state for consistency errors.
    pub fn check_invariants(&self) -> std::result::Result<StateSummary, Vec<StateInvariantError>> {
        let (summary, errors) = self.state.check_invariants(&self.store);
        if errors.is_empty() {
            Ok(summary)
        } else {
            Err(errors)
        }
    }

    /// Notifications recorded by operations on this handle so far.
    pub fn events(&self) -> &[CollectionEvent] {
        &self.events
    }

    /// Take the recorded notifications, leaving the handle's log empty.
    pub fn drain_events(&mut self) -> Vec<CollectionEvent> {
        std::mem::take(&mut self.events)
    }
}

impl<'st, BS> Collection<'st, BS>
where
    BS: Blockstore,
{
    /// Return the descriptive name of the collection.
    pub fn name(&self) -> &'static str {
        NAME
    }

    /// Return the abbreviated name for tokens in the collection.
    pub fn symbol(&self) -> &'static str {
        SYMBOL
    }

    /// Return the hard cap on the number of tokens.
    pub fn max_supply(&self) -> u64 {
        MAX_SUPPLY
    }

    /// Return the total number of tokens minted so far.
    pub fn total_supply(&self) -> u64 {
        self.state.total_supply
    }

    /// Return the prefix token URIs are derived from.
    pub fn base_uri(&self) -> &str {
        &self.state.base_uri
    }

    /// Return the principal currently holding the administrative capability.
    pub fn owner(&self) -> ActorID {
        self.state.collection_owner
    }

    /// Return the number of tokens held by a particular principal, zero if it
    /// holds none.
    pub fn balance_of(&self, owner: ActorID) -> Result<u64> {
        Ok(self.state.get_balance(&self.store, owner)?)
    }

    /// Return the owner of a token.
    pub fn owner_of(&self, token_id: TokenID) -> Result<ActorID> {
        Ok(self.state.get_owner(&self.store, token_id)?)
    }

    /// Return the metadata URI for a minted token.
    pub fn token_uri(&self, token_id: TokenID) -> Result<String> {
        Ok(self.state.token_uri(&self.store, token_id)?)
    }

    /// Report the royalty receiver and the amount payable on a sale of the
    /// given value.
    ///
    /// The computation depends only on the configured royalty terms;
    /// `_token_id` does not need to name a minted token.
    pub fn royalty_info(&self, _token_id: TokenID, sale_price: &TokenAmount) -> RoyaltiesReturn {
        self.state.royalty_info(sale_price)
    }

    /// Query whether the collection supports a given capability set.
    pub fn supports_interface(&self, interface_id: InterfaceId) -> bool {
        interface::supports_interface(interface_id)
    }

    /// Create new tokens belonging to `initial_owner`, assigning `quantity`
    /// consecutive ids starting at the current supply.
    ///
    /// Gated to the collection owner. Either every requested token is minted
    /// and the supply advanced, or the call fails with no effect. A creation
    /// notification is recorded per minted id.
    pub fn mint(
        &mut self,
        operator: ActorID,
        initial_owner: ActorID,
        quantity: u64,
    ) -> Result<MintReturn> {
        self.state.assert_collection_owner(operator)?;

        let intermediate =
            self.transaction(|state, bs| Ok(state.mint_tokens(bs, initial_owner, quantity)?))?;

        for &token_id in &intermediate.token_ids {
            self.events.push(CollectionEvent::Transfer {
                from: None,
                to: initial_owner,
                token_id,
            });
        }

        Ok(self.state.mint_return(&self.store, intermediate)?)
    }

    /// Replace the royalty rate with a new whole-percentage value.
    ///
    /// Gated to the collection owner. Rates outside `1..=100` are rejected
    /// and the stored configuration is left unchanged.
    pub fn set_royalties(&mut self, operator: ActorID, percentage: u64) -> Result<()> {
        self.state.assert_collection_owner(operator)?;

        self.transaction(|state, _bs| Ok(state.set_royalties(percentage)?))?;
        self.events.push(CollectionEvent::RoyaltiesSet { percentage });

        Ok(())
    }

    /// Replace the royalty receiver.
    ///
    /// Gated to the collection owner; any principal is accepted.
    pub fn set_royalties_receiver(&mut self, operator: ActorID, receiver: ActorID) -> Result<()> {
        self.state.assert_collection_owner(operator)?;

        self.transaction(|state, _bs| {
            state.set_royalties_receiver(receiver);
            Ok(())
        })?;
        self.events.push(CollectionEvent::RoyaltiesReceiverSet { receiver });

        Ok(())
    }

    /// Hand the administrative capability to a new principal.
    ///
    /// Gated to the current collection owner. The capability moves in one
    /// step; there is no intermediate unowned state.
    pub fn transfer_ownership(&mut self, operator: ActorID, new_owner: ActorID) -> Result<()> {
        self.state.assert_collection_owner(operator)?;

        let previous =
            self.transaction(|state, _bs| Ok(state.transfer_collection_owner(new_owner)))?;
        self.events.push(CollectionEvent::OwnershipTransferred { previous, new: new_owner });

        Ok(())
    }

    /// Enumerate a page of token ids.
    pub fn list_tokens(&self, cursor: Option<Cursor>, max: u64) -> Result<ListTokensReturn> {
        let limit = match max {
            0 => None,
            _ => Some(max),
        };
        let (tokens, next_cursor) = self.state.list_tokens(&self.store, cursor, limit)?;
        Ok(ListTokensReturn { tokens, next_cursor })
    }

    /// Enumerate a page of token ids owned by a specific principal.
    pub fn list_owned_tokens(
        &self,
        owner: ActorID,
        cursor: Option<Cursor>,
        max: u64,
    ) -> Result<ListTokensReturn> {
        let limit = match max {
            0 => None,
            _ => Some(max),
        };
        let (tokens, next_cursor) =
            self.state.list_owned_tokens(&self.store, owner, cursor, limit)?;
        Ok(ListTokensReturn { tokens, next_cursor })
    }
}

#[cfg(test)]
mod test {
    use fvm_ipld_blockstore::MemoryBlockstore;
    use fvm_shared::econ::TokenAmount;
    use fvm_shared::error::ExitCode;
    use fvm_shared::ActorID;
    use num_traits::Zero;

    use crate::events::CollectionEvent;
    use crate::interface;
    use crate::state::{CollectionState, StateError};
    use crate::{Collection, CollectionError, MAX_SUPPLY, NAME, SYMBOL};

    const DEPLOYER: ActorID = 1;
    const ALICE: ActorID = 2;
    const BOB: ActorID = 3;

    const BASE_URI: &str = "http://dummy.url/";

    fn new_state(store: &MemoryBlockstore) -> CollectionState {
        CollectionState::new(store, DEPLOYER, String::from(BASE_URI)).unwrap()
    }

    #[test]
    fn it_initialises_the_collection() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let collection = Collection::wrap(&store, &mut state);

        assert_eq!(collection.name(), NAME);
        assert_eq!(collection.symbol(), SYMBOL);
        assert_eq!(collection.max_supply(), MAX_SUPPLY);
        assert_eq!(collection.base_uri(), BASE_URI);
        assert_eq!(collection.total_supply(), 0);
        assert_eq!(collection.owner(), DEPLOYER);
        assert_eq!(collection.balance_of(DEPLOYER).unwrap(), 0);

        collection.check_invariants().unwrap();
    }

    #[test]
    fn it_mints_tokens_incrementally() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let mut collection = Collection::wrap(&store, &mut state);

        {
            // mint first token
            let res = collection.mint(DEPLOYER, DEPLOYER, 1).unwrap();
            assert_eq!(res.token_ids, vec![0]);
            assert_eq!(res.balance, 1);
            assert_eq!(res.supply, 1);
        }

        {
            // mint next token
            let res = collection.mint(DEPLOYER, DEPLOYER, 1).unwrap();
            assert_eq!(res.token_ids, vec![1]);
            assert_eq!(res.balance, 2);
            assert_eq!(res.supply, 2);
        }

        {
            // ids keep ascending when the recipient changes
            let res = collection.mint(DEPLOYER, ALICE, 3).unwrap();
            assert_eq!(res.token_ids, vec![2, 3, 4]);
            assert_eq!(res.balance, 3);
            assert_eq!(res.supply, 5);
        }

        {
            // ownership and balances reflect the mints
            assert_eq!(collection.owner_of(0).unwrap(), DEPLOYER);
            assert_eq!(collection.owner_of(2).unwrap(), ALICE);
            assert_eq!(collection.balance_of(DEPLOYER).unwrap(), 2);
            assert_eq!(collection.balance_of(ALICE).unwrap(), 3);
            assert_eq!(collection.balance_of(BOB).unwrap(), 0);
            assert_eq!(collection.total_supply(), 5);
        }

        {
            // a creation notification was recorded per id, in mint order
            let events = collection.drain_events();
            assert_eq!(events.len(), 5);
            assert_eq!(
                events[0],
                CollectionEvent::Transfer { from: None, to: DEPLOYER, token_id: 0 }
            );
            assert_eq!(
                events[4],
                CollectionEvent::Transfer { from: None, to: ALICE, token_id: 4 }
            );
            // drained once, the log is empty
            assert!(collection.events().is_empty());
        }

        collection.check_invariants().unwrap();
    }

    #[test]
    fn it_requires_the_owner_to_mint() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let mut collection = Collection::wrap(&store, &mut state);

        let err = collection.mint(ALICE, ALICE, 1).unwrap_err();
        if let CollectionError::CollectionState(StateError::NotCollectionOwner { actor }) = err {
            assert_eq!(actor, ALICE);
        } else {
            panic!("unexpected error {err:?}");
        }

        // nothing was minted and nothing was recorded
        assert_eq!(collection.total_supply(), 0);
        assert_eq!(collection.balance_of(ALICE).unwrap(), 0);
        assert!(collection.events().is_empty());

        collection.check_invariants().unwrap();
    }

    #[test]
    fn it_enforces_the_supply_cap() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let mut collection = Collection::wrap(&store, &mut state);

        collection.mint(DEPLOYER, DEPLOYER, 1).unwrap();

        {
            // a request for the full cap no longer fits
            let err = collection.mint(DEPLOYER, DEPLOYER, MAX_SUPPLY).unwrap_err();
            if let CollectionError::CollectionState(StateError::MaxSupplyExceeded {
                quantity,
                total_supply,
                max_supply,
            }) = err
            {
                assert_eq!(quantity, MAX_SUPPLY);
                assert_eq!(total_supply, 1);
                assert_eq!(max_supply, MAX_SUPPLY);
            } else {
                panic!("unexpected error {err:?}");
            }
        }

        {
            // the failed call left no partial effects
            assert_eq!(collection.total_supply(), 1);
            assert_eq!(collection.balance_of(DEPLOYER).unwrap(), 1);
            assert_eq!(collection.events().len(), 1);
        }

        {
            // the remaining capacity can be minted exactly
            let res = collection.mint(DEPLOYER, DEPLOYER, MAX_SUPPLY - 1).unwrap();
            assert_eq!(res.supply, MAX_SUPPLY);
            assert_eq!(collection.balance_of(DEPLOYER).unwrap(), MAX_SUPPLY);
        }

        {
            // the cap holds once reached
            collection.mint(DEPLOYER, DEPLOYER, 1).unwrap_err();
            assert_eq!(collection.total_supply(), MAX_SUPPLY);
        }

        collection.check_invariants().unwrap();
    }

    #[test]
    fn it_rejects_empty_mints() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let mut collection = Collection::wrap(&store, &mut state);

        let err = collection.mint(DEPLOYER, ALICE, 0).unwrap_err();
        if let CollectionError::CollectionState(StateError::InvalidQuantity) = err {
        } else {
            panic!("unexpected error {err:?}");
        }

        assert_eq!(collection.total_supply(), 0);
        assert!(collection.events().is_empty());
    }

    #[test]
    fn it_resolves_token_uris() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let mut collection = Collection::wrap(&store, &mut state);

        collection.mint(DEPLOYER, DEPLOYER, 1).unwrap();
        assert_eq!(collection.token_uri(0).unwrap(), "http://dummy.url/0.json");

        // unminted ids do not resolve
        let err = collection.token_uri(7).unwrap_err();
        if let CollectionError::CollectionState(StateError::TokenNotFound(id)) = err {
            assert_eq!(id, 7);
        } else {
            panic!("unexpected error {err:?}");
        }
    }

    #[test]
    fn it_reports_royalties() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let mut collection = Collection::wrap(&store, &mut state);

        {
            // nothing is owed until a rate is configured
            let res = collection.royalty_info(0, &TokenAmount::from_atto(100));
            assert_eq!(res.receiver, DEPLOYER);
            assert!(res.amount.is_zero());
        }

        collection.set_royalties(DEPLOYER, 10).unwrap();
        collection.mint(DEPLOYER, ALICE, 1).unwrap();

        {
            // 10% of a 100 unit sale
            let res = collection.royalty_info(0, &TokenAmount::from_atto(100));
            assert_eq!(res.receiver, DEPLOYER);
            assert_eq!(res.amount, TokenAmount::from_atto(10));
        }

        {
            // 10% of a whole token sale
            let res = collection.royalty_info(0, &TokenAmount::from_whole(1));
            assert_eq!(res.amount, TokenAmount::from_whole(1).div_rem(10).0);
        }

        {
            // the computation does not consult the ledger: an unminted id is fine
            let res = collection.royalty_info(40, &TokenAmount::from_atto(100));
            assert_eq!(res.amount, TokenAmount::from_atto(10));
        }

        {
            // updating the receiver redirects future payouts
            collection.set_royalties_receiver(DEPLOYER, BOB).unwrap();
            let res = collection.royalty_info(0, &TokenAmount::from_atto(100));
            assert_eq!(res.receiver, BOB);
            assert_eq!(res.amount, TokenAmount::from_atto(10));
        }

        let events = collection.drain_events();
        assert!(events.contains(&CollectionEvent::RoyaltiesSet { percentage: 10 }));
        assert!(events.contains(&CollectionEvent::RoyaltiesReceiverSet { receiver: BOB }));

        collection.check_invariants().unwrap();
    }

    #[test]
    fn it_validates_royalty_updates() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let mut collection = Collection::wrap(&store, &mut state);

        collection.set_royalties(DEPLOYER, 25).unwrap();
        collection.drain_events();

        {
            // a zero rate is rejected
            let err = collection.set_royalties(DEPLOYER, 0).unwrap_err();
            if let CollectionError::CollectionState(StateError::InvalidRoyalties(pct)) = err {
                assert_eq!(pct, 0);
            } else {
                panic!("unexpected error {err:?}");
            }
        }

        {
            // so is a rate beyond the whole sale value
            let err = collection.set_royalties(DEPLOYER, 101).unwrap_err();
            if let CollectionError::CollectionState(StateError::InvalidRoyalties(pct)) = err {
                assert_eq!(pct, 101);
            } else {
                panic!("unexpected error {err:?}");
            }
        }

        {
            // non-owners cannot touch royalty terms
            let err = collection.set_royalties(ALICE, 10).unwrap_err();
            if let CollectionError::CollectionState(StateError::NotCollectionOwner { actor }) = err
            {
                assert_eq!(actor, ALICE);
            } else {
                panic!("unexpected error {err:?}");
            }
            collection.set_royalties_receiver(ALICE, ALICE).unwrap_err();
        }

        {
            // the stored configuration never changed
            let res = collection.royalty_info(0, &TokenAmount::from_atto(100));
            assert_eq!(res.amount, TokenAmount::from_atto(25));
            assert_eq!(res.receiver, DEPLOYER);
            assert!(collection.events().is_empty());
        }

        collection.check_invariants().unwrap();
    }

    #[test]
    fn it_transfers_ownership() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let mut collection = Collection::wrap(&store, &mut state);

        collection.transfer_ownership(DEPLOYER, ALICE).unwrap();
        assert_eq!(collection.owner(), ALICE);

        {
            // the previous owner lost the capability
            let err = collection.mint(DEPLOYER, DEPLOYER, 1).unwrap_err();
            if let CollectionError::CollectionState(StateError::NotCollectionOwner { actor }) = err
            {
                assert_eq!(actor, DEPLOYER);
            } else {
                panic!("unexpected error {err:?}");
            }
            collection.transfer_ownership(DEPLOYER, DEPLOYER).unwrap_err();
            assert_eq!(collection.total_supply(), 0);
        }

        {
            // the new owner can mint
            let res = collection.mint(ALICE, ALICE, 10).unwrap();
            assert_eq!(res.balance, 10);
            assert_eq!(collection.balance_of(ALICE).unwrap(), 10);
        }

        let events = collection.drain_events();
        assert_eq!(
            events[0],
            CollectionEvent::OwnershipTransferred { previous: DEPLOYER, new: ALICE }
        );

        collection.check_invariants().unwrap();
    }

    #[test]
    fn it_advertises_supported_interfaces() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let collection = Collection::wrap(&store, &mut state);

        assert!(collection.supports_interface(interface::UNIQUE_ASSET_INTERFACE_ID));
        assert!(collection.supports_interface(interface::ASSET_METADATA_INTERFACE_ID));
        assert!(collection.supports_interface(interface::INTROSPECTION_INTERFACE_ID));
        assert!(collection.supports_interface(interface::SALE_ROYALTY_INTERFACE_ID));

        assert!(!collection.supports_interface(0x00000000));
        assert!(!collection.supports_interface(0x12345678));
    }

    #[test]
    fn it_enumerates_tokens() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let mut collection = Collection::wrap(&store, &mut state);

        collection.mint(DEPLOYER, ALICE, 5).unwrap();
        collection.mint(DEPLOYER, BOB, 3).unwrap();

        {
            // a single unlimited page returns everything
            let res = collection.list_tokens(None, 0).unwrap();
            assert_eq!(res.tokens.len(), 8);
            assert!(res.next_cursor.is_none());
        }

        {
            // pagination covers every id exactly once
            let page = collection.list_tokens(None, 3).unwrap();
            assert_eq!(page.tokens.len(), 3);
            let page = collection.list_tokens(page.next_cursor, 3).unwrap();
            assert_eq!(page.tokens.len(), 3);
            assert!(page.tokens.get(3) && page.tokens.get(4) && page.tokens.get(5));
            let page = collection.list_tokens(page.next_cursor, 3).unwrap();
            assert_eq!(page.tokens.len(), 2);
            assert!(page.next_cursor.is_none());
        }

        {
            // holdings are reported per owner
            let res = collection.list_owned_tokens(ALICE, None, 0).unwrap();
            assert_eq!(res.tokens.len(), 5);
            assert!(res.tokens.get(0) && res.tokens.get(4));
            let res = collection.list_owned_tokens(BOB, None, 0).unwrap();
            assert_eq!(res.tokens.len(), 3);
            assert!(res.tokens.get(5) && res.tokens.get(7));
        }

        {
            // cursors do not survive ledger mutations
            let page = collection.list_tokens(None, 2).unwrap();
            collection.mint(DEPLOYER, ALICE, 1).unwrap();
            let err = collection.list_tokens(page.next_cursor, 2).unwrap_err();
            if let CollectionError::CollectionState(StateError::InvalidCursor) = err {
            } else {
                panic!("unexpected error {err:?}");
            }
        }

        collection.check_invariants().unwrap();
    }

    #[test]
    fn it_persists_across_reload() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let root = {
            let mut collection = Collection::wrap(&store, &mut state);
            collection.mint(DEPLOYER, ALICE, 2).unwrap();
            collection.set_royalties(DEPLOYER, 10).unwrap();
            collection.flush().unwrap()
        };

        let mut reloaded = CollectionState::load(&store, &root).unwrap();
        let collection = Collection::wrap(&store, &mut reloaded);
        assert_eq!(collection.total_supply(), 2);
        assert_eq!(collection.owner_of(1).unwrap(), ALICE);
        assert_eq!(
            collection.royalty_info(0, &TokenAmount::from_atto(100)).amount,
            TokenAmount::from_atto(10)
        );

        collection.check_invariants().unwrap();
    }

    #[test]
    fn it_maps_failures_to_exit_codes() {
        let store = MemoryBlockstore::default();
        let mut state = new_state(&store);
        let mut collection = Collection::wrap(&store, &mut state);

        let err = collection.mint(ALICE, ALICE, 1).unwrap_err();
        assert_eq!(ExitCode::from(&err), ExitCode::USR_FORBIDDEN);

        let err = collection.mint(DEPLOYER, ALICE, MAX_SUPPLY + 1).unwrap_err();
        assert_eq!(ExitCode::from(&err), ExitCode::USR_ILLEGAL_ARGUMENT);

        let err = collection.token_uri(0).unwrap_err();
        assert_eq!(ExitCode::from(&err), ExitCode::USR_NOT_FOUND);
    }
}
