//! Abstraction of the persisted state backing the collection ledger
use std::collections::HashMap;

use cid::multihash::Code;
use cid::Cid;
use fvm_ipld_amt::Amt;
use fvm_ipld_amt::Error as AmtError;
use fvm_ipld_blockstore::Block;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::tuple::*;
use fvm_ipld_encoding::CborStore;
use fvm_ipld_encoding::DAG_CBOR;
use fvm_ipld_hamt::BytesKey;
use fvm_ipld_hamt::Error as HamtError;
use fvm_ipld_hamt::Hamt;
use fvm_shared::econ::TokenAmount;
use fvm_shared::ActorID;
use integer_encoding::VarInt;
use thiserror::Error;

use crate::types::MintIntermediate;
use crate::types::MintReturn;
use crate::types::RoyaltiesReturn;
use crate::types::TokenID;
use crate::types::TokenSet;
use crate::MAX_SUPPLY;

/// Opaque cursor to iterate over the token ledger.
#[derive(Serialize_tuple, Deserialize_tuple, Clone, Debug)]
pub struct Cursor {
    pub root: Cid,
    pub index: u64,
}

impl Cursor {
    fn new(cid: Cid, index: u64) -> Self {
        Self { root: cid, index }
    }
}

/// Collection state IPLD structure.
#[derive(Serialize_tuple, Deserialize_tuple, PartialEq, Eq, Clone, Debug)]
pub struct CollectionState {
    /// [`Amt<TokenID, ActorID>`] mapping each minted token id to its current owner.
    pub token_data: Cid,
    /// [`Hamt<ActorID, u64>`] index of owned-token counts, queried by owner.
    pub owner_data: Cid,
    /// The number of minted tokens. Tokens are never burned, so this is also
    /// the next id to assign.
    pub total_supply: u64,
    /// The principal holding the administrative capability: minting, royalty
    /// configuration and handing the capability on.
    pub collection_owner: ActorID,
    /// Prefix that token URIs are derived from. Immutable after construction.
    pub base_uri: String,
    /// Royalty rate in whole percentage points. Zero until the collection
    /// owner configures a rate.
    pub royalties: u64,
    /// The principal royalty payouts are directed to.
    pub royalties_receiver: ActorID,
}

// TODO: benchmark and tune these values
const AMT_BIT_WIDTH: u32 = 5;
const HAMT_BIT_WIDTH: u32 = 3;

type Result<T> = std::result::Result<T, StateError>;

type Map<'bs, BS, K, V> = Hamt<&'bs BS, V, K>;
type OwnerMap<'bs, BS> = Map<'bs, BS, BytesKey, u64>;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("ipld amt error: {0}")]
    IpldAmt(#[from] AmtError),
    #[error("ipld hamt error: {0}")]
    IpldHamt(#[from] HamtError),
    #[error("token id not found: {0}")]
    TokenNotFound(TokenID),
    #[error("actor {actor:?} does not hold the collection's administrative capability")]
    NotCollectionOwner { actor: ActorID },
    #[error(
        "minting {quantity} tokens would take the supply of {total_supply} over the maximum of {max_supply}"
    )]
    MaxSupplyExceeded { quantity: u64, total_supply: u64, max_supply: u64 },
    #[error("mint quantity must be greater than zero")]
    InvalidQuantity,
    #[error("royalty percentage {0} outside the accepted range of 1 to 100")]
    InvalidRoyalties(u64),
    #[error("invalid cursor")]
    InvalidCursor,
    /// This error is returned for errors that should never happen.
    #[error("invariant failed: {0}")]
    InvariantFailed(String),
}

impl CollectionState {
    /// Create a new collection state-tree, without committing it (the root Cid) to a blockstore.
    ///
    /// The deploying principal starts out holding the administrative
    /// capability and receiving royalties.
    pub fn new<BS: Blockstore>(store: &BS, deployer: ActorID, base_uri: String) -> Result<Self> {
        // Blockstore is still needed to create valid Cids for the Hamts
        let empty_token_array =
            Amt::<ActorID, &BS>::new_with_bit_width(store, AMT_BIT_WIDTH).flush()?;
        // Blockstore is still needed to create valid Cids for the Hamts
        let empty_owner_map = OwnerMap::new_with_bit_width(store, HAMT_BIT_WIDTH).flush()?;

        Ok(Self {
            token_data: empty_token_array,
            owner_data: empty_owner_map,
            total_supply: 0,
            collection_owner: deployer,
            base_uri,
            royalties: 0,
            royalties_receiver: deployer,
        })
    }

    pub fn load<BS: Blockstore>(store: &BS, root: &Cid) -> Result<Self> {
        match store.get_cbor::<Self>(root) {
            Ok(Some(state)) => Ok(state),
            Ok(None) => Err(StateError::InvariantFailed("State root not found".into())),
            Err(e) => Err(StateError::InvariantFailed(e.to_string())),
        }
    }

    pub fn save<BS: Blockstore>(&self, store: &BS) -> Result<Cid> {
        let serialized = match fvm_ipld_encoding::to_vec(self) {
            Ok(s) => s,
            Err(err) => return Err(StateError::InvariantFailed(err.to_string())),
        };
        let block = Block { codec: DAG_CBOR, data: serialized };
        let cid = match store.put(Code::Blake2b256, &block) {
            Ok(cid) => cid,
            Err(err) => return Err(StateError::InvariantFailed(err.to_string())),
        };
        Ok(cid)
    }

    pub fn get_token_data_amt<'bs, BS: Blockstore>(
        &self,
        store: &'bs BS,
    ) -> Result<Amt<ActorID, &'bs BS>> {
        let res = Amt::load(&self.token_data, store)?;
        Ok(res)
    }

    pub fn get_owner_data_hamt<'bs, BS: Blockstore>(
        &self,
        store: &'bs BS,
    ) -> Result<OwnerMap<'bs, BS>> {
        let res = OwnerMap::load_with_bit_width(&self.owner_data, store, HAMT_BIT_WIDTH)?;
        Ok(res)
    }

    /// Retrieves the token ledger, asserting that the cursor is valid for the current state. If
    /// the root cid has changed since the cursor was created, the data has mutated and the cursor
    /// is invalid.
    pub fn get_token_amt_for_cursor<'bs, BS: Blockstore>(
        &self,
        store: &'bs BS,
        cursor: &Option<Cursor>,
    ) -> Result<Amt<ActorID, &'bs BS>> {
        if let Some(cursor) = cursor {
            if cursor.root != self.token_data {
                return Err(StateError::InvalidCursor);
            }
        }
        self.get_token_data_amt(store)
    }
}

impl CollectionState {
    /// Asserts that the given actor holds the administrative capability.
    ///
    /// Every privileged operation runs this guard before touching state.
    pub fn assert_collection_owner(&self, actor: ActorID) -> Result<()> {
        if self.collection_owner != actor {
            return Err(StateError::NotCollectionOwner { actor });
        }

        Ok(())
    }

    /// Mint new tokens to the specified address.
    ///
    /// Ids are assigned consecutively from the current supply counter; the
    /// capacity check, the ledger inserts and the counter advance happen
    /// against the same state copy so a failure leaves nothing behind.
    pub fn mint_tokens<BS: Blockstore>(
        &mut self,
        bs: &BS,
        initial_owner: ActorID,
        quantity: u64,
    ) -> Result<MintIntermediate> {
        if quantity == 0 {
            return Err(StateError::InvalidQuantity);
        }
        // total_supply never exceeds MAX_SUPPLY so the subtraction cannot wrap
        if quantity > MAX_SUPPLY - self.total_supply {
            return Err(StateError::MaxSupplyExceeded {
                quantity,
                total_supply: self.total_supply,
                max_supply: MAX_SUPPLY,
            });
        }

        let first_token_id = self.total_supply;

        let mut token_array = self.get_token_data_amt(bs)?;
        let mut owner_map = self.get_owner_data_hamt(bs)?;

        // update owner data map
        let owner_key = actor_id_key(initial_owner);
        let balance = owner_map.get(&owner_key)?.copied().unwrap_or(0);
        owner_map.set(owner_key, balance + quantity)?;

        // update token ledger
        for token_id in first_token_id..first_token_id + quantity {
            token_array.set(token_id, initial_owner)?;
        }

        // update global trackers
        self.total_supply += quantity;
        self.token_data = token_array.flush()?;
        self.owner_data = owner_map.flush()?;

        // params for constructing our return value
        Ok(MintIntermediate {
            to: initial_owner,
            token_ids: (first_token_id..self.total_supply).collect(),
        })
    }

    /// Converts a [`MintIntermediate`] to a [`MintReturn`].
    ///
    /// This function should be called on a freshly committed or known-up-to-date state.
    pub fn mint_return<BS: Blockstore>(
        &self,
        bs: &BS,
        intermediate: MintIntermediate,
    ) -> Result<MintReturn> {
        let balance = self.get_balance(bs, intermediate.to)?;

        Ok(MintReturn { balance, supply: self.total_supply, token_ids: intermediate.token_ids })
    }

    /// Get the number of tokens owned by a particular address.
    pub fn get_balance<BS: Blockstore>(&self, bs: &BS, owner: ActorID) -> Result<u64> {
        let owner_data = self.get_owner_data_hamt(bs)?;
        let balance = match owner_data.get(&actor_id_key(owner))? {
            Some(balance) => *balance,
            None => 0,
        };

        Ok(balance)
    }

    /// Get the owner of a token.
    pub fn get_owner<BS: Blockstore>(&self, bs: &BS, token_id: TokenID) -> Result<ActorID> {
        let token_array = self.get_token_data_amt(bs)?;
        let owner = token_array.get(token_id)?.ok_or(StateError::TokenNotFound(token_id))?;
        Ok(*owner)
    }

    /// Resolve the metadata URI for a minted token.
    ///
    /// The URI is derived, not stored: the base prefix followed by the decimal
    /// token id and a `.json` suffix. Unminted ids resolve to nothing and are
    /// rejected.
    pub fn token_uri<BS: Blockstore>(&self, bs: &BS, token_id: TokenID) -> Result<String> {
        let token_array = self.get_token_data_amt(bs)?;
        token_array.get(token_id)?.ok_or(StateError::TokenNotFound(token_id))?;
        Ok(format!("{}{}.json", self.base_uri, token_id))
    }

    /// Compute the royalty payable on a sale of the given value.
    ///
    /// A pure function of the royalty configuration: the configured rate is
    /// applied to the sale price and the result truncated toward zero. The
    /// rate applies uniformly across the collection, so no token id is
    /// consulted.
    pub fn royalty_info(&self, sale_price: &TokenAmount) -> RoyaltiesReturn {
        let (amount, _) = TokenAmount::from_atto(sale_price.atto() * self.royalties).div_rem(100);
        RoyaltiesReturn { receiver: self.royalties_receiver, amount }
    }

    /// Replace the royalty rate.
    ///
    /// Rates are whole percentage points in `1..=100`; a rate above the whole
    /// sale value is never meaningful.
    pub fn set_royalties(&mut self, percentage: u64) -> Result<()> {
        if percentage == 0 || percentage > 100 {
            return Err(StateError::InvalidRoyalties(percentage));
        }
        self.royalties = percentage;
        Ok(())
    }

    /// Replace the royalty receiver unconditionally.
    pub fn set_royalties_receiver(&mut self, receiver: ActorID) {
        self.royalties_receiver = receiver;
    }

    /// Hand the administrative capability to a new principal, returning the
    /// previous holder. The capability always rests with exactly one
    /// principal; there is no intermediate unowned state.
    pub fn transfer_collection_owner(&mut self, new_owner: ActorID) -> ActorID {
        std::mem::replace(&mut self.collection_owner, new_owner)
    }

    /// List a page of minted token ids.
    ///
    /// Returns a bitfield of the ids and a cursor to the next page of data.
    pub fn list_tokens<BS: Blockstore>(
        &self,
        bs: &BS,
        cursor: Option<Cursor>,
        limit: Option<u64>,
    ) -> Result<(TokenSet, Option<Cursor>)> {
        self.list_tokens_matching(bs, cursor, limit, |_| true)
    }

    /// List a page of the token ids owned by an actor. This iterates the
    /// entire token ledger, which the supply cap keeps small.
    pub fn list_owned_tokens<BS: Blockstore>(
        &self,
        bs: &BS,
        owner: ActorID,
        cursor: Option<Cursor>,
        limit: Option<u64>,
    ) -> Result<(TokenSet, Option<Cursor>)> {
        self.list_tokens_matching(bs, cursor, limit, |token_owner| token_owner == owner)
    }

    fn list_tokens_matching<BS, F>(
        &self,
        bs: &BS,
        cursor: Option<Cursor>,
        limit: Option<u64>,
        predicate: F,
    ) -> Result<(TokenSet, Option<Cursor>)>
    where
        BS: Blockstore,
        F: Fn(ActorID) -> bool,
    {
        let token_array = self.get_token_amt_for_cursor(bs, &cursor)?;
        let start = cursor.map_or(0, |c| c.index);
        let limit = limit.unwrap_or(u64::MAX);

        // Build the TokenSet
        let mut token_ids = TokenSet::new();
        let mut taken = 0u64;
        let mut next_index = None;
        token_array.for_each(|token_id, owner| {
            if token_id < start || !predicate(*owner) {
                return Ok(());
            }
            if taken < limit {
                token_ids.set(token_id);
                taken += 1;
            } else if next_index.is_none() {
                next_index = Some(token_id);
            }
            Ok(())
        })?;

        let next_cursor = next_index.map(|index| Cursor::new(self.token_data, index));
        Ok((token_ids, next_cursor))
    }
}

pub struct StateSummary {
    pub total_supply: u64,
    pub owner_data: Option<HashMap<ActorID, u64>>,
    pub token_data: Option<HashMap<TokenID, ActorID>>,
}

#[derive(Error, Debug)]
pub enum StateInvariantError {
    #[error(
        "the total supply {total_supply:?} does not match the number of tokens recorded {token_count:?}"
    )]
    TotalSupplyMismatch { total_supply: u64, token_count: u64 },
    #[error("the total supply {total_supply:?} exceeds the maximum supply {max_supply:?}")]
    SupplyOverCap { total_supply: u64, max_supply: u64 },
    #[error("token id {0} lies at or beyond the supply counter; ids must be dense from zero")]
    TokenIdBeyondSupply(TokenID),
    #[error(
        "the token ledger recorded {token_count:?} tokens for {owner:?} but the owner map recorded {owner_count:?}"
    )]
    TokenBalanceMismatch { owner: ActorID, token_count: u64, owner_count: u64 },
    #[error("stored a zero balance which should have been removed for {0}")]
    ExplicitZeroBalance(ActorID),
    #[error("invalid serialized owner key {0:?}")]
    InvalidBytesKey(BytesKey),
    #[error("royalty percentage {0} stored outside the accepted range")]
    RoyaltiesOverCap(u64),
    #[error("underlying state error {0}")]
    State(#[from] StateError),
}

impl CollectionState {
    /**
     * Checks that the state is internally consistent and obeys the specified invariants
     *
     * Checks that balances in the token ledger and the owner map are consistent, that the total
     * supply matches the number of tokens recorded and never exceeds the cap, that ids are dense
     * from zero, and that the royalty configuration is within its domain. Checks that all bytes
     * keys are valid actor ids.
     *
     * Returns a state summary that can be used to check application specific invariants and a list
     * of errors that were found.
     */
    pub fn check_invariants<BS: Blockstore>(
        &self,
        bs: &BS,
    ) -> (StateSummary, Vec<StateInvariantError>) {
        // accumulate errors encountered in the state
        let mut errors: Vec<StateInvariantError> = vec![];

        if self.total_supply > MAX_SUPPLY {
            errors.push(StateInvariantError::SupplyOverCap {
                total_supply: self.total_supply,
                max_supply: MAX_SUPPLY,
            });
        }

        if self.royalties > 100 {
            errors.push(StateInvariantError::RoyaltiesOverCap(self.royalties));
        }

        // get token data
        let token_data = match self.get_token_data_amt(bs) {
            Ok(token_amt) => Some(token_amt),
            Err(e) => {
                errors.push(e.into());
                None
            }
        };

        // get owner data
        let owner_data = match self.get_owner_data_hamt(bs) {
            Ok(owner_hamt) => Some(owner_hamt),
            Err(e) => {
                errors.push(e.into());
                None
            }
        };

        // there's no point continuing if either are missing as something serious is wrong
        // we can't do meaningful state checks without the underlying data being loadable
        if owner_data.is_none() || token_data.is_none() {
            return (
                StateSummary {
                    owner_data: None,
                    token_data: None,
                    total_supply: self.total_supply,
                },
                errors,
            );
        }

        let owner_data = owner_data.unwrap();
        let token_data = token_data.unwrap();

        // check the total supply matches the number of tokens stored
        if self.total_supply != token_data.count() {
            errors.push(StateInvariantError::TotalSupplyMismatch {
                total_supply: self.total_supply,
                token_count: token_data.count(),
            });
        }

        // tally the ownership of each token to check for consistency against owner_data
        let mut counted_balances = HashMap::<ActorID, u64>::new();
        let mut token_map = HashMap::<TokenID, ActorID>::new();
        let res = token_data.for_each(|id, owner| {
            if id >= self.total_supply {
                errors.push(StateInvariantError::TokenIdBeyondSupply(id));
            }

            // tally owner of token
            let count = counted_balances.entry(*owner).or_insert(0);
            *count += 1;

            token_map.insert(id, *owner);
            Ok(())
        });
        if let Err(e) = res {
            errors.push(StateInvariantError::State(e.into()));
        }

        let mut owner_map = HashMap::<ActorID, u64>::new();
        // check owner data is consistent with token data
        let res = owner_data.for_each(|owner_key, balance| {
            if let Some(actor_id) = decode_actor_id(owner_key) {
                // assert balance matches the balance derived from the token ledger
                let expected_balance = counted_balances.get(&actor_id).unwrap_or(&0);
                if *expected_balance != *balance {
                    errors.push(StateInvariantError::TokenBalanceMismatch {
                        owner: actor_id,
                        token_count: *expected_balance,
                        owner_count: *balance,
                    });
                }

                // a principal holding nothing should have no entry in the owner map
                if *balance == 0 {
                    errors.push(StateInvariantError::ExplicitZeroBalance(actor_id));
                }

                owner_map.insert(actor_id, *balance);
            } else {
                errors.push(StateInvariantError::InvalidBytesKey(owner_key.clone()));
            }

            Ok(())
        });
        if let Err(e) = res {
            errors.push(StateInvariantError::State(e.into()));
        }

        (
            StateSummary {
                owner_data: Some(owner_map),
                token_data: Some(token_map),
                total_supply: self.total_supply,
            },
            errors,
        )
    }
}

pub fn actor_id_key(a: ActorID) -> BytesKey {
    a.encode_var_vec().into()
}

pub fn decode_actor_id(key: &BytesKey) -> Option<ActorID> {
    u64::decode_var(key.0.as_slice()).map(|a| a.0)
}
