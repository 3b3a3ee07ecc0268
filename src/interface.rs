//! Capability introspection for the collection.
//!
//! The collection advertises exactly four capability sets. The identifiers
//! follow the 4-byte ERC-165 convention so existing wallets and indexers can
//! detect support without probing every operation.

pub type InterfaceId = u32;

/// Ownership, transfer and balance queries over unique assets.
pub const UNIQUE_ASSET_INTERFACE_ID: InterfaceId = 0x80ac58cd;
/// Collection name/symbol and per-token URI resolution.
pub const ASSET_METADATA_INTERFACE_ID: InterfaceId = 0x5b5e139f;
/// Capability introspection, i.e. this query itself.
pub const INTROSPECTION_INTERFACE_ID: InterfaceId = 0x01ffc9a7;
/// Per-sale royalty reporting.
pub const SALE_ROYALTY_INTERFACE_ID: InterfaceId = 0x2a55205a;

/// Returns true for exactly the four capability sets the collection
/// implements, false for any other identifier.
pub fn supports_interface(interface_id: InterfaceId) -> bool {
    matches!(
        interface_id,
        UNIQUE_ASSET_INTERFACE_ID
            | ASSET_METADATA_INTERFACE_ID
            | INTROSPECTION_INTERFACE_ID
            | SALE_ROYALTY_INTERFACE_ID
    )
}
