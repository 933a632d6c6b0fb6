use serde::{Deserialize, Serialize};

use crate::primitives::{Address, B256, Uint};
use crate::projection::core::EventKind;

// ============================================================================
// Market Events - Decoded contract logs
// ============================================================================

/// Market Event - Union type for all market contract events
///
/// The set of kinds is closed: every variant has exactly one projection
/// handler and adding a variant without one does not compile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MarketEvent {
    #[serde(rename = "EIP712DomainChanged")]
    Eip712DomainChanged(Eip712DomainChanged),
    FeeReceiverUpdated(FeeReceiverUpdated),
    ListingCancelled(ListingCancelled),
    ListingCreated(ListingCreated),
    MerkleRootUpdated(MerkleRootUpdated),
    #[serde(rename = "NFTClaimed")]
    NftClaimed(NftClaimed),
    #[serde(rename = "NFTPurchased")]
    NftPurchased(NftPurchased),
    OwnershipTransferred(OwnershipTransferred),
    PermitPrePaid(PermitPrePaid),
    PlatformFeeUpdated(PlatformFeeUpdated),
    SignerUpdated(SignerUpdated),
    WhitelistDiscountUpdated(WhitelistDiscountUpdated),
}

impl EventKind for MarketEvent {
    fn kind(&self) -> &'static str {
        match self {
            MarketEvent::Eip712DomainChanged(_) => "EIP712DomainChanged",
            MarketEvent::FeeReceiverUpdated(_) => "FeeReceiverUpdated",
            MarketEvent::ListingCancelled(_) => "ListingCancelled",
            MarketEvent::ListingCreated(_) => "ListingCreated",
            MarketEvent::MerkleRootUpdated(_) => "MerkleRootUpdated",
            MarketEvent::NftClaimed(_) => "NFTClaimed",
            MarketEvent::NftPurchased(_) => "NFTPurchased",
            MarketEvent::OwnershipTransferred(_) => "OwnershipTransferred",
            MarketEvent::PermitPrePaid(_) => "PermitPrePaid",
            MarketEvent::PlatformFeeUpdated(_) => "PlatformFeeUpdated",
            MarketEvent::SignerUpdated(_) => "SignerUpdated",
            MarketEvent::WhitelistDiscountUpdated(_) => "WhitelistDiscountUpdated",
        }
    }
}

// ============================================================================
// Individual Event Types
// ============================================================================

/// EIP-712 domain separator changed. Carries no parameters.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Eip712DomainChanged {}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeeReceiverUpdated {
    pub new_fee_receiver: Address,
    pub timestamp: Uint,
}

/// Listing withdrawn by its seller.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ListingCancelled {
    pub listing_id: Uint,
    pub nft_contract: Address,
    pub token_id: Uint,
    pub token_type: u8,
    pub seller: Address,
    pub timestamp: Uint,
}

/// New listing put up for sale.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ListingCreated {
    pub listing_id: Uint,
    pub nft_contract: Address,
    pub token_id: Uint,
    pub token_type: u8,
    pub seller: Address,
    pub payment_token: Address,
    pub price: Uint,
    pub amount: Uint,
    pub requires_whitelist: bool,
    pub timestamp: Uint,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MerkleRootUpdated {
    pub new_root: B256,
    pub timestamp: Uint,
}

/// Whitelisted claim against a listing at a discounted price.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NftClaimed {
    pub listing_id: Uint,
    pub user: Address,
    pub discounted_price: Uint,
    pub timestamp: Uint,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NftPurchased {
    pub listing_id: Uint,
    pub nft_contract: Address,
    pub token_id: Uint,
    pub token_type: u8,
    pub seller: Address,
    pub buyer: Address,
    pub price: Uint,
    pub amount: Uint,
    pub platform_fee: Uint,
    pub is_permit_buy: bool,
    pub timestamp: Uint,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PermitPrePaid {
    pub user: Address,
    pub token: Address,
    pub amount: Uint,
    pub timestamp: Uint,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlatformFeeUpdated {
    pub new_fee_percentage: Uint,
    pub timestamp: Uint,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SignerUpdated {
    pub new_signer: Address,
    pub timestamp: Uint,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WhitelistDiscountUpdated {
    pub new_discount: Uint,
    pub timestamp: Uint,
}

// ============================================================================
// Unit Tests
// ============================================================================
