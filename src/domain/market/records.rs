use serde::{Deserialize, Serialize};

use crate::identifier::{listing_key, IdentifierError, RecordKey};
use crate::primitives::{Address, B256, TxHash, Uint};
use crate::projection::core::{BlockStamp, EventOccurrence, Record};
use super::events::*;

// ============================================================================
// Market Records - Persisted read model
// ============================================================================
//
// One record kind per event kind. Each mapping below destructures the event
// without `..` and builds the record with a full struct literal, so a field
// added on either side without a counterpart fails to compile.
//
// Every record except ListingCreatedRecord is keyed by its occurrence
// (transaction hash ++ log index). ListingCreatedRecord is keyed by its
// fixed-width listing id so later events can find it again.
//
// ============================================================================

macro_rules! impl_record {
    ($record:ty, $kind:literal) => {
        impl Record for $record {
            const KIND: &'static str = $kind;

            fn key(&self) -> &RecordKey {
                &self.id
            }

            fn stamp(&self) -> &BlockStamp {
                &self.stamp
            }
        }
    };
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Eip712DomainChangedRecord {
    pub id: RecordKey,
    #[serde(flatten)]
    pub stamp: BlockStamp,
}

impl_record!(Eip712DomainChangedRecord, "EIP712DomainChanged");

impl From<EventOccurrence<&Eip712DomainChanged>> for Eip712DomainChangedRecord {
    fn from(occurrence: EventOccurrence<&Eip712DomainChanged>) -> Self {
        let Eip712DomainChanged {} = occurrence.event;
        Self {
            id: occurrence.occurrence_key(),
            stamp: occurrence.stamp(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeeReceiverUpdatedRecord {
    pub id: RecordKey,
    pub new_fee_receiver: Address,
    pub timestamp: Uint,
    #[serde(flatten)]
    pub stamp: BlockStamp,
}

impl_record!(FeeReceiverUpdatedRecord, "FeeReceiverUpdated");

impl From<EventOccurrence<&FeeReceiverUpdated>> for FeeReceiverUpdatedRecord {
    fn from(occurrence: EventOccurrence<&FeeReceiverUpdated>) -> Self {
        let FeeReceiverUpdated { new_fee_receiver, timestamp } = occurrence.event;
        Self {
            id: occurrence.occurrence_key(),
            new_fee_receiver: *new_fee_receiver,
            timestamp: timestamp.clone(),
            stamp: occurrence.stamp(),
        }
    }
}

/// Cancellation log entry. `listing` is the key of the cancelled listing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ListingCancelledRecord {
    pub id: RecordKey,
    pub listing_id: Uint,
    pub listing: RecordKey,
    pub nft_contract: Address,
    pub token_id: Uint,
    pub token_type: u8,
    pub seller: Address,
    pub timestamp: Uint,
    #[serde(flatten)]
    pub stamp: BlockStamp,
}

impl_record!(ListingCancelledRecord, "ListingCancelled");

impl TryFrom<EventOccurrence<&ListingCancelled>> for ListingCancelledRecord {
    type Error = IdentifierError;

    fn try_from(occurrence: EventOccurrence<&ListingCancelled>) -> Result<Self, Self::Error> {
        let ListingCancelled {
            listing_id,
            nft_contract,
            token_id,
            token_type,
            seller,
            timestamp,
        } = occurrence.event;

        Ok(Self {
            id: occurrence.occurrence_key(),
            listing_id: listing_id.clone(),
            listing: listing_key(listing_id)?,
            nft_contract: *nft_contract,
            token_id: token_id.clone(),
            token_type: *token_type,
            seller: *seller,
            timestamp: timestamp.clone(),
            stamp: occurrence.stamp(),
        })
    }
}

/// Primary listing record, keyed by the fixed-width listing id.
///
/// `cancel_tx_hash` is the one field that changes after creation: it is set
/// by the first `ListingCancelled` event seen for the listing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ListingCreatedRecord {
    pub id: RecordKey,
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
    pub cancel_tx_hash: Option<TxHash>,
    #[serde(flatten)]
    pub stamp: BlockStamp,
}

impl_record!(ListingCreatedRecord, "ListingCreated");

impl TryFrom<EventOccurrence<&ListingCreated>> for ListingCreatedRecord {
    type Error = IdentifierError;

    fn try_from(occurrence: EventOccurrence<&ListingCreated>) -> Result<Self, Self::Error> {
        let ListingCreated {
            listing_id,
            nft_contract,
            token_id,
            token_type,
            seller,
            payment_token,
            price,
            amount,
            requires_whitelist,
            timestamp,
        } = occurrence.event;

        Ok(Self {
            id: listing_key(listing_id)?,
            listing_id: listing_id.clone(),
            nft_contract: *nft_contract,
            token_id: token_id.clone(),
            token_type: *token_type,
            seller: *seller,
            payment_token: *payment_token,
            price: price.clone(),
            amount: amount.clone(),
            requires_whitelist: *requires_whitelist,
            timestamp: timestamp.clone(),
            cancel_tx_hash: None,
            stamp: occurrence.stamp(),
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MerkleRootUpdatedRecord {
    pub id: RecordKey,
    pub new_root: B256,
    pub timestamp: Uint,
    #[serde(flatten)]
    pub stamp: BlockStamp,
}

impl_record!(MerkleRootUpdatedRecord, "MerkleRootUpdated");

impl From<EventOccurrence<&MerkleRootUpdated>> for MerkleRootUpdatedRecord {
    fn from(occurrence: EventOccurrence<&MerkleRootUpdated>) -> Self {
        let MerkleRootUpdated { new_root, timestamp } = occurrence.event;
        Self {
            id: occurrence.occurrence_key(),
            new_root: *new_root,
            timestamp: timestamp.clone(),
            stamp: occurrence.stamp(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NftClaimedRecord {
    pub id: RecordKey,
    pub listing_id: Uint,
    pub listing: RecordKey,
    pub user: Address,
    pub discounted_price: Uint,
    pub timestamp: Uint,
    #[serde(flatten)]
    pub stamp: BlockStamp,
}

impl_record!(NftClaimedRecord, "NFTClaimed");

impl TryFrom<EventOccurrence<&NftClaimed>> for NftClaimedRecord {
    type Error = IdentifierError;

    fn try_from(occurrence: EventOccurrence<&NftClaimed>) -> Result<Self, Self::Error> {
        let NftClaimed {
            listing_id,
            user,
            discounted_price,
            timestamp,
        } = occurrence.event;

        Ok(Self {
            id: occurrence.occurrence_key(),
            listing_id: listing_id.clone(),
            listing: listing_key(listing_id)?,
            user: *user,
            discounted_price: discounted_price.clone(),
            timestamp: timestamp.clone(),
            stamp: occurrence.stamp(),
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NftPurchasedRecord {
    pub id: RecordKey,
    pub listing_id: Uint,
    pub listing: RecordKey,
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
    #[serde(flatten)]
    pub stamp: BlockStamp,
}

impl_record!(NftPurchasedRecord, "NFTPurchased");

impl TryFrom<EventOccurrence<&NftPurchased>> for NftPurchasedRecord {
    type Error = IdentifierError;

    fn try_from(occurrence: EventOccurrence<&NftPurchased>) -> Result<Self, Self::Error> {
        let NftPurchased {
            listing_id,
            nft_contract,
            token_id,
            token_type,
            seller,
            buyer,
            price,
            amount,
            platform_fee,
            is_permit_buy,
            timestamp,
        } = occurrence.event;

        Ok(Self {
            id: occurrence.occurrence_key(),
            listing_id: listing_id.clone(),
            listing: listing_key(listing_id)?,
            nft_contract: *nft_contract,
            token_id: token_id.clone(),
            token_type: *token_type,
            seller: *seller,
            buyer: *buyer,
            price: price.clone(),
            amount: amount.clone(),
            platform_fee: platform_fee.clone(),
            is_permit_buy: *is_permit_buy,
            timestamp: timestamp.clone(),
            stamp: occurrence.stamp(),
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OwnershipTransferredRecord {
    pub id: RecordKey,
    pub previous_owner: Address,
    pub new_owner: Address,
    #[serde(flatten)]
    pub stamp: BlockStamp,
}

impl_record!(OwnershipTransferredRecord, "OwnershipTransferred");

impl From<EventOccurrence<&OwnershipTransferred>> for OwnershipTransferredRecord {
    fn from(occurrence: EventOccurrence<&OwnershipTransferred>) -> Self {
        let OwnershipTransferred { previous_owner, new_owner } = occurrence.event;
        Self {
            id: occurrence.occurrence_key(),
            previous_owner: *previous_owner,
            new_owner: *new_owner,
            stamp: occurrence.stamp(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PermitPrePaidRecord {
    pub id: RecordKey,
    pub user: Address,
    pub token: Address,
    pub amount: Uint,
    pub timestamp: Uint,
    #[serde(flatten)]
    pub stamp: BlockStamp,
}

impl_record!(PermitPrePaidRecord, "PermitPrePaid");

impl From<EventOccurrence<&PermitPrePaid>> for PermitPrePaidRecord {
    fn from(occurrence: EventOccurrence<&PermitPrePaid>) -> Self {
        let PermitPrePaid {
            user,
            token,
            amount,
            timestamp,
        } = occurrence.event;

        Self {
            id: occurrence.occurrence_key(),
            user: *user,
            token: *token,
            amount: amount.clone(),
            timestamp: timestamp.clone(),
            stamp: occurrence.stamp(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlatformFeeUpdatedRecord {
    pub id: RecordKey,
    pub new_fee_percentage: Uint,
    pub timestamp: Uint,
    #[serde(flatten)]
    pub stamp: BlockStamp,
}

impl_record!(PlatformFeeUpdatedRecord, "PlatformFeeUpdated");

impl From<EventOccurrence<&PlatformFeeUpdated>> for PlatformFeeUpdatedRecord {
    fn from(occurrence: EventOccurrence<&PlatformFeeUpdated>) -> Self {
        let PlatformFeeUpdated { new_fee_percentage, timestamp } = occurrence.event;
        Self {
            id: occurrence.occurrence_key(),
            new_fee_percentage: new_fee_percentage.clone(),
            timestamp: timestamp.clone(),
            stamp: occurrence.stamp(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SignerUpdatedRecord {
    pub id: RecordKey,
    pub new_signer: Address,
    pub timestamp: Uint,
    #[serde(flatten)]
    pub stamp: BlockStamp,
}

impl_record!(SignerUpdatedRecord, "SignerUpdated");

impl From<EventOccurrence<&SignerUpdated>> for SignerUpdatedRecord {
    fn from(occurrence: EventOccurrence<&SignerUpdated>) -> Self {
        let SignerUpdated { new_signer, timestamp } = occurrence.event;
        Self {
            id: occurrence.occurrence_key(),
            new_signer: *new_signer,
            timestamp: timestamp.clone(),
            stamp: occurrence.stamp(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WhitelistDiscountUpdatedRecord {
    pub id: RecordKey,
    pub new_discount: Uint,
    pub timestamp: Uint,
    #[serde(flatten)]
    pub stamp: BlockStamp,
}

impl_record!(WhitelistDiscountUpdatedRecord, "WhitelistDiscountUpdated");

impl From<EventOccurrence<&WhitelistDiscountUpdated>> for WhitelistDiscountUpdatedRecord {
    fn from(occurrence: EventOccurrence<&WhitelistDiscountUpdated>) -> Self {
        let WhitelistDiscountUpdated { new_discount, timestamp } = occurrence.event;
        Self {
            id: occurrence.occurrence_key(),
            new_discount: new_discount.clone(),
            timestamp: timestamp.clone(),
            stamp: occurrence.stamp(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
