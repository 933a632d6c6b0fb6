// ============================================================================
// Mock Market Events (test fixtures)
// ============================================================================
//
// Each constructor takes the event's parameters and wraps them with fixed
// default log metadata. `EventOccurrence::at` moves an event to a specific
// transaction and log index.
//
// ============================================================================

use crate::primitives::{Address, B256, TxHash, Uint};
use crate::projection::core::EventOccurrence;
use super::events::*;

pub const MOCK_TX_HASH: TxHash = B256::repeat_byte(0xa1);
pub const MOCK_LOG_INDEX: u32 = 1;
pub const MOCK_BLOCK_NUMBER: u64 = 1;
pub const MOCK_BLOCK_TIMESTAMP: u64 = 1;

pub fn new_mock_event(event: MarketEvent) -> EventOccurrence<MarketEvent> {
    EventOccurrence::new(
        event,
        MOCK_TX_HASH,
        MOCK_LOG_INDEX,
        MOCK_BLOCK_NUMBER,
        MOCK_BLOCK_TIMESTAMP,
    )
}

impl<E> EventOccurrence<E> {
    /// Move the occurrence to another transaction / log position.
    pub fn at(mut self, transaction_hash: TxHash, log_index: u32) -> Self {
        self.transaction_hash = transaction_hash;
        self.log_index = log_index;
        self
    }
}

pub fn create_eip712_domain_changed_event() -> EventOccurrence<MarketEvent> {
    new_mock_event(MarketEvent::Eip712DomainChanged(Eip712DomainChanged {}))
}

pub fn create_fee_receiver_updated_event(
    new_fee_receiver: Address,
    timestamp: Uint,
) -> EventOccurrence<MarketEvent> {
    new_mock_event(MarketEvent::FeeReceiverUpdated(FeeReceiverUpdated {
        new_fee_receiver,
        timestamp,
    }))
}

pub fn create_listing_cancelled_event(
    listing_id: Uint,
    nft_contract: Address,
    token_id: Uint,
    token_type: u8,
    seller: Address,
    timestamp: Uint,
) -> EventOccurrence<MarketEvent> {
    new_mock_event(MarketEvent::ListingCancelled(ListingCancelled {
        listing_id,
        nft_contract,
        token_id,
        token_type,
        seller,
        timestamp,
    }))
}

#[allow(clippy::too_many_arguments)]
pub fn create_listing_created_event(
    listing_id: Uint,
    nft_contract: Address,
    token_id: Uint,
    token_type: u8,
    seller: Address,
    payment_token: Address,
    price: Uint,
    amount: Uint,
    requires_whitelist: bool,
    timestamp: Uint,
) -> EventOccurrence<MarketEvent> {
    new_mock_event(MarketEvent::ListingCreated(ListingCreated {
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
    }))
}

pub fn create_merkle_root_updated_event(
    new_root: B256,
    timestamp: Uint,
) -> EventOccurrence<MarketEvent> {
    new_mock_event(MarketEvent::MerkleRootUpdated(MerkleRootUpdated {
        new_root,
        timestamp,
    }))
}

pub fn create_nft_claimed_event(
    listing_id: Uint,
    user: Address,
    discounted_price: Uint,
    timestamp: Uint,
) -> EventOccurrence<MarketEvent> {
    new_mock_event(MarketEvent::NftClaimed(NftClaimed {
        listing_id,
        user,
        discounted_price,
        timestamp,
    }))
}

#[allow(clippy::too_many_arguments)]
pub fn create_nft_purchased_event(
    listing_id: Uint,
    nft_contract: Address,
    token_id: Uint,
    token_type: u8,
    seller: Address,
    buyer: Address,
    price: Uint,
    amount: Uint,
    platform_fee: Uint,
    is_permit_buy: bool,
    timestamp: Uint,
) -> EventOccurrence<MarketEvent> {
    new_mock_event(MarketEvent::NftPurchased(NftPurchased {
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
    }))
}

pub fn create_ownership_transferred_event(
    previous_owner: Address,
    new_owner: Address,
) -> EventOccurrence<MarketEvent> {
    new_mock_event(MarketEvent::OwnershipTransferred(OwnershipTransferred {
        previous_owner,
        new_owner,
    }))
}

pub fn create_permit_pre_paid_event(
    user: Address,
    token: Address,
    amount: Uint,
    timestamp: Uint,
) -> EventOccurrence<MarketEvent> {
    new_mock_event(MarketEvent::PermitPrePaid(PermitPrePaid {
        user,
        token,
        amount,
        timestamp,
    }))
}

pub fn create_platform_fee_updated_event(
    new_fee_percentage: Uint,
    timestamp: Uint,
) -> EventOccurrence<MarketEvent> {
    new_mock_event(MarketEvent::PlatformFeeUpdated(PlatformFeeUpdated {
        new_fee_percentage,
        timestamp,
    }))
}

pub fn create_signer_updated_event(
    new_signer: Address,
    timestamp: Uint,
) -> EventOccurrence<MarketEvent> {
    new_mock_event(MarketEvent::SignerUpdated(SignerUpdated {
        new_signer,
        timestamp,
    }))
}

pub fn create_whitelist_discount_updated_event(
    new_discount: Uint,
    timestamp: Uint,
) -> EventOccurrence<MarketEvent> {
    new_mock_event(MarketEvent::WhitelistDiscountUpdated(WhitelistDiscountUpdated {
        new_discount,
        timestamp,
    }))
}
