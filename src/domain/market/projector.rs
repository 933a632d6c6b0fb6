use std::sync::Arc;

use crate::identifier::RecordKey;
use crate::primitives::TxHash;
use crate::projection::core::{EventKind, EventOccurrence, Record};
use crate::projection::error::ProjectionError;
use crate::projection::store::{create_record, load_record, save_record, RecordStore};

use super::events::*;
use super::records::*;

// ============================================================================
// Market Projector
// ============================================================================
//
// Orchestrates: Event Occurrence → Record(s) → Record Store
//
// Every event kind creates exactly one record. ListingCancelled additionally
// amends the ListingCreated record it refers to, when that record exists.
// Each call runs to completion before the caller hands over the next event.
//
// ============================================================================

/// What happened to the referenced listing when a cancellation was projected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingAmendment {
    /// `cancel_tx_hash` was set on the listing.
    Applied { listing: RecordKey },
    /// The listing is not indexed (older than the indexing window, or
    /// filtered upstream). Nothing was changed.
    ListingMissing { listing: RecordKey },
    /// The listing was already cancelled by another transaction; the first
    /// cancellation is kept.
    AlreadyCancelled { listing: RecordKey, cancel_tx_hash: TxHash },
}

impl ListingAmendment {
    pub fn label(&self) -> &'static str {
        match self {
            ListingAmendment::Applied { .. } => "applied",
            ListingAmendment::ListingMissing { .. } => "listing_missing",
            ListingAmendment::AlreadyCancelled { .. } => "already_cancelled",
        }
    }
}

/// Outcome of projecting one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projected {
    pub kind: &'static str,
    pub key: RecordKey,
    pub amendment: Option<ListingAmendment>,
}

pub struct MarketProjector<S: RecordStore + ?Sized> {
    store: Arc<S>,
}

impl<S: RecordStore + ?Sized> MarketProjector<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Project one event occurrence into the store.
    pub async fn project(
        &self,
        occurrence: &EventOccurrence<MarketEvent>,
    ) -> Result<Projected, ProjectionError> {
        let projected = match &occurrence.event {
            MarketEvent::Eip712DomainChanged(e) => {
                self.create(Eip712DomainChangedRecord::from(occurrence.with_event(e))).await
            }
            MarketEvent::FeeReceiverUpdated(e) => {
                self.create(FeeReceiverUpdatedRecord::from(occurrence.with_event(e))).await
            }
            MarketEvent::ListingCancelled(e) => {
                self.handle_listing_cancelled(occurrence.with_event(e)).await
            }
            MarketEvent::ListingCreated(e) => {
                self.create(ListingCreatedRecord::try_from(occurrence.with_event(e))?).await
            }
            MarketEvent::MerkleRootUpdated(e) => {
                self.create(MerkleRootUpdatedRecord::from(occurrence.with_event(e))).await
            }
            MarketEvent::NftClaimed(e) => {
                self.create(NftClaimedRecord::try_from(occurrence.with_event(e))?).await
            }
            MarketEvent::NftPurchased(e) => {
                self.create(NftPurchasedRecord::try_from(occurrence.with_event(e))?).await
            }
            MarketEvent::OwnershipTransferred(e) => {
                self.create(OwnershipTransferredRecord::from(occurrence.with_event(e))).await
            }
            MarketEvent::PermitPrePaid(e) => {
                self.create(PermitPrePaidRecord::from(occurrence.with_event(e))).await
            }
            MarketEvent::PlatformFeeUpdated(e) => {
                self.create(PlatformFeeUpdatedRecord::from(occurrence.with_event(e))).await
            }
            MarketEvent::SignerUpdated(e) => {
                self.create(SignerUpdatedRecord::from(occurrence.with_event(e))).await
            }
            MarketEvent::WhitelistDiscountUpdated(e) => {
                self.create(WhitelistDiscountUpdatedRecord::from(occurrence.with_event(e))).await
            }
        }?;

        tracing::debug!(
            kind = %projected.kind,
            key = %projected.key,
            event_kind = %occurrence.event.kind(),
            tx_hash = %occurrence.transaction_hash,
            log_index = occurrence.log_index,
            "Projected event"
        );
        Ok(projected)
    }

    async fn create<R: Record>(&self, record: R) -> Result<Projected, ProjectionError> {
        create_record(self.store.as_ref(), &record).await?;
        tracing::debug!(
            kind = R::KIND,
            key = %record.key(),
            block_number = record.stamp().block_number,
            "Created record"
        );
        Ok(Projected {
            kind: R::KIND,
            key: record.key().clone(),
            amendment: None,
        })
    }

    /// Mark the listing as cancelled, then record the cancellation. Key
    /// derivation and the listing lookup happen before the first write, so a
    /// cancellation with a bad listing id persists nothing.
    ///
    /// The listing is amended first: if creating the cancellation record then
    /// fails, redelivery finds the listing already carrying this transaction
    /// hash and only the record creation is retried.
    async fn handle_listing_cancelled(
        &self,
        occurrence: EventOccurrence<&ListingCancelled>,
    ) -> Result<Projected, ProjectionError> {
        let cancel_tx_hash = occurrence.transaction_hash;
        let record = ListingCancelledRecord::try_from(occurrence)?;
        let listing_key = record.listing.clone();

        let listing: Option<ListingCreatedRecord> =
            load_record(self.store.as_ref(), &listing_key).await?;

        let amendment = match listing {
            Some(mut listing) => match listing.cancel_tx_hash {
                None => {
                    listing.cancel_tx_hash = Some(cancel_tx_hash);
                    save_record(self.store.as_ref(), &listing).await?;
                    tracing::info!(
                        listing_id = %listing.listing_id,
                        listing = %listing_key,
                        cancel_tx_hash = %cancel_tx_hash,
                        "Listing marked cancelled"
                    );
                    ListingAmendment::Applied { listing: listing_key }
                }
                // Amended by an earlier delivery of this same event.
                Some(existing) if existing == cancel_tx_hash => {
                    ListingAmendment::Applied { listing: listing_key }
                }
                Some(existing) => {
                    tracing::warn!(
                        listing_id = %listing.listing_id,
                        listing = %listing_key,
                        existing_cancel_tx_hash = %existing,
                        cancel_tx_hash = %cancel_tx_hash,
                        "Listing already cancelled; keeping first cancellation"
                    );
                    ListingAmendment::AlreadyCancelled {
                        listing: listing_key,
                        cancel_tx_hash: existing,
                    }
                }
            },
            None => {
                tracing::info!(
                    listing_id = %record.listing_id,
                    listing = %listing_key,
                    "Cancelled listing is not indexed; skipping amendment"
                );
                ListingAmendment::ListingMissing { listing: listing_key }
            }
        };

        create_record(self.store.as_ref(), &record).await?;

        Ok(Projected {
            kind: ListingCancelledRecord::KIND,
            key: record.id,
            amendment: Some(amendment),
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::mock_events::*;
    use crate::identifier::listing_key;
    use crate::primitives::{Address, B256, Uint};
    use crate::projection::store::InMemoryRecordStore;

    fn projector() -> MarketProjector<InMemoryRecordStore> {
        MarketProjector::new(Arc::new(InMemoryRecordStore::new()))
    }

    fn listing_created(listing_id: u64) -> EventOccurrence<MarketEvent> {
        create_listing_created_event(
            Uint::from(listing_id),
            Address::repeat_byte(0x01),
            Uint::from(7u64),
            0,
            Address::repeat_byte(0x02),
            Address::repeat_byte(0x03),
            Uint::from(250u64),
            Uint::from(1u64),
            false,
            Uint::from(1_700_000_000u64),
        )
    }

    fn listing_cancelled(listing_id: Uint) -> EventOccurrence<MarketEvent> {
        create_listing_cancelled_event(
            listing_id,
            Address::repeat_byte(0x01),
            Uint::from(7u64),
            0,
            Address::repeat_byte(0x02),
            Uint::from(1_700_000_100u64),
        )
    }

    #[tokio::test]
    async fn test_eip712_domain_changed_created_and_stored() {
        let projector = projector();
        let occurrence = create_eip712_domain_changed_event();

        let projected = projector.project(&occurrence).await.unwrap();

        assert_eq!(projected.kind, "EIP712DomainChanged");
        assert_eq!(projected.key, occurrence.occurrence_key());
        assert_eq!(projector.store().count("EIP712DomainChanged").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_listing_created_is_stored_at_listing_key() {
        let projector = projector();
        projector.project(&listing_created(1)).await.unwrap();

        let key = listing_key(&Uint::from(1u64)).unwrap();
        assert_eq!(key.as_bytes(), &[0, 0, 0, 0, 0, 0, 0, 1]);

        let listing: ListingCreatedRecord = load_record(projector.store(), &key)
            .await
            .unwrap()
            .expect("listing should be stored");
        assert_eq!(listing.listing_id, Uint::from(1u64));
        assert_eq!(listing.price, Uint::from(250u64));
        assert_eq!(listing.cancel_tx_hash, None);
        assert_eq!(listing.stamp.transaction_hash, MOCK_TX_HASH);
        assert_eq!(listing.stamp.block_number, MOCK_BLOCK_NUMBER);
        assert_eq!(listing.stamp.block_timestamp, MOCK_BLOCK_TIMESTAMP);
    }

    #[tokio::test]
    async fn test_cancellation_amends_existing_listing() {
        let projector = projector();
        let cancel_tx = B256::repeat_byte(0xcc);

        projector.project(&listing_created(1)).await.unwrap();
        let projected = projector
            .project(&listing_cancelled(Uint::from(1u64)).at(cancel_tx, 0))
            .await
            .unwrap();

        let key = listing_key(&Uint::from(1u64)).unwrap();
        assert_eq!(
            projected.amendment,
            Some(ListingAmendment::Applied { listing: key.clone() })
        );

        let listing: ListingCreatedRecord =
            load_record(projector.store(), &key).await.unwrap().unwrap();
        assert_eq!(listing.cancel_tx_hash, Some(cancel_tx));
        // Creation metadata is untouched by the amendment.
        assert_eq!(listing.stamp.transaction_hash, MOCK_TX_HASH);

        assert_eq!(projector.store().count(ListingCreatedRecord::KIND).await.unwrap(), 1);
        assert_eq!(projector.store().count(ListingCancelledRecord::KIND).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_without_listing_is_a_noop() {
        let projector = projector();

        let projected = projector
            .project(&listing_cancelled(Uint::from(42u64)))
            .await
            .unwrap();

        assert!(matches!(
            projected.amendment,
            Some(ListingAmendment::ListingMissing { .. })
        ));
        assert_eq!(projector.store().count(ListingCreatedRecord::KIND).await.unwrap(), 0);
        assert_eq!(projector.store().count(ListingCancelledRecord::KIND).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_only_touches_matching_listing() {
        let projector = projector();
        projector.project(&listing_created(1)).await.unwrap();
        projector.project(&listing_created(2).at(B256::repeat_byte(0x02), 0)).await.unwrap();

        projector
            .project(&listing_cancelled(Uint::from(2u64)).at(B256::repeat_byte(0x03), 0))
            .await
            .unwrap();

        let first: ListingCreatedRecord =
            load_record(projector.store(), &listing_key(&Uint::from(1u64)).unwrap())
                .await
                .unwrap()
                .unwrap();
        let second: ListingCreatedRecord =
            load_record(projector.store(), &listing_key(&Uint::from(2u64)).unwrap())
                .await
                .unwrap()
                .unwrap();
        assert_eq!(first.cancel_tx_hash, None);
        assert_eq!(second.cancel_tx_hash, Some(B256::repeat_byte(0x03)));
    }

    #[tokio::test]
    async fn test_second_cancellation_keeps_first() {
        let projector = projector();
        projector.project(&listing_created(5)).await.unwrap();
        projector
            .project(&listing_cancelled(Uint::from(5u64)).at(B256::repeat_byte(0xa0), 0))
            .await
            .unwrap();

        let projected = projector
            .project(&listing_cancelled(Uint::from(5u64)).at(B256::repeat_byte(0xb0), 0))
            .await
            .unwrap();

        let key = listing_key(&Uint::from(5u64)).unwrap();
        assert_eq!(
            projected.amendment,
            Some(ListingAmendment::AlreadyCancelled {
                listing: key.clone(),
                cancel_tx_hash: B256::repeat_byte(0xa0),
            })
        );
        let listing: ListingCreatedRecord =
            load_record(projector.store(), &key).await.unwrap().unwrap();
        assert_eq!(listing.cancel_tx_hash, Some(B256::repeat_byte(0xa0)));
        assert_eq!(projector.store().count(ListingCancelledRecord::KIND).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_listing_surfaces_duplicate_key() {
        let projector = projector();
        projector.project(&listing_created(1)).await.unwrap();

        // Same listing id redelivered from another transaction.
        let err = projector
            .project(&listing_created(1).at(B256::repeat_byte(0x77), 3))
            .await
            .unwrap_err();

        assert!(err.is_duplicate_key());
        let listing: ListingCreatedRecord =
            load_record(projector.store(), &listing_key(&Uint::from(1u64)).unwrap())
                .await
                .unwrap()
                .unwrap();
        assert_eq!(listing.stamp.transaction_hash, MOCK_TX_HASH);
    }

    #[tokio::test]
    async fn test_replayed_log_event_surfaces_duplicate_key() {
        let projector = projector();
        let occurrence = create_signer_updated_event(
            Address::repeat_byte(0x0a),
            Uint::from(1u64),
        );

        projector.project(&occurrence).await.unwrap();
        let err = projector.project(&occurrence).await.unwrap_err();
        assert!(err.is_duplicate_key());
        assert_eq!(err.reason(), "duplicate_key");
        assert_eq!(projector.store().count("SignerUpdated").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_oversized_listing_id_fails_without_writes() {
        let projector = projector();
        let too_big = Uint::from(u128::from(u64::MAX) + 1);

        let err = projector.project(&listing_cancelled(too_big.clone())).await.unwrap_err();
        assert!(err.is_identifier_overflow());
        assert_eq!(projector.store().count(ListingCancelledRecord::KIND).await.unwrap(), 0);

        let err = projector
            .project(&create_nft_claimed_event(
                too_big,
                Address::repeat_byte(0x05),
                Uint::from(10u64),
                Uint::from(1u64),
            ))
            .await
            .unwrap_err();
        assert!(err.is_identifier_overflow());
        assert_eq!(err.reason(), "identifier_overflow");
        assert_eq!(projector.store().count(NftClaimedRecord::KIND).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_same_transaction_positions_are_distinct_records() {
        let projector = projector();
        let tx = B256::repeat_byte(0x10);
        let first = create_platform_fee_updated_event(Uint::from(250u64), Uint::from(1u64)).at(tx, 0);
        let second = create_platform_fee_updated_event(Uint::from(300u64), Uint::from(2u64)).at(tx, 1);

        let a = projector.project(&first).await.unwrap();
        let b = projector.project(&second).await.unwrap();

        assert_ne!(a.key, b.key);
        assert_eq!(projector.store().count(PlatformFeeUpdatedRecord::KIND).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_same_position_across_transactions_are_distinct_records() {
        let projector = projector();
        let first = create_whitelist_discount_updated_event(Uint::from(5u64), Uint::from(1u64))
            .at(B256::repeat_byte(0x01), 0);
        let second = create_whitelist_discount_updated_event(Uint::from(5u64), Uint::from(1u64))
            .at(B256::repeat_byte(0x02), 0);

        let a = projector.project(&first).await.unwrap();
        let b = projector.project(&second).await.unwrap();

        assert_ne!(a.key, b.key);
        assert_eq!(
            projector.store().count(WhitelistDiscountUpdatedRecord::KIND).await.unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_purchase_and_claim_reference_listing() {
        let projector = projector();
        projector.project(&listing_created(9)).await.unwrap();

        let purchase = create_nft_purchased_event(
            Uint::from(9u64),
            Address::repeat_byte(0x01),
            Uint::from(7u64),
            0,
            Address::repeat_byte(0x02),
            Address::repeat_byte(0x06),
            Uint::from(250u64),
            Uint::from(1u64),
            Uint::from(5u64),
            true,
            Uint::from(1_700_000_200u64),
        )
        .at(B256::repeat_byte(0x09), 2);
        let claim = create_nft_claimed_event(
            Uint::from(9u64),
            Address::repeat_byte(0x07),
            Uint::from(200u64),
            Uint::from(1_700_000_300u64),
        )
        .at(B256::repeat_byte(0x09), 3);

        let purchased = projector.project(&purchase).await.unwrap();
        let claimed = projector.project(&claim).await.unwrap();

        let purchase_record: NftPurchasedRecord =
            load_record(projector.store(), &purchased.key).await.unwrap().unwrap();
        let claim_record: NftClaimedRecord =
            load_record(projector.store(), &claimed.key).await.unwrap().unwrap();
        let listing = listing_key(&Uint::from(9u64)).unwrap();

        assert_eq!(purchase_record.listing, listing);
        assert!(purchase_record.is_permit_buy);
        assert_eq!(purchase_record.platform_fee, Uint::from(5u64));
        assert_eq!(claim_record.listing, listing);
        assert_eq!(claim_record.discounted_price, Uint::from(200u64));

        // Neither purchases nor claims amend the listing.
        assert!(purchased.amendment.is_none());
        assert!(claimed.amendment.is_none());
        let listing: ListingCreatedRecord =
            load_record(projector.store(), &listing).await.unwrap().unwrap();
        assert_eq!(listing.cancel_tx_hash, None);
    }

    #[tokio::test]
    async fn test_every_kind_creates_one_record() {
        let projector = projector();
        let tx = B256::repeat_byte(0x33);
        let events = vec![
            create_eip712_domain_changed_event(),
            create_fee_receiver_updated_event(Address::repeat_byte(1), Uint::from(1u64)),
            listing_created(1),
            listing_cancelled(Uint::from(1u64)),
            create_merkle_root_updated_event(B256::repeat_byte(0xee), Uint::from(1u64)),
            create_nft_claimed_event(
                Uint::from(1u64),
                Address::repeat_byte(2),
                Uint::from(1u64),
                Uint::from(1u64),
            ),
            create_nft_purchased_event(
                Uint::from(1u64),
                Address::repeat_byte(1),
                Uint::from(1u64),
                1,
                Address::repeat_byte(2),
                Address::repeat_byte(3),
                Uint::from(1u64),
                Uint::from(1u64),
                Uint::from(1u64),
                false,
                Uint::from(1u64),
            ),
            create_ownership_transferred_event(Address::repeat_byte(1), Address::repeat_byte(2)),
            create_permit_pre_paid_event(
                Address::repeat_byte(1),
                Address::repeat_byte(2),
                Uint::from(1u64),
                Uint::from(1u64),
            ),
            create_platform_fee_updated_event(Uint::from(1u64), Uint::from(1u64)),
            create_signer_updated_event(Address::repeat_byte(1), Uint::from(1u64)),
            create_whitelist_discount_updated_event(Uint::from(1u64), Uint::from(1u64)),
        ];

        for (index, event) in events.into_iter().enumerate() {
            let occurrence = event.at(tx, index as u32);
            let projected = projector.project(&occurrence).await.unwrap();
            assert_eq!(projected.kind, occurrence.event.kind());
            assert_eq!(projector.store().count(projected.kind).await.unwrap(), 1);
        }
    }

    /// Fails the first insert of one record kind, then behaves normally.
    struct FailFirstInsert {
        inner: InMemoryRecordStore,
        kind: &'static str,
        tripped: std::sync::atomic::AtomicBool,
    }

    #[async_trait::async_trait]
    impl RecordStore for FailFirstInsert {
        async fn insert(
            &self,
            kind: &'static str,
            key: &RecordKey,
            payload: String,
        ) -> Result<(), crate::projection::error::StoreError> {
            if kind == self.kind && !self.tripped.swap(true, std::sync::atomic::Ordering::SeqCst) {
                return Err(anyhow::anyhow!("connection reset").into());
            }
            self.inner.insert(kind, key, payload).await
        }

        async fn fetch(
            &self,
            kind: &'static str,
            key: &RecordKey,
        ) -> Result<Option<String>, crate::projection::error::StoreError> {
            self.inner.fetch(kind, key).await
        }

        async fn replace(
            &self,
            kind: &'static str,
            key: &RecordKey,
            payload: String,
        ) -> Result<(), crate::projection::error::StoreError> {
            self.inner.replace(kind, key, payload).await
        }

        async fn count(&self, kind: &'static str) -> Result<u64, crate::projection::error::StoreError> {
            self.inner.count(kind).await
        }
    }

    #[tokio::test]
    async fn test_redelivered_cancellation_completes_after_store_failure() {
        let projector = MarketProjector::new(Arc::new(FailFirstInsert {
            inner: InMemoryRecordStore::new(),
            kind: ListingCancelledRecord::KIND,
            tripped: std::sync::atomic::AtomicBool::new(false),
        }));
        let cancel_tx = B256::repeat_byte(0xcc);
        let cancellation = listing_cancelled(Uint::from(3u64)).at(cancel_tx, 2);

        projector.project(&listing_created(3)).await.unwrap();
        let err = projector.project(&cancellation).await.unwrap_err();
        assert_eq!(err.reason(), "store_backend");

        // Redelivery records the cancellation; the listing keeps the same hash.
        let projected = projector.project(&cancellation).await.unwrap();
        let key = listing_key(&Uint::from(3u64)).unwrap();
        assert_eq!(
            projected.amendment,
            Some(ListingAmendment::Applied { listing: key.clone() })
        );
        let listing: ListingCreatedRecord =
            load_record(projector.store(), &key).await.unwrap().unwrap();
        assert_eq!(listing.cancel_tx_hash, Some(cancel_tx));
        assert_eq!(projector.store().count(ListingCancelledRecord::KIND).await.unwrap(), 1);

        // A third delivery is a plain duplicate.
        let err = projector.project(&cancellation).await.unwrap_err();
        assert!(err.is_duplicate_key());
    }
}
