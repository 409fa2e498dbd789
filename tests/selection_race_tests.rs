/// Switching firearms while prices are still loading must never leak the
/// previous firearm's prices into the new selection.
use async_trait::async_trait;
use gun_iq::auth::UnconfiguredIdentityProvider;
use gun_iq::catalog::Catalog;
use gun_iq::error::{AppError, PriceFetchError};
use gun_iq::feedback::SilentFeedback;
use gun_iq::models::{Attachment, Price};
use gun_iq::pricing::{PriceAggregator, PriceSource, PriceStatus};
use gun_iq::session::Session;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

const GLOCK_ATTACHMENTS: [&str; 2] = ["Trijicon RMR", "Streamlight TLR-1"];

/// Holds Glock attachment fetches until released; everything else answers at once
struct GatedSource {
    gate: Semaphore,
    glock_fetch_started: Notify,
}

impl GatedSource {
    fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            glock_fetch_started: Notify::new(),
        }
    }

    fn release(&self) {
        self.gate.add_permits(GLOCK_ATTACHMENTS.len());
    }
}

#[async_trait]
impl PriceSource for GatedSource {
    async fn fetch_price(&self, attachment: &Attachment) -> Result<Price, PriceFetchError> {
        if GLOCK_ATTACHMENTS.contains(&attachment.name.as_str()) {
            self.glock_fetch_started.notify_one();
            let _permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| PriceFetchError::Malformed(e.to_string()))?;
            return Ok(Price::from_cents(99_999));
        }
        Ok(Price::from_cents(25_000))
    }
}

fn session_with(aggregator: PriceAggregator) -> Arc<Session> {
    Arc::new(Session::new(
        Arc::new(Catalog::builtin().unwrap()),
        aggregator,
        Arc::new(UnconfiguredIdentityProvider),
        Arc::new(SilentFeedback),
    ))
}

async fn assert_only_shield_prices(session: &Session) {
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.firearm.as_ref().unwrap().name, "M&P Shield Plus");

    let names: HashSet<&str> = snapshot
        .attachments
        .iter()
        .map(|a| a.attachment.name.as_str())
        .collect();
    assert_eq!(names, HashSet::from(["Holosun 507K", "Crimson Trace Laser"]));

    for row in &snapshot.attachments {
        assert_eq!(row.status, PriceStatus::Available(Price::from_cents(25_000)));
    }
    assert_eq!(snapshot.total, Price::from_cents(44_900));
}

#[tokio::test]
async fn test_switching_firearm_discards_in_flight_prices() {
    for concurrent in [false, true] {
        let source = Arc::new(GatedSource::new());
        let aggregator = if concurrent {
            PriceAggregator::concurrent(source.clone(), 4)
        } else {
            PriceAggregator::sequential(source.clone())
        };
        let session = session_with(aggregator);

        // Start loading the Glock; its fetches block on the gate
        let first = tokio::spawn({
            let session = session.clone();
            async move { session.select_firearm("Glock 19 Gen5").await }
        });
        source.glock_fetch_started.notified().await;

        // Switch before the Glock prices arrive
        session.select_firearm("M&P Shield Plus").await.unwrap();
        assert_only_shield_prices(&session).await;

        // Let the stale Glock fetches finish; that selection reports it was replaced
        source.release();
        let superseded = first.await.unwrap();
        assert!(matches!(
            superseded,
            Err(AppError::SelectionSuperseded(name)) if name == "Glock 19 Gen5"
        ));

        assert_only_shield_prices(&session).await;
        let snapshot = session.snapshot().await;
        for row in &snapshot.attachments {
            assert_ne!(row.status, PriceStatus::Available(Price::from_cents(99_999)));
        }
    }
}

#[tokio::test]
async fn test_stale_epoch_load_records_nothing() {
    let source = Arc::new(GatedSource::new());
    source.release();
    let session = session_with(PriceAggregator::sequential(source.clone()));

    let (glock_epoch, glock_attachments) = session.begin_selection("Glock 19 Gen5").await.unwrap();
    let (shield_epoch, shield_attachments) =
        session.begin_selection("M&P Shield Plus").await.unwrap();
    assert_ne!(glock_epoch, shield_epoch);

    assert_eq!(session.load_prices(glock_epoch, glock_attachments).await, 0);
    let snapshot = session.snapshot().await;
    assert!(snapshot
        .attachments
        .iter()
        .all(|a| a.status == PriceStatus::Loading));

    assert_eq!(session.load_prices(shield_epoch, shield_attachments).await, 2);
    assert_only_shield_prices(&session).await;
}

#[tokio::test]
async fn test_back_to_catalog_discards_in_flight_prices() {
    let source = Arc::new(GatedSource::new());
    let session = session_with(PriceAggregator::sequential(source.clone()));

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.select_firearm("Glock 19 Gen5").await }
    });
    source.glock_fetch_started.notified().await;

    session.back_to_catalog().await;
    source.release();
    assert!(matches!(
        first.await.unwrap(),
        Err(AppError::SelectionSuperseded(_))
    ));

    let snapshot = session.snapshot().await;
    assert!(snapshot.firearm.is_none());
    assert!(snapshot.attachments.is_empty());
    assert_eq!(snapshot.total, Price::ZERO);
}
