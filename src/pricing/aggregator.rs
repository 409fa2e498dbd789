use crate::config::{FetchStrategy, PricingConfig};
use crate::error::PriceFetchError;
use crate::metrics;
use crate::models::Attachment;
use crate::pricing::cache::{PriceCache, PriceEntry};
use crate::pricing::source::PriceSource;
use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Fetches one price per attachment and turns failures into `Unavailable`
#[derive(Clone)]
pub struct PriceAggregator {
    source: Arc<dyn PriceSource>,
    strategy: FetchStrategy,
    max_in_flight: usize,
}

impl PriceAggregator {
    pub fn new(source: Arc<dyn PriceSource>, config: &PricingConfig) -> Self {
        Self {
            source,
            strategy: config.strategy,
            max_in_flight: config.max_in_flight.max(1),
        }
    }

    /// Sequential aggregator, one request at a time in attachment order
    pub fn sequential(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            strategy: FetchStrategy::Sequential,
            max_in_flight: 1,
        }
    }

    /// Concurrent aggregator with at most `max_in_flight` outstanding requests
    pub fn concurrent(source: Arc<dyn PriceSource>, max_in_flight: usize) -> Self {
        Self {
            source,
            strategy: FetchStrategy::Concurrent,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }

    /// Yield `(attachment name, entry)` as each fetch resolves
    ///
    /// Sequential mode yields in attachment order; concurrent mode yields in
    /// completion order. Every attachment produces exactly one item.
    pub fn stream(&self, attachments: Vec<Attachment>) -> BoxStream<'static, (String, PriceEntry)> {
        let source = self.source.clone();
        let fetches = stream::iter(attachments).map(move |attachment| {
            let source = source.clone();
            resolve(source, attachment)
        });

        match self.strategy {
            FetchStrategy::Sequential => fetches.buffered(1).boxed(),
            FetchStrategy::Concurrent => fetches.buffer_unordered(self.max_in_flight).boxed(),
        }
    }

    /// Fetch every attachment and collect a fresh cache
    pub async fn fetch_all(&self, attachments: &[Attachment]) -> PriceCache {
        let started = Instant::now();
        let cache = self
            .stream(attachments.to_vec())
            .fold(PriceCache::new(), |mut cache, (name, entry)| async move {
                cache.insert(name, entry);
                cache
            })
            .await;

        metrics::record_price_batch(self.strategy.as_str(), started.elapsed());
        debug!(
            attachments = attachments.len(),
            strategy = self.strategy.as_str(),
            "Attachment prices fetched"
        );
        cache
    }
}

async fn resolve(source: Arc<dyn PriceSource>, attachment: Attachment) -> (String, PriceEntry) {
    let started = Instant::now();
    let result = source.fetch_price(&attachment).await;
    metrics::record_price_fetch(
        &attachment.name,
        started.elapsed(),
        result.as_ref().err().map(PriceFetchError::kind),
    );

    match result {
        Ok(price) => (attachment.name, PriceEntry::Available(price)),
        Err(e) => {
            warn!(
                attachment = %attachment.name,
                url = %attachment.price_url,
                error = %e,
                "Attachment price unavailable"
            );
            (attachment.name, PriceEntry::Unavailable)
        }
    }
}
