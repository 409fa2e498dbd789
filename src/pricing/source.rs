use crate::config::PricingConfig;
use crate::error::{AppError, PriceFetchError};
use crate::models::{Attachment, Price};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Where attachment prices come from
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current price of one attachment. One attempt, no retry.
    async fn fetch_price(&self, attachment: &Attachment) -> Result<Price, PriceFetchError>;
}

/// Price endpoint response body. Other fields are ignored.
#[derive(Debug, Deserialize)]
struct PriceQuote {
    price: f64,
}

/// Fetches `{"price": <number>}` from each attachment's price URL
pub struct HttpPriceSource {
    client: Client,
}

impl HttpPriceSource {
    pub fn new(config: &PricingConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }

        let client = builder.build().map_err(AppError::HttpClient)?;
        Ok(Self { client })
    }

    /// Wrap an existing client (shared connection pool)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    async fn fetch_price(&self, attachment: &Attachment) -> Result<Price, PriceFetchError> {
        if attachment.price_url.trim().is_empty() {
            return Err(PriceFetchError::MissingLocator(attachment.name.clone()));
        }

        let response = self
            .client
            .get(&attachment.price_url)
            .send()
            .await
            .map_err(PriceFetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceFetchError::Status(status));
        }

        let body = response.bytes().await.map_err(PriceFetchError::Transport)?;
        let quote: PriceQuote = serde_json::from_slice(&body)
            .map_err(|e| PriceFetchError::Malformed(e.to_string()))?;

        let price = Price::from_dollars(quote.price)
            .ok_or(PriceFetchError::InvalidPrice(quote.price))?;

        debug!(
            attachment = %attachment.name,
            price = %price,
            "Fetched attachment price"
        );
        Ok(price)
    }
}
