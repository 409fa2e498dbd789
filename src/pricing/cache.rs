use crate::models::Price;
use std::collections::HashMap;

/// Outcome of one attachment price fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceEntry {
    Available(Price),
    Unavailable,
}

impl PriceEntry {
    pub fn price(&self) -> Option<Price> {
        match self {
            Self::Available(price) => Some(*price),
            Self::Unavailable => None,
        }
    }
}

/// What the view shows for an attachment price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceStatus {
    /// No result yet
    Loading,
    Available(Price),
    Unavailable,
}

/// Fetched attachment prices for one firearm selection
///
/// A missing key means the fetch has not completed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceCache {
    entries: HashMap<String, PriceEntry>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, attachment: impl Into<String>, entry: PriceEntry) {
        self.entries.insert(attachment.into(), entry);
    }

    pub fn get(&self, attachment: &str) -> Option<PriceEntry> {
        self.entries.get(attachment).copied()
    }

    pub fn status(&self, attachment: &str) -> PriceStatus {
        match self.get(attachment) {
            None => PriceStatus::Loading,
            Some(PriceEntry::Available(price)) => PriceStatus::Available(price),
            Some(PriceEntry::Unavailable) => PriceStatus::Unavailable,
        }
    }

    /// Contribution of an attachment to the total: zero unless fetched successfully
    pub fn price_of(&self, attachment: &str) -> Price {
        self.get(attachment)
            .and_then(|entry| entry.price())
            .unwrap_or(Price::ZERO)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
