use crate::error::SelectionError;
use crate::models::{Attachment, Firearm, Price};
use crate::pricing::{PriceCache, PriceEntry, PriceStatus};
use tracing::debug;

/// Identifies one firearm selection
///
/// Every transition that replaces the price cache advances the epoch, so a
/// fetch started for an older selection can be recognized when it completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionEpoch(u64);

impl SelectionEpoch {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Selected firearm, selected attachments, and the prices fetched for them
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    epoch: SelectionEpoch,
    firearm: Option<Firearm>,
    selected: Vec<Attachment>,
    prices: PriceCache,
}

/// One attachment row as the view renders it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentView {
    pub attachment: Attachment,
    pub status: PriceStatus,
    pub selected: bool,
}

/// Read-only copy of the loadout for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadoutSnapshot {
    pub epoch: SelectionEpoch,
    pub firearm: Option<Firearm>,
    pub attachments: Vec<AttachmentView>,
    pub total: Price,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> SelectionEpoch {
        self.epoch
    }

    pub fn firearm(&self) -> Option<&Firearm> {
        self.firearm.as_ref()
    }

    pub fn selected_attachments(&self) -> &[Attachment] {
        &self.selected
    }

    pub fn prices(&self) -> &PriceCache {
        &self.prices
    }

    pub fn is_selected(&self, attachment: &str) -> bool {
        self.selected.iter().any(|a| a.name == attachment)
    }

    /// Select a firearm, discarding the previous attachments and prices
    pub fn select_firearm(&mut self, firearm: Firearm) -> SelectionEpoch {
        self.epoch = self.epoch.next();
        debug!(
            firearm = %firearm.name,
            epoch = self.epoch.value(),
            "Firearm selected"
        );
        self.firearm = Some(firearm);
        self.selected.clear();
        self.prices = PriceCache::new();
        self.epoch
    }

    /// Return to the catalog with nothing selected
    pub fn clear(&mut self) -> SelectionEpoch {
        self.epoch = self.epoch.next();
        self.firearm = None;
        self.selected.clear();
        self.prices = PriceCache::new();
        self.epoch
    }

    /// Add the attachment if absent, remove it if present
    ///
    /// Returns whether the attachment is selected afterwards.
    pub fn toggle_attachment(&mut self, name: &str) -> Result<bool, SelectionError> {
        let firearm = self
            .firearm
            .as_ref()
            .ok_or(SelectionError::NoFirearmSelected)?;

        if let Some(index) = self.selected.iter().position(|a| a.name == name) {
            self.selected.remove(index);
            return Ok(false);
        }

        let attachment = firearm
            .attachment(name)
            .ok_or_else(|| SelectionError::UnknownAttachment {
                firearm: firearm.name.clone(),
                attachment: name.to_string(),
            })?;

        self.selected.push(attachment.clone());
        Ok(true)
    }

    /// Store a fetched price if it belongs to the current selection
    ///
    /// Results tagged with an older epoch, or naming an attachment the
    /// selected firearm does not have, are dropped and `false` is returned.
    pub fn record_price(&mut self, epoch: SelectionEpoch, attachment: &str, entry: PriceEntry) -> bool {
        if epoch != self.epoch {
            debug!(
                attachment = %attachment,
                fetch_epoch = epoch.value(),
                current_epoch = self.epoch.value(),
                "Discarding price from a previous selection"
            );
            return false;
        }

        let belongs = self
            .firearm
            .as_ref()
            .is_some_and(|f| f.has_attachment(attachment));
        if !belongs {
            debug!(attachment = %attachment, "Discarding price for unknown attachment");
            return false;
        }

        self.prices.insert(attachment, entry);
        true
    }

    /// Base price plus fetched prices of the selected attachments
    ///
    /// Unfetched and unavailable attachments contribute nothing.
    pub fn total_price(&self) -> Price {
        let Some(firearm) = &self.firearm else {
            return Price::ZERO;
        };

        firearm.base_price
            + self
                .selected
                .iter()
                .map(|a| self.prices.price_of(&a.name))
                .sum::<Price>()
    }

    pub fn snapshot(&self) -> LoadoutSnapshot {
        let attachments = self
            .firearm
            .iter()
            .flat_map(|f| f.attachments.iter())
            .map(|a| AttachmentView {
                attachment: a.clone(),
                status: self.prices.status(&a.name),
                selected: self.is_selected(&a.name),
            })
            .collect();

        LoadoutSnapshot {
            epoch: self.epoch,
            firearm: self.firearm.clone(),
            attachments,
            total: self.total_price(),
        }
    }
}
