//! Session state for the ten data-source slots a project can track.

use crate::error::{ErrorKind, ResourceError};
use crate::types::climatology::MonthlyClimatology;
use crate::types::provider::ProviderFormat;
use std::fmt;
use thiserror::Error;

pub const SLOT_COUNT: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Slot {0} is outside the ten data-source slots")]
pub struct InvalidSlot(pub usize);

/// Index of a data-source slot, always below [`SLOT_COUNT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(usize);

impl SlotId {
    pub fn new(index: usize) -> Result<Self, InvalidSlot> {
        if index < SLOT_COUNT {
            Ok(Self(index))
        } else {
            Err(InvalidSlot(index))
        }
    }

    pub fn index(&self) -> usize {
        self.0
    }

    pub fn all() -> impl Iterator<Item = SlotId> {
        (0..SLOT_COUNT).map(SlotId)
    }
}

impl TryFrom<usize> for SlotId {
    type Error = InvalidSlot;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        SlotId::new(index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotStatus {
    #[default]
    Inactive,
    Loaded,
    Failed(ErrorKind),
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotStatus::Inactive => write!(f, "Inactive"),
            SlotStatus::Loaded => write!(f, "Loaded"),
            SlotStatus::Failed(kind) => write!(f, "{}", kind.status_label()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSlot {
    pub format: Option<ProviderFormat>,
    pub status: SlotStatus,
    pub climatology: Option<MonthlyClimatology>,
}

/// Fixed array of [`SourceSlot`]s addressed by [`SlotId`].
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    slots: [SourceSlot; SLOT_COUNT],
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, id: SlotId) -> &SourceSlot {
        &self.slots[id.0]
    }

    /// Stores the outcome of loading `format` into `id`.
    ///
    /// An empty input leaves the slot as it was. Any other failure marks the slot
    /// failed but keeps whatever climatology it held before.
    pub fn record(
        &mut self,
        id: SlotId,
        format: ProviderFormat,
        outcome: Result<MonthlyClimatology, ResourceError>,
    ) -> SlotStatus {
        let slot = &mut self.slots[id.0];
        match outcome {
            Ok(climatology) => {
                slot.format = Some(format);
                slot.climatology = Some(climatology);
                slot.status = SlotStatus::Loaded;
            }
            Err(e) if e.kind() == ErrorKind::EmptyInput => {}
            Err(e) => {
                slot.format = Some(format);
                slot.status = SlotStatus::Failed(e.kind());
            }
        }
        slot.status
    }

    /// Resets a slot to its initial inactive state.
    pub fn clear(&mut self, id: SlotId) {
        self.slots[id.0] = SourceSlot::default();
    }

    /// Slots currently holding a successfully loaded climatology.
    pub fn loaded(&self) -> impl Iterator<Item = (SlotId, &MonthlyClimatology)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.status == SlotStatus::Loaded)
            .filter_map(|(idx, slot)| slot.climatology.as_ref().map(|c| (SlotId(idx), c)))
    }
}
