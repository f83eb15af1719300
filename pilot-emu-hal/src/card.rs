use std::cell::RefCell;

/// Logical identifier of a removable-media slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    One,
    Two,
}

impl Slot {
    pub const COUNT: usize = 2;

    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// An opaque card image supplied by the host.
///
/// Loading and persisting images is an excluded collaborator's job; the bank
/// only attaches and detaches them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardImage {
    bytes: Vec<u8>,
}

impl CardImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Slot occupancy shared by the bank profiles that carry removable media.
///
/// Profiles hold one of these by composition rather than inheriting any base
/// behaviour.
#[derive(Default)]
pub(crate) struct SlotState {
    slots: RefCell<[Option<CardImage>; Slot::COUNT]>,
}

impl SlotState {
    /// Attaches `image`, returning whatever was mounted before.
    pub fn mount(&self, slot: Slot, image: CardImage) -> Option<CardImage> {
        self.slots.borrow_mut()[slot.index()].replace(image)
    }

    /// Detaches the slot's image. Detaching an empty slot is a no-op, not a
    /// failure.
    pub fn unmount(&self, slot: Slot) -> Option<CardImage> {
        self.slots.borrow_mut()[slot.index()].take()
    }

    pub fn is_mounted(&self, slot: Slot) -> bool {
        self.slots.borrow()[slot.index()].is_some()
    }
}
