//! Positional buffering of creator arguments during the document scan.

use json_bind_creators::ArgValue;

/// Presence bits for creator parameter slots. Arities up to 32 fit in
/// one inline word; larger creators spill into 64-bit blocks. Behavior
/// is identical in both representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotSet {
    Small(u32),
    Large(Vec<u64>),
}

impl SlotSet {
    pub fn new(arity: usize) -> Self {
        if arity <= 32 {
            SlotSet::Small(0)
        } else {
            SlotSet::Large(vec![0; (arity + 63) / 64])
        }
    }

    /// Total indexable slots in this representation.
    pub fn capacity(&self) -> usize {
        match self {
            SlotSet::Small(_) => 32,
            SlotSet::Large(blocks) => blocks.len() * 64,
        }
    }

    /// Sets the bit, returning whether it was already set. `index` is
    /// bounded by [`Self::capacity`].
    pub fn mark(&mut self, index: usize) -> bool {
        debug_assert!(index < self.capacity(), "slot {} out of range", index);
        match self {
            SlotSet::Small(bits) => {
                let mask = 1u32 << index;
                let prior = *bits & mask != 0;
                *bits |= mask;
                prior
            }
            SlotSet::Large(blocks) => {
                let mask = 1u64 << (index % 64);
                let block = &mut blocks[index / 64];
                let prior = *block & mask != 0;
                *block |= mask;
                prior
            }
        }
    }

    /// Whether the bit is set; indexes past the capacity read as unset.
    pub fn is_set(&self, index: usize) -> bool {
        match self {
            SlotSet::Small(bits) => index < 32 && bits & (1u32 << index) != 0,
            SlotSet::Large(blocks) => blocks
                .get(index / 64)
                .is_some_and(|block| block & (1u64 << (index % 64)) != 0),
        }
    }

    pub fn count(&self) -> usize {
        match self {
            SlotSet::Small(bits) => bits.count_ones() as usize,
            SlotSet::Large(blocks) => blocks.iter().map(|b| b.count_ones() as usize).sum(),
        }
    }
}

/// Fixed-size argument buffer for one creator invocation. Values land
/// positionally as the object scan encounters them; re-assignment of a
/// slot keeps the later value.
#[derive(Debug)]
pub struct ValueBuffer {
    slots: Vec<Option<ArgValue>>,
    present: SlotSet,
}

impl ValueBuffer {
    pub fn new(arity: usize) -> Self {
        let mut slots = Vec::with_capacity(arity);
        slots.resize_with(arity, || None);
        ValueBuffer {
            slots,
            present: SlotSet::new(arity),
        }
    }

    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// Stores a value, returning whether the slot had been assigned
    /// before.
    pub fn put(&mut self, index: usize, value: ArgValue) -> bool {
        self.slots[index] = Some(value);
        self.present.mark(index)
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.present.is_set(index)
    }

    pub fn set_count(&self) -> usize {
        self.present.count()
    }

    /// All declared parameters have values.
    pub fn complete(&self) -> bool {
        self.set_count() == self.arity()
    }

    /// Moves the slot's value out; the presence bit stays set.
    pub fn take(&mut self, index: usize) -> Option<ArgValue> {
        self.slots[index].take()
    }
}
