//! Fixed-capacity open-addressing table from [`Name`] to [`Aggregate`].

use crate::error::{Error, Result};
use crate::scanner::Name;

/// Running statistics for one name. The mean is derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: u64,
}

impl Aggregate {
    pub const EMPTY: Self = Self {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        sum: 0.0,
        count: 0,
    };

    pub fn of(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            count: 1,
        }
    }

    /// Folds one observation in. Same result as `combine(Aggregate::of(value))`.
    #[inline(always)]
    pub fn update(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
        self.count += 1;
    }

    pub fn combine(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

impl Default for Aggregate {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub name: Name<'a>,
    pub aggregate: Aggregate,
}

/// Linear-probing table with a power-of-two slot count.
///
/// The table never grows and entries are never removed. One slot always
/// stays empty so every probe terminates; an insert that would take it fails
/// with [`Error::CapacityExceeded`].
#[derive(Debug, Clone)]
pub struct Table<'a> {
    mask: usize,
    len: usize,
    slots: Vec<Option<Entry<'a>>>,
}

impl<'a> Table<'a> {
    pub fn with_bits(bits: u32) -> Self {
        let capacity = 1usize << bits;
        Self {
            mask: capacity - 1,
            len: 0,
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of `name`'s slot, or of the empty slot where it would go.
    #[inline(always)]
    fn probe(&self, name: &Name<'_>) -> usize {
        let mut idx = name.fingerprint() as usize & self.mask;
        while let Some(entry) = &self.slots[idx] {
            if entry.name == *name {
                break;
            }
            idx = (idx + 1) & self.mask;
        }
        idx
    }

    pub fn get(&self, name: &Name<'_>) -> Option<Aggregate> {
        self.slots[self.probe(name)].map(|entry| entry.aggregate)
    }

    /// Returns the aggregate for `name`, inserting an empty one on a miss.
    #[inline(always)]
    pub fn entry(&mut self, name: Name<'a>) -> Result<&mut Aggregate> {
        let idx = self.probe(&name);
        let capacity = self.slots.len();
        let slot = &mut self.slots[idx];
        if slot.is_none() {
            if self.len + 1 >= capacity {
                return Err(Error::CapacityExceeded { capacity });
            }
            self.len += 1;
        }
        let entry = slot.get_or_insert(Entry {
            name,
            aggregate: Aggregate::EMPTY,
        });
        Ok(&mut entry.aggregate)
    }

    /// Upserts: overwrites the aggregate of an existing `name`, otherwise inserts.
    pub fn set(&mut self, name: Name<'a>, aggregate: Aggregate) -> Result<()> {
        *self.entry(name)? = aggregate;
        Ok(())
    }

    /// Occupied entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry<'a>> + '_ {
        self.slots.iter().flatten()
    }
}
