use std::num::NonZeroUsize;
use std::thread;

/// Default table capacity exponent: 2^16 slots per table.
pub const DEFAULT_TABLE_BITS: u32 = 16;

/// Accepted table capacity exponents.
pub const TABLE_BITS_RANGE: std::ops::RangeInclusive<u32> = 4..=28;

/// How records are scanned out of a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Unchecked byte walk. Records are assumed to match
    /// `name;-?[0-9]+\.[0-9]+\n`; anything else produces garbage values.
    #[default]
    Trusted,
    /// Every record is validated and malformed input is reported with its offset.
    Checked,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub workers: NonZeroUsize,
    pub table_bits: u32,
    pub mode: ScanMode,
    pub profile: bool,
}

impl Config {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = NonZeroUsize::new(workers).unwrap_or(NonZeroUsize::MIN);
        self
    }

    pub fn with_table_bits(mut self, bits: u32) -> Self {
        self.table_bits = bits.clamp(*TABLE_BITS_RANGE.start(), *TABLE_BITS_RANGE.end());
        self
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn table_capacity(&self) -> usize {
        1 << self.table_bits
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
            table_bits: DEFAULT_TABLE_BITS,
            mode: ScanMode::default(),
            profile: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_workers_becomes_one() {
        let config = Config::default().with_workers(0);
        assert_eq!(config.workers.get(), 1);
    }

    #[test]
    fn table_bits_are_clamped() {
        assert_eq!(Config::default().with_table_bits(1).table_bits, 4);
        assert_eq!(Config::default().with_table_bits(40).table_bits, 28);
        assert_eq!(Config::default().table_capacity(), 65_536);
    }
}
