//! Per-name min/mean/max over a `name;value\n` file, computed across all cores.
//!
//! The pipeline is: map the file, [`partition`] it into record-aligned
//! ranges, [`fork_join`] one worker per range, [`merge`] the per-worker
//! tables, then render a sorted [`Summary`].

use std::io::Write;
use std::path::Path;

use log::debug;

pub mod config;
pub mod error;
pub mod mapping;
pub mod merge;
pub mod partition;
pub mod profile;
pub mod report;
pub mod scanner;
pub mod table;
pub mod worker;

pub use config::{Config, ScanMode};
pub use error::{Error, Result};
pub use mapping::MappedFile;
pub use merge::merge;
pub use partition::{partition, ByteRange};
pub use profile::Phases;
pub use report::Summary;
pub use scanner::Name;
pub use table::{Aggregate, Table};
pub use worker::fork_join;

/// Aggregates every record in `bytes` into one table.
pub fn summarize<'a>(bytes: &'a [u8], config: &Config) -> Result<Table<'a>> {
    summarize_timed(bytes, config, &mut Phases::new(false))
}

fn summarize_timed<'a>(bytes: &'a [u8], config: &Config, phases: &mut Phases) -> Result<Table<'a>> {
    let ranges = partition(bytes, config.workers.get());
    debug!("{} bytes split into {} ranges", bytes.len(), ranges.len());
    phases.lap("partition");

    let tables = fork_join(bytes, &ranges, config)?;
    phases.lap("parse");

    let table = merge(tables, config.table_bits)?;
    debug!("{} distinct names", table.len());
    phases.lap("merge");
    Ok(table)
}

/// Maps `path`, aggregates it and writes the summary line to `out`.
///
/// The mapping is handed back so the caller decides when it is released.
pub fn run(path: &Path, config: &Config, mut out: impl Write) -> Result<MappedFile> {
    let mut phases = Phases::new(config.profile);
    let input = MappedFile::open(path)?;
    phases.lap("map");

    {
        let table = summarize_timed(input.as_bytes(), config, &mut phases)?;
        let summary = Summary::from_table(&table);
        phases.lap("sort");

        summary.write_to(&mut out)?;
        out.flush()?;
        phases.lap("render");
    }

    phases.report();
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;
    use proptest::prelude::*;

    fn summary(input: &[u8], workers: usize) -> String {
        let config = Config::default().with_workers(workers).with_table_bits(10);
        let table = summarize(input, &config).unwrap();
        Summary::from_table(&table).to_string()
    }

    /// Straightforward single-threaded pass used as the oracle.
    fn reference(input: &str) -> AHashMap<&str, Aggregate> {
        let mut stats: AHashMap<&str, Aggregate> = AHashMap::new();
        for line in input.lines() {
            let (name, value) = line.split_once(';').unwrap();
            stats.entry(name).or_default().update(value.parse().unwrap());
        }
        stats
    }

    #[test]
    fn hamburg_berlin_single_worker() {
        let input = b"Hamburg;12.0\nHamburg;8.0\nBerlin;20.0\n";
        assert_eq!(summary(input, 1), "{Berlin=20.0/20.0/20.0, Hamburg=8.0/10.0/12.0}");
    }

    #[test]
    fn hamburg_berlin_two_workers() {
        let input = b"Hamburg;12.0\nHamburg;8.0\nBerlin;20.0\n";
        assert_eq!(summary(input, 2), summary(input, 1));
    }

    #[test]
    fn single_negative_value() {
        assert_eq!(summary(b"X;-3.4\n", 1), "{X=-3.4/-3.4/-3.4}");
        assert_eq!(summary(b"X;-3.4\n", 8), "{X=-3.4/-3.4/-3.4}");
    }

    #[test]
    fn empty_input_renders_braces() {
        assert_eq!(summary(b"", 4), "{}");
    }

    #[test]
    fn checked_mode_matches_trusted() {
        let input = b"Oslo;-5.0\nOslo;-10.0\nOslo;-2.0\nRome;21.5\n";
        let config = Config::default().with_workers(2).with_mode(ScanMode::Checked);
        let table = summarize(input, &config).unwrap();
        assert_eq!(Summary::from_table(&table).to_string(), summary(input, 2));
    }

    #[test]
    fn merged_cardinality_beyond_capacity_fails() {
        let input: Vec<u8> = (0..24).flat_map(|i| format!("s{i};1.0\n").into_bytes()).collect();
        let config = Config::default().with_workers(4).with_table_bits(4);
        assert!(matches!(
            summarize(&input, &config),
            Err(Error::CapacityExceeded { capacity: 16 })
        ));
    }

    fn records() -> impl Strategy<Value = String> {
        let names = prop::sample::select(vec!["Abha", "Accra", "Berlin", "Bulawayo", "Zürich", "Zug", "a b"]);
        proptest::collection::vec((names, -999i32..=999), 1..300).prop_map(|rows| {
            rows.iter()
                .map(|(name, v)| format!("{name};{:.1}\n", *v as f64 / 10.0))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_matches_reference_for_any_worker_count(input in records(), workers in 1usize..=16) {
            let config = Config::default().with_workers(workers).with_table_bits(10);
            let table = summarize(input.as_bytes(), &config).unwrap();
            let summary = Summary::from_table(&table);
            let expected = reference(&input);

            prop_assert_eq!(summary.entries().len(), expected.len());
            for pair in summary.entries().windows(2) {
                prop_assert!(pair[0].0 < pair[1].0);
            }
            for (name, got) in summary.entries() {
                let want = expected[std::str::from_utf8(name).unwrap()];
                prop_assert_eq!(got.count, want.count);
                prop_assert_eq!(format!("{:.1}", got.min), format!("{:.1}", want.min));
                prop_assert_eq!(format!("{:.1}", got.max), format!("{:.1}", want.max));
                prop_assert!((got.mean() - want.mean()).abs() < 1e-9);
            }
        }
    }
}
