use log::debug;

use crate::config::{Config, ScanMode};
use crate::error::{Error, Result};
use crate::partition::ByteRange;
use crate::scanner::{ends_with_complete_record, scan_name, scan_record_checked, scan_value};
use crate::table::Table;

/// Folds every record of `range` into a fresh table.
pub fn process_range(
    bytes: &[u8],
    range: ByteRange,
    table_bits: u32,
    mode: ScanMode,
) -> Result<Table<'_>> {
    let chunk = range.slice(bytes);
    match mode {
        ScanMode::Trusted => {
            if !ends_with_complete_record(chunk) {
                return Err(Error::UnterminatedRecord { end: range.end });
            }
            process_trusted(chunk, table_bits)
        }
        ScanMode::Checked => process_checked(chunk, range.start, table_bits),
    }
}

/// `chunk` must satisfy [`ends_with_complete_record`].
fn process_trusted(chunk: &[u8], table_bits: u32) -> Result<Table<'_>> {
    let mut table = Table::with_bits(table_bits);

    let mut idx = 0;
    while idx < chunk.len() {
        // SAFETY: the chunk ends with a complete record, so a `;` lies at or
        // after `idx`, and after it a `.` and then a `\n`.
        let (n, name) = unsafe { scan_name(chunk.get_unchecked(idx..)) };
        idx += n + 1;

        // SAFETY: as above.
        let (n, value) = unsafe { scan_value(chunk.get_unchecked(idx..)) };
        idx += n + 1;

        table.entry(name)?.update(value);
    }

    Ok(table)
}

fn process_checked(chunk: &[u8], base: usize, table_bits: u32) -> Result<Table<'_>> {
    let mut table = Table::with_bits(table_bits);

    let mut idx = 0;
    while idx < chunk.len() {
        let record = scan_record_checked(&chunk[idx..]).map_err(|reason| Error::Malformed {
            offset: base + idx,
            reason,
        })?;
        table.entry(record.name)?.update(record.value);
        idx += record.len;
    }

    Ok(table)
}

/// Runs one worker per range on a dedicated pool and collects their tables.
///
/// Tables come back in completion order.
pub fn fork_join<'a>(
    bytes: &'a [u8],
    ranges: &[ByteRange],
    config: &Config,
) -> Result<Vec<Table<'a>>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(ranges.len().max(1))
        .thread_name(|i| format!("brc-worker-{i}"))
        .build()?;

    let (table_bits, mode) = (config.table_bits, config.mode);
    let (tx, rx) = crossbeam_channel::bounded(ranges.len());

    pool.scope(|s| {
        for (i, &range) in ranges.iter().enumerate() {
            let tx = tx.clone();
            s.spawn(move |_| {
                let result = process_range(bytes, range, table_bits, mode);
                if let Ok(table) = &result {
                    debug!(
                        "worker {i}: {} bytes from {}, {} names",
                        range.len(),
                        range.start,
                        table.len()
                    );
                }
                // The receiver outlives the scope.
                let _ = tx.send(result);
            });
        }
    });
    drop(tx);

    let tables = rx.iter().collect::<Result<Vec<_>>>()?;
    if tables.len() != ranges.len() {
        return Err(Error::WorkerLost);
    }
    Ok(tables)
}
