use crate::error::Result;
use crate::table::{Aggregate, Table};

/// Folds per-worker tables into one. The first table becomes the result.
pub fn merge<'a>(tables: impl IntoIterator<Item = Table<'a>>, table_bits: u32) -> Result<Table<'a>> {
    let mut tables = tables.into_iter();
    let Some(mut result) = tables.next() else {
        return Ok(Table::with_bits(table_bits));
    };
    for table in tables {
        absorb(&mut result, &table)?;
    }
    Ok(result)
}

/// Combines every entry of `from` into `into`.
pub fn absorb<'a>(into: &mut Table<'a>, from: &Table<'a>) -> Result<()> {
    for entry in from.iter() {
        let merged = into
            .get(&entry.name)
            .unwrap_or(Aggregate::EMPTY)
            .combine(entry.aggregate);
        into.set(entry.name, merged)?;
    }
    Ok(())
}
