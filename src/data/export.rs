use std::io::Write;

use anyhow::{Context, Result};

use super::model::{Dataset, FieldValue, Record};
use super::schema::Schema;

// ---------------------------------------------------------------------------
// CSV export of a filtered view
// ---------------------------------------------------------------------------

/// Header label of the derived column appended on export.
pub const RATING_CATEGORY_COLUMN: &str = "Rating Category";

/// Serialize the given view (dataset + index list) as CSV: the original
/// columns in source order plus a trailing rating-category column. Missing
/// values become empty cells, so the output round-trips through the loader.
pub fn write_csv<W: Write>(writer: W, dataset: &Dataset, indices: &[usize]) -> Result<()> {
    let schema = &dataset.schema;
    let mut out = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = schema.columns.iter().map(String::as_str).collect();
    header.push(RATING_CATEGORY_COLUMN);
    out.write_record(&header).context("writing CSV header")?;

    for &idx in indices {
        let rec = &dataset.records[idx];
        let mut cells: Vec<String> = schema
            .columns
            .iter()
            .map(|col| cell_text(schema, rec, col))
            .collect();
        cells.push(
            rec.rating_category
                .map(|c| c.to_string())
                .unwrap_or_default(),
        );
        out.write_record(&cells)
            .with_context(|| format!("writing CSV row for record {idx}"))?;
    }

    out.flush().context("flushing CSV output")?;
    Ok(())
}

/// Text for one cell: canonical columns come from the typed core fields,
/// everything else from the `extra` map.
fn cell_text(schema: &Schema, rec: &Record, col: &str) -> String {
    fn text(v: &Option<String>) -> String {
        v.clone().unwrap_or_default()
    }
    fn num<T: ToString>(v: &Option<T>) -> String {
        v.as_ref().map(T::to_string).unwrap_or_default()
    }

    if schema.name.as_deref() == Some(col) {
        text(&rec.name)
    } else if schema.city == col {
        text(&rec.city)
    } else if schema.cuisines.as_deref() == Some(col) {
        text(&rec.cuisines)
    } else if schema.price_range.as_deref() == Some(col) {
        num(&rec.price_range)
    } else if schema.rating.as_deref() == Some(col) {
        num(&rec.rating)
    } else if schema.votes.as_deref() == Some(col) {
        num(&rec.votes)
    } else if schema.online_delivery.as_deref() == Some(col) {
        text(&rec.online_delivery)
    } else {
        match rec.extra.get(col) {
            Some(FieldValue::Null) | None => String::new(),
            Some(value) => value.to_string(),
        }
    }
}
