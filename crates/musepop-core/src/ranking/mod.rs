//! Ranking table extraction: locate the table, then materialize its rows.

pub mod locator;
pub mod materialize;

pub use locator::{locate_table, resolve_column, ColumnMap, LocatedTable};
pub use materialize::{RowMaterializer, YearStrategy};

use tracing::info;

use crate::error::ExtractionError;
use crate::html::Document;
use crate::models::RankedEntityRecord;

/// Extract ranking records from a rendered page.
///
/// Fails only when no table has the required columns; a located table
/// without usable rows yields an empty list.
pub fn extract_records(
    html: &str,
    provenance_url: &str,
) -> Result<Vec<RankedEntityRecord>, ExtractionError> {
    let document = Document::parse(html);
    let located = locate_table(&document)?;
    let columns = ColumnMap::resolve(&located.headers)
        .ok_or_else(|| ExtractionError::MissingField(located.headers.join(", ")))?;

    let materializer = RowMaterializer::new(columns, provenance_url);
    let records = materializer.materialize(&located);

    info!(
        "Extracted {} records from table {} ({:?} years)",
        records.len(),
        located.table_index,
        materializer.year_strategy()
    );
    Ok(records)
}
