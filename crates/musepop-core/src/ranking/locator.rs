//! Locating the ranking table inside a parsed document.

use tracing::debug;

use crate::error::ExtractionError;
use crate::extract::normalize_label;
use crate::html::{Document, TableCell};

const NAME_COLUMN: &[&str] = &["museum", "name"];
const GROUP_COLUMN: &[&str] = &["city", "location"];
const CATEGORY_COLUMN: &[&str] = &["country"];
const MAGNITUDE_COLUMN: &[&str] = &["visitor", "attendance"];
const YEAR_COLUMN: &[&str] = &["year"];

/// The table that carries the ranking, expanded into a positional grid.
#[derive(Debug, Clone)]
pub struct LocatedTable {
    /// Position of the table among all tables of the document.
    pub table_index: usize,

    /// Position of the header row in `grid`.
    pub header_row: usize,

    /// Lowercased, whitespace-normalized header labels.
    pub headers: Vec<String>,

    /// All rows of the table with spans expanded.
    pub grid: Vec<Vec<TableCell>>,
}

impl LocatedTable {
    /// Rows after the header, excluding rows made only of header cells.
    pub fn data_rows(&self) -> impl Iterator<Item = &[TableCell]> {
        self.grid
            .iter()
            .skip(self.header_row + 1)
            .filter(|row| !row.iter().all(|c| c.is_header))
            .map(Vec::as_slice)
    }
}

/// Column index of each role, resolved from the header labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub group: usize,
    pub magnitude: usize,
    pub category: Option<usize>,
    pub year: Option<usize>,
}

impl ColumnMap {
    /// Bind column roles. `None` when a required role has no column.
    pub fn resolve(headers: &[String]) -> Option<Self> {
        let name = resolve_column(headers, NAME_COLUMN)?;
        let group = resolve_column(headers, GROUP_COLUMN)?;
        let magnitude = resolve_column(headers, MAGNITUDE_COLUMN)?;
        let category = resolve_column(headers, CATEGORY_COLUMN);
        // "Visitors (year)" headers must not double as the year column
        let year = headers
            .iter()
            .enumerate()
            .position(|(i, h)| i != magnitude && YEAR_COLUMN.iter().any(|c| h.contains(c)));

        Some(Self {
            name,
            group,
            magnitude,
            category,
            year,
        })
    }

    /// Highest index a row must reach to be materialized.
    pub fn required_max(&self) -> usize {
        self.name.max(self.group).max(self.magnitude)
    }
}

/// First header (in column order) containing any of the candidate substrings.
pub fn resolve_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| candidates.iter().any(|c| h.contains(c)))
}

/// Find the first table whose headers name a museum, a city and a visitor count.
pub fn locate_table(document: &Document) -> Result<LocatedTable, ExtractionError> {
    for (table_index, table) in document.tables.iter().enumerate() {
        let grid = table.grid();
        if grid.is_empty() {
            continue;
        }

        // Title and grouping rows may precede the column headers
        let mut candidates: Vec<usize> = grid
            .iter()
            .enumerate()
            .filter(|(_, row)| row.iter().any(|c| c.is_header))
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            candidates.push(0);
        }

        let found = candidates.into_iter().find_map(|header_row| {
            let headers: Vec<String> = grid[header_row]
                .iter()
                .map(|c| normalize_label(&c.text))
                .collect();
            has_signature(&headers).then_some((header_row, headers))
        });

        if let Some((header_row, headers)) = found {
            debug!(
                "Ranking table found at index {} with headers {:?}",
                table_index, headers
            );
            return Ok(LocatedTable {
                table_index,
                header_row,
                headers,
                grid,
            });
        }
    }

    Err(ExtractionError::StructureNotFound {
        tables_seen: document.tables.len(),
    })
}

fn has_signature(headers: &[String]) -> bool {
    let has_name = headers.iter().any(|h| h.contains("museum") || h == "name");
    let has_group = headers
        .iter()
        .any(|h| GROUP_COLUMN.iter().any(|c| h.contains(c)));
    let has_magnitude = headers
        .iter()
        .any(|h| MAGNITUDE_COLUMN.iter().any(|c| h.contains(c)));
    has_name && has_group && has_magnitude
}
