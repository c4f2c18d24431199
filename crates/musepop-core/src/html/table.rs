//! Table structure recovered from rendered HTML.

/// Upper bound for `rowspan`/`colspan` attributes.
pub const MAX_SPAN: usize = 100;

/// A cell in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    /// Whitespace-normalized text content.
    pub text: String,
    /// Whether the cell was a `<th>`.
    pub is_header: bool,
    /// `href` of the first anchor inside the cell.
    pub link: Option<String>,
    /// Row span (number of rows this cell spans).
    pub row_span: usize,
    /// Column span (number of columns this cell spans).
    pub col_span: usize,
}

impl TableCell {
    /// Check if this cell spans multiple rows.
    pub fn is_row_spanning(&self) -> bool {
        self.row_span > 1
    }
}

/// A row as written in the markup, before span expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Whether every cell of the row is a header cell.
    pub fn is_header_only(&self) -> bool {
        !self.cells.is_empty() && self.cells.iter().all(|c| c.is_header)
    }
}

/// A table found in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    pub rows: Vec<TableRow>,
}

impl HtmlTable {
    /// Expand row and column spans into positional rows.
    ///
    /// A cell spanning several rows is repeated in each covered row, a
    /// cell spanning several columns is repeated in each covered column,
    /// so index `i` of every grid row refers to the same column.
    pub fn grid(&self) -> Vec<Vec<TableCell>> {
        // column -> (cell, rows still to cover)
        let mut carried: Vec<Option<(TableCell, usize)>> = Vec::new();
        let mut grid = Vec::with_capacity(self.rows.len());

        for row in &self.rows {
            let mut line = Vec::new();
            let mut cells = row.cells.iter();
            let mut col = 0;

            loop {
                if let Some(slot) = carried.get_mut(col) {
                    if let Some((cell, remaining)) = slot.take() {
                        line.push(cell.clone());
                        if remaining > 1 {
                            *slot = Some((cell, remaining - 1));
                        }
                        col += 1;
                        continue;
                    }
                }

                let Some(cell) = cells.next() else {
                    // Keep positions aligned when a carried cell sits further right
                    if carried.iter().skip(col).any(Option::is_some) {
                        line.push(TableCell::default());
                        col += 1;
                        continue;
                    }
                    break;
                };

                for _ in 0..cell.col_span.clamp(1, MAX_SPAN) {
                    if cell.is_row_spanning() {
                        if carried.len() <= col {
                            carried.resize(col + 1, None);
                        }
                        carried[col] = Some((cell.clone(), cell.row_span.min(MAX_SPAN) - 1));
                    }
                    line.push(cell.clone());
                    col += 1;
                }
            }

            grid.push(line);
        }

        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(text: &str, row_span: usize, col_span: usize) -> TableCell {
        TableCell {
            text: text.to_string(),
            is_header: false,
            link: None,
            row_span,
            col_span,
        }
    }

    fn texts(grid: &[Vec<TableCell>]) -> Vec<Vec<String>> {
        grid.iter()
            .map(|row| row.iter().map(|c| c.text.clone()).collect())
            .collect()
    }

    #[test]
    fn test_grid_without_spans() {
        let table = HtmlTable {
            rows: vec![
                TableRow { cells: vec![cell("a", 1, 1), cell("b", 1, 1)] },
                TableRow { cells: vec![cell("c", 1, 1), cell("d", 1, 1)] },
            ],
        };
        assert_eq!(texts(&table.grid()), vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn test_grid_expands_row_span() {
        // City spans the two museums located there
        let table = HtmlTable {
            rows: vec![
                TableRow { cells: vec![cell("Louvre", 1, 1), cell("Paris", 2, 1), cell("8", 1, 1)] },
                TableRow { cells: vec![cell("Orsay", 1, 1), cell("3", 1, 1)] },
                TableRow { cells: vec![cell("Tate", 1, 1), cell("London", 1, 1), cell("5", 1, 1)] },
            ],
        };
        assert_eq!(
            texts(&table.grid()),
            vec![
                vec!["Louvre", "Paris", "8"],
                vec!["Orsay", "Paris", "3"],
                vec!["Tate", "London", "5"],
            ]
        );
    }

    #[test]
    fn test_grid_expands_col_span() {
        let table = HtmlTable {
            rows: vec![TableRow { cells: vec![cell("wide", 1, 2), cell("x", 1, 1)] }],
        };
        assert_eq!(texts(&table.grid()), vec![vec!["wide", "wide", "x"]]);
    }

    #[test]
    fn test_grid_pads_gap_before_carried_cell() {
        let table = HtmlTable {
            rows: vec![
                TableRow { cells: vec![cell("a", 1, 1), cell("b", 1, 1), cell("tall", 2, 1)] },
                TableRow { cells: vec![cell("c", 1, 1)] },
            ],
        };
        assert_eq!(
            texts(&table.grid()),
            vec![vec!["a", "b", "tall"], vec!["c", "", "tall"]]
        );
    }

    #[test]
    fn test_header_only_row() {
        let mut header = cell("Museum", 1, 1);
        header.is_header = true;
        assert!(TableRow { cells: vec![header.clone()] }.is_header_only());
        assert!(!TableRow { cells: vec![header, cell("x", 1, 1)] }.is_header_only());
        assert!(!TableRow::default().is_header_only());
    }
}
