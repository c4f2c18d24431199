//! Turning located table rows into normalized ranking records.

use tracing::trace;

use super::locator::{ColumnMap, LocatedTable};
use crate::extract::{
    decode_link_target, slugify_group, strip_footnotes, AnnotatedYearExtractor,
    ColumnYearExtractor, FieldExtractor, MagnitudeExtractor,
};
use crate::html::TableCell;
use crate::models::RankedEntityRecord;

/// Where the year of a magnitude is read from, chosen once per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearStrategy {
    /// A dedicated year column at this index.
    Column(usize),
    /// A parenthesized annotation inside the magnitude cell.
    Inline,
}

impl YearStrategy {
    pub fn for_columns(map: &ColumnMap) -> Self {
        match map.year {
            Some(index) => YearStrategy::Column(index),
            None => YearStrategy::Inline,
        }
    }

    /// Year for one row. A year cell without a year falls back to the annotation.
    pub fn period(&self, row: &[TableCell], magnitude_text: &str) -> Option<i32> {
        match self {
            YearStrategy::Column(index) => row
                .get(*index)
                .and_then(|cell| ColumnYearExtractor.extract(&cell.text))
                .or_else(|| AnnotatedYearExtractor.extract(magnitude_text)),
            YearStrategy::Inline => AnnotatedYearExtractor.extract(magnitude_text),
        }
    }
}

/// Builds records from the data rows of a located table.
pub struct RowMaterializer {
    columns: ColumnMap,
    years: YearStrategy,
    magnitude: MagnitudeExtractor,
    provenance_url: String,
}

impl RowMaterializer {
    pub fn new(columns: ColumnMap, provenance_url: impl Into<String>) -> Self {
        Self {
            columns,
            years: YearStrategy::for_columns(&columns),
            magnitude: MagnitudeExtractor::new(),
            provenance_url: provenance_url.into(),
        }
    }

    pub fn year_strategy(&self) -> YearStrategy {
        self.years
    }

    /// Materialize every usable row, in table order.
    pub fn materialize(&self, table: &LocatedTable) -> Vec<RankedEntityRecord> {
        table
            .data_rows()
            .filter_map(|row| self.materialize_row(row))
            .collect()
    }

    /// One record, or `None` when the row is short, unnamed or has no magnitude.
    pub fn materialize_row(&self, row: &[TableCell]) -> Option<RankedEntityRecord> {
        if row.len() <= self.columns.required_max() {
            trace!("Skipping short row with {} cells", row.len());
            return None;
        }

        let name = strip_footnotes(&row[self.columns.name].text);
        if name.is_empty() {
            return None;
        }

        let magnitude_text = &row[self.columns.magnitude].text;
        let Some(magnitude) = self.magnitude.extract(magnitude_text) else {
            trace!("Dropping {}: no magnitude in {:?}", name, magnitude_text);
            return None;
        };

        let group_cell = &row[self.columns.group];
        let group_label = strip_footnotes(&group_cell.text);
        let group_key = decode_link_target(group_cell.link.as_deref())
            .or_else(|| slugify_group(&group_cell.text));

        let category_label = self
            .columns
            .category
            .and_then(|index| row.get(index))
            .map(|cell| strip_footnotes(&cell.text))
            .filter(|label| !label.is_empty());

        Some(RankedEntityRecord {
            name,
            group_label,
            group_key,
            category_label,
            magnitude: Some(magnitude),
            period: self.years.period(row, magnitude_text),
            provenance_url: self.provenance_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::Document;
    use crate::ranking::locator::locate_table;
    use pretty_assertions::assert_eq;

    const URL: &str = "https://en.wikipedia.org/wiki/List_of_most-visited_museums";

    fn records(html: &str) -> Vec<RankedEntityRecord> {
        let located = locate_table(&Document::parse(html)).unwrap();
        let columns = ColumnMap::resolve(&located.headers).unwrap();
        RowMaterializer::new(columns, URL).materialize(&located)
    }

    #[test]
    fn test_louvre_row() {
        let recs = records(
            "<table class=\"wikitable\"><tr><th>Name</th><th>City</th><th>Country</th>\
             <th>Visitors annually</th></tr>\
             <tr><td><a href=\"/wiki/Louvre\">Louvre</a></td><td><a href=\"/wiki/Paris\">Paris</a></td>\
             <td>France</td><td>8,700,000 (2024)<sup>[3]</sup></td></tr></table>",
        );
        assert_eq!(
            recs,
            vec![RankedEntityRecord {
                name: "Louvre".to_string(),
                group_label: "Paris".to_string(),
                group_key: Some("Paris".to_string()),
                category_label: Some("France".to_string()),
                magnitude: Some(8_700_000),
                period: Some(2024),
                provenance_url: URL.to_string(),
            }]
        );
    }

    #[test]
    fn test_separate_year_cell() {
        let recs = records(
            "<table><tr><th>Name</th><th>City</th><th>Country</th><th>Visitors</th><th>Year</th></tr>\
             <tr><td>Louvre</td><td><a href=\"/wiki/Paris\">Paris</a></td><td>France</td>\
             <td>8,900,000</td><td>2024</td></tr></table>",
        );
        assert_eq!(
            recs,
            vec![RankedEntityRecord {
                name: "Louvre".to_string(),
                group_label: "Paris".to_string(),
                group_key: Some("Paris".to_string()),
                category_label: Some("France".to_string()),
                magnitude: Some(8_900_000),
                period: Some(2024),
                provenance_url: URL.to_string(),
            }]
        );
    }

    #[test]
    fn test_year_column_after_per_year_visitors() {
        let recs = records(
            "<table><tr><th>Name</th><th>City</th><th>Visitors per year</th><th>Year</th></tr>\
             <tr><td>Louvre</td><td>Paris</td><td>8,900,000</td><td>2024</td></tr></table>",
        );
        assert_eq!(recs[0].magnitude, Some(8_900_000));
        assert_eq!(recs[0].period, Some(2024));
    }

    #[test]
    fn test_country_column_only_changes_category() {
        let with_country = records(
            "<table><tr><th>Museum</th><th>City</th><th>Country</th><th>Visitors</th></tr>\
             <tr><td>Prado</td><td>Madrid</td><td>Spain</td><td>3,200,000 (2023)</td></tr></table>",
        );
        let without_country = records(
            "<table><tr><th>Museum</th><th>City</th><th>Visitors</th></tr>\
             <tr><td>Prado</td><td>Madrid</td><td>3,200,000 (2023)</td></tr></table>",
        );

        assert_eq!(with_country[0].category_label.as_deref(), Some("Spain"));
        assert_eq!(without_country[0].category_label, None);

        let mut normalized = with_country[0].clone();
        normalized.category_label = None;
        assert_eq!(normalized, without_country[0]);
    }

    #[test]
    fn test_year_column_strategy() {
        let recs = records(
            "<table><tr><th>Museum</th><th>City</th><th>Visitors</th><th>Year reported</th></tr>\
             <tr><td>Tate Modern</td><td>London</td><td>5,570,000</td><td>2023[4]</td></tr>\
             <tr><td>British Museum</td><td>London</td><td>5.8 million (2022)</td><td>n/a</td></tr></table>",
        );
        assert_eq!(recs[0].period, Some(2023));
        assert_eq!(recs[1].magnitude, Some(5_800_000));
        assert_eq!(recs[1].period, Some(2022));
    }

    #[test]
    fn test_fiscal_year_inline() {
        let recs = records(
            "<table><tr><th>Museum</th><th>City</th><th>Visitors</th></tr>\
             <tr><td>National Gallery of Victoria</td><td>Melbourne</td>\
             <td>5.7 million (FY 2024-25)</td></tr></table>",
        );
        assert_eq!(recs[0].magnitude, Some(5_700_000));
        assert_eq!(recs[0].period, Some(2024));
    }

    #[test]
    fn test_rows_without_magnitude_or_name_are_dropped() {
        let recs = records(
            "<table><tr><th>Museum</th><th>City</th><th>Visitors</th></tr>\
             <tr><td>Closed museum</td><td>Paris</td><td>n/a</td></tr>\
             <tr><td>[1]</td><td>Paris</td><td>1,000,000</td></tr>\
             <tr><td>Too short</td><td>Paris</td></tr>\
             <tr><td>Kept</td><td>Paris</td><td>2,000,000</td></tr></table>",
        );
        let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Kept"]);
    }

    #[test]
    fn test_group_key_from_link_or_text() {
        let recs = records(
            "<table><tr><th>Museum</th><th>City</th><th>Visitors</th></tr>\
             <tr><td>Wawel</td><td><a href=\"/wiki/Krak%C3%B3w\">Cracow</a></td><td>2,100,000</td></tr>\
             <tr><td>National Gallery of Art</td><td>Washington, D.C.[a]</td><td>4,210,000</td></tr>\
             <tr><td>MASP</td><td><a href=\"/w/index.php?title=X&amp;redlink=1\">São Paulo</a></td>\
             <td>2,000,000</td></tr></table>",
        );
        assert_eq!(recs[0].group_key.as_deref(), Some("Kraków"));
        assert_eq!(recs[0].group_label, "Cracow");
        assert_eq!(recs[1].group_key.as_deref(), Some("Washington"));
        assert_eq!(recs[1].group_label, "Washington, D.C.");
        assert_eq!(recs[2].group_key.as_deref(), Some("São_Paulo"));
    }

    #[test]
    fn test_shared_city_cell_via_rowspan() {
        let recs = records(
            "<table><tr><th>Museum</th><th>City</th><th>Visitors</th></tr>\
             <tr><td>Louvre</td><td rowspan=\"2\"><a href=\"/wiki/Paris\">Paris</a></td><td>8,900,000</td></tr>\
             <tr><td>Musée d'Orsay</td><td>3,270,000</td></tr></table>",
        );
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1].group_key.as_deref(), Some("Paris"));
        assert_eq!(recs[1].magnitude, Some(3_270_000));
    }

    #[test]
    fn test_year_strategy_selection() {
        let columns = ColumnMap {
            name: 0,
            group: 1,
            magnitude: 2,
            category: None,
            year: Some(3),
        };
        assert_eq!(RowMaterializer::new(columns, URL).year_strategy(), YearStrategy::Column(3));

        let inline = ColumnMap { year: None, ..columns };
        assert_eq!(RowMaterializer::new(inline, URL).year_strategy(), YearStrategy::Inline);
    }
}
