//! Tolerant HTML reader that recovers tables from rendered pages.
//!
//! This is not a general HTML parser: it tracks only `table`, `tr`,
//! `td`/`th` and `a` elements, which is all the ranking extraction needs.
//! Unclosed rows and cells are closed implicitly, comments and
//! `script`/`style` bodies are dropped, nested tables become separate
//! entries in document order.

mod table;

pub use table::{HtmlTable, TableCell, TableRow, MAX_SPAN};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::extract::patterns::WHITESPACE;

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?-->").unwrap();

    static ref RAW_TEXT: Regex = Regex::new(
        r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>"
    ).unwrap();

    static ref TAG: Regex = Regex::new(
        r#"<(/?)([A-Za-z][A-Za-z0-9]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#
    ).unwrap();

    static ref ATTRIBUTE: Regex = Regex::new(
        r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#
    ).unwrap();

    static ref ENTITY: Regex = Regex::new(
        r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[A-Za-z]+);"
    ).unwrap();
}

/// Tags whose boundaries separate words inside a cell.
const BREAKING_TAGS: &[&str] = &["br", "p", "div", "li", "ul", "ol", "hr"];

/// A parsed document: every table it contains, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub tables: Vec<HtmlTable>,
}

impl Document {
    /// Parse rendered HTML. Never fails; malformed markup yields fewer tables.
    pub fn parse(html: &str) -> Self {
        let without_comments = COMMENT.replace_all(html, "");
        let cleaned = RAW_TEXT.replace_all(&without_comments, "");

        let mut builder = DocumentBuilder::default();
        let mut last = 0;

        for caps in TAG.captures_iter(&cleaned) {
            let Some(whole) = caps.get(0) else { continue };
            builder.text(&cleaned[last..whole.start()]);
            last = whole.end();

            let name = caps[2].to_ascii_lowercase();
            if caps[1].is_empty() {
                builder.open(&name, &caps[3]);
            } else {
                builder.close(&name);
            }
        }
        builder.text(&cleaned[last..]);

        let document = builder.finish();
        trace!("Parsed document with {} tables", document.tables.len());
        document
    }
}

#[derive(Default)]
struct CellBuilder {
    is_header: bool,
    text: String,
    link: Option<String>,
    row_span: usize,
    col_span: usize,
}

struct TableBuilder {
    ordinal: usize,
    rows: Vec<TableRow>,
    row: Option<TableRow>,
    cell: Option<CellBuilder>,
}

impl TableBuilder {
    fn new(ordinal: usize) -> Self {
        Self {
            ordinal,
            rows: Vec::new(),
            row: None,
            cell: None,
        }
    }

    fn finish_cell(&mut self) {
        let Some(cell) = self.cell.take() else { return };
        let row = self.row.get_or_insert_with(TableRow::default);
        row.cells.push(TableCell {
            text: normalize_ws(&decode_entities(&cell.text)),
            is_header: cell.is_header,
            link: cell.link,
            row_span: cell.row_span,
            col_span: cell.col_span,
        });
    }

    fn finish_row(&mut self) {
        self.finish_cell();
        if let Some(row) = self.row.take() {
            if !row.cells.is_empty() {
                self.rows.push(row);
            }
        }
    }

    fn finish(mut self) -> (usize, HtmlTable) {
        self.finish_row();
        (self.ordinal, HtmlTable { rows: self.rows })
    }
}

#[derive(Default)]
struct DocumentBuilder {
    open: Vec<TableBuilder>,
    done: Vec<(usize, HtmlTable)>,
    next_ordinal: usize,
}

impl DocumentBuilder {
    fn open(&mut self, name: &str, attrs: &str) {
        if name == "table" {
            self.open.push(TableBuilder::new(self.next_ordinal));
            self.next_ordinal += 1;
            return;
        }

        let Some(table) = self.open.last_mut() else { return };
        match name {
            "tr" => {
                table.finish_row();
                table.row = Some(TableRow::default());
            }
            "td" | "th" => {
                table.finish_cell();
                table.cell = Some(CellBuilder {
                    is_header: name == "th",
                    text: String::new(),
                    link: None,
                    row_span: span(attrs, "rowspan"),
                    col_span: span(attrs, "colspan"),
                });
            }
            "a" => {
                if let Some(cell) = table.cell.as_mut() {
                    if cell.link.is_none() {
                        cell.link = attribute(attrs, "href");
                    }
                }
            }
            _ if BREAKING_TAGS.contains(&name) => {
                if let Some(cell) = table.cell.as_mut() {
                    cell.text.push(' ');
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &str) {
        if name == "table" {
            if let Some(table) = self.open.pop() {
                self.done.push(table.finish());
            }
            return;
        }

        let Some(table) = self.open.last_mut() else { return };
        match name {
            "tr" => table.finish_row(),
            "td" | "th" => table.finish_cell(),
            _ if BREAKING_TAGS.contains(&name) => {
                if let Some(cell) = table.cell.as_mut() {
                    cell.text.push(' ');
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(cell) = self.open.last_mut().and_then(|t| t.cell.as_mut()) {
            cell.text.push_str(text);
        }
    }

    fn finish(mut self) -> Document {
        while let Some(table) = self.open.pop() {
            self.done.push(table.finish());
        }
        self.done.sort_by_key(|(ordinal, _)| *ordinal);
        Document {
            tables: self.done.into_iter().map(|(_, table)| table).collect(),
        }
    }
}

/// Value of an attribute in a raw attribute string, entity-decoded.
fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(attrs)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .and_then(|caps| {
            caps.get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
        })
}

fn span(attrs: &str, name: &str) -> usize {
    attribute(attrs, name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_SPAN)
}

/// Decode the named entities that show up in ranking tables, plus numeric ones.
pub fn decode_entities(s: &str) -> String {
    ENTITY
        .replace_all(s, |caps: &regex::Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "nbsp" => Some(' '),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "ndash" => Some('–'),
                    "mdash" => Some('—'),
                    "minus" => Some('−'),
                    _ => None,
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Collapse whitespace runs (including non-breaking spaces) and trim.
pub fn normalize_ws(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}
