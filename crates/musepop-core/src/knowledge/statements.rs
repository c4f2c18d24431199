//! Parsing and ranking of knowledge-graph quantity statements.

use chrono::NaiveDate;
use serde_json::Value;

use crate::extract::patterns::SIGNED_TIMESTAMP;
use crate::models::QuantityStatement;

/// Normalize a statement amount.
///
/// `"+2161000"` and `2161000` give the same value, native fractions
/// truncate, anything else (negative, malformed, missing) is `None`.
pub fn parse_amount(amount: &Value) -> Option<u64> {
    match amount {
        Value::String(s) => {
            let digits = s.trim().strip_prefix('+').unwrap_or(s.trim());
            digits.parse().ok()
        }
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64)
                .map(|f| f.trunc() as u64)
        }),
        _ => None,
    }
}

/// Calendar date of a signed timestamp such as `"+2020-01-01T00:00:00Z"`.
///
/// Negative years and precision placeholders (`"+2020-00-00"`) are `None`.
pub fn parse_point_in_time(raw: &str) -> Option<NaiveDate> {
    let caps = SIGNED_TIMESTAMP.captures(raw.trim())?;
    if &caps[1] != "+" {
        return None;
    }
    let year: i32 = caps[2].parse().ok()?;
    let month: u32 = caps[3].parse().ok()?;
    let day: u32 = caps[4].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Read one claim of the quantity property.
///
/// The last parseable point-in-time qualifier dates the statement.
pub fn parse_statement(entity_id: &str, claim: &Value, qualifier: &str) -> QuantityStatement {
    let quantity = claim
        .pointer("/mainsnak/datavalue/value/amount")
        .and_then(parse_amount);

    let as_of = claim
        .get("qualifiers")
        .and_then(|q| q.get(qualifier))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|snak| snak.pointer("/datavalue/value/time").and_then(Value::as_str))
        .filter_map(parse_point_in_time)
        .last();

    QuantityStatement {
        entity_id: entity_id.to_string(),
        quantity,
        as_of,
    }
}

/// Pick the best statement.
///
/// The latest dated statement wins; when none is dated, the largest
/// quantity does. Statements without a quantity never win, and ties go
/// to the later statement.
pub fn select_latest(statements: &[QuantityStatement]) -> Option<&QuantityStatement> {
    let candidates = statements.iter().filter(|s| s.quantity.is_some());

    let dated = candidates
        .clone()
        .filter_map(|s| s.as_of.map(|date| (date, s)))
        .max_by_key(|(date, _)| *date)
        .map(|(_, s)| s);

    dated.or_else(|| candidates.max_by_key(|s| s.quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn statement(quantity: Option<u64>, as_of: Option<(i32, u32, u32)>) -> QuantityStatement {
        QuantityStatement {
            entity_id: "Q90".to_string(),
            quantity,
            as_of: as_of.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
    }

    #[test]
    fn test_parse_amount_forms() {
        assert_eq!(parse_amount(&json!("+2161000")), Some(2_161_000));
        assert_eq!(parse_amount(&json!(2161000)), Some(2_161_000));
        assert_eq!(parse_amount(&json!(2161000.9)), Some(2_161_000));
        assert_eq!(parse_amount(&json!("2161000")), Some(2_161_000));
        assert_eq!(parse_amount(&json!("+21.5")), None);
        assert_eq!(parse_amount(&json!("-5")), None);
        assert_eq!(parse_amount(&json!("about 2 million")), None);
        assert_eq!(parse_amount(&json!(null)), None);
        assert_eq!(parse_amount(&json!(-3)), None);
    }

    #[test]
    fn test_parse_point_in_time() {
        assert_eq!(
            parse_point_in_time("+2020-01-01T00:00:00Z"),
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
        assert_eq!(parse_point_in_time("+2020-00-00T00:00:00Z"), None);
        assert_eq!(parse_point_in_time("-0500-01-01T00:00:00Z"), None);
        assert_eq!(parse_point_in_time("2020-01-01"), None);
        assert_eq!(parse_point_in_time("+2021-02-30T00:00:00Z"), None);
    }

    #[test]
    fn test_parse_statement() {
        let claim = json!({
            "mainsnak": {"datavalue": {"value": {"amount": "+2145906", "unit": "1"}}},
            "qualifiers": {
                "P585": [
                    {"datavalue": {"value": {"time": "+2019-00-00T00:00:00Z"}}},
                    {"datavalue": {"value": {"time": "+2021-01-01T00:00:00Z"}}}
                ]
            }
        });
        let parsed = parse_statement("Q90", &claim, "P585");
        assert_eq!(parsed, statement(Some(2_145_906), Some((2021, 1, 1))));
    }

    #[test]
    fn test_parse_statement_without_qualifiers() {
        let claim = json!({"mainsnak": {"datavalue": {"value": {"amount": "oops"}}}});
        assert_eq!(parse_statement("Q90", &claim, "P585"), statement(None, None));
    }

    #[test]
    fn test_dated_beats_larger_undated() {
        let statements = vec![
            statement(Some(9_000_000), None),
            statement(Some(2_100_000), Some((2020, 1, 1))),
            statement(Some(2_200_000), Some((2015, 1, 1))),
            statement(Some(12_000_000), None),
        ];
        assert_eq!(select_latest(&statements).unwrap().quantity, Some(2_100_000));
    }

    #[test]
    fn test_undated_picks_largest() {
        let statements = vec![statement(Some(5), None), statement(Some(7), None)];
        assert_eq!(select_latest(&statements).unwrap().quantity, Some(7));
    }

    #[test]
    fn test_ties_go_to_later_statement() {
        let statements = vec![
            statement(Some(1), Some((2020, 1, 1))),
            statement(Some(2), Some((2020, 1, 1))),
        ];
        assert_eq!(select_latest(&statements).unwrap().quantity, Some(2));
    }

    #[test]
    fn test_unparseable_only_yields_none() {
        let statements = vec![statement(None, Some((2020, 1, 1))), statement(None, None)];
        assert_eq!(select_latest(&statements), None);
        assert_eq!(select_latest(&[]), None);
    }

    #[test]
    fn test_dated_without_quantity_does_not_win() {
        let statements = vec![
            statement(Some(100), Some((2010, 1, 1))),
            statement(None, Some((2024, 1, 1))),
        ];
        assert_eq!(select_latest(&statements).unwrap().quantity, Some(100));
    }
}
