//! Round-trip between a [`ConditionSet`] and the single encoded string the
//! backend stores in `triggerConditions`. The wire shape is a JSON array of
//! `{parameter, operator, value}` records with `value` as a JSON number.
//!
//! Decoding never fails: a corrupt or legacy-shaped persisted value must not
//! prevent a rule list from rendering, so malformed input falls back to a
//! single blank row here and nowhere else.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::condition::{ConditionSet, Parameter, TriggerCondition};

pub const NO_CONDITIONS: &str = "No conditions";
pub const INVALID_CONDITIONS: &str = "Invalid conditions";

#[derive(Serialize)]
struct WireCondition<'a> {
    parameter: &'a str,
    operator: &'a str,
    value: Value,
}

/// Serializes the complete subset of `set`. Incomplete rows are never
/// encoded. Values that parse as numbers are written as JSON numbers (the
/// remote evaluator casts them); anything else is carried through as a
/// string rather than dropped.
pub fn encode(set: &ConditionSet) -> String {
    let complete = set.complete_subset();
    let records: Vec<WireCondition<'_>> = complete.iter().map(wire_record).collect();
    serde_json::to_string(&records).unwrap_or_else(|_| "[]".to_string())
}

/// Parses an encoded condition string into a set. Absent, empty, or
/// malformed input yields a single blank row so the editor always has one
/// row to show, as does a well-formed empty array.
pub fn decode(raw: Option<&str>) -> ConditionSet {
    let decoded = raw
        .filter(|r| !r.trim().is_empty())
        .and_then(try_decode)
        .unwrap_or_default();
    ConditionSet::from_conditions(decoded)
}

/// Human rendering of an encoded condition string: conditions joined by
/// `" AND "`, each as `<label> <operator> <value>`. Absent or empty input
/// reads "No conditions"; unparseable input reads "Invalid conditions".
pub fn format(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return NO_CONDITIONS.to_string();
    };
    match try_decode(raw) {
        None => INVALID_CONDITIONS.to_string(),
        Some(conditions) if conditions.is_empty() => NO_CONDITIONS.to_string(),
        Some(conditions) => conditions
            .iter()
            .map(|c| {
                format!(
                    "{} {} {}",
                    Parameter::label_for(&c.parameter),
                    c.operator,
                    c.value
                )
            })
            .collect::<Vec<_>>()
            .join(" AND "),
    }
}

fn wire_record(c: &TriggerCondition) -> WireCondition<'_> {
    WireCondition {
        parameter: &c.parameter,
        operator: &c.operator,
        value: wire_value(&c.value),
    }
}

fn wire_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = raw.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

fn try_decode(raw: &str) -> Option<Vec<TriggerCondition>> {
    let parsed: Value = serde_json::from_str(raw).ok()?;
    let entries = parsed.as_array()?;
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let record = entry.as_object()?;
        out.push(TriggerCondition {
            parameter: string_field(record, "parameter"),
            operator: operator_field(record),
            value: value_field(record),
        });
    }
    Some(out)
}

fn string_field(record: &Map<String, Value>, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn operator_field(record: &Map<String, Value>) -> String {
    let op = string_field(record, "operator");
    if op.is_empty() {
        TriggerCondition::blank().operator
    } else {
        op
    }
}

fn value_field(record: &Map<String, Value>) -> String {
    match record.get("value") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
