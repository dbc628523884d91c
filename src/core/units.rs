//! Unit normalization for raw upstream records
//!
//! Upstream numeric fields arrive as strings such as `"172"`, `"1,358"` or
//! `"unknown"`. These helpers turn them into typed values and build a
//! display-ready [`Character`] from a raw listing entry.

use std::collections::HashMap;

use serde_json::Value;

use crate::entities::Character;

/// Sentinel used upstream for values that are not known
const UNKNOWN: &str = "unknown";

/// Centimetres per inch
const CM_PER_INCH: f64 = 2.54;

/// Parse a numeric string, treating `"unknown"`, empty and unparsable input as absent
///
/// Thousands separators are stripped before parsing, so `"1,000"` is `1000.0`.
pub fn parse_numeric(value: Option<&str>) -> Option<f64> {
    let cleaned = value?.replace(',', "");
    let cleaned = cleaned.trim().to_lowercase();
    if cleaned.is_empty() || cleaned == UNKNOWN {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a raw JSON field that may be a string or a number
pub fn parse_numeric_value(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric(Some(s)),
        _ => None,
    }
}

/// Convert centimetres to inches, rounded to one decimal place
pub fn cm_to_inches(height_cm: Option<f64>) -> Option<f64> {
    height_cm.map(|cm| round_to(cm / CM_PER_INCH, 1))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

/// A single reference URL; empty strings are not references
fn url_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn url_list_field(raw: &Value, key: &str) -> Vec<String> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Build a normalized character from one raw listing entry
///
/// Display fields are left empty; enrichment fills them in later.
pub fn normalize_character(raw: &Value) -> Character {
    let height_cm = parse_numeric_value(raw.get("height"));

    Character {
        name: string_field(raw, "name").unwrap_or_else(|| "Unknown".to_string()),
        height_cm,
        height_in: cm_to_inches(height_cm),
        mass_kg: parse_numeric_value(raw.get("mass")),
        birth_year: string_field(raw, "birth_year"),
        gender: string_field(raw, "gender"),
        hair_color: string_field(raw, "hair_color"),
        skin_color: string_field(raw, "skin_color"),
        eye_color: string_field(raw, "eye_color"),
        url: url_field(raw, "url"),
        homeworld: url_field(raw, "homeworld"),
        films: url_list_field(raw, "films"),
        species: url_list_field(raw, "species"),
        starships: url_list_field(raw, "starships"),
        vehicles: url_list_field(raw, "vehicles"),
        ..Default::default()
    }
}

/// Collapse records sharing a name, as the cache keys characters by name
///
/// The last occurrence wins but keeps the position of the first, so the
/// result matches what a later cache load returns.
pub fn dedup_by_name(characters: Vec<Character>) -> Vec<Character> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Character> = Vec::with_capacity(characters.len());
    for character in characters {
        match index.get(&character.name) {
            Some(&slot) => unique[slot] = character,
            None => {
                index.insert(character.name.clone(), unique.len());
                unique.push(character);
            }
        }
    }
    unique
}
