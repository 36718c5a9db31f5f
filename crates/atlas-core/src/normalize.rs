// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Best-effort repair of hand-authored archive records.
//!
//! The archive is edited by hand, so malformed fields are expected. Every
//! repair here is silent: missing positions become the map center, values
//! outside `[0, 100]` are clamped, tag strings are split, missing ids are
//! generated. Normalization mutates the parsed JSON in place and is
//! idempotent, so running it twice leaves the document unchanged.

use std::collections::HashSet;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::model::{DEFAULT_MAP_IMAGE, Position};

/// Text fields coerced to strings on every destination.
const DESTINATION_TEXT_FIELDS: [&str; 4] = ["name", "game", "type", "icon"];

/// Text fields coerced to strings on every activity.
const ACTIVITY_TEXT_FIELDS: [&str; 6] = [
    "name",
    "shortName",
    "thumbnail",
    "description",
    "modeType",
    "category",
];

const OVERLAY_FIELDS: [&str; 3] = ["iconOverlay1", "iconOverlay2", "iconOverlay3"];

/// Normalize a whole archive document (`{ "destinations": [...] }`).
///
/// Returns `false` when the document has no `destinations` array, in which
/// case nothing is touched.
pub fn normalize_document(doc: &mut Value) -> bool {
    match doc.get_mut("destinations") {
        Some(Value::Array(destinations)) => {
            normalize_destinations(destinations);
            true
        }
        _ => false,
    }
}

/// Normalize a list of raw destination records in place.
///
/// Entries that are not JSON objects cannot be repaired and are dropped.
pub fn normalize_destinations(destinations: &mut Vec<Value>) {
    destinations.retain(Value::is_object);

    let mut ids = IdRegistry::for_records(destinations);
    for dest in destinations.iter_mut() {
        if let Value::Object(fields) = dest {
            normalize_destination(fields, &mut ids);
        }
    }
}

fn normalize_destination(dest: &mut Map<String, Value>, ids: &mut IdRegistry) {
    ensure_id(dest, "dest", ids);
    normalize_position(dest);

    for field in DESTINATION_TEXT_FIELDS {
        coerce_text(dest, field);
    }

    for field in OVERLAY_FIELDS {
        let overlay = match dest.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) if is_truthy_number(n) => n.to_string(),
            _ => String::new(),
        };
        dest.insert(field.to_string(), Value::String(overlay));
    }

    let has_map = matches!(dest.get("mapImage"), Some(Value::String(s)) if !s.is_empty());
    if !has_map {
        dest.insert(
            "mapImage".to_string(),
            Value::String(DEFAULT_MAP_IMAGE.to_string()),
        );
    }

    let activities = dest
        .entry("activities")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !activities.is_array() {
        *activities = Value::Array(Vec::new());
    }

    if let Value::Array(activities) = activities {
        activities.retain(Value::is_object);

        let mut activity_ids = IdRegistry::for_records(activities);
        for act in activities.iter_mut() {
            if let Value::Object(fields) = act {
                normalize_activity(fields, &mut activity_ids);
            }
        }
    }
}

fn normalize_activity(act: &mut Map<String, Value>, ids: &mut IdRegistry) {
    ensure_id(act, "act", ids);
    normalize_position(act);

    for field in ACTIVITY_TEXT_FIELDS {
        coerce_text(act, field);
    }

    let tags = normalize_tags(act.get("tags"));
    act.insert(
        "tags".to_string(),
        Value::Array(tags.into_iter().map(Value::String).collect()),
    );

    if !matches!(act.get("recommendedLight"), Some(Value::Number(_))) {
        act.remove("recommendedLight");
    }
}

/// Ids within one list of records: the ones authored in the archive and the
/// ones already assigned during this pass.
#[derive(Debug, Default)]
struct IdRegistry {
    authored: HashSet<String>,
    assigned: HashSet<String>,
}

impl IdRegistry {
    fn for_records(records: &[Value]) -> Self {
        Self {
            authored: records.iter().filter_map(|r| authored_id(r.get("id"))).collect(),
            assigned: HashSet::new(),
        }
    }

    /// The authored id if no earlier record holds it, otherwise a fresh
    /// token that collides with neither authored nor assigned ids.
    fn claim(&mut self, authored: Option<String>, prefix: &str) -> String {
        if let Some(id) = authored {
            if self.assigned.insert(id.clone()) {
                return id;
            }
        }
        loop {
            let candidate = generate_id(prefix);
            if !self.authored.contains(&candidate) && self.assigned.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

/// Truthy string ids, or numbers stringified.
fn authored_id(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) if is_truthy_number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Give `record` an id that is unique within its list. Later duplicates of
/// an authored id are renamed; the first occurrence keeps it.
fn ensure_id(record: &mut Map<String, Value>, prefix: &str, ids: &mut IdRegistry) {
    let id = ids.claim(authored_id(record.get("id")), prefix);
    record.insert("id".to_string(), Value::String(id));
}

/// Opaque random token such as `act_3f9a0c1e`.
#[must_use]
pub fn generate_id(prefix: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &token[..8])
}

fn normalize_position(record: &mut Map<String, Value>) {
    let (x, y) = match record.get("position") {
        Some(Value::Object(pos)) => (
            clamp_percent(pos.get("x"), Position::CENTER.x),
            clamp_percent(pos.get("y"), Position::CENTER.y),
        ),
        _ => (Position::CENTER.x, Position::CENTER.y),
    };

    let mut pos = match record.remove("position") {
        Some(Value::Object(pos)) => pos,
        _ => Map::new(),
    };
    pos.insert("x".to_string(), Value::from(x));
    pos.insert("y".to_string(), Value::from(y));
    record.insert("position".to_string(), Value::Object(pos));
}

/// Interpret a raw coordinate as an integer percentage in `[0, 100]`.
///
/// Absent and null values, and anything without a leading integer, use
/// `default`. Fractions truncate toward zero.
#[must_use]
pub fn clamp_percent(value: Option<&Value>, default: u8) -> u8 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(truncate_to_i64)),
        Some(Value::String(s)) => parse_leading_int(s),
        _ => None,
    };

    match parsed {
        Some(v) => u8::try_from(v.clamp(0, 100)).unwrap_or(default),
        None => default,
    }
}

#[allow(clippy::cast_possible_truncation, reason = "value is clamped to a percentage right after")]
fn truncate_to_i64(value: f64) -> i64 {
    value.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64
}

/// Parse an optional sign followed by digits, ignoring anything after them.
fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Saturate absurdly long digit runs; the caller clamps anyway.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Materialize a tag list from an array or a comma-delimited string.
#[must_use]
pub fn normalize_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Keep strings, stringify numbers, drop everything else.
fn coerce_text(record: &mut Map<String, Value>, field: &str) {
    match record.get(field) {
        None | Some(Value::String(_)) => {}
        Some(Value::Number(n)) => {
            let text = n.to_string();
            record.insert(field.to_string(), Value::String(text));
        }
        Some(_) => {
            record.remove(field);
        }
    }
}

fn is_truthy_number(n: &serde_json::Number) -> bool {
    n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalized(mut doc: Value) -> Value {
        assert!(normalize_document(&mut doc));
        doc
    }

    #[test]
    fn test_missing_position_defaults_to_center() {
        let doc = normalized(json!({ "destinations": [ { "id": "nessus" } ] }));
        assert_eq!(doc["destinations"][0]["position"], json!({ "x": 50, "y": 50 }));
    }

    #[test]
    fn test_position_values_are_clamped() {
        let doc = normalized(json!({ "destinations": [
            { "id": "a", "position": { "x": 140, "y": -12 } },
            { "id": "b", "position": { "x": 33.9, "y": null } },
            { "id": "c", "position": { "x": "72px", "y": "north" } },
            { "id": "d", "position": 7 },
        ] }));
        let dests = &doc["destinations"];
        assert_eq!(dests[0]["position"], json!({ "x": 100, "y": 0 }));
        assert_eq!(dests[1]["position"], json!({ "x": 33, "y": 50 }));
        assert_eq!(dests[2]["position"], json!({ "x": 72, "y": 50 }));
        assert_eq!(dests[3]["position"], json!({ "x": 50, "y": 50 }));
    }

    #[test]
    fn test_destination_defaults() {
        let doc = normalized(json!({ "destinations": [
            { "id": "moon", "iconOverlay1": null, "iconOverlay3": "assets/icons/raid.png", "activities": "none" }
        ] }));
        let dest = &doc["destinations"][0];
        assert_eq!(dest["iconOverlay1"], "");
        assert_eq!(dest["iconOverlay2"], "");
        assert_eq!(dest["iconOverlay3"], "assets/icons/raid.png");
        assert_eq!(dest["mapImage"], DEFAULT_MAP_IMAGE);
        assert_eq!(dest["activities"], json!([]));
    }

    #[test]
    fn test_missing_activity_ids_are_generated_and_unique() {
        let doc = normalized(json!({ "destinations": [ { "id": "nessus", "activities": [
            { "name": "Exodus Crash" },
            { "name": "The Insight Terminus", "id": "" },
            { "name": "Orrery", "id": "orrery" },
        ] } ] }));
        let acts = doc["destinations"][0]["activities"].as_array().unwrap();
        let ids: HashSet<&str> = acts.iter().map(|a| a["id"].as_str().unwrap()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("orrery"));
        assert!(ids.iter().all(|id| !id.is_empty()));
        assert!(acts[0]["id"].as_str().unwrap().starts_with("act_"));
    }

    #[test]
    fn test_duplicate_ids_are_renamed() {
        let doc = normalized(json!({ "destinations": [
            { "id": "moon", "activities": [
                { "id": "a", "name": "Pit of Heresy" },
                { "id": "a", "name": "Altars of Sorrow" },
            ] },
            { "id": "moon" },
        ] }));
        let dests = &doc["destinations"];
        assert_eq!(dests[0]["id"], "moon");
        assert!(dests[1]["id"].as_str().unwrap().starts_with("dest_"));

        let acts = &dests[0]["activities"];
        assert_eq!(acts[0]["id"], "a");
        assert!(acts[1]["id"].as_str().unwrap().starts_with("act_"));
        assert_eq!(acts[1]["name"], "Altars of Sorrow");

        assert_eq!(normalized(doc.clone()), doc);
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        let doc = normalized(json!({ "destinations": [ { "id": 7, "activities": [ { "id": 3 } ] } ] }));
        assert_eq!(doc["destinations"][0]["id"], "7");
        assert_eq!(doc["destinations"][0]["activities"][0]["id"], "3");
    }

    #[test]
    fn test_tag_normalization() {
        assert_eq!(normalize_tags(Some(&json!("a, b ,c"))), vec!["a", "b", "c"]);
        assert_eq!(normalize_tags(Some(&json!("a,, ,b"))), vec!["a", "b"]);
        assert!(normalize_tags(Some(&json!([]))).is_empty());
        assert!(normalize_tags(None).is_empty());
        assert!(normalize_tags(Some(&json!({ "tag": "x" }))).is_empty());
        assert_eq!(normalize_tags(Some(&json!(["raid", 6, null]))), vec!["raid", "6"]);
    }

    #[test]
    fn test_activity_field_coercion() {
        let doc = normalized(json!({ "destinations": [ { "id": "d", "activities": [
            { "id": "a", "name": 42, "description": { "oops": true }, "recommendedLight": "high" },
            { "id": "b", "recommendedLight": 1810 },
        ] } ] }));
        let acts = &doc["destinations"][0]["activities"];
        assert_eq!(acts[0]["name"], "42");
        assert!(acts[0].get("description").is_none());
        assert!(acts[0].get("recommendedLight").is_none());
        assert_eq!(acts[1]["recommendedLight"], 1810);
    }

    #[test]
    fn test_non_object_entries_are_dropped() {
        let doc = normalized(json!({ "destinations": [ null, 3, { "id": "ok", "activities": [ "x", { "id": "a" } ] } ] }));
        let dests = doc["destinations"].as_array().unwrap();
        assert_eq!(dests.len(), 1);
        assert_eq!(dests[0]["activities"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalized(json!({ "destinations": [
            { "name": "Nessus", "position": { "x": "250" }, "activities": [
                { "name": "Exodus Crash", "tags": "strike, nightfall", "position": { "x": -5, "y": 20.7 } },
            ] },
        ] }));
        let twice = normalized(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_document_without_destinations_is_untouched() {
        let mut doc = json!({ "worlds": [] });
        assert!(!normalize_document(&mut doc));
        assert_eq!(doc, json!({ "worlds": [] }));
    }
}
