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

//! Archive document parsing.

use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::model::Destination;
use crate::normalize::normalize_document;

/// Errors that can occur while turning archive bytes into destinations.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("malformed archive JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("archive document did not contain destinations[]")]
    MissingDestinations,
}

/// Parse and normalize an archive document.
///
/// The document must be an object with a `destinations` array. Individual
/// records are repaired rather than rejected, so the only failures are a
/// body that is not JSON at all or one without the destinations list.
pub fn parse_archive(bytes: &[u8]) -> Result<Vec<Destination>, ArchiveError> {
    let mut doc: Value = serde_json::from_slice(bytes)?;
    if !normalize_document(&mut doc) {
        return Err(ArchiveError::MissingDestinations);
    }

    let raw = doc
        .get_mut("destinations")
        .map(Value::take)
        .ok_or(ArchiveError::MissingDestinations)?;
    let destinations: Vec<Destination> = serde_json::from_value(raw)?;

    debug!(
        "Parsed archive with {} destinations and {} activities",
        destinations.len(),
        destinations.iter().map(|d| d.activities.len()).sum::<usize>()
    );

    Ok(destinations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    #[test]
    fn test_parse_repairs_records() {
        let body = br#"{
            "destinations": [
                {
                    "id": "europa",
                    "name": "Europa",
                    "game": "Destiny 2",
                    "type": "Moon",
                    "position": { "x": 120, "y": "40" },
                    "activities": [
                        { "name": "Deep Stone Crypt", "tags": "raid, pinnacle", "recommendedLight": 1350 }
                    ]
                }
            ]
        }"#;

        let dests = parse_archive(body).unwrap();
        assert_eq!(dests.len(), 1);
        let europa = &dests[0];
        assert_eq!(europa.kind.as_deref(), Some("Moon"));
        assert_eq!(europa.position, Position { x: 100, y: 40 });

        let crypt = &europa.activities[0];
        assert!(!crypt.id.is_empty());
        assert_eq!(crypt.tags, vec!["raid", "pinnacle"]);
        assert_eq!(crypt.recommended_light, Some(1350.0));
        assert_eq!(crypt.position, Position::CENTER);
    }

    #[test]
    fn test_missing_destinations_is_an_error() {
        let err = parse_archive(br#"{ "locations": [] }"#).unwrap_err();
        assert!(matches!(err, ArchiveError::MissingDestinations));

        let err = parse_archive(br#"{ "destinations": {} }"#).unwrap_err();
        assert!(matches!(err, ArchiveError::MissingDestinations));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = parse_archive(b"<html>404</html>").unwrap_err();
        assert!(matches!(err, ArchiveError::Json(_)));
    }
}
