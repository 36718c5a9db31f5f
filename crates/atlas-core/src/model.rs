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

//! Typed archive model.
//!
//! These types are deserialized from a document that has already been through
//! [`crate::normalize`], so every field the viewer depends on is present and
//! in range. Display fallbacks live here so both views render the same text.

use serde::{Deserialize, Serialize};

/// Icon used when a destination or activity has no image of its own.
pub const PLACEHOLDER_ICON: &str = "assets/icons/placeholder.png";

/// Map image used when a destination does not name one.
pub const DEFAULT_MAP_IMAGE: &str = "assets/maps/default_location_map.jpg";

/// Position as integer percentages of the containing map, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    /// Fallback used for records with no usable position.
    pub const CENTER: Self = Self { x: 50, y: 50 };
}

impl Default for Position {
    fn default() -> Self {
        Self::CENTER
    }
}

/// A top-level world or location shown on the overview map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub icon_overlay1: String,
    #[serde(default)]
    pub icon_overlay2: String,
    #[serde(default)]
    pub icon_overlay3: String,
    #[serde(default = "default_map_image")]
    pub map_image: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

fn default_map_image() -> String {
    DEFAULT_MAP_IMAGE.to_string()
}

/// A mission or sub-location inside a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mode_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub recommended_light: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub position: Position,
}

/// Flattened, read-only projection of an activity with its destination's
/// identifying fields copied alongside.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub activity: Activity,
    pub destination_id: String,
    pub destination_name: Option<String>,
    pub destination_game: Option<String>,
    pub destination_type: Option<String>,
}

/// Treat empty strings the same as missing values.
fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl Destination {
    /// Name, then id, then a generic label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        present(self.name.as_ref())
            .or_else(|| present(Some(&self.id)))
            .unwrap_or("Unknown")
    }

    #[must_use]
    pub fn icon_or_placeholder(&self) -> &str {
        present(self.icon.as_ref()).unwrap_or(PLACEHOLDER_ICON)
    }

    /// Overlay icons that are actually set, in slot order.
    pub fn overlay_icons(&self) -> impl Iterator<Item = &str> {
        [&self.icon_overlay1, &self.icon_overlay2, &self.icon_overlay3]
            .into_iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn map_image_or_default(&self) -> &str {
        if self.map_image.is_empty() {
            DEFAULT_MAP_IMAGE
        } else {
            &self.map_image
        }
    }

    #[must_use]
    pub fn game_label(&self) -> &str {
        present(self.game.as_ref()).unwrap_or("Unknown")
    }

    #[must_use]
    pub fn type_label(&self) -> &str {
        present(self.kind.as_ref()).unwrap_or("Location")
    }

    /// Summary shown under each row of the destination list.
    #[must_use]
    pub fn list_summary(&self) -> String {
        format!(
            "{} · {} · {} activities",
            self.game_label(),
            self.type_label(),
            self.activities.len()
        )
    }

    /// Summary shown under the detail map title, with a singular form.
    #[must_use]
    pub fn detail_summary(&self) -> String {
        let count = self.activities.len();
        let count_label = if count == 1 {
            "1 activity".to_string()
        } else {
            format!("{count} activities")
        };
        format!("{} · {} · {}", self.game_label(), self.type_label(), count_label)
    }

    #[must_use]
    pub fn detail_title(&self) -> String {
        self.display_name().to_uppercase()
    }

    /// Look up one of this destination's activities by id.
    #[must_use]
    pub fn activity(&self, activity_id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == activity_id)
    }
}

impl Activity {
    /// Short label painted under the activity node.
    #[must_use]
    pub fn label(&self) -> &str {
        present(self.short_name.as_ref())
            .or_else(|| present(self.name.as_ref()))
            .unwrap_or("")
    }

    #[must_use]
    pub fn title(&self) -> &str {
        present(self.name.as_ref()).unwrap_or("Unknown Activity")
    }

    /// Activity thumbnail, falling back to the destination icon.
    #[must_use]
    pub fn thumbnail_or<'a>(&'a self, destination: &'a Destination) -> &'a str {
        present(self.thumbnail.as_ref())
            .or_else(|| present(destination.icon.as_ref()))
            .unwrap_or(PLACEHOLDER_ICON)
    }

    /// Mode or category, with the recommended light appended when known.
    #[must_use]
    pub fn mode_line(&self) -> String {
        let mode = present(self.mode_type.as_ref())
            .or_else(|| present(self.category.as_ref()))
            .unwrap_or("Mode");
        match self.recommended_light {
            Some(light) => format!("{mode} · ✦ {}", format_light(light)),
            None => mode.to_string(),
        }
    }

    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        present(self.description.as_ref())
    }
}

/// Whole numbers print without a fractional part.
fn format_light(light: f64) -> String {
    if light.fract() == 0.0 && light.abs() < 1e15 {
        format!("{light:.0}")
    } else {
        light.to_string()
    }
}

/// Flatten every activity of every destination, in archive order.
#[must_use]
pub fn flatten_activities(destinations: &[Destination]) -> Vec<ActivityRecord> {
    destinations
        .iter()
        .flat_map(|dest| {
            dest.activities.iter().map(move |act| ActivityRecord {
                activity: act.clone(),
                destination_id: dest.id.clone(),
                destination_name: dest.name.clone(),
                destination_game: dest.game.clone(),
                destination_type: dest.kind.clone(),
            })
        })
        .collect()
}
