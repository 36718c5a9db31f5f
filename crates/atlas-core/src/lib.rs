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

//! Core of the PVE Atlas archive viewer.
//!
//! This crate holds everything the viewer does that is not drawing pixels,
//! so the rules can be exercised without a window:
//!
//! - **Archive layer**: [`parse_archive`] turns the JSON document into typed
//!   [`Destination`]s after the [`normalize`] pass has repaired hand-authored
//!   records.
//! - **State layer**: [`ViewerState`] owns the model, the derived activity
//!   index, the active tab, per-view selections and pan offsets.
//! - **Interaction layer**: [`PanController`] implements drag-to-pan,
//!   [`layout`] places and hit-tests nodes and [`TooltipEngine`] manages the
//!   single hover tooltip.
//!
//! # Quick Start
//!
//! ```
//! use atlas_core::{parse_archive, Tab, ViewerState};
//!
//! let body = br#"{ "destinations": [ { "id": "nessus", "activities": [ { "name": "Exodus Crash" } ] } ] }"#;
//! let destinations = parse_archive(body).unwrap_or_default();
//!
//! let mut state = ViewerState::new(Tab::Destinations);
//! state.load(destinations);
//! state.select_overview_destination("nessus");
//!
//! assert_eq!(state.active_tab(), Tab::Locations);
//! assert_eq!(state.all_activities().len(), 1);
//! ```

pub mod archive;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod normalize;
pub mod pan;
pub mod state;
pub mod tabs;
pub mod tooltip;

pub use archive::{parse_archive, ArchiveError};
pub use geometry::{Point, Rect, Size};
pub use model::{
    Activity, ActivityRecord, Destination, Position, DEFAULT_MAP_IMAGE, PLACEHOLDER_ICON,
};
pub use pan::{PanController, PointerButton};
pub use state::ViewerState;
pub use tabs::{Tab, TabController};
pub use tooltip::{HoverTarget, TooltipContent, TooltipEngine};

#[cfg(test)]
mod tests {
    use super::*;

    const NESSUS: &[u8] = br#"{
        "destinations": [
            {
                "id": "nessus",
                "name": "Nessus",
                "game": "Destiny 2",
                "type": "Planetoid",
                "position": { "x": 30, "y": 60 },
                "activities": [
                    { "name": "The Insight Terminus", "modeType": "Strike", "tags": "vex, nightfall" }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_full_session() {
        let destinations = parse_archive(NESSUS).unwrap();
        let activity_id = destinations[0].activities[0].id.clone();
        assert!(!activity_id.is_empty());

        let mut state = ViewerState::new(Tab::Destinations);
        state.load(destinations);

        // Overview shows a single node.
        let overview = Rect::new(Point::ZERO, Size::new(1000.0, 600.0));
        let layer = overview.translate(state.destinations_pan);
        let nodes = layout::overview_nodes(state.destinations(), layer);
        assert_eq!(nodes.len(), 1);
        let clicked = layout::hit_test(&nodes, nodes[0].center).unwrap().id.clone();

        // Clicking it opens the locations tab with nessus active everywhere.
        state.select_overview_destination(&clicked);
        assert_eq!(state.active_tab(), Tab::Locations);
        assert!(!state.tabs().is_visible(Tab::Destinations));
        let highlighted: Vec<&str> = state
            .destinations()
            .iter()
            .filter(|d| Some(d.id.as_str()) == state.active_location_destination_id())
            .map(|d| d.id.as_str())
            .collect();
        assert_eq!(highlighted, vec!["nessus"]);

        // Detail map has one activity node.
        let container = Rect::new(Point::new(320.0, 80.0), Size::new(800.0, 500.0));
        let dest = state.location_selection().unwrap().clone();
        let nodes = layout::activity_nodes(&dest, container.translate(state.location_pan));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, activity_id);

        // Hover shows the tooltip, leaving removes it.
        let pointer = nodes[0].center;
        let hovered = layout::hit_test(&nodes, pointer).and_then(|node| {
            dest.activity(&node.id).map(|activity| HoverTarget {
                destination: &dest,
                activity,
                node_rect: node.hit_rect,
            })
        });
        state.tooltip.track(hovered, Some(pointer), container);
        assert_eq!(state.tooltip.live_count(), 1);
        assert_eq!(state.tooltip.current().unwrap().content.title, "The Insight Terminus");
        assert_eq!(state.tooltip.current().unwrap().content.tags, vec!["vex", "nightfall"]);

        state.tooltip.track(None, Some(Point::new(330.0, 90.0)), container);
        assert_eq!(state.tooltip.live_count(), 0);
    }

    #[test]
    fn test_duplicate_activity_ids_hover_separately() {
        let body = br#"{ "destinations": [ { "id": "moon", "activities": [
            { "id": "a", "name": "Pit of Heresy", "position": { "x": 20, "y": 20 } },
            { "id": "a", "name": "Altars of Sorrow", "position": { "x": 80, "y": 80 } }
        ] } ] }"#;
        let dest = parse_archive(body).unwrap().remove(0);
        let container = Rect::new(Point::ZERO, Size::new(800.0, 500.0));
        let nodes = layout::activity_nodes(&dest, container);
        assert_ne!(nodes[0].id, nodes[1].id);
        assert_eq!(dest.activity(&nodes[1].id).unwrap().title(), "Altars of Sorrow");

        let mut tooltip = TooltipEngine::new();
        for node in &nodes {
            let target = HoverTarget {
                destination: &dest,
                activity: dest.activity(&node.id).unwrap(),
                node_rect: node.hit_rect,
            };
            tooltip.track(Some(target), Some(node.center), container);
        }
        assert_eq!(tooltip.live_count(), 1);
        assert_eq!(tooltip.current().unwrap().content.title, "Altars of Sorrow");
    }
}
