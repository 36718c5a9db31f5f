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

//! Viewer state store.
//!
//! [`ViewerState`] is the one application-state object. Views receive it
//! explicitly and mutate it only through the selection methods below, which
//! keep the cross-view rules in a single place:
//!
//! - choosing a destination on the overview opens it on the locations tab;
//! - choosing a destination for the detail map re-centers that map;
//! - the overview pan offset survives every re-render and selection.

use log::{debug, info};

use crate::geometry::Point;
use crate::model::{flatten_activities, Activity, ActivityRecord, Destination};
use crate::tabs::{Tab, TabController};
use crate::tooltip::TooltipEngine;

/// Session state: the loaded archive plus UI selection and pan offsets.
#[derive(Debug, Default)]
pub struct ViewerState {
    destinations: Vec<Destination>,
    all_activities: Vec<ActivityRecord>,
    tabs: TabController,
    active_destination_id: Option<String>,
    active_location_destination_id: Option<String>,
    /// Overview map translation in pixels.
    pub destinations_pan: Point,
    /// Detail map translation in pixels.
    pub location_pan: Point,
    /// Tooltip for the detail map.
    pub tooltip: TooltipEngine,
}

impl ViewerState {
    #[must_use]
    pub fn new(initial_tab: Tab) -> Self {
        Self {
            tabs: TabController::new(initial_tab),
            ..Self::default()
        }
    }

    /// Replace the archive and rebuild the derived activity index.
    ///
    /// Selections that no longer resolve fall back to the first destination.
    pub fn load(&mut self, destinations: Vec<Destination>) {
        self.destinations = destinations;
        self.all_activities = flatten_activities(&self.destinations);
        self.tooltip.hide();

        let first = self.destinations.first().map(|d| d.id.clone());
        if !self.resolves(self.active_destination_id.as_deref()) {
            self.active_destination_id.clone_from(&first);
        }
        if !self.resolves(self.active_location_destination_id.as_deref()) {
            self.active_location_destination_id = first;
            self.location_pan = Point::ZERO;
        }

        info!(
            "Loaded {} destinations with {} activities",
            self.destinations.len(),
            self.all_activities.len()
        );
    }

    fn resolves(&self, id: Option<&str>) -> bool {
        id.is_some_and(|id| self.destination(id).is_some())
    }

    #[must_use]
    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Every activity of every destination, flattened.
    #[must_use]
    pub fn all_activities(&self) -> &[ActivityRecord] {
        &self.all_activities
    }

    #[must_use]
    pub fn destination(&self, id: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.id == id)
    }

    #[must_use]
    pub fn activity(&self, destination_id: &str, activity_id: &str) -> Option<&Activity> {
        self.destination(destination_id)?.activity(activity_id)
    }

    #[must_use]
    pub fn active_tab(&self) -> Tab {
        self.tabs.active()
    }

    #[must_use]
    pub fn tabs(&self) -> &TabController {
        &self.tabs
    }

    /// Switch pages. Leaving the locations page drops its tooltip.
    pub fn set_active_tab(&mut self, tab: Tab) {
        let previous = self.tabs.select(tab);
        if previous == Tab::Locations && tab != Tab::Locations {
            self.tooltip.hide();
        }
    }

    #[must_use]
    pub fn active_destination_id(&self) -> Option<&str> {
        self.active_destination_id.as_deref()
    }

    #[must_use]
    pub fn active_location_destination_id(&self) -> Option<&str> {
        self.active_location_destination_id.as_deref()
    }

    /// Destination highlighted on the overview, defaulting to the first one.
    pub fn overview_selection(&mut self) -> Option<&Destination> {
        if !self.resolves(self.active_destination_id.as_deref()) {
            self.active_destination_id = self.destinations.first().map(|d| d.id.clone());
        }
        let id = self.active_destination_id.as_deref()?;
        self.destinations.iter().find(|d| d.id == id)
    }

    /// Destination shown on the detail map, defaulting to the first one.
    pub fn location_selection(&mut self) -> Option<&Destination> {
        if self.active_location_destination_id.is_none() {
            self.active_location_destination_id = self.destinations.first().map(|d| d.id.clone());
        }
        let id = self.active_location_destination_id.as_deref()?;
        self.destinations.iter().find(|d| d.id == id)
    }

    /// Overview click: select `id` in both views and open the locations tab.
    pub fn select_overview_destination(&mut self, id: &str) {
        debug!("Overview selected destination {id}");
        self.active_destination_id = Some(id.to_string());
        self.select_location_destination(id);
        self.set_active_tab(Tab::Locations);
    }

    /// Detail selection: show `id` on the detail map, re-centered.
    pub fn select_location_destination(&mut self, id: &str) {
        self.active_location_destination_id = Some(id.to_string());
        self.location_pan = Point::ZERO;
        self.tooltip.hide();
    }
}
