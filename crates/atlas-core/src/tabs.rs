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

//! Top-level tab state machine.

use std::fmt;

use log::debug;

/// The two top-level pages of the viewer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Overview map of all destinations.
    #[default]
    Destinations,
    /// Destination list plus the detail map of the selected destination.
    Locations,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Destinations, Tab::Locations];

    /// Resolve a tab by name. Unknown names fall back to [`Tab::Destinations`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "locations" => Tab::Locations,
            _ => Tab::Destinations,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Tab::Destinations => "destinations",
            Tab::Locations => "locations",
        }
    }

    /// Caption shown on the tab button.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Tab::Destinations => "Destinations",
            Tab::Locations => "Locations",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tracks which page is active. Exactly one page is visible at a time.
#[derive(Debug, Clone, Default)]
pub struct TabController {
    active: Tab,
}

impl TabController {
    #[must_use]
    pub fn new(initial: Tab) -> Self {
        Self { active: initial }
    }

    #[must_use]
    pub fn active(&self) -> Tab {
        self.active
    }

    /// Switch to `tab`. Returns the previously active tab.
    pub fn select(&mut self, tab: Tab) -> Tab {
        let previous = self.active;
        if previous != tab {
            debug!("Switching tab {previous} -> {tab}");
        }
        self.active = tab;
        previous
    }

    /// Switch by name, falling back to the destinations tab for unknown names.
    pub fn select_by_name(&mut self, name: &str) -> Tab {
        self.select(Tab::from_name(name))
    }

    #[must_use]
    pub fn is_visible(&self, tab: Tab) -> bool {
        self.active == tab
    }

    /// Visibility of every page, in tab order.
    #[must_use]
    pub fn pages(&self) -> [(Tab, bool); 2] {
        Tab::ALL.map(|tab| (tab, self.is_visible(tab)))
    }
}
