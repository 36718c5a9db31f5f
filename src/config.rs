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

//! Application configuration management.
//!
//! Configuration is stored as TOML through `confy`. Every field has a serde
//! default so older or hand-edited files keep loading. Command line flags
//! override individual values for a single session without being written
//! back.

use serde::{Deserialize, Serialize};

use atlas_core::Tab;

const APP_NAME: &str = "pve-atlas";
const CONFIG_NAME: &str = "config";

/// Archive document loaded when nothing else is configured
pub const DEFAULT_DATA_SOURCE: &str = "data/destiny_pve_archive.json";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Archive JSON: a file path or an http(s) URL
    #[serde(default = "default_data_source")]
    pub data_source: String,

    /// Directory that relative asset paths resolve against
    #[serde(default = "default_asset_root")]
    pub asset_root: String,

    /// Base URL for relative asset paths; takes precedence over `asset_root`
    #[serde(default)]
    pub asset_base_url: Option<String>,

    /// Tab shown at startup: "destinations" or "locations"
    #[serde(default = "default_initial_tab")]
    pub initial_tab: String,

    /// Initial window width in pixels
    #[serde(default = "default_window_width")]
    pub window_width: f32,

    /// Initial window height in pixels
    #[serde(default = "default_window_height")]
    pub window_height: f32,

    /// Destination list panel width in pixels
    #[serde(default = "default_locations_list_width")]
    pub locations_list_width: f32,

    /// Keep downloaded images in the user cache directory
    #[serde(default = "default_true")]
    pub cache_remote_assets: bool,

    /// Paint short labels under activity nodes
    #[serde(default = "default_true")]
    pub show_activity_labels: bool,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_data_source() -> String {
    DEFAULT_DATA_SOURCE.to_string()
}

fn default_asset_root() -> String {
    ".".to_string()
}

fn default_initial_tab() -> String {
    Tab::Destinations.name().to_string()
}

fn default_window_width() -> f32 {
    1400.0
}

fn default_window_height() -> f32 {
    860.0
}

fn default_locations_list_width() -> f32 {
    300.0
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            data_source: default_data_source(),
            asset_root: default_asset_root(),
            asset_base_url: None,
            initial_tab: default_initial_tab(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            locations_list_width: default_locations_list_width(),
            cache_remote_assets: true,
            show_activity_labels: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, creating it with defaults on first run
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Load configuration, falling back to defaults when the file is unreadable
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            log::warn!("Could not load configuration ({e}), using defaults");
            Self::default()
        })
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Tab to open at startup; unknown names fall back to destinations
    pub fn initial_tab(&self) -> Tab {
        Tab::from_name(&self.initial_tab)
    }
}
