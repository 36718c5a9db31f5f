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

use std::fmt;

use chrono::{DateTime, Local, Utc};

use atlas_core::ViewerState;

use crate::assets::{AssetResolver, AssetTextures, DiskCache};
use crate::config::AppConfig;
use crate::data_source::{DataSource, LoadOutcome, PendingLoad};
use crate::ui::{DestinationsView, LocationsView, View, ACCENT, MAP_BACKGROUND, MUTED_TEXT};

/// Top-level application: tab bar plus whichever view is active
pub struct ViewerApp {
    state: ViewerState,
    views: Vec<Box<dyn View>>,
    assets: AssetTextures,
    source: DataSource,
    pending: Option<PendingLoad>,
    load_error: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
    // Background loads run here; dropping it cancels them.
    _runtime: tokio::runtime::Runtime,
}

impl fmt::Debug for ViewerApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewerApp")
            .field("source", &self.source)
            .field("active_tab", &self.state.active_tab())
            .field("destinations", &self.state.destinations().len())
            .field("loading", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &AppConfig, runtime: tokio::runtime::Runtime) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let resolver = AssetResolver::new(&config.asset_root, config.asset_base_url.clone());
        let mut assets = AssetTextures::new(resolver, DiskCache::new(config.cache_remote_assets), runtime.handle().clone());
        assets.init_placeholder(&cc.egui_ctx);

        let source = DataSource::parse(&config.data_source);
        let pending = PendingLoad::spawn(runtime.handle(), source.clone(), cc.egui_ctx.clone());

        let views: Vec<Box<dyn View>> = vec![
            Box::new(DestinationsView::new()),
            Box::new(LocationsView::new(config.locations_list_width, config.show_activity_labels)),
        ];

        Self {
            state: ViewerState::new(config.initial_tab()),
            views,
            assets,
            source,
            pending: Some(pending),
            load_error: None,
            loaded_at: None,
            _runtime: runtime,
        }
    }

    fn finish_load(&mut self, outcome: LoadOutcome) {
        self.state.load(outcome.destinations);
        self.load_error = outcome.error;
        self.loaded_at = Some(outcome.loaded_at);
    }

    fn tab_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("◈ PVE ATLAS").color(ACCENT).size(14.0).strong());
            ui.separator();

            for (tab, visible) in self.state.tabs().pages() {
                if ui.selectable_label(visible, tab.title()).clicked() && !visible {
                    self.state.set_active_tab(tab);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(loaded_at) = self.loaded_at {
                    ui.label(
                        egui::RichText::new(format!("loaded {}", loaded_at.with_timezone(&Local).format("%H:%M:%S")))
                            .size(11.0)
                            .color(MUTED_TEXT),
                    )
                    .on_hover_text(self.source.to_string());
                }

                ui.label(
                    egui::RichText::new(format!(
                        "{} destinations · {} activities",
                        self.state.destinations().len(),
                        self.state.all_activities().len()
                    ))
                    .size(11.0)
                    .color(MUTED_TEXT),
                );

                if let Some(error) = &self.load_error {
                    ui.label(
                        egui::RichText::new(format!("⚠ {error}"))
                            .size(11.0)
                            .color(egui::Color32::from_rgb(230, 120, 100)),
                    );
                }
            });
        });
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(outcome) = self.pending.as_mut().and_then(PendingLoad::poll) {
            self.pending = None;
            self.finish_load(outcome);
        }

        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| self.tab_bar(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(MAP_BACKGROUND))
            .show(ctx, |ui| {
                if self.pending.is_some() {
                    ui.centered_and_justified(|ui| ui.spinner());
                    return;
                }

                for view in &mut self.views {
                    if self.state.tabs().is_visible(view.tab()) {
                        view.render(ui, &mut self.state, &self.assets);
                    }
                }
            });
    }
}
