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

//! Overview map with one node per destination.

use atlas_core::layout::{self, NodeLayout};
use atlas_core::{PanController, Tab, ViewerState};

use super::orbit::{paint_node, Emphasis, NodeArt};
use super::{drive_pan, point, rect, View, MAP_BACKGROUND, MUTED_TEXT};
use crate::assets::AssetTextures;

#[derive(Debug, Default)]
pub struct DestinationsView {
    pan: PanController,
}

impl DestinationsView {
    pub fn new() -> Self {
        Self {
            pan: PanController::new(),
        }
    }
}

impl View for DestinationsView {
    fn tab(&self) -> Tab {
        Tab::Destinations
    }

    fn render(&mut self, ui: &mut egui::Ui, state: &mut ViewerState, assets: &AssetTextures) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let area = response.rect;
        let painter = painter.with_clip_rect(area);

        painter.rect_filled(area, 0.0, MAP_BACKGROUND);

        if state.destinations().is_empty() {
            painter.text(
                area.center(),
                egui::Align2::CENTER_CENTER,
                "No destinations yet.",
                egui::FontId::proportional(14.0),
                MUTED_TEXT,
            );
            return;
        }

        let selected = state.overview_selection().map(|d| d.id.clone());

        // Presses are tested against this frame's layout, drawing uses the
        // offset after this frame's drag.
        let nodes = layout::overview_nodes(state.destinations(), rect(area).translate(state.destinations_pan));
        drive_pan(ui, area, &mut self.pan, &mut state.destinations_pan, |p| {
            layout::hit_test(&nodes, p).is_some()
        });
        let nodes = layout::overview_nodes(state.destinations(), rect(area).translate(state.destinations_pan));

        let hovered: Option<&NodeLayout> = if self.pan.is_dragging() {
            None
        } else {
            response.hover_pos().and_then(|p| layout::hit_test(&nodes, point(p)))
        };

        for (node, dest) in nodes.iter().zip(state.destinations()) {
            let emphasis = if selected.as_deref() == Some(dest.id.as_str()) {
                Emphasis::Selected
            } else if hovered.is_some_and(|h| h.id == node.id) {
                Emphasis::Hovered
            } else {
                Emphasis::Normal
            };

            let art = NodeArt {
                icon: dest.icon_or_placeholder(),
                overlays: dest.overlay_icons().collect(),
                label: Some(dest.display_name()),
            };
            paint_node(&painter, assets, node, &art, emphasis);
        }

        if response.clicked() {
            let clicked = response
                .interact_pointer_pos()
                .and_then(|p| layout::hit_test(&nodes, point(p)))
                .map(|node| node.id.clone());

            if let Some(id) = clicked {
                state.select_overview_destination(&id);
            }
        }
    }
}
