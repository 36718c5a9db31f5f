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

//! Activity tooltip drawn above the detail map.
//!
//! The [`TooltipEngine`] decides where the tooltip goes; this module only
//! lays it out and reports the measured size back so the engine can clamp
//! it inside the map container.

use atlas_core::{Rect, Size, TooltipContent, TooltipEngine};

use super::{to_pos, ACCENT, MUTED_TEXT};
use crate::assets::AssetTextures;

const MAX_WIDTH: f32 = 280.0;
const THUMBNAIL_SIZE: f32 = 40.0;

fn tag_pill(ui: &mut egui::Ui, tag: &str) {
    egui::Frame::new()
        .fill(ACCENT.gamma_multiply(0.15))
        .stroke(egui::Stroke::new(1.0, ACCENT.gamma_multiply(0.4)))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(tag).size(10.0).color(ACCENT));
        });
}

fn tooltip_body(ui: &mut egui::Ui, content: &TooltipContent, assets: &AssetTextures) {
    ui.set_max_width(MAX_WIDTH);

    ui.horizontal(|ui| {
        if let Some(texture) = assets.texture(ui.ctx(), &content.thumbnail) {
            ui.add(
                egui::Image::new(&texture)
                    .fit_to_exact_size(egui::vec2(THUMBNAIL_SIZE, THUMBNAIL_SIZE))
                    .corner_radius(4.0),
            );
        }
        ui.vertical(|ui| {
            ui.label(egui::RichText::new(&content.title).size(13.0).strong().color(egui::Color32::WHITE));
            ui.label(egui::RichText::new(&content.mode_line).size(11.0).color(MUTED_TEXT));
        });
    });

    if let Some(description) = &content.description {
        ui.add_space(4.0);
        ui.label(egui::RichText::new(description).size(12.0).color(egui::Color32::from_rgb(210, 215, 230)));
    }

    if !content.tags.is_empty() {
        ui.add_space(6.0);
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(4.0, 4.0);
            for tag in &content.tags {
                tag_pill(ui, tag);
            }
        });
    }
}

/// Draw the live tooltip, if any, and settle its measured size
pub(crate) fn show_tooltip(ctx: &egui::Context, tooltip: &mut TooltipEngine, container: Rect, assets: &AssetTextures) {
    let Some(active) = tooltip.current() else {
        return;
    };

    let screen_pos = container.min + active.position();
    let id = egui::Id::new(("activity_tooltip", &active.destination_id, &active.activity_id));
    let content = active.content.clone();

    let shown = egui::Area::new(id)
        .order(egui::Order::Tooltip)
        .fixed_pos(to_pos(screen_pos))
        .constrain(false)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(egui::Color32::from_rgba_unmultiplied(14, 19, 32, 240))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(60, 80, 100)))
                .corner_radius(6.0)
                .inner_margin(10.0)
                .show(ui, |ui| tooltip_body(ui, &content, assets));
        });

    let measured = shown.response.rect.size();
    tooltip.settle(Size::new(measured.x, measured.y), container);
}
