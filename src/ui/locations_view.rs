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

//! Destination list plus the detail map of the selected destination.

use atlas_core::layout::{self, NodeLayout};
use atlas_core::{Destination, HoverTarget, PanController, Point, Size, Tab, ViewerState};

use super::orbit::{paint_node, Emphasis, NodeArt};
use super::tooltip_overlay::show_tooltip;
use super::{drive_pan, point, rect, to_rect, View, ACCENT, MAP_BACKGROUND, MUTED_TEXT};
use crate::assets::AssetTextures;

const ROW_HEIGHT: f32 = 48.0;
const ROW_ICON_SIZE: f32 = 32.0;
const MAP_SURFACE: egui::Color32 = egui::Color32::from_rgb(14, 19, 32);

#[derive(Debug)]
pub struct LocationsView {
    pan: PanController,
    list_width: f32,
    show_labels: bool,
}

impl LocationsView {
    pub fn new(list_width: f32, show_labels: bool) -> Self {
        Self {
            pan: PanController::new(),
            list_width,
            show_labels,
        }
    }

    fn detail(&mut self, ui: &mut egui::Ui, state: &mut ViewerState, assets: &AssetTextures) {
        let Some(dest) = state.location_selection().cloned() else {
            ui.heading("Select a Destination");
            state.location_pan = Point::ZERO;
            state.tooltip.hide();
            self.pan.release();
            return;
        };

        ui.add_space(4.0);
        ui.label(egui::RichText::new(dest.detail_title()).size(18.0).strong().color(egui::Color32::WHITE));
        ui.label(egui::RichText::new(dest.detail_summary()).size(12.0).color(MUTED_TEXT));
        ui.add_space(6.0);

        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let area = response.rect;
        let painter = painter.with_clip_rect(area);
        let container = rect(area);

        painter.rect_filled(area, 6.0, MAP_SURFACE);

        let nodes = layout::activity_nodes(&dest, container.translate(state.location_pan));
        let dragging = drive_pan(ui, area, &mut self.pan, &mut state.location_pan, |p| {
            layout::hit_test(&nodes, p).is_some()
        });
        let layer = container.translate(state.location_pan);
        let nodes = layout::activity_nodes(&dest, layer);

        if let Some(texture) = assets.loaded(ui.ctx(), dest.map_image_or_default()) {
            let size = texture.size_vec2();
            let image_rect = layout::fit_within(layer, Size::new(size.x, size.y));
            painter.image(
                texture.id(),
                to_rect(image_rect),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        let pointer = response.hover_pos();
        let hovered: Option<&NodeLayout> = if dragging {
            None
        } else {
            pointer.and_then(|p| layout::hit_test(&nodes, point(p)))
        };

        for node in &nodes {
            let Some(activity) = dest.activity(&node.id) else {
                continue;
            };

            let art = NodeArt {
                icon: activity.thumbnail_or(&dest),
                overlays: Vec::new(),
                label: self.show_labels.then(|| activity.label()),
            };
            let emphasis = if hovered.is_some_and(|h| h.id == node.id) {
                Emphasis::Hovered
            } else {
                Emphasis::Normal
            };
            paint_node(&painter, assets, node, &art, emphasis);
        }

        let target = hovered.and_then(|node| {
            dest.activity(&node.id).map(|activity| HoverTarget {
                destination: &dest,
                activity,
                node_rect: node.hit_rect,
            })
        });
        state.tooltip.track(target, pointer.map(point), container);
        show_tooltip(ui.ctx(), &mut state.tooltip, container, assets);
    }
}

fn list_row(ui: &mut egui::Ui, assets: &AssetTextures, dest: &Destination, active: bool) -> egui::Response {
    let (row, response) = ui.allocate_exact_size(egui::vec2(ui.available_width(), ROW_HEIGHT), egui::Sense::click());
    let painter = ui.painter_at(row);

    let fill = if active {
        ACCENT.gamma_multiply(0.18)
    } else if response.hovered() {
        egui::Color32::from_rgba_unmultiplied(255, 255, 255, 10)
    } else {
        egui::Color32::TRANSPARENT
    };
    painter.rect_filled(row, 4.0, fill);
    if active {
        painter.rect_stroke(row, 4.0, egui::Stroke::new(1.0, ACCENT), egui::StrokeKind::Inside);
    }

    let icon_rect = egui::Rect::from_min_size(
        row.left_top() + egui::vec2(8.0, (ROW_HEIGHT - ROW_ICON_SIZE) / 2.0),
        egui::vec2(ROW_ICON_SIZE, ROW_ICON_SIZE),
    );
    if let Some(texture) = assets.texture(ui.ctx(), dest.icon_or_placeholder()) {
        painter.image(
            texture.id(),
            icon_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }

    let text_left = icon_rect.right() + 10.0;
    painter.text(
        egui::pos2(text_left, row.top() + 16.0),
        egui::Align2::LEFT_CENTER,
        dest.display_name(),
        egui::FontId::proportional(13.0),
        if active { ACCENT } else { egui::Color32::WHITE },
    );
    painter.text(
        egui::pos2(text_left, row.top() + 33.0),
        egui::Align2::LEFT_CENTER,
        dest.list_summary(),
        egui::FontId::proportional(11.0),
        MUTED_TEXT,
    );

    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}

fn destination_list(ui: &mut egui::Ui, state: &mut ViewerState, assets: &AssetTextures) {
    if state.destinations().is_empty() {
        ui.label(egui::RichText::new("No destinations yet.").size(12.0).color(MUTED_TEXT));
        return;
    }

    let active = state.location_selection().map(|d| d.id.clone());
    let mut clicked = None;

    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        for dest in state.destinations() {
            let is_active = active.as_deref() == Some(dest.id.as_str());
            if list_row(ui, assets, dest, is_active).clicked() {
                clicked = Some(dest.id.clone());
            }
        }
    });

    if let Some(id) = clicked {
        state.select_location_destination(&id);
    }
}

impl View for LocationsView {
    fn tab(&self) -> Tab {
        Tab::Locations
    }

    fn render(&mut self, ui: &mut egui::Ui, state: &mut ViewerState, assets: &AssetTextures) {
        egui::SidePanel::left("locations_list")
            .resizable(true)
            .default_width(self.list_width)
            .width_range(200.0..=480.0)
            .show_inside(ui, |ui| {
                ui.add_space(6.0);
                ui.label(egui::RichText::new("◈ LOCATIONS").color(ACCENT).size(12.0).strong());
                ui.add_space(4.0);
                destination_list(ui, state, assets);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(MAP_BACKGROUND).inner_margin(8.0))
            .show_inside(ui, |ui| self.detail(ui, state, assets));
    }
}
