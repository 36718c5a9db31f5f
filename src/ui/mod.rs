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

//! UI components for PVE Atlas.
//!
//! Each tab is a [`View`]. Views rebuild their whole page from
//! [`ViewerState`] every frame and write selections and pan offsets back to
//! it; nothing about the archive is cached in the widgets themselves.

mod destinations_view;
mod locations_view;
mod orbit;
mod tooltip_overlay;

pub use destinations_view::DestinationsView;
pub use locations_view::LocationsView;

use atlas_core::{PanController, Point, PointerButton, Rect, Size, Tab, ViewerState};

use crate::assets::AssetTextures;

/// Window background behind both maps
pub(crate) const MAP_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(8, 11, 20);

/// Muted text used for meta lines and empty states
pub(crate) const MUTED_TEXT: egui::Color32 = egui::Color32::from_rgb(157, 168, 197);

/// Accent for selected and hovered elements
pub(crate) const ACCENT: egui::Color32 = egui::Color32::from_rgb(120, 190, 255);

/// A page behind one of the tabs
pub trait View {
    /// Tab this view renders
    fn tab(&self) -> Tab;

    /// Draw the page into `ui`
    fn render(&mut self, ui: &mut egui::Ui, state: &mut ViewerState, assets: &AssetTextures);
}

pub(crate) fn to_pos(p: Point) -> egui::Pos2 {
    egui::pos2(p.x, p.y)
}

pub(crate) fn to_rect(r: Rect) -> egui::Rect {
    egui::Rect::from_min_size(to_pos(r.min), egui::vec2(r.size.width, r.size.height))
}

pub(crate) fn point(p: egui::Pos2) -> Point {
    Point::new(p.x, p.y)
}

pub(crate) fn rect(r: egui::Rect) -> Rect {
    Rect::new(point(r.min), Size::new(r.width(), r.height()))
}

fn pointer_button(button: egui::PointerButton) -> PointerButton {
    match button {
        egui::PointerButton::Primary => PointerButton::Primary,
        egui::PointerButton::Secondary => PointerButton::Secondary,
        egui::PointerButton::Middle => PointerButton::Middle,
        _ => PointerButton::Other,
    }
}

/// Feed this frame's pointer events for `area` into `pan` and update
/// `offset` while a drag is in progress.
///
/// Presses are taken from the raw event stream so the button and the exact
/// press position are known. `on_node` decides whether a press landed on an
/// interactive node, in which case no drag starts. Returns `true` while
/// dragging.
pub(crate) fn drive_pan(
    ui: &egui::Ui,
    area: egui::Rect,
    pan: &mut PanController,
    offset: &mut Point,
    on_node: impl Fn(Point) -> bool,
) -> bool {
    let presses: Vec<(egui::Pos2, egui::PointerButton, bool)> = ui.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => Some((*pos, *button, *pressed)),
                _ => None,
            })
            .collect()
    });

    for (pos, button, pressed) in presses {
        if !pressed {
            pan.release();
            continue;
        }

        // Ignore presses on other panels or on windows above the map.
        if !area.contains(pos) || ui.ctx().layer_id_at(pos) != Some(ui.layer_id()) {
            continue;
        }

        let pointer = point(pos);
        pan.press(pointer_button(button), pointer, on_node(pointer), *offset);
    }

    // A release outside the window never reaches us as an event.
    if pan.is_dragging() && !ui.input(|i| i.pointer.primary_down()) {
        pan.release();
    }

    if let Some(pos) = ui.input(|i| i.pointer.latest_pos()) {
        if let Some(new_offset) = pan.drag_to(point(pos)) {
            *offset = new_offset;
        }
    }

    if pan.is_dragging() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
    } else if let Some(pos) = ui.input(|i| i.pointer.hover_pos()).filter(|p| area.contains(*p)) {
        if on_node(point(pos)) {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        } else if ui.rect_contains_pointer(area) {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
        }
    }

    pan.is_dragging()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_conversion_round_trip() {
        let r = Rect::new(Point::new(10.0, 20.0), Size::new(300.0, 150.0));
        let e = to_rect(r);
        assert_eq!(e.min, egui::pos2(10.0, 20.0));
        assert_eq!(e.max, egui::pos2(310.0, 170.0));
        assert_eq!(rect(e), r);
    }

    #[test]
    fn test_pointer_button_mapping() {
        assert_eq!(pointer_button(egui::PointerButton::Primary), PointerButton::Primary);
        assert_eq!(pointer_button(egui::PointerButton::Secondary), PointerButton::Secondary);
        assert_eq!(pointer_button(egui::PointerButton::Extra1), PointerButton::Other);
    }
}
