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

//! Painting of orbit nodes shared by both maps.

use atlas_core::layout::NodeLayout;

use super::{to_rect, ACCENT};
use crate::assets::AssetTextures;

/// How strongly a node is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Emphasis {
    Normal,
    Hovered,
    Selected,
}

/// What to draw for one node
#[derive(Debug)]
pub(crate) struct NodeArt<'a> {
    pub icon: &'a str,
    pub overlays: Vec<&'a str>,
    pub label: Option<&'a str>,
}

const ORBIT_FILL: egui::Color32 = egui::Color32::from_rgb(18, 24, 40);
const ORBIT_RING: egui::Color32 = egui::Color32::from_rgb(70, 90, 130);
const LABEL_FONT_SIZE: f32 = 11.0;

fn full_uv() -> egui::Rect {
    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0))
}

fn paint_round_image(painter: &egui::Painter, texture: &egui::TextureHandle, rect: egui::Rect) {
    let radius = (rect.width().min(rect.height()) / 2.0).clamp(0.0, f32::from(u8::MAX));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "clamped to u8 range")]
    let corner = egui::CornerRadius::same(radius as u8);
    painter.add(
        egui::epaint::RectShape::filled(rect, corner, egui::Color32::WHITE).with_texture(texture.id(), full_uv()),
    );
}

/// Paint one node: disc, icon, overlays, ring and label
pub(crate) fn paint_node(
    painter: &egui::Painter,
    assets: &AssetTextures,
    node: &NodeLayout,
    art: &NodeArt<'_>,
    emphasis: Emphasis,
) {
    let ctx = painter.ctx();
    let center = super::to_pos(node.center);
    let radius = node.orbit_radius;

    if emphasis == Emphasis::Selected {
        painter.circle_filled(center, radius + 6.0, ACCENT.gamma_multiply(0.25));
    }
    painter.circle_filled(center, radius, ORBIT_FILL);

    let icon_rect = to_rect(node.orbit_rect).shrink(3.0);
    if let Some(texture) = assets.texture(ctx, art.icon) {
        paint_round_image(painter, &texture, icon_rect);
    }

    // Overlays are stacked over the icon in slot order.
    for overlay in &art.overlays {
        if let Some(texture) = assets.loaded(ctx, overlay) {
            paint_round_image(painter, &texture, icon_rect);
        }
    }

    let (ring_width, ring_color) = match emphasis {
        Emphasis::Normal => (1.5, ORBIT_RING),
        Emphasis::Hovered => (2.0, ACCENT.gamma_multiply(0.7)),
        Emphasis::Selected => (2.5, ACCENT),
    };
    painter.circle_stroke(center, radius, egui::Stroke::new(ring_width, ring_color));

    let Some(label) = art.label.filter(|l| !l.is_empty()) else {
        return;
    };

    let label_rect = to_rect(node.label_rect);
    let text_color = if emphasis == Emphasis::Normal {
        egui::Color32::WHITE
    } else {
        ACCENT
    };

    let mut job = egui::text::LayoutJob::simple_singleline(
        label.to_string(),
        egui::FontId::proportional(LABEL_FONT_SIZE),
        text_color,
    );
    job.wrap = egui::text::TextWrapping::truncate_at_width(label_rect.width() - 6.0);
    let galley = painter.layout_job(job);

    // Draw background box
    let box_rect = egui::Rect::from_center_size(label_rect.center(), galley.size() + egui::vec2(6.0, 4.0));
    painter.rect_filled(box_rect, 2.0, egui::Color32::from_rgba_unmultiplied(0, 0, 0, 180));
    painter.galley(box_rect.center() - galley.size() / 2.0, galley, text_color);
}
