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

//! Node placement on map layers.
//!
//! Records carry percentage positions; a node is centered on the matching
//! pixel of its layer. Layers are passed in already translated by their pan
//! offset, so the rectangles returned here are final screen coordinates used
//! for both painting and hit testing.

use crate::geometry::{Point, Rect, Size};
use crate::model::{Destination, Position};

/// Orbit radius of a destination node on the overview map.
pub const DESTINATION_ORBIT_RADIUS: f32 = 34.0;

/// Orbit radius of an activity node on the detail map.
pub const ACTIVITY_ORBIT_RADIUS: f32 = 18.0;

const LABEL_GAP: f32 = 6.0;
const LABEL_HEIGHT: f32 = 18.0;
const DESTINATION_LABEL_WIDTH: f32 = 128.0;
const ACTIVITY_LABEL_WIDTH: f32 = 104.0;

/// Screen geometry of one node: the circular orbit plus its label below.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    /// Destination id on the overview map, activity id on the detail map.
    pub id: String,
    pub center: Point,
    pub orbit_radius: f32,
    pub orbit_rect: Rect,
    pub label_rect: Rect,
    /// Area that reacts to clicks and hover.
    pub hit_rect: Rect,
}

impl NodeLayout {
    fn new(id: &str, center: Point, orbit_radius: f32, label_width: f32) -> Self {
        let diameter = orbit_radius * 2.0;
        let orbit_rect = Rect::from_center_size(center, Size::new(diameter, diameter));
        let label_rect = Rect::new(
            Point::new(center.x - label_width / 2.0, orbit_rect.bottom() + LABEL_GAP),
            Size::new(label_width, LABEL_HEIGHT),
        );
        Self {
            id: id.to_string(),
            center,
            orbit_radius,
            orbit_rect,
            label_rect,
            hit_rect: orbit_rect.union(&label_rect),
        }
    }
}

/// Pixel position of a percentage position inside `layer`.
#[must_use]
pub fn place(position: Position, layer: Rect) -> Point {
    Point::new(
        layer.left() + layer.size.width * f32::from(position.x) / 100.0,
        layer.top() + layer.size.height * f32::from(position.y) / 100.0,
    )
}

/// One node per destination, in archive order.
#[must_use]
pub fn overview_nodes(destinations: &[Destination], layer: Rect) -> Vec<NodeLayout> {
    destinations
        .iter()
        .map(|dest| {
            NodeLayout::new(
                &dest.id,
                place(dest.position, layer),
                DESTINATION_ORBIT_RADIUS,
                DESTINATION_LABEL_WIDTH,
            )
        })
        .collect()
}

/// One node per activity of `destination`, in archive order.
#[must_use]
pub fn activity_nodes(destination: &Destination, layer: Rect) -> Vec<NodeLayout> {
    destination
        .activities
        .iter()
        .map(|act| {
            NodeLayout::new(
                &act.id,
                place(act.position, layer),
                ACTIVITY_ORBIT_RADIUS,
                ACTIVITY_LABEL_WIDTH,
            )
        })
        .collect()
}

/// Top-most node under `point`. Later nodes paint over earlier ones.
#[must_use]
pub fn hit_test(nodes: &[NodeLayout], point: Point) -> Option<&NodeLayout> {
    nodes.iter().rev().find(|node| node.hit_rect.contains(point))
}

/// Largest rectangle with `content`'s aspect ratio that fits in `container`,
/// centered. Degenerate content sizes fill the container.
#[must_use]
pub fn fit_within(container: Rect, content: Size) -> Rect {
    if content.width <= 0.0 || content.height <= 0.0 {
        return container;
    }
    let scale = (container.size.width / content.width).min(container.size.height / content.height);
    let size = Size::new(content.width * scale, content.height * scale);
    Rect::from_center_size(container.center(), size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{activity, destination};

    fn layer() -> Rect {
        Rect::new(Point::new(100.0, 50.0), Size::new(400.0, 200.0))
    }

    #[test]
    fn test_place_uses_percentages_of_layer() {
        assert_eq!(place(Position { x: 0, y: 0 }, layer()), Point::new(100.0, 50.0));
        assert_eq!(place(Position { x: 50, y: 50 }, layer()), Point::new(300.0, 150.0));
        assert_eq!(place(Position { x: 100, y: 100 }, layer()), Point::new(500.0, 250.0));
    }

    #[test]
    fn test_pan_offset_moves_nodes() {
        let dests = vec![destination("nessus", Vec::new())];
        let still = overview_nodes(&dests, layer());
        let panned = overview_nodes(&dests, layer().translate(Point::new(-40.0, 25.0)));
        assert_eq!(panned[0].center, still[0].center + Point::new(-40.0, 25.0));
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut dest = destination("moon", vec![activity("a", "A"), activity("b", "B")]);
        dest.activities[1].position = Position { x: 51, y: 50 };
        let nodes = activity_nodes(&dest, layer());

        let hit = hit_test(&nodes, nodes[0].center).unwrap();
        assert_eq!(hit.id, "b");
        assert!(hit_test(&nodes, Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_label_is_part_of_hit_area() {
        let dests = vec![destination("nessus", Vec::new())];
        let node = &overview_nodes(&dests, layer())[0];
        let label_point = node.label_rect.center();
        assert!(!node.orbit_rect.contains(label_point));
        assert!(hit_test(std::slice::from_ref(node), label_point).is_some());
    }

    #[test]
    fn test_fit_within_keeps_aspect() {
        let container = Rect::new(Point::ZERO, Size::new(800.0, 400.0));
        let fitted = fit_within(container, Size::new(1000.0, 1000.0));
        assert_eq!(fitted.size, Size::new(400.0, 400.0));
        assert_eq!(fitted.center(), container.center());
        assert_eq!(fit_within(container, Size::new(0.0, 10.0)), container);
    }
}
