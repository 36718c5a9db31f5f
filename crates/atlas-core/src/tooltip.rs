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

//! Activity hover tooltips.
//!
//! At most one tooltip is live at a time. Hovering a node builds a tooltip
//! anchored near the node's center; its size is only known once the GUI has
//! laid it out, so the first clamp happens on the following paint through
//! [`TooltipEngine::settle`]. Later pointer moves reposition and clamp
//! immediately because the size is already known.
//!
//! All positions stored here are relative to the map container's top-left
//! corner.

use log::trace;

use crate::geometry::{Point, Rect, Size};
use crate::model::{Activity, Destination};

/// Minimum gap kept between the tooltip and every container edge.
pub const TOOLTIP_PADDING: f32 = 8.0;

/// Offset from the node center when the tooltip first appears.
pub const ENTER_OFFSET: Point = Point::new(12.0, -20.0);

/// Offset from the pointer while it moves over the node.
pub const FOLLOW_OFFSET: Point = Point::new(16.0, 8.0);

/// Everything the tooltip displays, resolved with the usual fallbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub thumbnail: String,
    pub title: String,
    pub mode_line: String,
    pub description: Option<String>,
    /// Empty means the tag row is omitted entirely.
    pub tags: Vec<String>,
}

impl TooltipContent {
    #[must_use]
    pub fn for_activity(destination: &Destination, activity: &Activity) -> Self {
        Self {
            thumbnail: activity.thumbnail_or(destination).to_string(),
            title: activity.title().to_string(),
            mode_line: activity.mode_line(),
            description: activity.description_text().map(str::to_string),
            tags: activity.tags.clone(),
        }
    }
}

/// The single live tooltip.
#[derive(Debug, Clone)]
pub struct ActiveTooltip {
    pub destination_id: String,
    pub activity_id: String,
    pub content: TooltipContent,
    position: Point,
    size: Option<Size>,
    /// Container size the position was last clamped against.
    clamped_in: Option<Size>,
    pending_clamp: bool,
}

impl ActiveTooltip {
    /// Top-left corner relative to the container.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Measured size, once the tooltip has been painted.
    #[must_use]
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    #[must_use]
    pub fn is_pending_clamp(&self) -> bool {
        self.pending_clamp
    }
}

/// A node currently under the pointer.
#[derive(Debug, Clone, Copy)]
pub struct HoverTarget<'a> {
    pub destination: &'a Destination,
    pub activity: &'a Activity,
    /// Node bounds in screen coordinates.
    pub node_rect: Rect,
}

/// Owns the tooltip lifecycle for one map container.
#[derive(Debug, Default)]
pub struct TooltipEngine {
    current: Option<ActiveTooltip>,
    last_pointer: Option<Point>,
}

impl TooltipEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any live tooltip with one for `target`.
    pub fn show(&mut self, target: &HoverTarget<'_>, container: Rect) {
        self.hide();

        let center = target.node_rect.center();
        let position = Point::new(
            center.x - container.left() + ENTER_OFFSET.x,
            center.y - container.top() + ENTER_OFFSET.y,
        );

        trace!(
            "Showing tooltip for {}/{}",
            target.destination.id,
            target.activity.id
        );

        self.current = Some(ActiveTooltip {
            destination_id: target.destination.id.clone(),
            activity_id: target.activity.id.clone(),
            content: TooltipContent::for_activity(target.destination, target.activity),
            position,
            size: None,
            clamped_in: None,
            pending_clamp: true,
        });
    }

    /// Follow the pointer (screen coordinates), clamping right away when the
    /// size is known.
    pub fn follow_pointer(&mut self, pointer: Point, container: Rect) {
        let Some(tooltip) = self.current.as_mut() else {
            return;
        };

        tooltip.position = Point::new(
            pointer.x - container.left() + FOLLOW_OFFSET.x,
            pointer.y - container.top() + FOLLOW_OFFSET.y,
        );

        match tooltip.size {
            Some(size) => {
                tooltip.position = clamp_within(tooltip.position, size, container.size, TOOLTIP_PADDING);
                tooltip.clamped_in = Some(container.size);
            }
            None => tooltip.pending_clamp = true,
        }
    }

    /// Record the laid-out size and clamp again if a clamp is pending or the
    /// tooltip or container changed size since the last one.
    pub fn settle(&mut self, measured: Size, container: Rect) {
        let Some(tooltip) = self.current.as_mut() else {
            return;
        };

        let resized = tooltip.size != Some(measured) || tooltip.clamped_in != Some(container.size);
        tooltip.size = Some(measured);
        if tooltip.pending_clamp || resized {
            tooltip.position = clamp_within(tooltip.position, measured, container.size, TOOLTIP_PADDING);
            tooltip.clamped_in = Some(container.size);
            tooltip.pending_clamp = false;
        }
    }

    /// Remove the live tooltip. Returns `true` if one was showing.
    pub fn hide(&mut self) -> bool {
        self.last_pointer = None;
        self.current.take().is_some()
    }

    /// Drive the tooltip from the node currently under the pointer.
    ///
    /// Entering a different node rebuilds the tooltip, moving within the same
    /// node makes it follow the pointer and leaving every node removes it.
    pub fn track(&mut self, hovered: Option<HoverTarget<'_>>, pointer: Option<Point>, container: Rect) {
        let Some(target) = hovered else {
            if self.current.is_some() {
                self.hide();
            }
            return;
        };

        if !self.is_showing(&target.destination.id, &target.activity.id) {
            self.show(&target, container);
            self.last_pointer = pointer;
            return;
        }

        if let Some(pointer) = pointer {
            if self.last_pointer != Some(pointer) {
                self.follow_pointer(pointer, container);
                self.last_pointer = Some(pointer);
            }
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&ActiveTooltip> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_showing(&self, destination_id: &str, activity_id: &str) -> bool {
        self.current
            .as_ref()
            .is_some_and(|t| t.destination_id == destination_id && t.activity_id == activity_id)
    }

    /// Number of live tooltips: zero or one.
    #[must_use]
    pub fn live_count(&self) -> usize {
        usize::from(self.current.is_some())
    }
}

/// Shift a tooltip so it stays inside `container` minus `padding` on every
/// side. Overflow to the right or bottom is resolved first, then the left and
/// top edges win, so content larger than the container pins to the padding.
/// The tooltip size is never changed.
#[must_use]
pub fn clamp_within(position: Point, size: Size, container: Size, padding: f32) -> Point {
    let mut left = position.x;
    let mut top = position.y;

    if left + size.width > container.width - padding {
        left = container.width - padding - size.width;
    }
    if left < padding {
        left = padding;
    }

    if top + size.height > container.height - padding {
        top = container.height - padding - size.height;
    }
    if top < padding {
        top = padding;
    }

    Point::new(left, top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{activity, destination};

    fn container() -> Rect {
        Rect::new(Point::new(200.0, 100.0), Size::new(600.0, 400.0))
    }

    fn node_at(x: f32, y: f32) -> Rect {
        Rect::from_center_size(Point::new(x, y), Size::new(36.0, 36.0))
    }

    #[test]
    fn test_content_fallbacks() {
        let mut act = activity("a", "Exodus Crash");
        act.description = Some(String::new());
        act.tags = vec!["strike".to_string()];
        let dest = destination("nessus", vec![act.clone()]);

        let content = TooltipContent::for_activity(&dest, &act);
        assert_eq!(content.title, "Exodus Crash");
        assert_eq!(content.mode_line, "Mode");
        assert_eq!(content.description, None);
        assert_eq!(content.tags, vec!["strike"]);
    }

    #[test]
    fn test_show_anchors_near_node_center() {
        let dest = destination("nessus", vec![activity("a", "Exodus Crash")]);
        let mut engine = TooltipEngine::new();
        let target = HoverTarget {
            destination: &dest,
            activity: &dest.activities[0],
            node_rect: node_at(400.0, 300.0),
        };

        engine.show(&target, container());
        let tooltip = engine.current().unwrap();
        assert_eq!(tooltip.position(), Point::new(212.0, 180.0));
        assert!(tooltip.is_pending_clamp());
        assert_eq!(tooltip.size(), None);
    }

    #[test]
    fn test_settle_clamps_on_next_paint() {
        let dest = destination("nessus", vec![activity("a", "Exodus Crash")]);
        let mut engine = TooltipEngine::new();
        let target = HoverTarget {
            destination: &dest,
            activity: &dest.activities[0],
            node_rect: node_at(790.0, 105.0),
        };

        engine.show(&target, container());
        engine.settle(Size::new(240.0, 120.0), container());

        let tooltip = engine.current().unwrap();
        assert!(!tooltip.is_pending_clamp());
        assert_eq!(tooltip.position(), Point::new(600.0 - 8.0 - 240.0, 8.0));
    }

    #[test]
    fn test_settle_reclamps_after_resize() {
        let dest = destination("nessus", vec![activity("a", "Exodus Crash")]);
        let mut engine = TooltipEngine::new();
        let target = HoverTarget {
            destination: &dest,
            activity: &dest.activities[0],
            node_rect: node_at(600.0, 300.0),
        };
        engine.show(&target, container());
        engine.settle(Size::new(100.0, 50.0), container());
        assert_eq!(engine.current().unwrap().position(), Point::new(412.0, 180.0));

        // Content grew after an image loaded.
        engine.settle(Size::new(200.0, 50.0), container());
        assert_eq!(engine.current().unwrap().position(), Point::new(392.0, 180.0));

        // Window shrank while hovering.
        let smaller = Rect::new(Point::new(200.0, 100.0), Size::new(450.0, 220.0));
        engine.settle(Size::new(200.0, 50.0), smaller);
        assert_eq!(engine.current().unwrap().position(), Point::new(242.0, 162.0));
    }

    #[test]
    fn test_follow_pointer_clamps_synchronously() {
        let dest = destination("nessus", vec![activity("a", "Exodus Crash")]);
        let mut engine = TooltipEngine::new();
        let target = HoverTarget {
            destination: &dest,
            activity: &dest.activities[0],
            node_rect: node_at(400.0, 300.0),
        };
        engine.show(&target, container());
        engine.settle(Size::new(100.0, 50.0), container());

        engine.follow_pointer(Point::new(300.0, 200.0), container());
        assert_eq!(engine.current().unwrap().position(), Point::new(116.0, 108.0));

        engine.follow_pointer(Point::new(795.0, 495.0), container());
        assert_eq!(engine.current().unwrap().position(), Point::new(492.0, 342.0));
    }

    #[test]
    fn test_switching_nodes_keeps_one_tooltip() {
        let dest = destination("nessus", vec![activity("a", "Exodus Crash"), activity("b", "Orrery")]);
        let mut engine = TooltipEngine::new();
        let a = HoverTarget {
            destination: &dest,
            activity: &dest.activities[0],
            node_rect: node_at(300.0, 200.0),
        };
        let b = HoverTarget {
            destination: &dest,
            activity: &dest.activities[1],
            node_rect: node_at(500.0, 300.0),
        };

        engine.track(Some(a), Some(Point::new(300.0, 200.0)), container());
        assert!(engine.is_showing("nessus", "a"));
        engine.track(Some(b), Some(Point::new(500.0, 300.0)), container());
        assert_eq!(engine.live_count(), 1);
        assert!(engine.is_showing("nessus", "b"));
        assert_eq!(engine.current().unwrap().content.title, "Orrery");

        engine.track(None, Some(Point::new(10.0, 10.0)), container());
        assert_eq!(engine.live_count(), 0);
    }

    #[test]
    fn test_track_follows_pointer_within_same_node() {
        let dest = destination("nessus", vec![activity("a", "Exodus Crash")]);
        let mut engine = TooltipEngine::new();
        let a = HoverTarget {
            destination: &dest,
            activity: &dest.activities[0],
            node_rect: node_at(400.0, 300.0),
        };

        engine.track(Some(a), Some(Point::new(400.0, 300.0)), container());
        let entered = engine.current().unwrap().position();
        engine.track(Some(a), Some(Point::new(400.0, 300.0)), container());
        assert_eq!(engine.current().unwrap().position(), entered);

        engine.track(Some(a), Some(Point::new(405.0, 302.0)), container());
        assert_eq!(engine.current().unwrap().position(), Point::new(221.0, 210.0));
    }

    #[test]
    fn test_clamp_never_exceeds_padded_bounds() {
        let container = Size::new(300.0, 200.0);
        for (x, y) in [(-50.0, -50.0), (0.0, 0.0), (150.0, 100.0), (290.0, 190.0), (1e4, 1e4)] {
            for (w, h) in [(10.0, 10.0), (120.0, 80.0), (284.0, 184.0)] {
                let p = clamp_within(Point::new(x, y), Size::new(w, h), container, TOOLTIP_PADDING);
                assert!(p.x >= TOOLTIP_PADDING && p.y >= TOOLTIP_PADDING);
                assert!(p.x + w <= container.width - TOOLTIP_PADDING);
                assert!(p.y + h <= container.height - TOOLTIP_PADDING);
            }
        }
    }

    #[test]
    fn test_oversized_tooltip_pins_to_padding() {
        let p = clamp_within(
            Point::new(120.0, 40.0),
            Size::new(5000.0, 3000.0),
            Size::new(300.0, 200.0),
            TOOLTIP_PADDING,
        );
        assert_eq!(p, Point::new(TOOLTIP_PADDING, TOOLTIP_PADDING));
    }
}
