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

//! Drag-to-pan interaction for map layers.
//!
//! A drag starts when the primary button goes down on the layer background,
//! follows every pointer move without debouncing and ends on release anywhere
//! in the window. The controller only computes offsets; the owner stores the
//! offset and applies it as a translation.

use crate::geometry::Point;

/// Pointer buttons the viewer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    pointer_start: Point,
    offset_start: Point,
}

/// Drag state for one map layer.
#[derive(Debug, Default)]
pub struct PanController {
    session: Option<DragSession>,
}

impl PanController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a button press on the layer.
    ///
    /// Only a primary press that does not land on an interactive node starts
    /// a drag. Returns `true` when a drag began.
    pub fn press(&mut self, button: PointerButton, pointer: Point, on_node: bool, offset: Point) -> bool {
        if button != PointerButton::Primary || on_node {
            return false;
        }
        self.session = Some(DragSession {
            pointer_start: pointer,
            offset_start: offset,
        });
        true
    }

    /// Offset for the current pointer position, or `None` when not dragging.
    #[must_use]
    pub fn drag_to(&self, pointer: Point) -> Option<Point> {
        self.session
            .map(|s| s.offset_start + (pointer - s.pointer_start))
    }

    /// End the drag. Returns `true` if one was in progress.
    pub fn release(&mut self) -> bool {
        self.session.take().is_some()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_adds_delta_to_start_offset() {
        let mut pan = PanController::new();
        assert!(pan.press(PointerButton::Primary, Point::new(100.0, 100.0), false, Point::new(10.0, -5.0)));

        assert_eq!(pan.drag_to(Point::new(130.0, 90.0)), Some(Point::new(40.0, -15.0)));
        // Each move is relative to the drag start, not the previous move.
        assert_eq!(pan.drag_to(Point::new(100.0, 100.0)), Some(Point::new(10.0, -5.0)));

        assert!(pan.release());
        assert_eq!(pan.drag_to(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_non_primary_and_node_presses_do_not_drag() {
        let mut pan = PanController::new();
        assert!(!pan.press(PointerButton::Secondary, Point::ZERO, false, Point::ZERO));
        assert!(!pan.press(PointerButton::Middle, Point::ZERO, false, Point::ZERO));
        assert!(!pan.press(PointerButton::Primary, Point::ZERO, true, Point::ZERO));
        assert!(!pan.is_dragging());
        assert!(!pan.release());
    }
}
