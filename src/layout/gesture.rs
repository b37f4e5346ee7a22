//! # Gesture State Machine
//!
//! A drag or resize is a run of pointer events between a press and a release.
//! The tracker makes that run explicit:
//!
//! ```text
//!            begin_drag                 end / cancel / expire
//!   Idle ─────────────────► Dragging ─────────────────────────► Idle
//!     │      begin_resize                end / cancel / expire
//!     └───────────────────► Resizing ─────────────────────────► Idle
//! ```
//!
//! Every gesture ends back in `Idle`, even if the release event never arrives:
//! [`GestureTracker::expire_stale`] terminates a gesture whose last event is
//! older than the timeout, and starting a new gesture ends the previous one.

use std::time::{Duration, Instant};

use super::canvas::{Canvas, Corner, Placement};
use super::geometry::Rect;
use crate::error::LabelError;

/// Current gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging {
        id: String,
        last_event: Instant,
    },
    Resizing {
        id: String,
        corner: Corner,
        /// Rectangle at the start of the gesture; deltas are relative to it.
        origin: Rect,
        last_event: Instant,
    },
}

/// Which kind of gesture finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
}

/// A gesture that returned to `Idle`. Its widget's geometry is final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureEnd {
    pub id: String,
    pub kind: GestureKind,
}

/// Drives a [`Canvas`] from pointer events.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    state: Gesture,
    timeout: Duration,
}

impl GestureTracker {
    /// How long a gesture may go without events before it is dropped.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            state: Gesture::Idle,
            timeout,
        }
    }

    pub fn state(&self) -> &Gesture {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == Gesture::Idle
    }

    /// Start dragging `id`. Its current rectangle becomes the revert target.
    pub fn begin_drag(
        &mut self,
        canvas: &mut Canvas,
        id: &str,
        now: Instant,
    ) -> Result<Option<GestureEnd>, LabelError> {
        canvas.remember_safe(id)?;
        let previous = self.end(canvas);
        self.state = Gesture::Dragging {
            id: id.to_string(),
            last_event: now,
        };
        Ok(previous)
    }

    /// Pointer moved during a drag; `(x, y)` is the proposed top-left corner.
    ///
    /// Returns `None` when no drag is in progress.
    pub fn drag_to(
        &mut self,
        canvas: &mut Canvas,
        x: f64,
        y: f64,
        now: Instant,
    ) -> Result<Option<Placement>, LabelError> {
        let Gesture::Dragging { id, last_event } = &mut self.state else {
            return Ok(None);
        };
        *last_event = now;
        canvas.move_widget(id, x, y).map(Some)
    }

    /// Start resizing `id` by `corner`.
    pub fn begin_resize(
        &mut self,
        canvas: &mut Canvas,
        id: &str,
        corner: Corner,
        now: Instant,
    ) -> Result<Option<GestureEnd>, LabelError> {
        let origin = canvas.remember_safe(id)?;
        let previous = self.end(canvas);
        self.state = Gesture::Resizing {
            id: id.to_string(),
            corner,
            origin,
            last_event: now,
        };
        Ok(previous)
    }

    /// Pointer moved during a resize; `(dx, dy)` is the offset from the
    /// pointer-down position, in percentage units.
    ///
    /// Returns `None` when no resize is in progress.
    pub fn resize_to(
        &mut self,
        canvas: &mut Canvas,
        dx: f64,
        dy: f64,
        now: Instant,
    ) -> Result<Option<Placement>, LabelError> {
        let Gesture::Resizing {
            id,
            corner,
            origin,
            last_event,
        } = &mut self.state
        else {
            return Ok(None);
        };
        *last_event = now;
        let proposed = corner.drag(*origin, dx, dy);
        canvas.resize_widget(id, *corner, proposed).map(Some)
    }

    /// Pointer released (or the gesture was cancelled). Clears the guides.
    ///
    /// Returns what ended, or `None` if already idle.
    pub fn end(&mut self, canvas: &mut Canvas) -> Option<GestureEnd> {
        let ended = match std::mem::replace(&mut self.state, Gesture::Idle) {
            Gesture::Idle => return None,
            Gesture::Dragging { id, .. } => GestureEnd {
                id,
                kind: GestureKind::Drag,
            },
            Gesture::Resizing { id, .. } => GestureEnd {
                id,
                kind: GestureKind::Resize,
            },
        };
        canvas.clear_guides();
        Some(ended)
    }

    /// End a gesture that has seen no events for longer than the timeout.
    pub fn expire_stale(&mut self, canvas: &mut Canvas, now: Instant) -> Option<GestureEnd> {
        let last = match &self.state {
            Gesture::Idle => return None,
            Gesture::Dragging { last_event, .. } | Gesture::Resizing { last_event, .. } => {
                *last_event
            }
        };
        if now.saturating_duration_since(last) > self.timeout {
            self.end(canvas)
        } else {
            None
        }
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::canvas::{LayoutSettings, new_template_id};
    use crate::layout::widget::Widget;

    fn canvas_with_two() -> (Canvas, String, String) {
        let widgets = vec![
            Widget { id: "Box-1".into(), name: "Box".into(), rect: Rect::new(10.0, 10.0, 20.0, 20.0) },
            Widget { id: "Box-2".into(), name: "Box".into(), rect: Rect::new(35.0, 10.0, 10.0, 10.0) },
        ];
        let canvas = Canvas::restore(new_template_id(), LayoutSettings::default(), widgets);
        (canvas, "Box-1".into(), "Box-2".into())
    }

    #[test]
    fn test_drag_lifecycle() {
        let (mut canvas, a, _) = canvas_with_two();
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();

        tracker.begin_drag(&mut canvas, &a, t0).unwrap();
        assert!(matches!(tracker.state(), Gesture::Dragging { .. }));

        let placed = tracker.drag_to(&mut canvas, 10.0, 50.0, t0).unwrap().unwrap();
        assert!(placed.is_accepted());

        let ended = tracker.end(&mut canvas).unwrap();
        assert_eq!(ended.kind, GestureKind::Drag);
        assert_eq!(ended.id, a);
        assert!(tracker.is_idle());
        assert!(canvas.guides().is_empty());
    }

    #[test]
    fn test_drag_onto_neighbor_sticks() {
        let (mut canvas, a, _) = canvas_with_two();
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();

        tracker.begin_drag(&mut canvas, &a, t0).unwrap();
        let placed = tracker.drag_to(&mut canvas, 30.0, 10.0, t0).unwrap().unwrap();
        assert_eq!(placed, Placement::Reverted(Rect::new(10.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn test_resize_deltas_are_from_origin() {
        let (mut canvas, a, _) = canvas_with_two();
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();

        tracker.begin_resize(&mut canvas, &a, Corner::Se, t0).unwrap();
        let first = tracker.resize_to(&mut canvas, 5.0, 5.0, t0).unwrap().unwrap();
        assert_eq!(first, Placement::Accepted(Rect::new(10.0, 10.0, 25.0, 25.0)));

        let second = tracker.resize_to(&mut canvas, 10.0, 5.0, t0).unwrap().unwrap();
        assert_eq!(second, Placement::Rejected(Rect::new(10.0, 10.0, 25.0, 25.0)));

        let ended = tracker.end(&mut canvas).unwrap();
        assert_eq!(ended.kind, GestureKind::Resize);
    }

    #[test]
    fn test_events_without_gesture_are_ignored() {
        let (mut canvas, _, _) = canvas_with_two();
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();
        assert_eq!(tracker.drag_to(&mut canvas, 1.0, 1.0, t0).unwrap(), None);
        assert_eq!(tracker.resize_to(&mut canvas, 1.0, 1.0, t0).unwrap(), None);
        assert_eq!(tracker.end(&mut canvas), None);
    }

    #[test]
    fn test_stale_gesture_expires() {
        let (mut canvas, a, _) = canvas_with_two();
        let mut tracker = GestureTracker::with_timeout(Duration::from_millis(500));
        let t0 = Instant::now();

        tracker.begin_drag(&mut canvas, &a, t0).unwrap();
        assert_eq!(tracker.expire_stale(&mut canvas, t0 + Duration::from_millis(400)), None);

        let ended = tracker.expire_stale(&mut canvas, t0 + Duration::from_secs(1));
        assert_eq!(ended.map(|e| e.kind), Some(GestureKind::Drag));
        assert!(tracker.is_idle());
    }

    #[test]
    fn test_new_gesture_ends_previous() {
        let (mut canvas, a, b) = canvas_with_two();
        let mut tracker = GestureTracker::new();
        let t0 = Instant::now();

        tracker.begin_drag(&mut canvas, &a, t0).unwrap();
        let previous = tracker
            .begin_resize(&mut canvas, &b, Corner::Nw, t0)
            .unwrap()
            .unwrap();
        assert_eq!(previous.id, a);
        assert!(matches!(tracker.state(), Gesture::Resizing { .. }));
    }

    #[test]
    fn test_begin_unknown_widget() {
        let (mut canvas, _, _) = canvas_with_two();
        let mut tracker = GestureTracker::new();
        assert!(tracker.begin_drag(&mut canvas, "ghost", Instant::now()).is_err());
        assert!(tracker.is_idle());
    }
}
