//! # Alignment Engine
//!
//! Nudges a moving rectangle onto the canvas boundaries or onto other
//! widgets' edges when it comes within a threshold, independently per axis.
//!
//! ## Candidates
//!
//! | Axis | Canvas | Other widgets |
//! |------|--------|---------------|
//! | X | `0`, `100 - w` | `o.x`, `o.x + o.w` |
//! | Y | `0`, `100 - h` | `o.y`, `o.y + o.h` |
//!
//! The nearest candidate wins if it lies within the threshold; the matching
//! guide line is then reported for rendering. Ties keep the earliest candidate
//! (canvas boundaries first, then widgets in placement order).

use serde::{Deserialize, Serialize};

use super::geometry::{CANVAS_EXTENT, Rect};

/// Active alignment guide lines, in percentage units.
///
/// Ephemeral: recomputed on every pointer event and never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guides {
    pub guide_x: Option<f64>,
    pub guide_y: Option<f64>,
}

impl Guides {
    pub fn is_empty(&self) -> bool {
        self.guide_x.is_none() && self.guide_y.is_none()
    }
}

/// Result of aligning a proposed position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    pub x: f64,
    pub y: f64,
    pub guides: Guides,
}

/// Nearest candidate to `value`, with its distance.
fn nearest(value: f64, candidates: &[f64]) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64)> = None;
    for &c in candidates {
        let d = (c - value).abs();
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((c, d));
        }
    }
    best
}

/// Snap `value` to the nearest candidate within `threshold`.
fn snap_to(value: f64, candidates: &[f64], threshold: f64) -> Option<f64> {
    nearest(value, candidates)
        .filter(|&(_, d)| d <= threshold)
        .map(|(c, _)| c)
}

/// Align the top-left corner of `proposed` against the canvas and `others`.
///
/// `others` must not contain the rectangle being moved.
pub fn align_position<'a>(
    proposed: Rect,
    others: impl IntoIterator<Item = &'a Rect>,
    threshold: f64,
) -> Alignment {
    let mut xs = vec![0.0, CANVAS_EXTENT - proposed.w];
    let mut ys = vec![0.0, CANVAS_EXTENT - proposed.h];
    for o in others {
        xs.extend([o.x, o.right()]);
        ys.extend([o.y, o.bottom()]);
    }

    let snapped_x = snap_to(proposed.x, &xs, threshold);
    let snapped_y = snap_to(proposed.y, &ys, threshold);

    Alignment {
        x: snapped_x.unwrap_or(proposed.x),
        y: snapped_y.unwrap_or(proposed.y),
        guides: Guides {
            guide_x: snapped_x,
            guide_y: snapped_y,
        },
    }
}

/// Axis selector for [`align_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Align a single moving edge (used while resizing).
///
/// Candidates are the two canvas boundaries and both edges of every other
/// rectangle on `axis`. Returns the aligned edge, if any is within range.
pub fn align_edge<'a>(
    edge: f64,
    axis: Axis,
    others: impl IntoIterator<Item = &'a Rect>,
    threshold: f64,
) -> Option<f64> {
    let mut candidates = vec![0.0, CANVAS_EXTENT];
    for o in others {
        match axis {
            Axis::X => candidates.extend([o.x, o.right()]),
            Axis::Y => candidates.extend([o.y, o.bottom()]),
        }
    }
    snap_to(edge, &candidates, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: [Rect; 0] = [];

    fn pair() -> Vec<Rect> {
        vec![
            Rect::new(0.0, 0.0, 20.0, 10.0),
            Rect::new(50.0, 40.0, 20.0, 10.0),
        ]
    }

    #[test]
    fn test_snaps_within_threshold() {
        let others = pair();
        let a = align_position(Rect::new(49.5, 70.0, 10.0, 10.0), &others, 1.0);
        assert_eq!(a.x, 50.0);
        assert_eq!(a.guides.guide_x, Some(50.0));
    }

    #[test]
    fn test_no_snap_beyond_threshold() {
        let others = pair();
        let a = align_position(Rect::new(47.0, 70.0, 10.0, 10.0), &others, 1.0);
        assert_eq!(a.x, 47.0);
        assert_eq!(a.guides.guide_x, None);
    }

    #[test]
    fn test_axes_are_independent() {
        let others = pair();
        // x near 20 (right edge of first), y far from everything
        let a = align_position(Rect::new(20.8, 63.0, 10.0, 10.0), &others, 1.0);
        assert_eq!(a.x, 20.0);
        assert_eq!(a.y, 63.0);
        assert_eq!(
            a.guides,
            Guides {
                guide_x: Some(20.0),
                guide_y: None
            }
        );
    }

    #[test]
    fn test_canvas_far_boundary() {
        let a = align_position(Rect::new(74.5, 10.0, 25.0, 25.0), &NONE, 1.0);
        assert_eq!(a.x, 75.0);
        assert_eq!(a.y, 10.0);
    }

    #[test]
    fn test_exact_threshold_snaps() {
        let a = align_position(Rect::new(1.0, 5.0, 10.0, 10.0), &NONE, 1.0);
        assert_eq!(a.x, 0.0);
        assert_eq!(a.guides.guide_x, Some(0.0));
    }

    #[test]
    fn test_align_edge() {
        let others = [Rect::new(35.0, 10.0, 10.0, 10.0)];
        assert_eq!(align_edge(34.0, Axis::X, &others, 1.0), Some(35.0));
        assert_eq!(align_edge(40.0, Axis::X, &others, 1.0), None);
        assert_eq!(align_edge(99.2, Axis::Y, &others, 1.0), Some(100.0));
    }

    #[test]
    fn test_guides_empty() {
        assert!(Guides::default().is_empty());
    }
}
