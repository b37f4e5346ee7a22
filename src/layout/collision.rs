//! # Collision Resolver
//!
//! Keeps widget rectangles from overlapping.
//!
//! Moves and resizes only *check* a candidate (the caller rejects or reverts).
//! New widgets that land on an occupied spot are relocated by an exhaustive
//! row-major scan of the snap grid:
//!
//! ```text
//! y = 0      → x = 0, step, 2·step, … 100 - w
//! y = step   → x = 0, step, …
//! …
//! y ≤ 100 - h
//! ```
//!
//! The first free cell wins. Every cell is visited at most once, so the scan
//! always terminates after `(⌊(100-w)/step⌋+1) · (⌊(100-h)/step⌋+1)` cells.

use super::geometry::{CANVAS_EXTENT, Rect};

/// True if `candidate` overlaps any of `others`.
pub fn any_overlap<'a>(candidate: &Rect, others: impl IntoIterator<Item = &'a Rect>) -> bool {
    others.into_iter().any(|o| candidate.overlaps(o))
}

/// Iterator over grid positions for a `w × h` box, row-major.
#[derive(Debug, Clone)]
pub struct GridCells {
    step: f64,
    cols: u32,
    rows: u32,
    col: u32,
    row: u32,
}

impl GridCells {
    /// Cells reachable with `step` inside `[0, 100-w] × [0, 100-h]`.
    ///
    /// Yields nothing when the box does not fit on the canvas or the step is
    /// not positive.
    pub fn new(w: f64, h: f64, step: f64) -> Self {
        let span_x = CANVAS_EXTENT - w;
        let span_y = CANVAS_EXTENT - h;
        let (cols, rows) = if step > 0.0 && span_x >= 0.0 && span_y >= 0.0 {
            (
                (span_x / step).floor() as u32 + 1,
                (span_y / step).floor() as u32 + 1,
            )
        } else {
            (0, 0)
        };
        Self {
            step,
            cols,
            rows,
            col: 0,
            row: 0,
        }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for GridCells {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.row >= self.rows || self.cols == 0 {
            return None;
        }
        let cell = (self.col as f64 * self.step, self.row as f64 * self.step);
        self.col += 1;
        if self.col == self.cols {
            self.col = 0;
            self.row += 1;
        }
        Some(cell)
    }
}

/// First overlap-free grid position for a box of `size`, scanning row-major.
///
/// Returns `None` when every reachable cell is occupied.
pub fn find_free_slot(size: &Rect, others: &[Rect], step: f64) -> Option<Rect> {
    GridCells::new(size.w, size.h, step)
        .map(|(x, y)| size.with_origin(x, y))
        .find(|cand| !any_overlap(cand, others))
}

/// Result of placing a new rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// The proposed spot was already free.
    Free(Rect),
    /// Relocated to the first free grid cell.
    Relocated(Rect),
    /// Nothing free; the overlapping proposal is kept as-is.
    Unresolved(Rect),
}

impl Resolution {
    pub fn rect(&self) -> Rect {
        match *self {
            Resolution::Free(r) | Resolution::Relocated(r) | Resolution::Unresolved(r) => r,
        }
    }
}

/// Resolve a new placement: keep it if free, otherwise search the grid.
pub fn resolve(proposed: Rect, others: &[Rect], step: f64) -> Resolution {
    if !any_overlap(&proposed, others) {
        return Resolution::Free(proposed);
    }
    match find_free_slot(&proposed, others, step) {
        Some(r) => Resolution::Relocated(r),
        None => Resolution::Unresolved(proposed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_overlap() {
        let others = [Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(20.0, 0.0, 10.0, 10.0)];
        assert!(any_overlap(&Rect::new(5.0, 5.0, 4.0, 4.0), &others));
        assert!(!any_overlap(&Rect::new(10.0, 0.0, 10.0, 10.0), &others));
    }

    #[test]
    fn test_grid_cell_count() {
        // 100-25 = 75 → 0..=74 step 2 → 38 positions per axis
        let cells = GridCells::new(25.0, 25.0, 2.0);
        assert_eq!(cells.len(), 38 * 38);
        assert_eq!(cells.count(), 38 * 38);
    }

    #[test]
    fn test_grid_row_major() {
        let cells: Vec<_> = GridCells::new(96.0, 98.0, 2.0).collect();
        assert_eq!(
            cells,
            vec![(0.0, 0.0), (2.0, 0.0), (4.0, 0.0), (0.0, 2.0), (2.0, 2.0), (4.0, 2.0)]
        );
    }

    #[test]
    fn test_grid_oversized_box() {
        assert!(GridCells::new(120.0, 10.0, 2.0).is_empty());
        assert_eq!(GridCells::new(120.0, 10.0, 2.0).next(), None);
    }

    #[test]
    fn test_resolve_free() {
        let r = Rect::new(40.0, 40.0, 10.0, 10.0);
        assert_eq!(resolve(r, &[], 2.0), Resolution::Free(r));
    }

    #[test]
    fn test_resolve_relocates_to_origin() {
        let taken = [Rect::new(34.0, 34.0, 25.0, 25.0)];
        let res = resolve(Rect::new(34.0, 34.0, 25.0, 25.0), &taken, 2.0);
        assert_eq!(res, Resolution::Relocated(Rect::new(0.0, 0.0, 25.0, 25.0)));
    }

    #[test]
    fn test_resolve_skips_occupied_row() {
        // Full-width band across the top pushes the box below it
        let taken = [Rect::new(0.0, 0.0, 100.0, 25.0)];
        let res = resolve(Rect::new(10.0, 10.0, 30.0, 12.0), &taken, 2.0);
        assert_eq!(res.rect(), Rect::new(0.0, 26.0, 30.0, 12.0));
    }

    #[test]
    fn test_resolve_full_canvas() {
        let taken = [Rect::new(0.0, 0.0, 100.0, 100.0)];
        let proposed = Rect::new(34.0, 34.0, 25.0, 25.0);
        assert_eq!(resolve(proposed, &taken, 2.0), Resolution::Unresolved(proposed));
    }
}
