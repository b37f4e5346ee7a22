//! # Canvas Model
//!
//! Owns the placed widgets and the template id. The four operations below
//! are the only writers of widget geometry:
//!
//! | Operation | Pipeline |
//! |-----------|----------|
//! | [`Canvas::add_widget`] | snap → clamp → align → resolve (grid search) |
//! | [`Canvas::move_widget`] | snap → clamp → align → check, else revert to last-safe |
//! | [`Canvas::resize_widget`] | anchor opposite corner → clamp → align edge → check, else reject |
//! | [`Canvas::remove_all`] | clear, new template id |
//!
//! After any accepted mutation no two widgets overlap. The one documented
//! exception is a drop onto a canvas with no free grid cell left, where the
//! overlapping placement is kept.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::align::{self, Alignment, Axis, Guides};
use super::collision::{self, Resolution};
use super::geometry::{CANVAS_EXTENT, Rect, clamp, snap};
use super::widget::{self, Widget};
use crate::error::LabelError;

/// Where a widget lands when no position is proposed.
pub const DEFAULT_ORIGIN: (f64, f64) = (35.0, 35.0);

/// Tunables for snapping and resizing, in percentage units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Grid step for positions.
    pub snap_step: f64,
    /// Maximum distance for edge alignment.
    pub edge_threshold: f64,
    /// Smallest width/height a resize may produce.
    pub min_size: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            snap_step: 2.0,
            edge_threshold: 1.0,
            min_size: 5.0,
        }
    }
}

/// Resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corner {
    Se,
    Sw,
    Ne,
    Nw,
}

impl Corner {
    /// True if this handle moves the left edge (otherwise the right one).
    pub fn moves_left(self) -> bool {
        matches!(self, Corner::Sw | Corner::Nw)
    }

    /// True if this handle moves the top edge (otherwise the bottom one).
    pub fn moves_top(self) -> bool {
        matches!(self, Corner::Ne | Corner::Nw)
    }

    /// Rectangle obtained by dragging this handle of `start` by `(dx, dy)`.
    ///
    /// The opposite corner stays where it was. No clamping happens here.
    pub fn drag(self, start: Rect, dx: f64, dy: f64) -> Rect {
        let (mut left, mut right) = (start.x, start.right());
        let (mut top, mut bottom) = (start.y, start.bottom());
        if self.moves_left() {
            left += dx;
        } else {
            right += dx;
        }
        if self.moves_top() {
            top += dy;
        } else {
            bottom += dy;
        }
        Rect::from_edges(left, top, right, bottom)
    }
}

/// Outcome of a move or resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Committed at this rectangle.
    Accepted(Rect),
    /// Move overlapped; widget went back to its last-safe rectangle.
    Reverted(Rect),
    /// Resize overlapped; the previous rectangle stays.
    Rejected(Rect),
}

impl Placement {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Placement::Accepted(_))
    }

    /// Rectangle the widget has after the operation.
    pub fn rect(&self) -> Rect {
        match *self {
            Placement::Accepted(r) | Placement::Reverted(r) | Placement::Rejected(r) => r,
        }
    }
}

/// A label canvas: the set of placed widgets plus the template id.
#[derive(Debug, Clone)]
pub struct Canvas {
    template_id: String,
    settings: LayoutSettings,
    widgets: Vec<Widget>,
    last_safe: HashMap<String, Rect>,
    guides: Guides,
    next_seq: u64,
}

/// Fresh template id (UUID v4).
pub fn new_template_id() -> String {
    Uuid::new_v4().to_string()
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_settings(LayoutSettings::default())
    }

    pub fn with_settings(settings: LayoutSettings) -> Self {
        Self {
            template_id: new_template_id(),
            settings,
            widgets: Vec::new(),
            last_safe: HashMap::new(),
            guides: Guides::default(),
            next_seq: 1,
        }
    }

    /// Rebuild a canvas from already-placed widgets (template import).
    ///
    /// Geometry is taken as-is; every widget's current rectangle becomes its
    /// last-safe placement.
    pub(crate) fn restore(template_id: String, settings: LayoutSettings, widgets: Vec<Widget>) -> Self {
        let last_safe = widgets.iter().map(|w| (w.id.clone(), w.rect)).collect();
        Self {
            template_id,
            settings,
            widgets,
            last_safe,
            guides: Guides::default(),
            next_seq: 1,
        }
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Widgets in placement order.
    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Guide lines from the most recent add/move/resize.
    pub fn guides(&self) -> Guides {
        self.guides
    }

    pub fn clear_guides(&mut self) {
        self.guides = Guides::default();
    }

    /// Last accepted rectangle for `id`.
    pub fn last_safe(&self, id: &str) -> Option<Rect> {
        self.last_safe.get(id).copied()
    }

    /// Record the widget's current rectangle as its revert target.
    pub fn remember_safe(&mut self, id: &str) -> Result<Rect, LabelError> {
        let rect = self.rect_of(id)?;
        self.last_safe.insert(id.to_string(), rect);
        Ok(rect)
    }

    /// True if `candidate` overlaps any widget other than `ignore_id`.
    pub fn any_overlap(&self, candidate: &Rect, ignore_id: Option<&str>) -> bool {
        collision::any_overlap(candidate, self.others(ignore_id))
    }

    /// Align `proposed`'s top-left corner against the canvas and every widget
    /// except `exclude`.
    pub fn align(&self, proposed: Rect, exclude: Option<&str>) -> Alignment {
        align::align_position(proposed, self.others(exclude), self.settings.edge_threshold)
    }

    /// Place a new widget of type `name`.
    ///
    /// Without a proposal the widget gets its type's default size at
    /// [`DEFAULT_ORIGIN`]. If the spot is taken the first free grid cell is
    /// used; if there is none the overlapping spot is kept.
    pub fn add_widget(&mut self, name: &str, proposed: Option<Rect>) -> Widget {
        let (dw, dh) = widget::default_size(name);
        let min = self.settings.min_size;
        let size = match proposed {
            Some(r) => (clamp(r.w, min, CANVAS_EXTENT), clamp(r.h, min, CANVAS_EXTENT)),
            None => (dw, dh),
        };
        let (px, py) = proposed.map(|r| (r.x, r.y)).unwrap_or(DEFAULT_ORIGIN);

        let rect = self.normalize_origin(Rect::new(px, py, size.0, size.1));
        let (rect, guides) = self.align_within(rect, None);
        self.guides = guides;

        let others: Vec<Rect> = self.widgets.iter().map(|w| w.rect).collect();
        let rect = match collision::resolve(rect, &others, self.settings.snap_step) {
            Resolution::Free(r) => r,
            Resolution::Relocated(r) => {
                debug!(name, x = r.x, y = r.y, "relocated new widget to free cell");
                r
            }
            Resolution::Unresolved(r) => {
                debug!(name, "no free cell left, keeping overlapping placement");
                r
            }
        };

        let id = self.next_id(name);
        let widget = Widget {
            id: id.clone(),
            name: name.to_string(),
            rect,
        };
        self.last_safe.insert(id, rect);
        self.widgets.push(widget.clone());
        widget
    }

    /// Move a widget's top-left corner to `(x, y)`.
    ///
    /// An overlapping result is not applied: the widget returns to its
    /// last-safe rectangle instead.
    pub fn move_widget(&mut self, id: &str, x: f64, y: f64) -> Result<Placement, LabelError> {
        let idx = self.index_of(id)?;
        let current = self.widgets[idx].rect;

        let cand = self.normalize_origin(current.with_origin(x, y));
        let (cand, guides) = self.align_within(cand, Some(id));
        self.guides = guides;

        if !self.any_overlap(&cand, Some(id)) {
            self.widgets[idx].rect = cand;
            self.last_safe.insert(id.to_string(), cand);
            return Ok(Placement::Accepted(cand));
        }

        let fallback = self.last_safe.get(id).copied().unwrap_or(current);
        self.widgets[idx].rect = fallback;
        Ok(Placement::Reverted(fallback))
    }

    /// Resize a widget by dragging `corner`; `proposed` is the raw dragged
    /// rectangle (see [`Corner::drag`]).
    ///
    /// Only the edges owned by `corner` are taken from `proposed`; the
    /// opposite edges stay fixed. The moving left/top edge is grid-snapped
    /// like any position. Width and height are kept between the minimum size
    /// and the canvas border. A moving edge within the threshold of another
    /// widget's edge (or the canvas border) aligns to it. Overlapping results
    /// are rejected.
    pub fn resize_widget(
        &mut self,
        id: &str,
        corner: Corner,
        proposed: Rect,
    ) -> Result<Placement, LabelError> {
        let idx = self.index_of(id)?;
        let current = self.widgets[idx].rect;
        let LayoutSettings {
            snap_step,
            edge_threshold,
            min_size,
        } = self.settings;
        let others: Vec<Rect> = self.others(Some(id)).copied().collect();

        let (mut left, mut right) = (current.x, current.right());
        let (mut top, mut bottom) = (current.y, current.bottom());
        let mut guides = Guides::default();

        if corner.moves_left() {
            left = clamp(snap(proposed.x, snap_step), 0.0, right - min_size);
            if let Some(e) = align::align_edge(left, Axis::X, &others, edge_threshold)
                .filter(|&e| e >= 0.0 && right - e >= min_size)
            {
                left = e;
                guides.guide_x = Some(e);
            }
        } else {
            right = clamp(proposed.right(), left + min_size, CANVAS_EXTENT);
            if let Some(e) = align::align_edge(right, Axis::X, &others, edge_threshold)
                .filter(|&e| e <= CANVAS_EXTENT && e - left >= min_size)
            {
                right = e;
                guides.guide_x = Some(e);
            }
        }

        if corner.moves_top() {
            top = clamp(snap(proposed.y, snap_step), 0.0, bottom - min_size);
            if let Some(e) = align::align_edge(top, Axis::Y, &others, edge_threshold)
                .filter(|&e| e >= 0.0 && bottom - e >= min_size)
            {
                top = e;
                guides.guide_y = Some(e);
            }
        } else {
            bottom = clamp(proposed.bottom(), top + min_size, CANVAS_EXTENT);
            if let Some(e) = align::align_edge(bottom, Axis::Y, &others, edge_threshold)
                .filter(|&e| e <= CANVAS_EXTENT && e - top >= min_size)
            {
                bottom = e;
                guides.guide_y = Some(e);
            }
        }
        self.guides = guides;

        let cand = Rect::from_edges(left, top, right, bottom);
        if collision::any_overlap(&cand, &others) {
            return Ok(Placement::Rejected(current));
        }

        self.widgets[idx].rect = cand;
        self.last_safe.insert(id.to_string(), cand);
        Ok(Placement::Accepted(cand))
    }

    /// Remove every widget and start a new template.
    pub fn remove_all(&mut self) {
        self.widgets.clear();
        self.last_safe.clear();
        self.guides = Guides::default();
        self.template_id = new_template_id();
        self.next_seq = 1;
    }

    /// Ids of every overlapping pair, in placement order.
    pub fn overlapping_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (i, a) in self.widgets.iter().enumerate() {
            for b in &self.widgets[i + 1..] {
                if a.rect.overlaps(&b.rect) {
                    pairs.push((a.id.clone(), b.id.clone()));
                }
            }
        }
        pairs
    }

    fn others<'a>(&'a self, exclude: Option<&'a str>) -> impl Iterator<Item = &'a Rect> + 'a {
        self.widgets
            .iter()
            .filter(move |w| exclude != Some(w.id.as_str()))
            .map(|w| &w.rect)
    }

    fn index_of(&self, id: &str) -> Result<usize, LabelError> {
        self.widgets
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| LabelError::UnknownWidget(id.to_string()))
    }

    fn rect_of(&self, id: &str) -> Result<Rect, LabelError> {
        self.index_of(id).map(|i| self.widgets[i].rect)
    }

    /// Grid-snap the origin and keep the box on the canvas.
    fn normalize_origin(&self, r: Rect) -> Rect {
        let step = self.settings.snap_step;
        r.with_origin(
            clamp(snap(r.x, step), 0.0, CANVAS_EXTENT - r.w),
            clamp(snap(r.y, step), 0.0, CANVAS_EXTENT - r.h),
        )
    }

    /// Align, dropping an axis whose aligned value would leave the canvas.
    fn align_within(&self, r: Rect, exclude: Option<&str>) -> (Rect, Guides) {
        let a = self.align(r, exclude);
        let mut guides = a.guides;
        let x = if (0.0..=CANVAS_EXTENT - r.w).contains(&a.x) {
            a.x
        } else {
            guides.guide_x = None;
            r.x
        };
        let y = if (0.0..=CANVAS_EXTENT - r.h).contains(&a.y) {
            a.y
        } else {
            guides.guide_y = None;
            r.y
        };
        (r.with_origin(x, y), guides)
    }

    fn next_id(&mut self, name: &str) -> String {
        loop {
            let id = format!("{}-{}", name, self.next_seq);
            self.next_seq += 1;
            if self.widget(&id).is_none() {
                return id;
            }
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}
