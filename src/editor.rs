//! # Editor Session
//!
//! One label being built: the canvas, each widget's data, the template name,
//! the pointer gesture in progress, and where the work is kept.
//!
//! Every completed edit (a drop, a finished drag or resize, a data change, a
//! rename) bumps the revision, marks the session unsaved, and rewrites the
//! local cache slot. Intermediate pointer moves do not touch the cache.
//!
//! Saving runs in the background; watch [`Editor::status`] for the outcome.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::client::TemplateClient;
use crate::error::LabelError;
use crate::layout::geometry::{CANVAS_EXTENT, clamp};
use crate::layout::widget::default_size;
use crate::layout::{
    Canvas, Corner, GestureEnd, GestureTracker, Guides, LayoutSettings, Placement, Rect, Viewport,
    Widget,
};
use crate::template::{
    ComponentData, DEFAULT_TEMPLATE_NAME, LocalCache, TemplatePayload, from_payload, to_payload,
};

/// Where the current revision stands relative to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Edited since the last save.
    Unsaved,
    /// A save of `revision` is in flight.
    Saving { revision: u64 },
    /// `revision` was stored as `count` components.
    Saved { count: usize, revision: u64 },
    /// The last save failed.
    Failed(String),
}

pub struct Editor {
    canvas: Canvas,
    data: HashMap<String, ComponentData>,
    name: String,
    viewport: Viewport,
    cache: Option<LocalCache>,
    gestures: GestureTracker,
    revision: u64,
    status: Arc<watch::Sender<SaveStatus>>,
}

impl Editor {
    /// Empty session without a cache.
    pub fn new(viewport: Viewport) -> Self {
        Self::blank(viewport, None)
    }

    /// Session backed by `cache`, resuming the cached template if there is a
    /// usable one. A cached payload that cannot be imported is discarded.
    pub fn open(cache: LocalCache, viewport: Viewport) -> Self {
        let Some(payload) = cache.load() else {
            return Self::blank(viewport, Some(cache));
        };
        match from_payload(&payload, LayoutSettings::default()) {
            Ok(loaded) => {
                info!(
                    template = %loaded.canvas.template_id(),
                    widgets = loaded.canvas.len(),
                    "resumed cached template"
                );
                Self::from_parts(loaded.canvas, loaded.data, loaded.name, loaded.viewport, Some(cache))
            }
            Err(e) => {
                warn!(error = %e, "discarding unusable cached template");
                Self::blank(viewport, Some(cache))
            }
        }
    }

    fn blank(viewport: Viewport, cache: Option<LocalCache>) -> Self {
        let name = DEFAULT_TEMPLATE_NAME.to_string();
        Self::from_parts(Canvas::new(), HashMap::new(), name, viewport, cache)
    }

    fn from_parts(
        canvas: Canvas,
        data: HashMap<String, ComponentData>,
        name: String,
        viewport: Viewport,
        cache: Option<LocalCache>,
    ) -> Self {
        let (status, _) = watch::channel(SaveStatus::Unsaved);
        Self {
            canvas,
            data,
            name,
            viewport,
            cache,
            gestures: GestureTracker::new(),
            revision: 0,
            status: Arc::new(status),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn guides(&self) -> Guides {
        self.canvas.guides()
    }

    /// Data of widget `id`.
    pub fn data(&self, id: &str) -> Option<&ComponentData> {
        self.data.get(id)
    }

    /// Counter of completed edits.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Subscribe to save status changes.
    pub fn status(&self) -> watch::Receiver<SaveStatus> {
        self.status.subscribe()
    }

    /// Current template as a payload.
    pub fn payload(&self) -> TemplatePayload {
        to_payload(&self.canvas, &self.name, self.viewport, &self.data)
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Add a widget from the palette without a drop point.
    pub fn add_widget(&mut self, name: &str) -> Widget {
        self.place(name, None)
    }

    /// Drop a palette widget with its centre at pixel `(px, py)`.
    pub fn drop_widget(&mut self, name: &str, px: f64, py: f64) -> Widget {
        let (w, h) = default_size(name);
        let x = clamp(self.viewport.x_to_pct(px) - w / 2.0, 0.0, CANVAS_EXTENT - w);
        let y = clamp(self.viewport.y_to_pct(py) - h / 2.0, 0.0, CANVAS_EXTENT - h);
        self.place(name, Some(Rect::new(x, y, w, h)))
    }

    fn place(&mut self, name: &str, proposed: Option<Rect>) -> Widget {
        let widget = self.canvas.add_widget(name, proposed);
        self.data.insert(widget.id.clone(), ComponentData::default_for(name));
        self.touch();
        widget
    }

    /// Replace a widget's data. The data must belong to the widget's type.
    pub fn set_data(&mut self, id: &str, data: ComponentData) -> Result<(), LabelError> {
        let widget = self
            .canvas
            .widget(id)
            .ok_or_else(|| LabelError::UnknownWidget(id.to_string()))?;
        if !data.matches(&widget.name) {
            return Err(LabelError::InvalidData {
                name: widget.name.clone(),
                reason: format!("{:?} data does not belong to this widget", data),
            });
        }
        self.data.insert(id.to_string(), data);
        self.touch();
        Ok(())
    }

    pub fn begin_drag(&mut self, id: &str, now: Instant) -> Result<(), LabelError> {
        let previous = self.gestures.begin_drag(&mut self.canvas, id, now)?;
        self.finished(previous);
        Ok(())
    }

    pub fn drag_to(&mut self, x: f64, y: f64, now: Instant) -> Result<Option<Placement>, LabelError> {
        self.gestures.drag_to(&mut self.canvas, x, y, now)
    }

    pub fn begin_resize(&mut self, id: &str, corner: Corner, now: Instant) -> Result<(), LabelError> {
        let previous = self.gestures.begin_resize(&mut self.canvas, id, corner, now)?;
        self.finished(previous);
        Ok(())
    }

    pub fn resize_to(&mut self, dx: f64, dy: f64, now: Instant) -> Result<Option<Placement>, LabelError> {
        self.gestures.resize_to(&mut self.canvas, dx, dy, now)
    }

    /// Pointer released.
    pub fn end_gesture(&mut self) -> Option<GestureEnd> {
        let ended = self.gestures.end(&mut self.canvas);
        self.finished(ended.clone());
        ended
    }

    /// Drop a gesture whose pointer-up never arrived.
    pub fn expire_stale(&mut self, now: Instant) -> Option<GestureEnd> {
        let ended = self.gestures.expire_stale(&mut self.canvas, now);
        self.finished(ended.clone());
        ended
    }

    fn finished(&mut self, ended: Option<GestureEnd>) {
        if ended.is_some() {
            self.touch();
        }
    }

    /// Remove every widget, start a new template and empty the cache slot.
    pub fn reset(&mut self) -> Result<(), LabelError> {
        self.gestures.end(&mut self.canvas);
        self.canvas.remove_all();
        self.data.clear();
        self.name = DEFAULT_TEMPLATE_NAME.to_string();
        self.mark_dirty();
        if let Some(cache) = &self.cache {
            cache.clear()?;
        }
        Ok(())
    }

    /// Send the current template to the service in the background.
    ///
    /// The outcome is published on [`Editor::status`] unless the template
    /// was edited again in the meantime. Must be called from within a tokio
    /// runtime; otherwise returns [`LabelError::Config`] and leaves the status
    /// untouched.
    pub fn save(&self, client: TemplateClient) -> Result<JoinHandle<()>, LabelError> {
        let runtime = Handle::try_current()
            .map_err(|e| LabelError::Config(format!("saving needs a tokio runtime: {}", e)))?;
        let payload = self.payload();
        let revision = self.revision;
        self.status.send_replace(SaveStatus::Saving { revision });
        let status = Arc::clone(&self.status);

        Ok(runtime.spawn(async move {
            let outcome = match client.save(&payload).await {
                Ok(saved) => {
                    info!(template = %payload.template.id, count = saved.count, "template saved");
                    SaveStatus::Saved {
                        count: saved.count,
                        revision,
                    }
                }
                Err(e) => {
                    warn!(template = %payload.template.id, error = %e, "save failed");
                    SaveStatus::Failed(e.to_string())
                }
            };
            status.send_if_modified(|current| {
                if *current == (SaveStatus::Saving { revision }) {
                    *current = outcome;
                    true
                } else {
                    false
                }
            });
        }))
    }

    fn mark_dirty(&mut self) {
        self.revision += 1;
        self.status.send_replace(SaveStatus::Unsaved);
    }

    /// Record a completed edit and persist it.
    fn touch(&mut self) {
        self.mark_dirty();
        if let Some(cache) = &self.cache
            && let Err(e) = cache.store(&self.payload())
        {
            warn!(path = %cache.slot_path().display(), error = %e, "failed to cache template");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::data::TextData;
    use std::time::Duration;

    #[test]
    fn test_drop_centres_widget() {
        let mut editor = Editor::new(Viewport::BUILDER);
        let qr = editor.drop_widget("QR", 250.0, 400.0);
        // 50% - 12.5 = 37.5, snapped to 38
        assert_eq!(qr.rect, Rect::new(38.0, 38.0, 25.0, 25.0));
        assert_eq!(editor.data(&qr.id), Some(&ComponentData::default_for("QR")));
    }

    #[test]
    fn test_drop_near_border_stays_on_canvas() {
        let mut editor = Editor::new(Viewport::BUILDER);
        let logo = editor.drop_widget("Logo", 495.0, 5.0);
        assert_eq!(logo.rect.right(), 100.0);
        assert_eq!(logo.rect.y, 0.0);
    }

    #[test]
    fn test_edits_persist_and_resume() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());

        let mut editor = Editor::open(cache.clone(), Viewport::BUILDER);
        let text = editor.add_widget("Text");
        editor
            .set_data(&text.id, ComponentData::Text(TextData { text: "Fragile".into() }))
            .unwrap();
        editor.rename("Warehouse");
        let template_id = editor.canvas().template_id().to_string();

        let resumed = Editor::open(cache, Viewport::BUILDER);
        assert_eq!(resumed.canvas().template_id(), template_id);
        assert_eq!(resumed.name(), "Warehouse");
        assert_eq!(resumed.canvas().widgets(), editor.canvas().widgets());
        assert_eq!(
            resumed.data(&text.id),
            Some(&ComponentData::Text(TextData { text: "Fragile".into() }))
        );
    }

    #[test]
    fn test_unusable_cache_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        std::fs::write(cache.slot_path(), "not json").unwrap();
        let editor = Editor::open(cache, Viewport::BUILDER);
        assert!(editor.canvas().is_empty());
        assert_eq!(editor.name(), DEFAULT_TEMPLATE_NAME);
    }

    #[test]
    fn test_drag_persists_only_when_finished() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        let mut editor = Editor::open(cache.clone(), Viewport::BUILDER);
        let qr = editor.add_widget("QR");
        let now = Instant::now();

        editor.begin_drag(&qr.id, now).unwrap();
        let placed = editor.drag_to(0.0, 0.0, now).unwrap().unwrap();
        assert!(placed.is_accepted());
        let cached = cache.load().unwrap();
        assert_eq!(cached.components[0].corners.x_left_top, 34.0);

        let before = editor.revision();
        assert!(editor.end_gesture().is_some());
        assert_eq!(editor.revision(), before + 1);
        assert_eq!(cache.load().unwrap().components[0].corners.x_left_top, 0.0);
        assert!(editor.guides().is_empty());
    }

    #[test]
    fn test_stale_gesture_is_finished() {
        let mut editor = Editor::new(Viewport::BUILDER);
        let qr = editor.add_widget("QR");
        let start = Instant::now();
        editor.begin_resize(&qr.id, Corner::Se, start).unwrap();
        assert!(editor.expire_stale(start + Duration::from_secs(1)).is_none());
        assert!(editor.expire_stale(start + Duration::from_secs(11)).is_some());
    }

    #[test]
    fn test_set_data_checks_type() {
        let mut editor = Editor::new(Viewport::BUILDER);
        let qr = editor.add_widget("QR");
        let err = editor
            .set_data(&qr.id, ComponentData::Text(TextData { text: "x".into() }))
            .unwrap_err();
        assert!(matches!(err, LabelError::InvalidData { .. }));
        assert!(matches!(
            editor.set_data("QR-99", ComponentData::default_for("QR")),
            Err(LabelError::UnknownWidget(_))
        ));
    }

    #[test]
    fn test_reset_clears_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path());
        let mut editor = Editor::open(cache.clone(), Viewport::BUILDER);
        editor.add_widget("Logo");
        let old_id = editor.canvas().template_id().to_string();
        assert!(cache.load().is_some());

        editor.reset().unwrap();
        assert!(editor.canvas().is_empty());
        assert_ne!(editor.canvas().template_id(), old_id);
        assert!(cache.load().is_none());
    }

    #[tokio::test]
    async fn test_failed_save_is_reported() {
        let mut editor = Editor::new(Viewport::BUILDER);
        editor.add_widget("QR");
        let status = editor.status();
        let client = TemplateClient::new("http://127.0.0.1:9").unwrap();

        editor.save(client).unwrap().await.unwrap();
        assert!(matches!(*status.borrow(), SaveStatus::Failed(_)));
    }

    #[tokio::test]
    async fn test_edit_during_save_keeps_unsaved() {
        let mut editor = Editor::new(Viewport::BUILDER);
        editor.add_widget("QR");
        let status = editor.status();
        let client = TemplateClient::new("http://127.0.0.1:9").unwrap();

        let handle = editor.save(client).unwrap();
        editor.add_widget("Logo");
        handle.await.unwrap();
        assert_eq!(*status.borrow(), SaveStatus::Unsaved);
    }

    #[test]
    fn test_save_outside_runtime_is_an_error() {
        let mut editor = Editor::new(Viewport::BUILDER);
        editor.add_widget("QR");
        let status = editor.status();
        let client = TemplateClient::new("http://127.0.0.1:9").unwrap();

        assert!(matches!(editor.save(client), Err(LabelError::Config(_))));
        assert_eq!(*status.borrow(), SaveStatus::Unsaved);
    }
}
