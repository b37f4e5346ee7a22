//! Conversion between a [`Canvas`] and a [`TemplatePayload`].

use std::collections::{HashMap, HashSet};

use tracing::warn;

use super::data::ComponentData;
use super::schema::{ComponentRecord, Corners, TemplatePayload, TemplateRecord};
use crate::error::LabelError;
use crate::layout::{Canvas, LayoutSettings, Rect, Viewport, Widget};

/// Name given to templates built in the editor.
pub const DEFAULT_TEMPLATE_NAME: &str = "User Template";

/// A template payload turned back into editable state.
#[derive(Debug, Clone)]
pub struct LoadedTemplate {
    pub canvas: Canvas,
    pub name: String,
    pub viewport: Viewport,
    /// Component data by widget id.
    pub data: HashMap<String, ComponentData>,
}

/// Export `canvas` as a payload.
///
/// Each widget's `data` comes from `data` by widget id; a missing entry, or
/// one that does not belong to the widget's type, is replaced by the type's
/// default.
pub fn to_payload(
    canvas: &Canvas,
    name: &str,
    viewport: Viewport,
    data: &HashMap<String, ComponentData>,
) -> TemplatePayload {
    let template_id = canvas.template_id().to_string();
    let components = canvas
        .widgets()
        .iter()
        .map(|w| {
            let component_data = match data.get(&w.id) {
                Some(d) if d.matches(&w.name) => d.to_value(),
                Some(_) => {
                    warn!(id = %w.id, name = %w.name, "data does not match widget type, using default");
                    ComponentData::default_for(&w.name).to_value()
                }
                None => ComponentData::default_for(&w.name).to_value(),
            };
            ComponentRecord {
                template_id: template_id.clone(),
                component_id: w.id.clone(),
                name: w.name.clone(),
                corners: Corners::from_rect(&w.rect),
                data: Some(component_data),
            }
        })
        .collect();

    TemplatePayload {
        template: TemplateRecord {
            id: template_id,
            name: name.to_string(),
        },
        width: Some(viewport.width),
        height: Some(viewport.height),
        components,
    }
}

/// Rebuild editable state from a payload.
///
/// Rectangles come from the top-left corner and the top/left edge lengths;
/// the remaining corners are not checked. Component ids that are empty or
/// repeated are replaced. Fails if a component's data does not fit its type.
pub fn from_payload(
    payload: &TemplatePayload,
    settings: LayoutSettings,
) -> Result<LoadedTemplate, LabelError> {
    let mut seen = HashSet::new();
    let mut widgets = Vec::with_capacity(payload.components.len());
    let mut data = HashMap::new();

    for (idx, c) in payload.components.iter().enumerate() {
        let mut id = if c.component_id.is_empty() {
            format!("C-{}", idx + 1)
        } else {
            c.component_id.clone()
        };
        if seen.contains(&id) {
            let base = id;
            let mut n = idx + 1;
            id = format!("{}-{}", base, n);
            while seen.contains(&id) {
                n += 1;
                id = format!("{}-{}", base, n);
            }
        }
        seen.insert(id.clone());

        let parsed = ComponentData::from_value(&c.name, c.data.clone().unwrap_or_default())?;
        data.insert(id.clone(), parsed);
        widgets.push(Widget {
            id,
            name: c.name.clone(),
            rect: positive(c.corners.to_rect()),
        });
    }

    let viewport = match (payload.width, payload.height) {
        (Some(w), Some(h)) => Viewport::new(w, h),
        _ => Viewport::default(),
    };

    Ok(LoadedTemplate {
        canvas: Canvas::restore(payload.template.id.clone(), settings, widgets),
        name: payload.template.name.clone(),
        viewport,
        data,
    })
}

/// Flip negative extents so the box has non-negative width and height.
fn positive(r: Rect) -> Rect {
    Rect::from_edges(
        r.x.min(r.right()),
        r.y.min(r.bottom()),
        r.x.max(r.right()),
        r.y.max(r.bottom()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::data::ValueData;
    use serde_json::json;

    #[test]
    fn test_to_payload_projects_corners() {
        let mut canvas = Canvas::new();
        let qr = canvas.add_widget("QR", None);
        let payload = to_payload(&canvas, DEFAULT_TEMPLATE_NAME, Viewport::BUILDER, &HashMap::new());

        assert_eq!(payload.template.id, canvas.template_id());
        assert_eq!(payload.template.name, "User Template");
        assert_eq!((payload.width, payload.height), (Some(500), Some(800)));

        let c = &payload.components[0];
        assert_eq!(c.component_id, qr.id);
        assert_eq!(c.template_id, canvas.template_id());
        assert_eq!(c.corners.x_left_top, 34.0);
        assert_eq!(c.corners.x_right_bottom, 59.0);
        assert_eq!(c.data, Some(json!({ "value": "QR123" })));
    }

    #[test]
    fn test_to_payload_uses_supplied_data() {
        let mut canvas = Canvas::new();
        let qr = canvas.add_widget("QR", None);
        let mut data = HashMap::new();
        data.insert(qr.id.clone(), ComponentData::Qr(ValueData { value: "https://x.test".into() }));

        let payload = to_payload(&canvas, "Mine", Viewport::BUILDER, &data);
        assert_eq!(payload.components[0].data, Some(json!({ "value": "https://x.test" })));
    }

    #[test]
    fn test_mismatched_data_falls_back() {
        let mut canvas = Canvas::new();
        let logo = canvas.add_widget("Logo", None);
        let mut data = HashMap::new();
        data.insert(logo.id.clone(), ComponentData::Qr(ValueData { value: "x".into() }));

        let payload = to_payload(&canvas, "Mine", Viewport::BUILDER, &data);
        assert_eq!(payload.components[0].data, Some(json!({ "text": "amazon.com" })));
    }

    #[test]
    fn test_from_payload_repairs_ids() {
        let payload: TemplatePayload = serde_json::from_value(json!({
            "template": { "id": "T-9", "name": "Imported" },
            "components": [
                { "name": "Text", "xLeftTop": 0, "yLeftTop": 0, "xRightTop": 40, "yRightTop": 0,
                  "xLeftBottom": 0, "yLeftBottom": 10, "xRightBottom": 40, "yRightBottom": 10 },
                { "componentId": "A", "name": "Text", "xLeftTop": 50, "yLeftTop": 0, "xRightTop": 90, "yRightTop": 0,
                  "xLeftBottom": 50, "yLeftBottom": 10, "xRightBottom": 90, "yRightBottom": 10 },
                { "componentId": "A", "name": "Text", "xLeftTop": 0, "yLeftTop": 50, "xRightTop": 40, "yRightTop": 50,
                  "xLeftBottom": 0, "yLeftBottom": 60, "xRightBottom": 40, "yRightBottom": 60 }
            ]
        }))
        .unwrap();

        let loaded = from_payload(&payload, LayoutSettings::default()).unwrap();
        let ids: Vec<_> = loaded.canvas.widgets().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["C-1", "A", "A-3"]);
        assert_eq!(loaded.canvas.template_id(), "T-9");
        assert_eq!(loaded.viewport, Viewport::BUILDER);
        assert_eq!(loaded.data["C-1"], ComponentData::default_for("Text"));
    }

    #[test]
    fn test_repaired_id_skips_taken_suffix() {
        let text_at = |id: &str, y: f64| {
            json!({ "componentId": id, "name": "Text",
                    "xLeftTop": 0, "yLeftTop": y, "xRightTop": 40, "yRightTop": y,
                    "xLeftBottom": 0, "yLeftBottom": y + 10.0, "xRightBottom": 40, "yRightBottom": y + 10.0 })
        };
        let payload: TemplatePayload = serde_json::from_value(json!({
            "template": { "id": "T-9", "name": "Imported" },
            "components": [text_at("A", 0.0), text_at("A-3", 20.0), text_at("A", 40.0)]
        }))
        .unwrap();

        let loaded = from_payload(&payload, LayoutSettings::default()).unwrap();
        let ids: Vec<_> = loaded.canvas.widgets().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "A-3", "A-4"]);
        assert_eq!(loaded.data.len(), 3);
    }

    #[test]
    fn test_from_payload_rejects_bad_data() {
        let payload: TemplatePayload = serde_json::from_value(json!({
            "template": { "id": "T-9", "name": "Imported" },
            "components": [
                { "componentId": "Q", "name": "QR", "data": { "text": "wrong field" },
                  "xLeftTop": 0, "yLeftTop": 0, "xRightTop": 25, "yRightTop": 0,
                  "xLeftBottom": 0, "yLeftBottom": 25, "xRightBottom": 25, "yRightBottom": 25 }
            ]
        }))
        .unwrap();
        assert!(matches!(
            from_payload(&payload, LayoutSettings::default()),
            Err(LabelError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_positive_extent() {
        assert_eq!(
            positive(Rect::new(30.0, 10.0, -10.0, 5.0)),
            Rect::new(20.0, 10.0, 10.0, 5.0)
        );
    }
}
