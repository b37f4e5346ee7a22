//! Wire types for template payloads.
//!
//! Field names are camelCase on the wire. The four corners of a component are
//! redundant (the box is always axis-aligned) and kept for compatibility with
//! the storage schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::layout::Rect;

/// Template identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: String,
    pub name: String,
}

/// Bounding box as four corner points, in percentage units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Corners {
    pub x_left_top: f64,
    pub y_left_top: f64,
    pub x_right_top: f64,
    pub y_right_top: f64,
    pub x_left_bottom: f64,
    pub y_left_bottom: f64,
    pub x_right_bottom: f64,
    pub y_right_bottom: f64,
}

impl Corners {
    pub fn from_rect(r: &Rect) -> Self {
        let right = r.right();
        let bottom = r.bottom();
        Self {
            x_left_top: r.x,
            y_left_top: r.y,
            x_right_top: right,
            y_right_top: r.y,
            x_left_bottom: r.x,
            y_left_bottom: bottom,
            x_right_bottom: right,
            y_right_bottom: bottom,
        }
    }

    /// Axis-aligned box from the top-left corner, the top edge's right end and
    /// the left edge's bottom end. The other corners are ignored.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.x_left_top,
            self.y_left_top,
            self.x_right_top - self.x_left_top,
            self.y_left_bottom - self.y_left_top,
        )
    }
}

/// One placed component of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub component_id: String,
    /// Widget type name.
    pub name: String,
    #[serde(flatten)]
    pub corners: Corners,
    /// Type-specific payload.
    #[serde(default)]
    pub data: Option<Value>,
}

/// A complete label layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplatePayload {
    pub template: TemplateRecord,
    /// Canvas width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Canvas height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub components: Vec<ComponentRecord>,
}

/// Reply to a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub message: String,
    /// Components written.
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_corners_projection() {
        let c = Corners::from_rect(&Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_eq!(c.x_left_top, c.x_left_bottom);
        assert_eq!(c.y_left_top, c.y_right_top);
        assert_eq!(c.x_right_bottom, 40.0);
        assert_eq!(c.y_right_bottom, 60.0);
        assert_eq!(c.to_rect(), Rect::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_skewed_corners_degrade() {
        let c = Corners {
            x_left_top: 10.0,
            y_left_top: 10.0,
            x_right_top: 30.0,
            y_right_top: 12.0,
            x_left_bottom: 8.0,
            y_left_bottom: 25.0,
            x_right_bottom: 33.0,
            y_right_bottom: 27.0,
        };
        assert_eq!(c.to_rect(), Rect::new(10.0, 10.0, 20.0, 15.0));
    }

    #[test]
    fn test_component_wire_format() {
        let rec = ComponentRecord {
            template_id: "T-1".into(),
            component_id: "QR-1".into(),
            name: "QR".into(),
            corners: Corners::from_rect(&Rect::new(0.0, 20.0, 30.0, 25.0)),
            data: Some(json!({ "value": "QR123" })),
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["templateId"], "T-1");
        assert_eq!(v["componentId"], "QR-1");
        assert_eq!(v["xRightTop"], 30.0);
        assert_eq!(v["yLeftBottom"], 45.0);
        assert_eq!(v["data"]["value"], "QR123");
    }

    #[test]
    fn test_payload_parses_without_dimensions() {
        let payload: TemplatePayload = serde_json::from_value(json!({
            "template": { "id": "T-1001", "name": "Amazon Shipping Label" },
            "components": [{
                "templateId": "T-1001", "componentId": "C-LOGO", "name": "Logo",
                "xLeftTop": 0, "yLeftTop": 0, "xRightTop": 40, "yRightTop": 0,
                "xLeftBottom": 0, "yLeftBottom": 15, "xRightBottom": 40, "yRightBottom": 15
            }]
        }))
        .unwrap();
        assert_eq!(payload.width, None);
        assert_eq!(payload.components[0].data, None);
        assert_eq!(payload.components[0].corners.to_rect(), Rect::new(0.0, 0.0, 40.0, 15.0));
    }
}
