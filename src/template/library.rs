//! Rebuilding templates from flat stored rows.

use serde_json::Value;
use tracing::{debug, warn};

use super::data::ComponentData;
use super::schema::{ComponentRecord, TemplatePayload, TemplateRecord};
use crate::layout::Viewport;
use crate::store::StoredComponent;

/// Stored rows that share a template id.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateGroup {
    pub template_id: String,
    pub components: Vec<StoredComponent>,
}

/// Group rows by template id, in order of first appearance.
pub fn group_rows(rows: Vec<StoredComponent>) -> Vec<TemplateGroup> {
    let mut groups: Vec<TemplateGroup> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|g| g.template_id == row.template_id) {
            Some(group) => group.components.push(row),
            None => groups.push(TemplateGroup {
                template_id: row.template_id.clone(),
                components: vec![row],
            }),
        }
    }
    groups
}

/// Parse a stored `dataJson`; anything unparseable counts as no data.
pub fn parse_data_json(raw: Option<&str>) -> Option<Value> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(error = %e, "ignoring malformed stored data");
            None
        }
    }
}

/// Stored data that fits the component's type; anything else counts as no
/// data, so the component opens with its type's default.
fn usable_data(row: &StoredComponent) -> Option<Value> {
    let data = parse_data_json(row.data_json.as_deref())?;
    match ComponentData::from_value(&row.name, data.clone()) {
        Ok(_) => Some(data),
        Err(e) => {
            warn!(component = %row.component_id, error = %e, "dropping stored data");
            None
        }
    }
}

impl TemplateGroup {
    /// Display name: the first eight characters of the id.
    pub fn display_name(&self) -> String {
        let short: String = self.template_id.chars().take(8).collect();
        format!("Template {}", short)
    }

    /// Payload for opening this template on a 4x6" label canvas.
    pub fn to_payload(&self) -> TemplatePayload {
        TemplatePayload {
            template: TemplateRecord {
                id: self.template_id.clone(),
                name: self.display_name(),
            },
            width: Some(Viewport::LABEL_4X6.width),
            height: Some(Viewport::LABEL_4X6.height),
            components: self
                .components
                .iter()
                .map(|c| ComponentRecord {
                    template_id: c.template_id.clone(),
                    component_id: c.component_id.clone(),
                    name: c.name.clone(),
                    corners: c.corners,
                    data: usable_data(c),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Rect;
    use crate::template::Corners;
    use serde_json::json;

    fn stored(id: i64, template: &str, data: Option<&str>) -> StoredComponent {
        StoredComponent {
            id,
            template_id: template.to_string(),
            component_id: format!("C-{}", id),
            name: "QR".to_string(),
            corners: Corners::from_rect(&Rect::new(0.0, 0.0, 25.0, 25.0)),
            data_json: data.map(String::from),
        }
    }

    #[test]
    fn test_group_rows_first_seen_order() {
        let groups = group_rows(vec![
            stored(5, "b", None),
            stored(4, "a", None),
            stored(3, "b", None),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].template_id, "b");
        assert_eq!(groups[0].components.len(), 2);
        assert_eq!(groups[1].template_id, "a");
    }

    #[test]
    fn test_to_payload_parses_data_leniently() {
        let group = TemplateGroup {
            template_id: "0f8fad5b-d9cb-469f-a165-70867728950e".to_string(),
            components: vec![
                stored(1, "0f8fad5b-d9cb-469f-a165-70867728950e", Some(r#"{"value":"QR9"}"#)),
                stored(2, "0f8fad5b-d9cb-469f-a165-70867728950e", Some("{broken")),
                stored(3, "0f8fad5b-d9cb-469f-a165-70867728950e", None),
            ],
        };
        let payload = group.to_payload();
        assert_eq!(payload.template.name, "Template 0f8fad5b");
        assert_eq!((payload.width, payload.height), (Some(384), Some(576)));
        assert_eq!(payload.components[0].data, Some(json!({ "value": "QR9" })));
        assert_eq!(payload.components[1].data, None);
        assert_eq!(payload.components[2].data, None);
    }

    #[test]
    fn test_wrongly_shaped_data_still_opens() {
        let group = TemplateGroup {
            template_id: "T-9".to_string(),
            components: vec![
                stored(1, "T-9", Some(r#"{"wrong":true}"#)),
                stored(2, "T-9", Some(r#"{"value":"QR2"}"#)),
            ],
        };
        let payload = group.to_payload();
        assert_eq!(payload.components[0].data, None);

        let loaded = crate::template::from_payload(&payload, crate::layout::LayoutSettings::default()).unwrap();
        assert_eq!(loaded.data["C-1"], ComponentData::default_for("QR"));
        assert_eq!(loaded.data["C-2"], ComponentData::from_value("QR", json!({ "value": "QR2" })).unwrap());
    }
}
