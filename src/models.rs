//! Typed records for the QMS entity families
//!
//! Every resource module defaults to `serde_json::Value`; these structs are
//! the typed alternative. All fields are optional because the backend owns
//! the schema, and anything not listed here lands in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A recorded deviation from an approved procedure or specification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<i64>,
    /// Risk priority number, computed by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpn: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Corrective and preventive action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capa {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capa_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deviation_id: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub capa_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_plan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One environmental or process measurement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitoringReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_format: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Aggregate counts returned by `/deviations/stats`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviationStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_category: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_risk: BTreeMap<String, u64>,
}

/// Headline numbers from `/dashboard/kpis`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardKpis {
    #[serde(default)]
    pub total_deviations: u64,
    #[serde(default)]
    pub open_deviations: u64,
    #[serde(default)]
    pub total_capa: u64,
    #[serde(default)]
    pub open_capa: u64,
    #[serde(default)]
    pub active_batches: u64,
    #[serde(default)]
    pub out_of_spec_parameters: u64,
}

/// Backend reply to a create/update/delete/record/generate call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deviation_keeps_unknown_fields() {
        let raw = json!({
            "id": 3,
            "deviation_number": "DEV-2024-0003",
            "title": "Equipment Deviation - Sample 3",
            "severity": 7,
            "rpn": 210,
            "created_by": 2
        });
        let deviation: Deviation = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(deviation.rpn, Some(210));
        assert_eq!(deviation.extra.get("created_by"), Some(&json!(2)));
        assert_eq!(serde_json::to_value(&deviation).unwrap(), raw);
    }

    #[test]
    fn test_capa_type_rename() {
        let capa: Capa = serde_json::from_value(json!({"type": "Corrective", "deviation_id": 4})).unwrap();
        assert_eq!(capa.capa_type.as_deref(), Some("Corrective"));
        assert_eq!(capa.deviation_id, Some(4));
    }

    #[test]
    fn test_partial_kpis() {
        let kpis: DashboardKpis = serde_json::from_value(json!({"open_deviations": 7})).unwrap();
        assert_eq!(kpis.open_deviations, 7);
        assert_eq!(kpis.total_capa, 0);
    }
}
