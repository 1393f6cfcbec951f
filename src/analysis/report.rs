use serde::{Deserialize, Serialize};

/// Result payload of one skin analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub skin_type: String,
    pub concerns: Vec<String>,
    /// Always within `[0, 1]`.
    pub confidence: f32,
    pub recommendations: Vec<String>,
}

impl Report {
    pub fn new(
        skin_type: impl Into<String>,
        concerns: Vec<String>,
        confidence: f32,
        recommendations: Vec<String>,
    ) -> Self {
        Self {
            skin_type: skin_type.into(),
            concerns,
            confidence: confidence.clamp(0.0, 1.0),
            recommendations,
        }
    }

    pub fn confidence_percent(&self) -> u8 {
        (self.confidence * 100.0).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped() {
        let report = Report::new("Oily", Vec::new(), 1.7, Vec::new());
        assert_eq!(report.confidence, 1.0);
        let report = Report::new("Dry", Vec::new(), -0.2, Vec::new());
        assert_eq!(report.confidence, 0.0);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let report = Report::new("Combination", vec!["Redness".into()], 0.86, Vec::new());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["skinType"], "Combination");
        assert_eq!(json["concerns"][0], "Redness");
        assert_eq!(report.confidence_percent(), 86);
    }
}
