//! Request bodies for the extraction step.

use crate::model::{DocUnit, DocUnitRequest, DocUnitTextRequest};

use super::jsonl::to_jsonl;

fn clean_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
}

/// Build a request carrying the units as structured records.
pub fn build_request<S: AsRef<str>>(
    units: &[DocUnit],
    fields: &[S],
    notes: Option<&str>,
) -> DocUnitRequest {
    DocUnitRequest {
        records: units.to_vec(),
        fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
        notes: clean_notes(notes),
    }
}

/// Build a request carrying the units as one JSON Lines string.
pub fn build_text_request<S: AsRef<str>>(
    units: &[DocUnit],
    fields: &[S],
    notes: Option<&str>,
) -> DocUnitTextRequest {
    DocUnitTextRequest {
        records: to_jsonl(units),
        fields: fields.iter().map(|f| f.as_ref().to_string()).collect(),
        notes: clean_notes(notes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request() {
        let units = vec![DocUnit::text("LINE", "IBAN IT60X").on_page(1)];
        let request = build_request(&units, &["iban", "totale"], Some("  solo EUR "));
        assert_eq!(request.records, units);
        assert_eq!(request.fields, vec!["iban", "totale"]);
        assert_eq!(request.notes.as_deref(), Some("solo EUR"));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["records"][0]["type"], "TEXT");
    }

    #[test]
    fn test_build_text_request() {
        let units = vec![
            DocUnit::text("LINE", "a").on_page(1),
            DocUnit::text("LINE", "b").on_page(1),
        ];
        let fields = vec!["nome".to_string()];
        let request = build_text_request(&units, &fields, Some("   "));
        assert_eq!(request.records.lines().count(), 2);
        assert!(request.notes.is_none());

        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("notes"));
    }
}
