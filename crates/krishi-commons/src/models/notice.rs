//! Government notice / subsidy document model.
//!
//! Notices are never persisted — they are recomputed from upstream sources on
//! every aggregation request and have no identity beyond their position in
//! the merged list.

use serde::{Deserialize, Serialize};

/// Classification of an aggregated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// General announcement from a notice board.
    Notice,
    /// Downloadable administrative form.
    Form,
    /// Subsidy or grant document.
    SubsidyDetails,
}

/// An externally sourced announcement or subsidy document record.
///
/// `date` is an opaque display string: upstream sources mix numeral scripts
/// and formats, and no normalization is performed at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    #[serde(rename = "type")]
    pub kind: NoticeKind,
    pub title: String,
    pub link: String,
    pub date: String,
    pub is_subsidy: bool,

    /// Source-system label ("DOA", "AITC"); absent for static forms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_in_wire_format() {
        let notice = Notice {
            kind: NoticeKind::SubsidyDetails,
            title: "t".into(),
            link: "https://example.com/x.pdf".into(),
            date: "2025-01-12".into(),
            is_subsidy: true,
            source: Some("AITC".into()),
        };
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["type"], "subsidy_details");
        assert_eq!(json["source"], "AITC");
    }

    #[test]
    fn absent_source_is_omitted() {
        let notice = Notice {
            kind: NoticeKind::Form,
            title: "t".into(),
            link: "l".into(),
            date: "d".into(),
            is_subsidy: false,
            source: None,
        };
        let json = serde_json::to_value(&notice).unwrap();
        assert!(json.get("source").is_none());
    }
}
