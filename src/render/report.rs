//! Persisted report shapes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{HeadingLevel, Outline, RankedSection};

/// One outline row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// "H1", "H2", ...
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

/// Structure extraction output: `{"title", "outline"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureReport {
    pub title: String,
    pub outline: Vec<OutlineEntry>,
}

impl From<&Outline> for StructureReport {
    fn from(outline: &Outline) -> Self {
        Self {
            title: outline.title.clone(),
            outline: outline
                .headings
                .iter()
                .map(|h| OutlineEntry {
                    level: h.level,
                    text: h.text.clone(),
                    page: h.page,
                })
                .collect(),
        }
    }
}

/// Run description in a persona report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    /// ISO-8601, UTC
    pub processing_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSection {
    pub document: String,
    pub page_number: u32,
    pub section_title: String,
    pub importance_rank: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub section_title: String,
    pub refined_text: String,
    pub page_number: u32,
}

/// Persona-ranking output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaReport {
    pub metadata: ReportMetadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

impl PersonaReport {
    /// Assemble a report from the full ranked list, keeping the top `top_k`.
    pub fn build(
        input_documents: Vec<String>,
        persona: &str,
        task: &str,
        ranked: &[RankedSection],
        top_k: usize,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let top = &ranked[..ranked.len().min(top_k)];

        Self {
            metadata: ReportMetadata {
                input_documents,
                persona: persona.to_string(),
                job_to_be_done: task.to_string(),
                processing_timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            },
            extracted_sections: top
                .iter()
                .map(|r| ExtractedSection {
                    document: r.section.document.clone(),
                    page_number: r.section.page,
                    section_title: r.section.heading.clone(),
                    importance_rank: r.rank,
                })
                .collect(),
            subsection_analysis: top
                .iter()
                .map(|r| SubsectionAnalysis {
                    document: r.section.document.clone(),
                    section_title: r.section.heading.clone(),
                    refined_text: r.section.body.clone(),
                    page_number: r.section.page,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::model::{HeadingCandidate, Section, TitleSource};
    use crate::render::{to_json, JsonFormat};

    fn ranked(heading: &str, rank: usize) -> RankedSection {
        RankedSection {
            section: Section {
                document: "menu.pdf".to_string(),
                heading: heading.to_string(),
                level: HeadingLevel::Heading(1),
                page: 2,
                body: format!("{} body", heading),
                truncated: false,
            },
            similarity: 1.0 / rank as f32,
            rank,
        }
    }

    #[test]
    fn test_structure_report_json() {
        let outline = Outline {
            title: "Guide".to_string(),
            title_source: TitleSource::Metadata,
            headings: vec![HeadingCandidate {
                text: "Setup".to_string(),
                level: HeadingLevel::Heading(1),
                page: 1,
                y: 80.0,
                font_size: 16.0,
            }],
        };
        let json = to_json(&StructureReport::from(&outline), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Guide","outline":[{"level":"H1","text":"Setup","page":1}]}"#
        );
    }

    #[test]
    fn test_persona_report_top_k() {
        let sections: Vec<_> = (1..=4).map(|i| ranked(&format!("S{}", i), i)).collect();
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let report = PersonaReport::build(
            vec!["menu.pdf".to_string()],
            "Chef",
            "plan a menu",
            &sections,
            3,
            timestamp,
        );

        assert_eq!(report.metadata.processing_timestamp, "2024-03-01T09:30:00Z");
        assert_eq!(report.metadata.job_to_be_done, "plan a menu");
        assert_eq!(report.extracted_sections.len(), 3);
        assert_eq!(report.extracted_sections[2].importance_rank, 3);
        assert_eq!(report.subsection_analysis[0].refined_text, "S1 body");

        let value: serde_json::Value =
            serde_json::from_str(&to_json(&report, JsonFormat::Pretty).unwrap()).unwrap();
        assert_eq!(value["extracted_sections"][0]["page_number"], 2);
        assert_eq!(value["metadata"]["input_documents"][0], "menu.pdf");
    }

    #[test]
    fn test_persona_report_fewer_than_k() {
        let report = PersonaReport::build(Vec::new(), "p", "t", &[ranked("Only", 1)], 10, Utc::now());
        assert_eq!(report.extracted_sections.len(), 1);
    }
}
