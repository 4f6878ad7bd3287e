//! Structured feedback the AI model is instructed to return for a résumé.
//!
//! The model's reply is trusted as-is: every field is optional, scores keep
//! whatever number the model wrote, tip kinds keep their original spelling and
//! unknown keys are carried in `extra`. Serializing a parsed `Feedback` gives
//! back the object the model returned.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Whether a tip praises something or asks for a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipKind {
    Good,
    Improve,
    Other(String),
}

impl TipKind {
    /// Classifies a raw `type` value, ignoring case and surrounding whitespace.
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("good") {
            TipKind::Good
        } else if trimmed.eq_ignore_ascii_case("improve") {
            TipKind::Improve
        } else {
            TipKind::Other(raw.to_string())
        }
    }
}

/// One tip. ATS tips carry no explanation; the other categories do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tip {
    pub fn kind(&self) -> Option<TipKind> {
        self.kind.as_deref().map(TipKind::classify)
    }
}

/// A scored category with its tips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Number>, // 0 – 100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<Tip>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Section {
    pub fn tips(&self) -> &[Tip] {
        self.tips.as_deref().unwrap_or_default()
    }
}

/// Full feedback object stored on a `ResumeRecord` once analysis finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<Number>,
    #[serde(rename = "ATS", default, skip_serializing_if = "Option::is_none")]
    pub ats: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_and_style: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Section>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feedback {
    pub fn overall_score(&self) -> Option<f64> {
        self.overall_score.as_ref().and_then(Number::as_f64)
    }

    /// Every category the model returned, ATS first.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        [
            &self.ats,
            &self.tone_and_style,
            &self.content,
            &self.structure,
            &self.skills,
        ]
        .into_iter()
        .flatten()
    }

    /// Number of tips asking for a change, across all categories.
    pub fn improvement_count(&self) -> usize {
        self.sections()
            .flat_map(Section::tips)
            .filter(|tip| tip.kind() == Some(TipKind::Improve))
            .count()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A well-formed feedback payload as the model would return it.
    pub const FEEDBACK_JSON: &str = r#"{
        "overallScore": 72,
        "ATS": {
            "score": 80,
            "tips": [
                {"type": "good", "tip": "Standard section headings"},
                {"type": "improve", "tip": "Add keywords from the job description"}
            ]
        },
        "toneAndStyle": {
            "score": 70,
            "tips": [{"type": "good", "tip": "Concise", "explanation": "Bullets are short and direct."}]
        },
        "content": {
            "score": 65,
            "tips": [{"type": "improve", "tip": "Quantify impact", "explanation": "Few bullets mention numbers."}]
        },
        "structure": {
            "score": 75,
            "tips": [{"type": "good", "tip": "Clear layout", "explanation": "Sections are easy to scan."}]
        },
        "skills": {
            "score": 60,
            "tips": [{"type": "improve", "tip": "List Kubernetes", "explanation": "The role requires it."}]
        }
    }"#;

    /// The same payload with a fractional score, a capitalised tip kind and
    /// keys the prompt never asked for.
    pub const LOOSE_FEEDBACK_JSON: &str = r#"{
        "overallScore": 72.5,
        "summary": "Solid backend profile.",
        "ATS": {
            "score": 80,
            "tips": [{"type": "Good", "tip": "Standard section headings", "priority": 1}]
        },
        "toneAndStyle": {"score": 70, "tips": [], "note": "n/a"},
        "content": {"score": 65},
        "structure": {"score": 75, "tips": [{"type": "neutral", "tip": "Two pages"}]},
        "skills": {"score": 60, "tips": []}
    }"#;
}
