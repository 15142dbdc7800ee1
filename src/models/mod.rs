use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which back-end strategy produced (or should produce) a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    Quick,
    Detailed,
    Llava,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 3] = [AnalysisType::Quick, AnalysisType::Detailed, AnalysisType::Llava];

    /// Path segment under `/api/food-analysis/`
    pub fn slug(&self) -> &'static str {
        match self {
            AnalysisType::Quick => "quick-scan",
            AnalysisType::Detailed => "detailed-scan",
            AnalysisType::Llava => "llava-scan",
        }
    }

    /// Value used by the upload form's `mode` field
    pub fn form_value(&self) -> &'static str {
        match self {
            AnalysisType::Quick => "quick",
            AnalysisType::Detailed => "detailed",
            AnalysisType::Llava => "llava",
        }
    }

    /// Accepts the form value or the endpoint slug, case-insensitively
    pub fn from_string(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.form_value() == normalized || kind.slug() == normalized)
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AnalysisType::Quick => "Quick Scan",
            AnalysisType::Detailed => "Detailed Analysis",
            AnalysisType::Llava => "Advanced Scan",
        };
        write!(f, "{}", s)
    }
}

/// JSON body accepted by every analysis endpoint. Other keys (browsers also
/// send `analysisType`) are ignored; the endpoint decides the mode.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeRequest {
    pub image: Option<String>,
}

impl AnalyzeRequest {
    /// A non-string `image` counts as absent
    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            image: fields.get("image").and_then(Value::as_str).map(str::to_string),
        }
    }

    /// The image, if one was supplied and is non-blank
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickScanResult {
    pub food_name: String,
    pub calories: u32,
    pub serving_size: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkdownResult {
    pub markdown: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Quick(QuickScanResult),
    Markdown(MarkdownResult),
}

impl AnalysisResult {
    pub fn confidence(&self) -> f64 {
        match self {
            AnalysisResult::Quick(r) => r.confidence,
            AnalysisResult::Markdown(r) => r.confidence,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
