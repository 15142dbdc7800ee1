use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::models::{AnalysisResult, AnalysisType, QuickScanResult};
use crate::services::replicate::output_text;
use crate::services::{estimate_calories, ConfidenceProfile, FoodAnalyzer, ReplicateClient};

pub const BLIP2_MODEL: &str =
    "salesforce/blip-2:4b32258c42e9efd4288bb9910bc532a69727f9acd26aa08e175713a0a857a608";

const QUESTION: &str = "What food item is this? Please be specific about what you see in the image.";

pub const DEFAULT_SERVING_SIZE: &str = "100g (estimated)";

static SERVING_SIZE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(g|grams|oz|ounces|cups?|pieces?|servings?)").expect("valid serving size pattern")
});

/// Fast path: BLIP-2 caption plus the keyword calorie table
pub struct QuickScanHandler {
    replicate: Arc<ReplicateClient>,
}

impl QuickScanHandler {
    pub fn new(replicate: Arc<ReplicateClient>) -> Self {
        Self { replicate }
    }
}

#[async_trait::async_trait]
impl FoodAnalyzer for QuickScanHandler {
    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::Quick
    }

    async fn analyze(&self, image: &str) -> Result<AnalysisResult> {
        let output = self
            .replicate
            .run(
                BLIP2_MODEL,
                serde_json::json!({
                    "image": image,
                    "question": QUESTION,
                }),
            )
            .await?;

        let caption = output_text(&output)?;
        log::info!("📝 BLIP-2 caption: {}", caption);

        Ok(AnalysisResult::Quick(summarize_caption(&caption)))
    }
}

/// Turn a free-text caption into metrics
pub fn summarize_caption(caption: &str) -> QuickScanResult {
    let food_name = caption.split('.').next().unwrap_or_default().trim().to_string();
    let estimate = estimate_calories(&food_name, ConfidenceProfile::QUICK_SCAN);

    QuickScanResult {
        food_name,
        calories: estimate.calories,
        serving_size: extract_serving_size(caption).unwrap_or_else(|| DEFAULT_SERVING_SIZE.to_string()),
        confidence: estimate.confidence,
    }
}

fn extract_serving_size(text: &str) -> Option<String> {
    SERVING_SIZE.find(text).map(|m| m.as_str().to_string())
}
