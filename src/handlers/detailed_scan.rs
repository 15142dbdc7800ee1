use anyhow::Result;
use std::sync::Arc;

use crate::models::{AnalysisResult, AnalysisType, MarkdownResult};
use crate::services::{FoodAnalyzer, OpenAIService};

const CONFIDENCE: f64 = 0.95;
const MAX_TOKENS: u32 = 500;

const PROMPT: &str = "Analyze this food image and provide nutritional information in the following markdown format:

# [Food Name]
## Serving Size
[serving size details]

## Nutritional Information
- Calories: [number] kcal
- Protein: [number]g
- Carbohydrates: [number]g
- Fats: [number]g
- Fiber: [number]g

## Ingredients
[list of ingredients]

## Allergens
[list of allergens if any]

## Dietary Notes
[vegan/vegetarian/gluten-free/etc]

Please be specific and detailed in your analysis.";

/// GPT-4o nutritional breakdown as markdown
pub struct DetailedScanHandler {
    openai: Arc<OpenAIService>,
}

impl DetailedScanHandler {
    pub fn new(openai: Arc<OpenAIService>) -> Self {
        Self { openai }
    }
}

#[async_trait::async_trait]
impl FoodAnalyzer for DetailedScanHandler {
    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::Detailed
    }

    async fn analyze(&self, image: &str) -> Result<AnalysisResult> {
        let markdown = self.openai.describe_image(PROMPT, image, MAX_TOKENS).await?;
        log::info!("✅ {} returned {} chars of markdown", self.openai.model(), markdown.len());

        Ok(AnalysisResult::Markdown(MarkdownResult {
            markdown,
            confidence: CONFIDENCE,
        }))
    }
}
