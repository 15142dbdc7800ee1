use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

use crate::models::{AnalysisResult, AnalysisType, MarkdownResult};
use crate::services::replicate::output_text;
use crate::services::{FoodAnalyzer, ReplicateClient};

pub const LLAVA_MODEL: &str =
    "yorickvp/llava-v1.6-vicuna-13b:0603dec596080fa084e26f0ae6d605fc5788ed2b1a0358cd25010619487eae63";

const CONFIDENCE: f64 = 0.9;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new("```\n|```").expect("valid code fence pattern"));

const PROMPT: &str = "Analyze this food image and provide the information in the following markdown format:

# [Food Name]

## Serving Size
[Specify approximate serving size in grams or standard measurements]

## Preparation
[Describe how the food appears to be prepared (e.g., grilled, baked, raw)]

## Description
[Provide a detailed description of what you see]

## Ingredients
[List visible or likely ingredients]

Please be specific and detailed in your analysis.";

/// LLaVA descriptive markdown
pub struct LlavaScanHandler {
    replicate: Arc<ReplicateClient>,
}

impl LlavaScanHandler {
    pub fn new(replicate: Arc<ReplicateClient>) -> Self {
        Self { replicate }
    }
}

#[async_trait::async_trait]
impl FoodAnalyzer for LlavaScanHandler {
    fn analysis_type(&self) -> AnalysisType {
        AnalysisType::Llava
    }

    async fn analyze(&self, image: &str) -> Result<AnalysisResult> {
        let output = self
            .replicate
            .run(
                LLAVA_MODEL,
                serde_json::json!({
                    "image": image,
                    "prompt": PROMPT,
                    "temperature": 0.5,
                    "max_tokens": 500,
                }),
            )
            .await?;

        let markdown = markdown_from_output(&output)?;
        log::info!("✅ LLaVA returned {} chars of markdown", markdown.len());

        Ok(AnalysisResult::Markdown(MarkdownResult {
            markdown,
            confidence: CONFIDENCE,
        }))
    }
}

/// Streamed token arrays come wrapped in code fences; plain strings are used as-is.
fn markdown_from_output(output: &Value) -> Result<String> {
    let text = output_text(output)?;
    if output.is_array() {
        Ok(CODE_FENCE.replace_all(&text, "").into_owned())
    } else {
        Ok(text)
    }
}
