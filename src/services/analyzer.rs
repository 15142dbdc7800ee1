use anyhow::Result;

use crate::models::{AnalysisResult, AnalysisType};

/// One analysis mode: forwards an image to a hosted model and shapes the reply.
#[async_trait::async_trait]
pub trait FoodAnalyzer: Send + Sync {
    fn analysis_type(&self) -> AnalysisType;

    /// `image` is a data URL (or any URL the provider can fetch)
    async fn analyze(&self, image: &str) -> Result<AnalysisResult>;
}
