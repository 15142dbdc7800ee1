pub mod analyzer;
pub mod calorie; // Keyword calorie table
pub mod openai; // OpenAI vision service
pub mod replicate; // Replicate predictions API

pub use analyzer::FoodAnalyzer;
pub use calorie::{estimate_calories, ConfidenceProfile};
pub use openai::OpenAIService;
pub use replicate::ReplicateClient;
