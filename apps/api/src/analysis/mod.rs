// Resume / profile analysis.
// Implements: upload handling, PDF text extraction, prompt building,
// completion, and normalization of the model output into an AnalysisRecord.
// All LLM calls go through llm_client.

pub mod extractor;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod prompts;
pub mod upload;

#[cfg(test)]
pub mod testing;

pub use pipeline::{AnalysisError, AnalysisPipeline, PipelineFailure, PipelineStage, ProfileInput};
