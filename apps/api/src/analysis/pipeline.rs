//! Analysis pipeline: orchestrates one analysis request.
//!
//! Flow: Received → Extracting (resume only) → PromptBuilt → AwaitingCompletion
//!       → Normalizing → Completed | Failed(stage, reason).
//!
//! No stage is retried. The uploaded document is discarded before `run` returns,
//! whatever the outcome.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::extractor::{require_text, ExtractionError, TextExtractor};
use crate::analysis::models::{AnalysisMode, AnalysisRecord, ProfileForm};
use crate::analysis::normalizer::{normalize_completion, NormalizationError};
use crate::analysis::prompts::{build_prompt, PromptSource};
use crate::analysis::upload::UploadedDocument;
use crate::llm_client::{CompletionClient, CompletionError, SamplingParams};

/// Exactly one variant per analysis request.
#[derive(Debug)]
pub enum ProfileInput {
    Document(UploadedDocument),
    Form(ProfileForm),
}

impl ProfileInput {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            ProfileInput::Document(_) => AnalysisMode::Resume,
            ProfileInput::Form(_) => AnalysisMode::Manual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Extracting,
    PromptBuilt,
    AwaitingCompletion,
    Normalizing,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Received => "received",
            PipelineStage::Extracting => "extracting",
            PipelineStage::PromptBuilt => "prompt_built",
            PipelineStage::AwaitingCompletion => "awaiting_completion",
            PipelineStage::Normalizing => "normalizing",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    Input(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Upstream(#[from] CompletionError),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),
}

/// Terminal failure of a run: the stage that failed and why.
#[derive(Debug, Error)]
#[error("analysis failed while {stage}: {error}")]
pub struct PipelineFailure {
    pub stage: PipelineStage,
    #[source]
    pub error: AnalysisError,
}

fn failed_at<E: Into<AnalysisError>>(stage: PipelineStage) -> impl FnOnce(E) -> PipelineFailure {
    move |e| PipelineFailure {
        stage,
        error: e.into(),
    }
}

/// Holds only immutable collaborators, so one instance serves concurrent requests.
pub struct AnalysisPipeline {
    completion: Arc<dyn CompletionClient>,
    extractor: Arc<dyn TextExtractor>,
    params: SamplingParams,
}

impl AnalysisPipeline {
    pub fn new(completion: Arc<dyn CompletionClient>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            completion,
            extractor,
            params: SamplingParams::default(),
        }
    }

    pub fn params(&self) -> &SamplingParams {
        &self.params
    }

    #[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4(), mode = %input.mode()))]
    pub async fn run(&self, input: ProfileInput) -> Result<AnalysisRecord, PipelineFailure> {
        let outcome = match input {
            ProfileInput::Document(document) => {
                let outcome = self.analyze_document(&document).await;
                document.discard();
                outcome
            }
            ProfileInput::Form(form) => self.analyze_form(&form).await,
        };

        match &outcome {
            Ok(_) => info!("Analysis completed"),
            Err(failure) => warn!(stage = %failure.stage, "Analysis failed: {}", failure.error),
        }
        outcome
    }

    async fn analyze_document(
        &self,
        document: &UploadedDocument,
    ) -> Result<AnalysisRecord, PipelineFailure> {
        validate_document(document).map_err(failed_at(PipelineStage::Received))?;

        info!(stage = %PipelineStage::Extracting, size = document.size());
        let text = self
            .extractor
            .extract(document)
            .await
            .and_then(require_text)
            .map_err(failed_at(PipelineStage::Extracting))?;

        self.complete_and_normalize(PromptSource::Resume(&text)).await
    }

    async fn analyze_form(&self, form: &ProfileForm) -> Result<AnalysisRecord, PipelineFailure> {
        validate_form(form).map_err(failed_at(PipelineStage::Received))?;
        self.complete_and_normalize(PromptSource::Manual(form)).await
    }

    async fn complete_and_normalize(
        &self,
        source: PromptSource<'_>,
    ) -> Result<AnalysisRecord, PipelineFailure> {
        let prompt = build_prompt(&source);
        info!(
            stage = %PipelineStage::PromptBuilt,
            mode = %source.mode(),
            chars = prompt.as_str().chars().count()
        );

        info!(stage = %PipelineStage::AwaitingCompletion, model = %self.params.model);
        let raw = self
            .completion
            .complete(prompt.as_str(), &self.params)
            .await
            .map_err(failed_at(PipelineStage::AwaitingCompletion))?;

        info!(stage = %PipelineStage::Normalizing, chars = raw.chars().count());
        normalize_completion(&raw).map_err(failed_at(PipelineStage::Normalizing))
    }
}

fn validate_document(document: &UploadedDocument) -> Result<(), AnalysisError> {
    if document.is_empty() {
        return Err(AnalysisError::Input("Uploaded file is empty".to_string()));
    }
    if !document.has_pdf_signature() {
        return Err(AnalysisError::Input(
            "Uploaded file is not a PDF document".to_string(),
        ));
    }
    Ok(())
}

fn validate_form(form: &ProfileForm) -> Result<(), AnalysisError> {
    let blank = form.blank_fields();
    if blank.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::Input(format!(
            "Missing required fields: {}",
            blank.join(", ")
        )))
    }
}
