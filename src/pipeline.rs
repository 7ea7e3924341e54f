//! Tailoring pipeline: extract, build prompt, generate with retry, classify

use crate::error::{Result, TailorError};
use crate::input::{self, SourceDocument};
use crate::llm::prompts::PromptTemplates;
use crate::llm::{Credential, RetryPolicy, TailoringRequest, TextGenerator, Tone};
use crate::output::{classify, ReportMetadata, TailoringReport};
use crate::session::{PipelineStatus, SessionContext};
use chrono::Utc;
use log::{debug, info};

/// Raw inputs of one tailoring request, validated by [`TailoringPipeline::run`].
#[derive(Debug, Clone)]
pub struct TailoringInputs {
    pub credential: Option<Credential>,
    pub document: Option<SourceDocument>,
    pub job_description: String,
    pub tone: Tone,
}

pub struct TailoringPipeline<G: TextGenerator> {
    generator: G,
    policy: RetryPolicy,
    templates: PromptTemplates,
}

impl<G: TextGenerator> TailoringPipeline<G> {
    pub fn new(generator: G, policy: RetryPolicy) -> Self {
        Self {
            generator,
            policy,
            templates: PromptTemplates::default(),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Extracts the CV into a request without calling the model. A blank job
    /// description is rejected before extraction starts.
    pub fn prepare(
        &self,
        session: &SessionContext,
        document: &SourceDocument,
        job_description: &str,
        tone: Tone,
    ) -> Result<TailoringRequest> {
        if job_description.trim().is_empty() {
            return Err(TailorError::MissingInput(
                "Please provide a job description".to_string(),
            ));
        }

        session.report(PipelineStatus::Extracting {
            kind: document.kind,
        });
        let cv_text = input::extract(document)?;
        info!(
            "Extracted {} characters from {} ({})",
            cv_text.chars().count(),
            document.name,
            document.kind
        );

        Ok(TailoringRequest::new(cv_text, job_description, tone))
    }

    pub fn render(&self, request: &TailoringRequest) -> String {
        self.templates.render_tailoring(request)
    }

    /// Runs one request to completion. Any failure ends the request.
    pub async fn run(&self, session: &SessionContext, inputs: TailoringInputs) -> Result<TailoringReport> {
        let TailoringInputs {
            credential,
            document,
            job_description,
            tone,
        } = inputs;

        let credential = credential.ok_or(TailorError::MissingCredential)?;
        let document = document
            .ok_or_else(|| TailorError::MissingInput("Please upload a CV (PDF or DOCX)".to_string()))?;

        let request = self.prepare(session, &document, &job_description, tone)?;

        session.report(PipelineStatus::BuildingPrompt);
        let prompt = self.render(&request);
        debug!("Prompt is {} characters", prompt.len());

        let generation = self
            .policy
            .execute(&self.generator, &prompt, &credential, session)
            .await?;

        session.report(PipelineStatus::Classifying);
        let result = classify(generation.text);
        info!(
            "Verdict: {} after {} attempt(s)",
            if result.is_mismatch() { "mismatch" } else { "tailored" },
            generation.attempts
        );

        Ok(TailoringReport {
            result,
            metadata: ReportMetadata {
                model: self.generator.model().to_string(),
                tone,
                attempts: generation.attempts,
                cv_characters: request.cv_text().chars().count(),
                generated_at: Utc::now(),
            },
        })
    }
}
