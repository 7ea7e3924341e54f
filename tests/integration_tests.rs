//! Integration tests for the tailoring pipeline

use async_trait::async_trait;
use cv_tailor::error::TailorError;
use cv_tailor::input::manager::InputManager;
use cv_tailor::input::{DocumentKind, SourceDocument};
use cv_tailor::llm::{Credential, GenerationError, RetryPolicy, TextGenerator, Tone};
use cv_tailor::output::GenerationResult;
use cv_tailor::pipeline::{TailoringInputs, TailoringPipeline};
use cv_tailor::session::{PipelineStatus, SessionContext, StatusReporter};
use std::collections::VecDeque;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Replays scripted responses and records every prompt it receives.
struct FakeGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    fn replying(replies: Vec<Result<String, GenerationError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str, _credential: &Credential) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::QuotaExhausted("quota".to_string())))
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

#[derive(Default)]
struct Recorder(Mutex<Vec<PipelineStatus>>);

impl StatusReporter for Recorder {
    fn report(&self, status: &PipelineStatus) {
        self.0.lock().unwrap().push(status.clone());
    }
}

fn session() -> (SessionContext, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    (SessionContext::new(recorder.clone()), recorder)
}

fn blank_pdf() -> Vec<u8> {
    use printpdf::{Mm, PdfDocument};

    let (doc, _page, _layer) = PdfDocument::new("Blank CV", Mm(210.0), Mm(297.0), "Layer 1");
    doc.save_to_bytes().unwrap()
}

fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::FileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

fn inputs(document: Option<SourceDocument>, job_description: &str) -> TailoringInputs {
    TailoringInputs {
        credential: Some(Credential::new("k").unwrap()),
        document,
        job_description: job_description.to_string(),
        tone: Tone::Professional,
    }
}

#[tokio::test]
async fn test_empty_pdf_reaches_generation_with_empty_cv_segment() {
    let pipeline = TailoringPipeline::new(
        FakeGenerator::replying(vec![Ok("Go Engineer CV".to_string())]),
        RetryPolicy::default(),
    );
    let (session, recorder) = session();
    let document = SourceDocument::new("cv.pdf", DocumentKind::Pdf, blank_pdf());

    let report = pipeline
        .run(&session, inputs(Some(document), "Senior Go Engineer"))
        .await
        .unwrap();

    let prompts = pipeline.generator().prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("<CV>\n\n</CV>"));
    assert!(prompts[0].contains("Senior Go Engineer"));
    assert!(prompts[0].contains("TONE: Professional/Corporate"));

    assert_eq!(report.result, GenerationResult::Tailored("Go Engineer CV".to_string()));
    assert_eq!(report.metadata.attempts, 1);
    assert_eq!(report.metadata.cv_characters, 0);
    assert_eq!(report.metadata.model, "fake-model");

    let statuses = recorder.0.lock().unwrap();
    assert_eq!(statuses.first(), Some(&PipelineStatus::Extracting { kind: DocumentKind::Pdf }));
    assert_eq!(statuses.last(), Some(&PipelineStatus::Classifying));
}

#[tokio::test]
async fn test_docx_mismatch_is_reported_verbatim() {
    let alert = "⚠️ RELEVANCE ALERT: This JD is a significant mismatch.";
    let pipeline = TailoringPipeline::new(
        FakeGenerator::replying(vec![Ok(alert.to_string())]),
        RetryPolicy::default(),
    );
    let (session, _) = session();
    let document = SourceDocument::new(
        "cv.docx",
        DocumentKind::Docx,
        docx(&["Jane Doe", "Pastry Chef", "Croissants at scale"]),
    );

    let report = pipeline
        .run(&session, inputs(Some(document), "Senior Go Engineer"))
        .await
        .unwrap();

    assert_eq!(report.result, GenerationResult::Mismatch(alert.to_string()));
    assert!(pipeline.generator().prompts()[0]
        .contains("<CV>\nJane Doe Pastry Chef Croissants at scale\n</CV>"));
}

#[tokio::test]
async fn test_missing_credential_halts_before_any_work() {
    let pipeline = TailoringPipeline::new(FakeGenerator::replying(vec![]), RetryPolicy::default());
    let (session, recorder) = session();
    let mut request = inputs(
        Some(SourceDocument::new("cv.pdf", DocumentKind::Pdf, blank_pdf())),
        "Senior Go Engineer",
    );
    request.credential = None;

    let err = pipeline.run(&session, request).await.unwrap_err();

    assert!(matches!(err, TailorError::MissingCredential));
    assert!(pipeline.generator().prompts().is_empty());
    assert!(recorder.0.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_document_or_job_description() {
    let pipeline = TailoringPipeline::new(FakeGenerator::replying(vec![]), RetryPolicy::default());
    let (session, _) = session();

    let err = pipeline
        .run(&session, inputs(None, "Senior Go Engineer"))
        .await
        .unwrap_err();
    assert!(matches!(err, TailorError::MissingInput(_)));

    let document = SourceDocument::new("cv.docx", DocumentKind::Docx, docx(&["Jane"]));
    let err = pipeline
        .run(&session, inputs(Some(document), "  \n "))
        .await
        .unwrap_err();
    assert!(matches!(err, TailorError::MissingInput(_)));

    assert!(pipeline.generator().prompts().is_empty());
}

#[test]
fn test_prepare_rejects_blank_job_description() {
    let pipeline = TailoringPipeline::new(FakeGenerator::replying(vec![]), RetryPolicy::default());
    let (session, recorder) = session();
    let document = SourceDocument::new("cv.docx", DocumentKind::Docx, docx(&["Jane Doe"]));

    for job_description in ["", " \n\t "] {
        let err = pipeline
            .prepare(&session, &document, job_description, Tone::Technical)
            .unwrap_err();
        assert!(matches!(err, TailorError::MissingInput(_)));
    }

    assert!(recorder.0.lock().unwrap().is_empty());
    assert!(pipeline.generator().prompts().is_empty());
}

#[tokio::test]
async fn test_corrupt_document_is_not_sent() {
    let pipeline = TailoringPipeline::new(FakeGenerator::replying(vec![]), RetryPolicy::default());
    let (session, _) = session();
    let document = SourceDocument::new("cv.docx", DocumentKind::Docx, b"garbage".to_vec());

    let err = pipeline
        .run(&session, inputs(Some(document), "Senior Go Engineer"))
        .await
        .unwrap_err();

    assert!(matches!(err, TailorError::CorruptDocument(_)));
    assert!(pipeline.generator().prompts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_persistent_quota_exhausts_after_ceiling() {
    let pipeline = TailoringPipeline::new(FakeGenerator::replying(vec![]), RetryPolicy::default());
    let (session, recorder) = session();
    let document = SourceDocument::new("cv.docx", DocumentKind::Docx, docx(&["Jane Doe"]));

    let err = pipeline
        .run(&session, inputs(Some(document), "Senior Go Engineer"))
        .await
        .unwrap_err();

    assert!(matches!(err, TailorError::QuotaExhausted { attempts: 4 }));
    assert_eq!(pipeline.generator().prompts().len(), 4);
    let waits = recorder
        .0
        .lock()
        .unwrap()
        .iter()
        .filter(|s| matches!(s, PipelineStatus::QuotaWait { .. }))
        .count();
    assert_eq!(waits, 4);
}

#[tokio::test]
async fn test_job_description_from_text_file() {
    let text = InputManager::new()
        .read_job_description(Path::new("tests/fixtures/sample_job.txt"))
        .await
        .unwrap();

    assert!(text.contains("Senior Go Engineer"));
    assert!(text.contains("PostgreSQL"));
}

#[tokio::test]
async fn test_job_description_from_markdown_file() {
    let text = InputManager::new()
        .read_job_description(Path::new("tests/fixtures/sample_job.md"))
        .await
        .unwrap();

    assert!(text.contains("Senior Go Engineer"));
    assert!(text.contains("Kubernetes"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_unsupported_cv_file_type() {
    let err = InputManager::new()
        .load_document(Path::new("tests/fixtures/unsupported.xyz"))
        .await
        .unwrap_err();

    assert!(matches!(err, TailorError::UnsupportedFormat(_)));
}

#[tokio::test]
async fn test_nonexistent_cv_file() {
    let err = InputManager::new()
        .load_document(Path::new("tests/fixtures/nonexistent.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, TailorError::MissingInput(_)));
}

#[tokio::test]
async fn test_load_document_resolves_kind_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Resume.DOCX");
    std::fs::write(&path, docx(&["Jane Doe"])).unwrap();

    let document = InputManager::new().load_document(&path).await.unwrap();

    assert_eq!(document.kind, DocumentKind::Docx);
    assert_eq!(document.name, "Resume.DOCX");
    assert_eq!(cv_tailor::input::extract(&document).unwrap(), "Jane Doe");
}
