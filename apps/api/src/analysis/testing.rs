//! Fakes and fixtures shared by the analysis and route tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};

use crate::analysis::extractor::{ExtractionError, TextExtractor};
use crate::analysis::upload::UploadedDocument;
use crate::llm_client::{CompletionClient, CompletionError, SamplingParams};

/// A well-formed analysis: 3 roles, 4 steps, 2 certifications, 4 skills.
pub fn sample_record_json() -> Value {
    json!({
        "eligibility": {
            "status": "Yes",
            "roles": ["Data Analyst", "Business Intelligence Analyst", "Junior Data Engineer"],
            "reason": "Python and SQL cover the core of entry-level analytics work. A CS degree in progress adds statistical grounding."
        },
        "roadmap": [
            "Step 1: Build two portfolio dashboards from public datasets",
            "Step 2: Learn pandas and data cleaning workflows in depth",
            "Step 3: Practice SQL window functions and query optimization",
            "Step 4: Apply for analytics internships with the portfolio"
        ],
        "suggestions": {
            "certifications": [
                "Google Data Analytics Professional Certificate",
                "Microsoft Certified: Power BI Data Analyst Associate"
            ],
            "technicalSkills": ["Power BI", "pandas", "Tableau", "dbt"]
        }
    })
}

enum FakeReply {
    Text(String),
    Unavailable,
}

/// Completion client that returns a canned reply and records every prompt.
pub struct FakeCompletionClient {
    reply: FakeReply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeCompletionClient {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(FakeReply::Text(text.into()))
    }

    pub fn failing() -> Self {
        Self::with_reply(FakeReply::Unavailable)
    }

    fn with_reply(reply: FakeReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        _params: &SamplingParams,
    ) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            FakeReply::Text(text) => Ok(text.clone()),
            FakeReply::Unavailable => Err(CompletionError::Api {
                status: 503,
                message: "service unavailable".to_string(),
            }),
        }
    }
}

/// Extractor that returns fixed text, or fails as if the PDF were corrupt.
pub struct FakeExtractor {
    text: Option<String>,
}

impl FakeExtractor {
    pub fn returning(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn unreadable() -> Self {
        Self { text: None }
    }
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract(&self, _document: &UploadedDocument) -> Result<String, ExtractionError> {
        self.text
            .clone()
            .ok_or_else(|| ExtractionError::Unreadable("corrupt xref table".to_string()))
    }
}

pub async fn upload_with(dir: &Path, data: &'static [u8]) -> UploadedDocument {
    UploadedDocument::persist(dir, Bytes::from_static(data), Some("resume.pdf".to_string()))
        .await
        .unwrap()
}

pub async fn pdf_upload(dir: &Path) -> UploadedDocument {
    upload_with(dir, b"%PDF-1.4\n% fake resume\n").await
}

/// Content stream that draws one line of Helvetica text.
pub fn text_page(line: &str) -> String {
    format!("BT /F1 12 Tf 72 720 Td ({line}) Tj ET")
}

/// Content stream with a filled rectangle and no text operators.
pub const SHAPES_ONLY_PAGE: &str = "0 0 1 rg 72 72 200 100 re f";

/// Builds a small uncompressed PDF with one page per content stream, in order,
/// and a correct cross-reference table.
pub fn minimal_pdf(pages: &[&str]) -> Vec<u8> {
    let mut objects = vec![
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            (0..pages.len())
                .map(|i| format!("{} 0 R", 4 + 2 * i))
                .collect::<Vec<_>>()
                .join(" "),
            pages.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];
    for (i, content) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ));
    }

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}

pub async fn upload_pdf_bytes(dir: &Path, data: Vec<u8>) -> UploadedDocument {
    UploadedDocument::persist(dir, Bytes::from(data), Some("resume.pdf".to_string()))
        .await
        .unwrap()
}
