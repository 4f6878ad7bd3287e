//! In-memory collaborators that record every call, for flow and handler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::Config;
use crate::convert::{ConvertError, ConvertedImage, PdfConverter};
use crate::errors::AnalyzeError;
use crate::ids::IdGenerator;
use crate::kv::{KvError, KvStore};
use crate::llm_client::{AiResponse, FeedbackClient, LlmError};
use crate::storage::{FileStore, StorageError, StoredFile, UploadFile};
use crate::upload::status::{AnalysisStep, StatusReporter};
use crate::upload::ResumeAnalyzer;

pub const TEST_ID: &str = "test-id-1";

pub fn pdf_file() -> UploadFile {
    UploadFile::new("resume.pdf", "application/pdf", Bytes::from_static(b"%PDF-1.7 fake"))
}

/// Stores uploads under `mem/{n}/{name}`. Can be told to fail the n-th upload (1-based).
#[derive(Default)]
pub struct FakeFileStore {
    pub uploads: Mutex<Vec<String>>,
    pub fail_on_upload: Option<usize>,
}

impl FakeFileStore {
    pub fn failing_on(n: usize) -> Self {
        Self {
            fail_on_upload: Some(n),
            ..Self::default()
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl FileStore for FakeFileStore {
    async fn upload(&self, file: &UploadFile) -> Result<StoredFile, StorageError> {
        let mut uploads = self.uploads.lock().unwrap();
        let n = uploads.len() + 1;
        let path = format!("mem/{n}/{}", file.name);
        uploads.push(path.clone());
        if self.fail_on_upload == Some(n) {
            return Err(StorageError::Upload {
                path,
                message: "simulated outage".to_string(),
            });
        }
        Ok(StoredFile {
            path,
            name: file.name.clone(),
            size: file.size(),
            content_type: file.content_type.clone(),
        })
    }

    async fn download(&self, path: &str) -> Result<Bytes, StorageError> {
        Err(StorageError::Download {
            path: path.to_string(),
            message: "not supported by fake".to_string(),
        })
    }
}

/// HashMap-backed store keeping a log of every `set`. Can be told to fail the
/// n-th `set` (1-based); a failed `set` is logged but stores nothing.
#[derive(Default)]
pub struct FakeKv {
    pub values: Mutex<HashMap<String, String>>,
    pub sets: Mutex<Vec<(String, String)>>,
    pub fail_on_set: Option<usize>,
}

impl FakeKv {
    pub fn failing_on(n: usize) -> Self {
        Self {
            fail_on_set: Some(n),
            ..Self::default()
        }
    }

    pub fn set_calls(&self) -> Vec<(String, String)> {
        self.sets.lock().unwrap().clone()
    }
}

#[async_trait]
impl KvStore for FakeKv {
    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut sets = self.sets.lock().unwrap();
        sets.push((key.to_string(), value.to_string()));
        if self.fail_on_set == Some(sets.len()) {
            return Err(KvError::Redis(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "simulated outage",
            ))));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }
}

pub enum ConvertBehavior {
    Image,
    NoImage,
    Fail,
}

pub struct FakeConverter {
    pub behavior: ConvertBehavior,
    pub calls: Mutex<usize>,
}

impl FakeConverter {
    pub fn new(behavior: ConvertBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl PdfConverter for FakeConverter {
    async fn convert(&self, _file: &UploadFile) -> Result<ConvertedImage, ConvertError> {
        *self.calls.lock().unwrap() += 1;
        match self.behavior {
            ConvertBehavior::Image => Ok(ConvertedImage {
                file: Some(UploadFile::new(
                    "resume.png",
                    "image/png",
                    Bytes::from_static(b"\x89PNG"),
                )),
            }),
            ConvertBehavior::NoImage => Ok(ConvertedImage { file: None }),
            ConvertBehavior::Fail => Err(ConvertError::CorruptPdf("simulated".to_string())),
        }
    }
}

/// Returns a fixed response (or `EmptyContent` when `None`) and records each request.
pub struct FakeAi {
    pub response: Option<AiResponse>,
    pub requests: Mutex<Vec<(String, String)>>,
}

impl FakeAi {
    pub fn replying(response: AiResponse) -> Self {
        Self {
            response: Some(response),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            response: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl FeedbackClient for FakeAi {
    async fn feedback(&self, path: &str, instructions: &str) -> Result<AiResponse, LlmError> {
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), instructions.to_string()));
        self.response.clone().ok_or(LlmError::EmptyContent)
    }
}

pub struct FixedIds;

impl IdGenerator for FixedIds {
    fn next_id(&self) -> String {
        TEST_ID.to_string()
    }
}

/// Records status strings in the order they were reported.
#[derive(Default)]
pub struct StatusHistory {
    pub texts: Mutex<Vec<String>>,
}

impl StatusHistory {
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.texts.lock().unwrap().last().cloned()
    }
}

impl StatusReporter for StatusHistory {
    fn on_step(&self, step: AnalysisStep) {
        self.texts
            .lock()
            .unwrap()
            .push(step.status_text().to_string());
    }

    fn on_failure(&self, error: &AnalyzeError) {
        self.texts
            .lock()
            .unwrap()
            .push(error.status_text().to_string());
    }
}

/// Handles to every fake, plus an analyzer wired to them.
pub struct Harness {
    pub files: Arc<FakeFileStore>,
    pub kv: Arc<FakeKv>,
    pub converter: Arc<FakeConverter>,
    pub ai: Arc<FakeAi>,
    pub analyzer: ResumeAnalyzer,
}

impl Harness {
    pub fn new(files: FakeFileStore, converter: ConvertBehavior, ai: FakeAi) -> Self {
        Self::build(files, FakeKv::default(), converter, ai)
    }

    pub fn with_kv(kv: FakeKv, converter: ConvertBehavior, ai: FakeAi) -> Self {
        Self::build(FakeFileStore::default(), kv, converter, ai)
    }

    fn build(files: FakeFileStore, kv: FakeKv, converter: ConvertBehavior, ai: FakeAi) -> Self {
        let files = Arc::new(files);
        let kv = Arc::new(kv);
        let converter = Arc::new(FakeConverter::new(converter));
        let ai = Arc::new(ai);
        let analyzer = ResumeAnalyzer::new(
            files.clone(),
            kv.clone(),
            converter.clone(),
            ai.clone(),
            Arc::new(FixedIds),
        );
        Self {
            files,
            kv,
            converter,
            ai,
            analyzer,
        }
    }

    pub fn succeeding(response: AiResponse) -> Self {
        Self::new(
            FakeFileStore::default(),
            ConvertBehavior::Image,
            FakeAi::replying(response),
        )
    }
}

pub fn test_config() -> Config {
    Config {
        redis_url: "redis://localhost".to_string(),
        s3_bucket: "resumes".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        s3_region: "us-east-1".to_string(),
        aws_access_key_id: "test".to_string(),
        aws_secret_access_key: "test".to_string(),
        anthropic_api_key: "test".to_string(),
        pdfium_lib_dir: None,
        render_max_pixels: 512,
        max_upload_bytes: 1024 * 1024,
        port: 0,
        rust_log: "debug".to_string(),
    }
}
