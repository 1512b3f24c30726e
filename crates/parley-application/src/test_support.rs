//! Hand-written gateway and repository doubles shared by the unit tests.

use async_trait::async_trait;
use parley_core::ParleyError;
use parley_core::capability::{
    Availability, Capability, CapabilityGateway, CapabilityReport, SummarizeOptions,
};
use parley_core::chat::{ConversationRepository, Message};
use parley_core::error::Result;
use parley_core::language::DetectedLanguage;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

pub fn readily() -> CapabilityReport {
    CapabilityReport {
        language_detector: Availability::Readily,
        translator: Availability::Readily,
        summarizer: Availability::Readily,
    }
}

// Mock CapabilityGateway for testing
pub struct MockGateway {
    report: Mutex<Result<CapabilityReport>>,
    prepare_error: Mutex<Option<ParleyError>>,
    detections: Mutex<HashMap<String, Result<Vec<DetectedLanguage>>>>,
    translations: Mutex<VecDeque<Result<String>>>,
    summaries: Mutex<VecDeque<Result<String>>>,
    detect_delay: Mutex<Duration>,
    pub detect_calls: Mutex<Vec<String>>,
    pub translate_calls: Mutex<Vec<(String, String, String)>>,
    pub summarize_calls: Mutex<Vec<String>>,
    pub prepare_calls: Mutex<Vec<Capability>>,
}

impl MockGateway {
    pub fn new(report: CapabilityReport) -> Self {
        Self {
            report: Mutex::new(Ok(report)),
            prepare_error: Mutex::new(None),
            detections: Mutex::new(HashMap::new()),
            translations: Mutex::new(VecDeque::new()),
            summaries: Mutex::new(VecDeque::new()),
            detect_delay: Mutex::new(Duration::ZERO),
            detect_calls: Mutex::new(Vec::new()),
            translate_calls: Mutex::new(Vec::new()),
            summarize_calls: Mutex::new(Vec::new()),
            prepare_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn ready() -> Self {
        Self::new(readily())
    }

    pub fn failing_probe(error: ParleyError) -> Self {
        let gateway = Self::ready();
        *gateway.report.lock().unwrap() = Err(error);
        gateway
    }

    pub fn with_prepare_error(self, error: ParleyError) -> Self {
        *self.prepare_error.lock().unwrap() = Some(error);
        self
    }

    pub fn with_detection(self, text: &str, code: &str, confidence: f32) -> Self {
        self.detections
            .lock()
            .unwrap()
            .insert(text.to_string(), Ok(vec![DetectedLanguage::new(code, confidence)]));
        self
    }

    pub fn with_detection_error(self, text: &str) -> Self {
        self.detections
            .lock()
            .unwrap()
            .insert(text.to_string(), Err(ParleyError::gateway("detect", "boom")));
        self
    }

    pub fn with_detect_delay(self, delay: Duration) -> Self {
        *self.detect_delay.lock().unwrap() = delay;
        self
    }

    pub fn push_translation(&self, result: Result<String>) {
        self.translations.lock().unwrap().push_back(result);
    }

    pub fn push_summary(&self, result: Result<String>) {
        self.summaries.lock().unwrap().push_back(result);
    }

    pub fn detect_count(&self) -> usize {
        self.detect_calls.lock().unwrap().len()
    }

    pub fn translate_count(&self) -> usize {
        self.translate_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CapabilityGateway for MockGateway {
    async fn probe(&self) -> Result<CapabilityReport> {
        self.report.lock().unwrap().clone()
    }

    async fn prepare(&self, capability: Capability) -> Result<()> {
        self.prepare_calls.lock().unwrap().push(capability);
        match self.prepare_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn detect_language(&self, text: &str) -> Result<Vec<DetectedLanguage>> {
        self.detect_calls.lock().unwrap().push(text.to_string());
        let delay = *self.detect_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.detections
            .lock()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        self.translate_calls.lock().unwrap().push((
            text.to_string(),
            source.to_string(),
            target.to_string(),
        ));
        self.translations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ParleyError::gateway("translate", "no scripted reply")))
    }

    async fn summarize(&self, text: &str, _options: &SummarizeOptions) -> Result<String> {
        self.summarize_calls.lock().unwrap().push(text.to_string());
        self.summaries
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ParleyError::gateway("summarize", "no scripted reply")))
    }
}

// Mock ConversationRepository for testing
#[derive(Default)]
pub struct MemoryRepository {
    pub stored: Mutex<Option<Vec<Message>>>,
    pub saves: Mutex<usize>,
    pub clears: Mutex<usize>,
}

impl MemoryRepository {
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            stored: Mutex::new(Some(messages)),
            ..Self::default()
        }
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    pub fn clear_count(&self) -> usize {
        *self.clears.lock().unwrap()
    }
}

#[async_trait]
impl ConversationRepository for MemoryRepository {
    async fn load(&self) -> Result<Option<Vec<Message>>> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save(&self, messages: &[Message]) -> Result<()> {
        *self.stored.lock().unwrap() = Some(messages.to_vec());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.stored.lock().unwrap() = None;
        *self.clears.lock().unwrap() += 1;
        Ok(())
    }
}

/// Text long enough to be offered for summarization.
pub fn long_text() -> String {
    "Parley keeps a short log of messages and can enrich any of them. "
        .repeat(4)
        .trim_end()
        .to_string()
}
