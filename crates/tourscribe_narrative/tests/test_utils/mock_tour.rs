//! Scripted driver for writer/director tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tourscribe_core::{GenerateRequest, GenerateResponse, Output, ResponseFormat};
use tourscribe_error::{GeminiError, GeminiErrorKind, TourscribeError, TourscribeResult};
use tourscribe_interface::TourDriver;

/// A single scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Json(serde_json::Value),
    Error(GeminiErrorKind),
}

/// Driver that answers writer (text) and director (JSON) requests from
/// separate scripts.
///
/// Writer calls without a script reply with numbered narration that names
/// the stop. Director calls without a script approve. Scripts repeat their
/// last reply once exhausted.
#[derive(Clone, Default)]
pub struct MockTourDriver {
    writer: Vec<MockReply>,
    director: Vec<MockReply>,
    failing_stops: Vec<(String, GeminiErrorKind)>,
    delay: Option<Duration>,
    writer_calls: Arc<Mutex<usize>>,
    director_calls: Arc<Mutex<usize>>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

#[allow(dead_code)]
impl MockTourDriver {
    /// Numbered drafts, always approved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the writer's replies.
    pub fn with_writer(mut self, replies: Vec<MockReply>) -> Self {
        self.writer = replies;
        self
    }

    /// Script the director's replies.
    pub fn with_director(mut self, replies: Vec<MockReply>) -> Self {
        self.director = replies;
        self
    }

    /// Director that never approves.
    pub fn rejecting() -> Self {
        Self::new().with_director(vec![super::reject("Needs more detail.")])
    }

    /// Fail every writer call for the stop titled `title`.
    pub fn failing_on(mut self, title: &str, error: GeminiErrorKind) -> Self {
        self.failing_stops.push((title.to_string(), error));
        self
    }

    /// Sleep before every reply.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of writer calls so far.
    pub fn writer_calls(&self) -> usize {
        *self.writer_calls.lock().unwrap()
    }

    /// Number of director calls so far.
    pub fn director_calls(&self) -> usize {
        *self.director_calls.lock().unwrap()
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Prompts of requests with the given format, in order.
    pub fn prompts(&self, format: ResponseFormat) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| *r.response_format() == format)
            .map(|r| r.messages()[0].content().clone())
            .collect()
    }

    fn scripted(script: &[MockReply], call: usize) -> Option<MockReply> {
        script.get(call).or_else(|| script.last()).cloned()
    }

    fn reply(reply: MockReply) -> TourscribeResult<GenerateResponse> {
        match reply {
            MockReply::Text(text) => Ok(GenerateResponse::new(vec![Output::Text(text)])),
            MockReply::Json(value) => Ok(GenerateResponse::new(vec![Output::Json(value)])),
            MockReply::Error(kind) => Err(TourscribeError::from(GeminiError::new(kind))),
        }
    }

    fn writer_reply(&self, req: &GenerateRequest) -> TourscribeResult<GenerateResponse> {
        let call = {
            let mut count = self.writer_calls.lock().unwrap();
            *count += 1;
            *count
        };
        let prompt = req.messages()[0].content();
        let title = prompt
            .lines()
            .find_map(|line| line.strip_prefix("Point Title: "))
            .unwrap_or("unknown")
            .to_string();

        if let Some((_, error)) = self.failing_stops.iter().find(|(t, _)| *t == title) {
            return Self::reply(MockReply::Error(error.clone()));
        }
        match Self::scripted(&self.writer, call - 1) {
            Some(reply) => Self::reply(reply),
            None => Self::reply(MockReply::Text(format!(
                "Narration for {} (draft {})",
                title, call
            ))),
        }
    }

    fn director_reply(&self) -> TourscribeResult<GenerateResponse> {
        let call = {
            let mut count = self.director_calls.lock().unwrap();
            *count += 1;
            *count
        };
        Self::reply(Self::scripted(&self.director, call - 1).unwrap_or_else(super::approve))
    }
}

#[async_trait]
impl TourDriver for MockTourDriver {
    async fn generate(&self, req: &GenerateRequest) -> TourscribeResult<GenerateResponse> {
        self.requests.lock().unwrap().push(req.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match req.response_format() {
            ResponseFormat::Text => self.writer_reply(req),
            ResponseFormat::Json => self.director_reply(),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-tour"
    }
}
