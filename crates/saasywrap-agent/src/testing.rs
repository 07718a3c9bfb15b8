// ABOUTME: Test utilities for saasywrap-agent, including a scripted stub chat model.
// ABOUTME: Used in tests to simulate model completions without real API calls.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::{ChatModel, ChatRequest, ModelError};

/// A stub chat model that returns pre-scripted choice lists in order.
///
/// Each call to `complete` pops the next scripted list regardless of the
/// request contents; an exhausted queue errors, which doubles as proof in
/// tests that no further model call was made.
pub struct StubModel {
    queue: Mutex<VecDeque<Vec<String>>>,
}

impl StubModel {
    /// Script the stub with one choice list per expected call.
    pub fn new(responses: Vec<Vec<String>>) -> Self {
        Self {
            queue: Mutex::new(responses.into()),
        }
    }

    /// Convenience constructor for a single call returning a single choice.
    pub fn single(text: &str) -> Self {
        Self::new(vec![vec![text.to_string()]])
    }
}

#[async_trait]
impl ChatModel for StubModel {
    async fn complete(&self, _request: &ChatRequest) -> Result<Vec<String>, ModelError> {
        let mut queue = self
            .queue
            .lock()
            .map_err(|_| ModelError::Provider("stub queue poisoned".to_string()))?;
        queue
            .pop_front()
            .ok_or_else(|| ModelError::Provider("stub model exhausted".to_string()))
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}
