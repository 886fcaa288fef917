//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use storefront_harvest::domain::errors::{ExtractionError, ExtractionResult};
use storefront_harvest::domain::dataset::Dataset;
use storefront_harvest::domain::{FetchKind, PageFetcher};

/// Canned responses keyed by URL; unknown URLs fail like a refused connection
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    responses: HashMap<String, Result<String, u16>>,
    calls: Arc<Mutex<Vec<(String, FetchKind)>>>,
}

impl ScriptedFetcher {
    pub fn respond(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Err(status));
        self
    }

    pub fn calls(&self) -> Vec<(String, FetchKind)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str, kind: FetchKind) -> ExtractionResult<String> {
        self.calls.lock().unwrap().push((url.to_string(), kind));
        match self.responses.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(ExtractionError::fetch(url, Some(*status), "scripted failure")),
            None => Err(ExtractionError::fetch(url, None, "connection refused")),
        }
    }
}

pub fn dataset(columns: &[&str], rows: &[&[&str]]) -> Dataset {
    Dataset::with_rows(
        columns.iter().map(|c| (*c).to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|c| (*c).to_string()).collect())
            .collect(),
    )
}
