use async_trait::async_trait;
use tracing::warn;

use crate::api::payloads::Symbol;
use crate::client::api_client::ClientError;

/// Query run when the edit dialog opens.
pub const DEFAULT_QUERY: &str = "cats";

#[async_trait]
pub trait SymbolSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<Symbol>, ClientError>;
}

/// Image picker state inside the card edit dialog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolSearch {
    pub input: String,
    /// Query the current results belong to.
    pub label: String,
    pub results: Vec<Symbol>,
    pub loading: bool,
    pub error: Option<String>,
    pub selected: Option<String>,
}

impl SymbolSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn can_search(&self) -> bool {
        !self.loading && !self.input.trim().is_empty()
    }

    pub async fn load_initial(&mut self, source: &dyn SymbolSource) {
        self.run(source, DEFAULT_QUERY.to_string()).await;
    }

    /// Searches for the typed input. Blank input is ignored.
    pub async fn submit(&mut self, source: &dyn SymbolSource) {
        if !self.can_search() {
            return;
        }
        let query = self.input.trim().to_string();
        self.run(source, query).await;
    }

    async fn run(&mut self, source: &dyn SymbolSource, query: String) {
        self.loading = true;
        self.error = None;

        match source.search(&query).await {
            Ok(results) => {
                self.results = results;
                self.label = query;
            }
            Err(e) => {
                warn!("Symbol search for {query:?} failed: {e}");
                self.results.clear();
                self.error = Some(format!("Error fetching images: {e}"));
            }
        }

        self.loading = false;
    }

    pub fn heading(&self) -> String {
        if self.label.is_empty() {
            "Results for: Cats".to_string()
        } else {
            format!("Results for: {}", self.label)
        }
    }

    pub fn select(&mut self, image_url: impl Into<String>) {
        self.selected = Some(image_url.into());
    }

    pub fn selection_label(&self) -> &'static str {
        if self.selected.is_some() {
            "Image Selected"
        } else {
            "None selected"
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use reqwest::StatusCode;
    use std::sync::Mutex;

    /// Answers every query with one symbol named after it, or fails when
    /// `failing` is set.
    #[derive(Debug, Default)]
    pub struct EchoSource {
        pub failing: bool,
        pub queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SymbolSource for EchoSource {
        async fn search(&self, query: &str) -> Result<Vec<Symbol>, ClientError> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.failing {
                return Err(ClientError::Api {
                    status: StatusCode::BAD_GATEWAY,
                    message: "Failed to fetch symbols".to_string(),
                });
            }
            Ok(vec![Symbol {
                image_url: format!("https://img/{query}.png"),
                name: query.to_string(),
            }])
        }
    }
}
