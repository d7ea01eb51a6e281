use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use quiz_core::model::{Difficulty, Question, QuestionRequest, SelectionStrategy};

use crate::repository::{QuestionRecord, QuestionSource, ReportRecord, ResultSink, SourceError};

/// REST adapter for the platform backend.
///
/// Transport failures surface as `SourceError::Transport`; the engine never
/// silently substitutes embedded sample data. Offline runs go through
/// `InMemoryQuestionBank` instead.
#[derive(Clone)]
pub struct RestBackend {
    base_url: String,
    client: Client,
}

/// The API wraps payloads in a `{ data: ... }` envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct QuestionPage {
    questions: Vec<QuestionRecord>,
}

impl RestBackend {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn difficulty_param(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "easy",
        Difficulty::Medium => "medium",
        Difficulty::Hard => "hard",
    }
}

fn endpoint_for(strategy: SelectionStrategy) -> &'static str {
    match strategy {
        SelectionStrategy::WrongRetry => "/questions/wrong",
        SelectionStrategy::Favorites => "/favorites/questions",
        _ => "/questions",
    }
}

#[async_trait]
impl QuestionSource for RestBackend {
    async fn fetch_questions(
        &self,
        request: &QuestionRequest,
    ) -> Result<Vec<Question>, SourceError> {
        let mut params: Vec<(&str, String)> = vec![("limit", request.count.to_string())];
        if let Some(category) = &request.filters.category {
            params.push(("category", category.clone()));
        }
        if let Some(difficulty) = request.filters.difficulty {
            params.push(("difficulty", difficulty_param(difficulty).to_owned()));
        }
        if request.strategy == SelectionStrategy::Random {
            params.push(("random", "true".to_owned()));
        }

        let response = self
            .client
            .get(self.url(endpoint_for(request.strategy)))
            .query(&params)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let page: Envelope<QuestionPage> = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        page.data
            .questions
            .into_iter()
            .map(|record| record.into_question().map_err(SourceError::from))
            .collect()
    }
}

#[async_trait]
impl ResultSink for RestBackend {
    async fn submit_report(&self, report: &ReportRecord) -> Result<(), SourceError> {
        let response = self
            .client
            .post(self.url("/practice/records"))
            .json(report)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let backend = RestBackend::new("http://localhost:5000/api/");
        assert_eq!(backend.base_url(), "http://localhost:5000/api");
        assert_eq!(backend.url("/questions"), "http://localhost:5000/api/questions");
    }

    #[test]
    fn strategies_map_to_endpoints() {
        assert_eq!(endpoint_for(SelectionStrategy::Random), "/questions");
        assert_eq!(endpoint_for(SelectionStrategy::WrongRetry), "/questions/wrong");
        assert_eq!(
            endpoint_for(SelectionStrategy::Favorites),
            "/favorites/questions"
        );
    }
}
