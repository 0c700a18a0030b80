use cdpchat_core::{ChannelError, Citation};
use serde::{Deserialize, Serialize};

/// Outbound request body: `{ "query": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }
}

/// One retrieved source as the answering engine reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSource {
    pub title: String,
    pub url: String,
    /// Documentation set the chunk came from; shown as the citation's source label
    pub cdp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk_text: Option<String>,
}

impl From<ContextSource> for Citation {
    fn from(source: ContextSource) -> Self {
        Citation { title: source.title, url: source.url, source_label: source.cdp }
    }
}

/// Success response body.
///
/// Every field is optional on the wire; [`QueryResponse::into_answer`] decides
/// what is usable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub context: Option<Vec<ContextSource>>,
    #[serde(default)]
    pub query_type: Option<String>,
}

impl QueryResponse {
    /// A response without an answer is unusable even if it decoded.
    pub fn into_answer(self) -> Result<Answer, ChannelError> {
        let text = self.answer.ok_or(ChannelError::MissingAnswer)?;
        let citations = self.context.unwrap_or_default().into_iter().map(Citation::from).collect();
        Ok(Answer { text, citations, query_type: self.query_type })
    }
}

/// Validated answer ready to merge into the transcript
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub citations: Vec<Citation>,
    pub query_type: Option<String>,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), citations: Vec::new(), query_type: None }
    }

    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }

    pub fn with_query_type(mut self, query_type: impl Into<String>) -> Self {
        self.query_type = Some(query_type.into());
        self
    }
}

/// Decode a response body and validate it.
pub fn parse_response_body(body: &str) -> Result<Answer, ChannelError> {
    serde_json::from_str::<QueryResponse>(body)
        .map_err(|e| ChannelError::malformed(e.to_string()))?
        .into_answer()
}
