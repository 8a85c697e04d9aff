//! Client for the external generation API used by the recommendation
//! feature.
//!
//! The adapter is fail-open by design of the feature's contract: every
//! failure mode (missing key, transport error, unusable reply) is raised as
//! [`EngineError::ExternalService`] and absorbed by the recommendation
//! operation, which falls back to [`default_report`].

use std::time::Duration;

use serde::Deserialize;

use crate::{EngineError, ResultEngine, Transaction, TransactionKind, summary};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-pro";
const PLACEHOLDER_KEY: &str = "your-gemini-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Terminal payload of the recommendation feature, either parsed from the
/// generation API or the canned fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub recommendations: Vec<String>,
    pub summary: String,
}

/// The fixed payload served whenever a live recommendation cannot be
/// produced.
pub fn default_report() -> Report {
    Report {
        recommendations: vec![
            "Track your expenses regularly to identify spending patterns".to_string(),
            "Set up a monthly budget and stick to it".to_string(),
            "Review your subscriptions and cancel unused services".to_string(),
            "Build an emergency fund covering 3-6 months of expenses".to_string(),
        ],
        summary: "Start tracking your finances to get personalized recommendations".to_string(),
    }
}

#[derive(Debug)]
pub struct Advisor {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl Advisor {
    pub fn new(api_key: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// An advisor without credentials. Every generate call fails, so callers
    /// always end up on the default payload.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Calls the generation API and returns the raw candidate text.
    pub(crate) async fn generate(&self, prompt: &str) -> ResultEngine<String> {
        let Some(key) = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_KEY)
        else {
            return Err(EngineError::ExternalService(
                "generation api key is not configured".to_string(),
            ));
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 1024,
                "responseMimeType": "application/json",
            },
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                EngineError::ExternalService(format!("generation request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::ExternalService(format!(
                "generation api returned {status}"
            )));
        }

        let payload: serde_json::Value = response.json().await.map_err(|err| {
            EngineError::ExternalService(format!("unreadable generation reply: {err}"))
        })?;

        candidate_text(&payload).ok_or_else(|| {
            EngineError::ExternalService("generation reply missing candidate text".to_string())
        })
    }
}

fn candidate_text(payload: &serde_json::Value) -> Option<String> {
    payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}

/// Builds the analysis prompt from the trailing-quarter transactions.
pub(crate) fn build_prompt(transactions: &[Transaction]) -> String {
    let mut prompt = String::new();
    prompt.push_str(
        "Analyze the following financial transactions and provide personalized recommendations. ",
    );
    prompt.push_str(
        "Return ONLY valid JSON in this exact format: \
         {\"recommendations\": [\"rec1\", \"rec2\", ...], \"summary\": \"brief summary\"}\n\n",
    );
    prompt.push_str("Transactions:\n");

    let by_category = summary::expenses_by_category(transactions);
    let mut categories: Vec<_> = by_category.iter().collect();
    categories.sort_by(|a, b| a.0.cmp(b.0));

    prompt.push_str("Expense Categories:\n");
    for (category, amount_minor) in categories {
        prompt.push_str(&format!(
            "- {category}: {}\n",
            format_minor(*amount_minor)
        ));
    }

    let total_income = summary::sum_by_kind(transactions, TransactionKind::Income);
    let total_expense = summary::sum_by_kind(transactions, TransactionKind::Expense);
    prompt.push_str(&format!("\nTotal Income: {}\n", format_minor(total_income)));
    prompt.push_str(&format!("Total Expense: {}\n", format_minor(total_expense)));

    prompt.push_str(
        "\nProvide 3-5 actionable financial recommendations and a brief summary. \
         Focus on savings, budgeting, and expense optimization. \
         Return ONLY valid JSON, no markdown, no code blocks.",
    );

    prompt
}

fn format_minor(minor: i64) -> String {
    format!("{}.{:02}", minor / 100, (minor % 100).abs())
}

#[derive(Debug, Deserialize)]
struct RawReply {
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    summary: Option<String>,
}

/// The model may wrap its JSON in extra prose; keep only the substring
/// between the first `{` and the last `}`.
pub(crate) fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses the candidate text into a [`Report`]. Returns `None` when the
/// reply is unusable (no JSON, malformed JSON, empty recommendation list).
pub(crate) fn parse_report(text: &str) -> Option<Report> {
    let raw = extract_json(text)?;
    let reply: RawReply = serde_json::from_str(raw).ok()?;
    if reply.recommendations.is_empty() {
        return None;
    }
    Some(Report {
        recommendations: reply.recommendations,
        summary: reply
            .summary
            .unwrap_or_else(|| "No summary available".to_string()),
    })
}
