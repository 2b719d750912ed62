use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::Instrument;

use crate::config::Config;
use crate::error::AppError;
use crate::llm::{GeminiClient, Model};
use crate::prompt::{build_prompt, is_rejection};
use crate::report::{split, summary_to_html, table_to_html};
use crate::search::{SearchAggregator, TavilyClient};
use crate::validate::validate;

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);
const COMPLETION_TIMEOUT_WITH_CONTEXT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Default)]
pub struct ComparisonRequest {
    pub company_a: String,
    pub company_b: String,
    pub model: Option<String>,
    pub use_web_search: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResponse {
    pub success: bool,
    pub company_a: String,
    pub company_b: String,
    pub model: Model,
    pub response_text: String,
    pub timestamp: String,
    pub table_html: String,
    pub summary_html: String,
}

/// Runs one comparison: validate, optionally search, prompt, complete.
pub struct Comparator {
    gemini: Option<GeminiClient>,
    search: Option<SearchAggregator>,
}

impl Comparator {
    pub fn new(config: &Config) -> Self {
        let gemini = config
            .gemini_api_key
            .as_deref()
            .map(|key| GeminiClient::new(key, &config.gemini_base_url));
        let search = config
            .tavily_api_key
            .as_deref()
            .map(|key| SearchAggregator::new(TavilyClient::new(key, &config.tavily_base_url)));

        Self { gemini, search }
    }

    pub async fn compare(&self, request: ComparisonRequest) -> Result<ComparisonResponse, AppError> {
        let ComparisonRequest {
            company_a,
            company_b,
            model,
            use_web_search,
        } = request;
        let company_a = company_a.trim();
        let company_b = company_b.trim();

        if company_a.is_empty() || company_b.is_empty() {
            return Err(AppError::Validation(
                "Both Company A and Company B are required".into(),
            ));
        }
        if let Some(message) = validate(company_a, company_b) {
            return Err(AppError::Validation(message));
        }

        let model = Model::from_requested(model.as_deref());

        let Some(gemini) = &self.gemini else {
            tracing::error!("GEMINI_API_KEY is not set");
            return Err(AppError::Configuration);
        };

        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("compare", %run_id, company_a, company_b, %model);

        async {
            let context = if use_web_search {
                self.search_context(company_a, company_b).await
            } else {
                None
            };

            let prompt = build_prompt(company_a, company_b, context.as_deref());
            let timeout = if context.is_some() {
                COMPLETION_TIMEOUT_WITH_CONTEXT
            } else {
                COMPLETION_TIMEOUT
            };

            let llm_start = Instant::now();
            let response_text = gemini.complete(model, &prompt, timeout).await?;
            tracing::info!(
                llm_latency_ms = llm_start.elapsed().as_millis() as u64,
                with_context = context.is_some(),
                rejected = is_rejection(&response_text),
                "comparison completed"
            );

            let parts = split(&response_text);

            Ok::<_, AppError>(ComparisonResponse {
                success: true,
                company_a: company_a.to_string(),
                company_b: company_b.to_string(),
                model,
                table_html: table_to_html(&parts.table_markdown),
                summary_html: summary_to_html(&parts.summary_text),
                response_text,
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            })
        }
        .instrument(span)
        .await
    }

    async fn search_context(&self, company_a: &str, company_b: &str) -> Option<String> {
        let Some(search) = &self.search else {
            tracing::warn!("web search requested but TAVILY_API_KEY is not set");
            return None;
        };

        let context = search.gather(company_a, company_b).await;
        if context.trim().is_empty() {
            None
        } else {
            Some(context)
        }
    }
}
