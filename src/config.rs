use std::time::Duration;

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub tavily_api_key: Option<String>,
    pub tavily_base_url: String,
    pub port: u16,
    pub static_dir: String,
    pub production: bool,
    pub cors_origin: Option<String>,
    pub trust_proxy_hops: usize,
    pub rate_limit_window: Duration,
    pub general_rate_limit: u32,
    pub compare_rate_limit: u32,
    pub pdf_font_dir: String,
    pub pdf_font_family: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
            tavily_api_key: None,
            tavily_base_url: "https://api.tavily.com".into(),
            port: 3000,
            static_dir: "public".into(),
            production: false,
            cors_origin: None,
            trust_proxy_hops: 1,
            rate_limit_window: Duration::from_secs(15 * 60),
            general_rate_limit: 100,
            compare_rate_limit: 10,
            pdf_font_dir: "/usr/share/fonts/truetype/liberation".into(),
            pdf_font_family: "LiberationSans".into(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let environment = std::env::var("APP_ENV")
            .or_else(|_| std::env::var("NODE_ENV"))
            .unwrap_or_else(|_| "development".into());

        Ok(Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or(defaults.gemini_base_url),
            tavily_api_key: non_empty_var("TAVILY_API_KEY"),
            tavily_base_url: std::env::var("TAVILY_BASE_URL")
                .unwrap_or(defaults.tavily_base_url),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .context("PORT must be a port number")?,
            static_dir: std::env::var("STATIC_DIR").unwrap_or(defaults.static_dir),
            production: environment.eq_ignore_ascii_case("production"),
            cors_origin: non_empty_var("CORS_ORIGIN"),
            trust_proxy_hops: std::env::var("TRUST_PROXY_HOPS")
                .unwrap_or_else(|_| "1".into())
                .parse()
                .context("TRUST_PROXY_HOPS must be a number")?,
            rate_limit_window: Duration::from_secs(
                std::env::var("RATE_LIMIT_WINDOW_SECS")
                    .unwrap_or_else(|_| "900".into())
                    .parse()
                    .context("RATE_LIMIT_WINDOW_SECS must be a number")?,
            ),
            general_rate_limit: std::env::var("GENERAL_RATE_LIMIT")
                .unwrap_or_else(|_| "100".into())
                .parse()
                .context("GENERAL_RATE_LIMIT must be a number")?,
            compare_rate_limit: std::env::var("COMPARE_RATE_LIMIT")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .context("COMPARE_RATE_LIMIT must be a number")?,
            pdf_font_dir: std::env::var("PDF_FONT_DIR").unwrap_or(defaults.pdf_font_dir),
            pdf_font_family: std::env::var("PDF_FONT_FAMILY")
                .unwrap_or(defaults.pdf_font_family),
        })
    }

    pub fn web_search_enabled(&self) -> bool {
        self.tavily_api_key.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
