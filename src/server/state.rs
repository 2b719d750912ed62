use std::sync::Arc;
use std::time::Instant;

use crate::compare::Comparator;
use crate::config::Config;
use crate::report::PdfRenderer;

use super::rate_limit::{Clock, FixedWindowLimiter, RateLimitPolicy, SystemClock};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub comparator: Arc<Comparator>,
    pub pdf: Option<Arc<PdfRenderer>>,
    pub general_limiter: Arc<FixedWindowLimiter>,
    pub compare_limiter: Arc<FixedWindowLimiter>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: Config, clock: Arc<dyn Clock>) -> Self {
        let general_limiter = FixedWindowLimiter::new(
            RateLimitPolicy {
                max: config.general_rate_limit,
                window: config.rate_limit_window,
                message: "Too many requests from this IP address. Please try again later.",
                report_limit: false,
            },
            clock.clone(),
        );
        let compare_limiter = FixedWindowLimiter::new(
            RateLimitPolicy {
                max: config.compare_rate_limit,
                window: config.rate_limit_window,
                message: "You have made too many comparison requests. Please wait before trying again.",
                report_limit: true,
            },
            clock,
        );

        let pdf = match PdfRenderer::load(&config.pdf_font_dir, &config.pdf_font_family) {
            Ok(renderer) => Some(Arc::new(renderer)),
            Err(e) => {
                tracing::warn!(error = %e, "PDF downloads are disabled");
                None
            }
        };

        Self {
            comparator: Arc::new(Comparator::new(&config)),
            config: Arc::new(config),
            pdf,
            general_limiter: Arc::new(general_limiter),
            compare_limiter: Arc::new(compare_limiter),
            started_at: Instant::now(),
        }
    }
}
