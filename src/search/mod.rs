pub mod tavily;

use std::time::Instant;

pub use tavily::{SearchHit, SearchResult, TavilyClient, MAX_SOURCES};

const EXCERPT_CHARS: usize = 500;

/// One topical query issued for a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSlice {
    pub label: &'static str,
    pub query: String,
}

/// The three fixed queries, in the order their sections appear in the context.
pub fn slices(company_a: &str, company_b: &str) -> [SearchSlice; 3] {
    [
        SearchSlice {
            label: "Company Overview",
            query: format!("{company_a} vs {company_b} company overview founded headquarters CEO"),
        },
        SearchSlice {
            label: "Market and Funding",
            query: format!(
                "{company_a} {company_b} market position market share funding valuation revenue"
            ),
        },
        SearchSlice {
            label: "Products and Achievements",
            query: format!(
                "{company_a} {company_b} key products services notable achievements recent news"
            ),
        },
    ]
}

pub struct SearchAggregator {
    client: TavilyClient,
}

impl SearchAggregator {
    pub fn new(client: TavilyClient) -> Self {
        Self { client }
    }

    /// Runs all three slices concurrently and returns the combined context.
    /// Failed slices are dropped; the result may be empty.
    pub async fn gather(&self, company_a: &str, company_b: &str) -> String {
        let start = Instant::now();
        let [overview, market, products] = slices(company_a, company_b);

        let (r1, r2, r3) = tokio::join!(
            self.try_search(&overview),
            self.try_search(&market),
            self.try_search(&products),
        );

        let sections = [(overview, r1), (market, r2), (products, r3)];
        let succeeded = sections.iter().filter(|(_, r)| r.is_some()).count();
        tracing::info!(
            succeeded,
            search_latency_ms = start.elapsed().as_millis() as u64,
            "web search finished"
        );

        format_context(&sections)
    }

    async fn try_search(&self, slice: &SearchSlice) -> Option<SearchResult> {
        match self.client.search(&slice.query).await {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(slice = slice.label, error = %e, "search query failed");
                None
            }
        }
    }
}

/// Joins the successful slices into one context block, in slice order.
pub fn format_context(sections: &[(SearchSlice, Option<SearchResult>)]) -> String {
    sections
        .iter()
        .filter_map(|(slice, result)| {
            result
                .as_ref()
                .map(|result| format_section(slice.label, result))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_section(label: &str, result: &SearchResult) -> String {
    let mut lines = vec![format!("### {label}")];

    if let Some(answer) = result.answer.as_deref().map(str::trim) {
        if !answer.is_empty() {
            lines.push(format!("Answer: {answer}"));
        }
    }

    for (i, hit) in result.results.iter().take(MAX_SOURCES).enumerate() {
        lines.push(format!("Source {}: {}", i + 1, hit.title));
        lines.push(format!("URL: {}", hit.url));
        lines.push(format!("Content: {}", hit.content));
        if let Some(raw) = hit.raw_content.as_deref() {
            lines.push(format!("Excerpt: {}", truncate_chars(raw, EXCERPT_CHARS)));
        }
    }

    lines.join("\n")
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hit(n: usize, raw: Option<String>) -> SearchHit {
        SearchHit {
            title: format!("Title {n}"),
            url: format!("https://example.org/{n}"),
            content: format!("Snippet {n}"),
            raw_content: raw,
        }
    }

    #[test]
    fn every_slice_names_both_companies() {
        for slice in slices("Stripe", "Adyen") {
            assert!(slice.query.contains("Stripe"), "{}", slice.query);
            assert!(slice.query.contains("Adyen"), "{}", slice.query);
        }
    }

    #[test]
    fn failed_slices_contribute_nothing() {
        let [a, b, c] = slices("Stripe", "Adyen");
        let sections = [
            (a, None),
            (
                b,
                Some(SearchResult {
                    answer: Some("Adyen is listed.".into()),
                    results: vec![hit(1, None)],
                }),
            ),
            (c, None),
        ];

        assert_eq!(
            format_context(&sections),
            "### Market and Funding\n\
             Answer: Adyen is listed.\n\
             Source 1: Title 1\n\
             URL: https://example.org/1\n\
             Content: Snippet 1"
        );
    }

    #[test]
    fn all_failed_is_empty() {
        let sections = slices("Stripe", "Adyen").map(|s| (s, None::<SearchResult>));
        assert_eq!(format_context(&sections), "");
    }

    #[test]
    fn sections_keep_query_order_and_blank_line_separators() {
        let ok = || Some(SearchResult { answer: None, results: vec![] });
        let sections = slices("Stripe", "Adyen").map(|s| (s, ok()));
        assert_eq!(
            format_context(&sections),
            "### Company Overview\n\n### Market and Funding\n\n### Products and Achievements"
        );
    }

    #[test]
    fn caps_sources_and_truncates_excerpts() {
        let long: String = "é".repeat(EXCERPT_CHARS + 20);
        let result = SearchResult {
            answer: None,
            results: (1..=5).map(|n| hit(n, Some(long.clone()))).collect(),
        };
        let section = format_section("Company Overview", &result);

        assert!(section.contains("Source 3: Title 3"));
        assert!(!section.contains("Source 4"));
        let excerpt = section
            .lines()
            .find(|l| l.starts_with("Excerpt: "))
            .unwrap()
            .trim_start_matches("Excerpt: ");
        assert_eq!(excerpt.chars().count(), EXCERPT_CHARS);
    }
}
