/// The exact reply the model is told to give when either name is not a real
/// company. It is a normal result, not an error.
pub const INVALID_COMPANY_SENTINEL: &str = "Unable to compare: One or both company names appear to be invalid or not found. Please verify the company names and try again.";

const TABLE_ROWS: &[&str] = &[
    "Industry",
    "Target Market",
    "Year Founded",
    "CEO",
    "Market Position",
    "Funding Status",
    "Key Products/Services",
    "Notable Achievements",
];

pub fn build_prompt(company_a: &str, company_b: &str, search_context: Option<&str>) -> String {
    let context_section = match search_context.map(str::trim) {
        Some(context) if !context.is_empty() => format!(
            r#"
Context Data:
The following information was gathered from recent web searches. Treat it as your primary source: where it conflicts with your prior knowledge, the Context Data takes precedence.

{context}
"#
        ),
        _ => String::new(),
    };

    let rows = TABLE_ROWS
        .iter()
        .map(|row| format!("| {row} | [data] | [data] |"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Role:
You are a professional business analyst with expertise in corporate research and competitive benchmarking.

Instruction:
Compare the two given companies: {company_a} and {company_b}.
{context_section}
Present your findings in a structured Markdown table with the following format:

| Attribute | {company_a} | {company_b} |
|-----------|-------------|-------------|
{rows}

After the table, provide a brief summary paragraph (3-5 sentences) highlighting which company leads in more areas or has notable strengths.

Guardrails:
- If either {company_a} or {company_b} is invalid, not a real company, or cannot be found, respond ONLY with: "{INVALID_COMPANY_SENTINEL}"
- Do not hallucinate data. Only use publicly available or commonly known information.
- If data is unavailable or inconsistent across sources, write "Data Not Available" in that specific table cell.
- Keep the tone objective, factual, and non-opinionated.
- Do not add extra commentary outside the table and summary."#
    )
}

/// Whether the model answered with the invalid-company sentinel.
pub fn is_rejection(response_text: &str) -> bool {
    let text = response_text.trim().trim_matches('"').trim();
    text == INVALID_COMPANY_SENTINEL
}
