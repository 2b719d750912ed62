use super::table::{parse_table, TableError};

pub const NO_TABLE: &str = "<p>No table data available</p>";
pub const INVALID_TABLE: &str = "<p>Invalid table format</p>";
pub const NO_SUMMARY: &str = "No summary available.";

/// Renders the table block as a `comparison-table`. Empty or single-line input
/// yields a placeholder paragraph instead of a partial table.
pub fn table_to_html(table_markdown: &str) -> String {
    let table = match parse_table(table_markdown) {
        Ok(table) => table,
        Err(TableError::Empty) => return NO_TABLE.to_string(),
        Err(TableError::TooShort) => return INVALID_TABLE.to_string(),
    };

    let mut html = String::from("<table class=\"comparison-table\"><thead><tr>");
    for header in &table.headers {
        html.push_str(&format!("<th>{}</th>", escape(header)));
    }
    html.push_str("</tr></thead><tbody>");

    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

pub fn summary_to_html(summary_text: &str) -> String {
    let summary = summary_text.trim();
    if summary.is_empty() {
        return format!("<p>{NO_SUMMARY}</p>");
    }
    format!("<p>{}</p>", escape(summary))
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_header_row_one_body_row() {
        let html = table_to_html("|A|B|C|\n|---|---|---|\n|1|2|3|");
        assert_eq!(
            html,
            "<table class=\"comparison-table\"><thead><tr>\
             <th>A</th><th>B</th><th>C</th></tr></thead><tbody>\
             <tr><td>1</td><td>2</td><td>3</td></tr></tbody></table>"
        );
        assert!(!html.contains("---"));
        assert_eq!(html.matches("<th>").count(), 3);
        assert_eq!(html.matches("<tr>").count(), 2);
    }

    #[test]
    fn placeholders_for_missing_or_short_tables() {
        assert_eq!(table_to_html(""), NO_TABLE);
        assert_eq!(table_to_html("| only header |"), INVALID_TABLE);
    }

    #[test]
    fn cell_text_is_escaped() {
        let html = table_to_html("| Name |\n|---|\n| AT&T <Mobility> |");
        assert!(html.contains("<td>AT&amp;T &lt;Mobility&gt;</td>"));
    }

    #[test]
    fn summary_placeholder_when_empty() {
        assert_eq!(summary_to_html("  \n"), "<p>No summary available.</p>");
        assert_eq!(summary_to_html("Stripe leads."), "<p>Stripe leads.</p>");
    }
}
