use std::sync::LazyLock;

use regex::Regex;

static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitResult {
    pub table_markdown: String,
    pub summary_text: String,
}

fn is_table_line(s: &str) -> bool {
    s.trim().starts_with('|')
}

/// Separates the markdown table from the prose that follows it.
///
/// The first run of consecutive blank-line-separated blocks starting with `|`
/// is the table; the blocks after it are the summary and anything before it
/// is dropped. Without such a block every `|` line goes to the table and every
/// other non-blank line to the summary.
pub fn split(text: &str) -> SplitResult {
    let blocks: Vec<&str> = BLOCK_BREAK.split(text).collect();

    let Some(start) = blocks.iter().position(|b| is_table_line(b)) else {
        return split_lines(text);
    };

    let end = blocks[start..]
        .iter()
        .take_while(|b| is_table_line(b))
        .count()
        + start;

    SplitResult {
        table_markdown: blocks[start..end].join("\n"),
        summary_text: blocks[end..].join("\n\n").trim().to_string(),
    }
}

fn split_lines(text: &str) -> SplitResult {
    let (table, summary): (Vec<&str>, Vec<&str>) = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .partition(|l| is_table_line(l));

    SplitResult {
        table_markdown: table.join("\n"),
        summary_text: summary.join("\n").trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TABLE: &str = "| Attribute | Stripe | Adyen |\n|---|---|---|\n| CEO | Patrick Collison | Pieter van der Does |";

    #[test]
    fn contiguous_table_then_summary() {
        let text = format!("{TABLE}\n\nStripe leads in developer reach.\n\n\nAdyen is profitable.\n");
        let result = split(&text);
        assert_eq!(result.table_markdown, TABLE);
        assert_eq!(
            result.summary_text,
            "Stripe leads in developer reach.\n\nAdyen is profitable."
        );
    }

    #[test]
    fn text_before_table_is_dropped() {
        let text = format!("Here is the comparison:\n\n{TABLE}\n\nSummary line.");
        let result = split(&text);
        assert_eq!(result.table_markdown, TABLE);
        assert_eq!(result.summary_text, "Summary line.");
    }

    #[test]
    fn adjacent_table_blocks_are_joined() {
        let text = "| a | b |\n|---|---|\n\n| 1 | 2 |\n\nDone.";
        let result = split(text);
        assert_eq!(result.table_markdown, "| a | b |\n|---|---|\n| 1 | 2 |");
        assert_eq!(result.summary_text, "Done.");
    }

    #[test]
    fn only_first_table_run_counts() {
        let text = "| a |\n|---|\n\nMiddle.\n\n| later |";
        let result = split(text);
        assert_eq!(result.table_markdown, "| a |\n|---|");
        assert_eq!(result.summary_text, "Middle.\n\n| later |");
    }

    #[test]
    fn table_reaching_end_leaves_summary_empty() {
        let result = split(TABLE);
        assert_eq!(result.table_markdown, TABLE);
        assert_eq!(result.summary_text, "");
    }

    #[test]
    fn scattered_pipe_lines_fall_back_to_line_split() {
        let text = "Intro line\n| a | b |\nmiddle\n  | 1 | 2 |\n\nclosing";
        let result = split(text);
        assert_eq!(result.table_markdown, "| a | b |\n  | 1 | 2 |");
        assert_eq!(result.summary_text, "Intro line\nmiddle\nclosing");
    }

    #[test]
    fn no_pipes_means_no_table() {
        let result = split("Unable to compare: the names look invalid.");
        assert_eq!(result.table_markdown, "");
        assert_eq!(result.summary_text, "Unable to compare: the names look invalid.");
    }

    #[test]
    fn empty_input() {
        assert_eq!(split(""), SplitResult::default());
    }
}
