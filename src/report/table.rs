#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("no table data")]
    Empty,
    #[error("table needs a header and a separator line")]
    TooShort,
}

impl Table {
    /// Widest row, header included. Rows are never checked against the header.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }
}

/// Splits a row on `|`, trims each segment and drops the empty ones.
pub fn cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Line 0 is the header, line 1 the separator (skipped unread), the rest data.
/// Blank lines are ignored; data rows without any cell are dropped.
pub fn parse_table(markdown: &str) -> Result<Table, TableError> {
    if markdown.trim().is_empty() {
        return Err(TableError::Empty);
    }

    let lines: Vec<&str> = markdown.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Err(TableError::TooShort);
    }

    Ok(Table {
        headers: cells(lines[0]),
        rows: lines[2..]
            .iter()
            .map(|l| cells(l))
            .filter(|row| !row.is_empty())
            .collect(),
    })
}
