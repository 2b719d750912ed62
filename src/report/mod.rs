//! Turns a raw markdown answer into displayable output.

pub mod html;
pub mod justify;
pub mod pdf;
pub mod split;
pub mod table;

pub use html::{summary_to_html, table_to_html};
pub use pdf::{report_filename, PdfRenderer, RenderError};
pub use split::{split, SplitResult};
pub use table::{parse_table, Table, TableError};
