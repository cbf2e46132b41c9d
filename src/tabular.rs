//! Tabular (CSV) export
//!
//! The simpler sibling of the bulk media pipeline: structured records are
//! rendered to CSV text and handed to the same download sink. Every field is
//! quoted unconditionally, which keeps the escaping rules to one case
//! (embedded quotes are doubled) and needs no special-casing of delimiters.

use crate::types::MediaDescriptor;

/// A CSV column: header label plus a field accessor
///
/// The accessor produces a string for every record, so each row supplies a
/// value (possibly empty) for every declared column by construction.
pub struct Column<R> {
    header: String,
    accessor: Box<dyn Fn(&R) -> String + Send + Sync>,
}

impl<R> Column<R> {
    /// Create a column from a header label and a field accessor
    pub fn new(
        header: impl Into<String>,
        accessor: impl Fn(&R) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            header: header.into(),
            accessor: Box::new(accessor),
        }
    }

    /// The column's header label
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Extract this column's value from a record
    pub fn value(&self, record: &R) -> String {
        (self.accessor)(record)
    }
}

/// The standard columns used when exporting a media catalog listing
pub fn media_columns() -> Vec<Column<MediaDescriptor>> {
    vec![
        Column::new("Id", |d: &MediaDescriptor| d.id.to_string()),
        Column::new("Name", |d: &MediaDescriptor| d.display_name.clone()),
        Column::new("Type", |d: &MediaDescriptor| {
            format!("{:?}", d.kind).to_lowercase()
        }),
        Column::new("Tags", |d: &MediaDescriptor| d.tags.join(";")),
        Column::new("Created", |d: &MediaDescriptor| {
            d.created_at.map(|t| t.to_rfc3339()).unwrap_or_default()
        }),
    ]
}

/// Quote a field: wrap in double quotes, doubling embedded quotes
fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render records to CSV text
///
/// First line is the header row; fields are joined by `,`, rows by `\n`.
/// Rendering is pure; the empty-input guard lives in the exporter.
pub fn render<R>(rows: &[R], columns: &[Column<R>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);

    let header: Vec<String> = columns.iter().map(|c| quote_field(c.header())).collect();
    lines.push(header.join(","));

    for row in rows {
        let fields: Vec<String> = columns
            .iter()
            .map(|c| quote_field(&c.value(row)))
            .collect();
        lines.push(fields.join(","));
    }

    lines.join("\n")
}
