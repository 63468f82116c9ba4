//! CSV layout shared by the import pipeline, the export and the upload route.

use std::io::Read;

use thiserror::Error;

use crate::domain::client::NewClient;

/// Column headers of the import template, in order.
pub const TEMPLATE_HEADERS: [&str; 8] = [
    "ID",
    "Full Name",
    "Display Name",
    "Email",
    "Details",
    "Active",
    "Location",
    "Country",
];

/// Headers a sheet must contain to be imported.
pub const REQUIRED_HEADERS: [&str; 5] = ["Full Name", "Display Name", "Email", "Active", "Country"];

pub const TEMPLATE_FILE_NAME: &str = "client-import-template.csv";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Failed to read sheet: {0}")]
    Read(#[from] csv::Error),

    #[error("Import failed. Please check your data.")]
    Rejected,
}

/// Rows accepted from a sheet plus the number silently skipped.
#[derive(Debug, Default)]
pub struct ParsedSheet {
    pub rows: Vec<NewClient>,
    pub dropped: usize,
}

/// Interprets a spreadsheet cell as a boolean flag.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

struct Columns {
    positions: Vec<Option<usize>>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self, ImportError> {
        let headers = headers.iter().map(str::trim).collect::<Vec<_>>();

        let missing = REQUIRED_HEADERS
            .iter()
            .filter(|required| !headers.contains(*required))
            .map(|required| required.to_string())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }

        let positions = TEMPLATE_HEADERS
            .iter()
            .map(|name| headers.iter().position(|header| header == name))
            .collect();
        Ok(Self { positions })
    }

    fn cell<'r>(&self, record: &'r csv::StringRecord, header: &str) -> &'r str {
        TEMPLATE_HEADERS
            .iter()
            .position(|name| *name == header)
            .and_then(|index| self.positions[index])
            .and_then(|position| record.get(position))
            .map(str::trim)
            .unwrap_or_default()
    }

    fn row(&self, record: &csv::StringRecord) -> Option<NewClient> {
        let full_name = self.cell(record, "Full Name");
        let display_name = self.cell(record, "Display Name");
        let email = self.cell(record, "Email");
        let country = self.cell(record, "Country");
        if [full_name, display_name, email, country]
            .iter()
            .any(|value| value.is_empty())
        {
            return None;
        }

        NewClient::try_new(
            full_name,
            display_name,
            email,
            self.cell(record, "Details"),
            parse_flag(self.cell(record, "Active")),
            self.cell(record, "Location"),
            country,
        )
        .ok()
    }
}

/// Parses a CSV sheet whose first row holds the template headers.
///
/// Header cells are trimmed before matching and extra columns are ignored.
/// Rows missing a full name, display name, email or country, or carrying a
/// malformed value, are skipped and counted in [`ParsedSheet::dropped`].
pub fn parse_sheet<R: Read>(input: R) -> Result<ParsedSheet, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let columns = Columns::locate(reader.headers()?)?;

    let mut sheet = ParsedSheet::default();
    for record in reader.records() {
        match columns.row(&record?) {
            Some(row) => sheet.rows.push(row),
            None => sheet.dropped += 1,
        }
    }

    if sheet.dropped > 0 {
        log::info!("Skipped {} incomplete sheet rows", sheet.dropped);
    }

    Ok(sheet)
}
