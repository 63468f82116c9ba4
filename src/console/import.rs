//! Spreadsheet import: choose a file, parse, preview, submit.

use std::io::{Read, Write};

use crate::console::http::ClientsApi;
use crate::domain::client::NewClient;
use crate::sheet::{ImportError, TEMPLATE_HEADERS, parse_sheet};

/// Rows shown before submitting.
pub const PREVIEW_ROWS: usize = 5;

const TEMPLATE_SAMPLE: [&str; 8] = [
    "",
    "Jane Doe",
    "Jane",
    "jane@example.com",
    "VIP",
    "true",
    "Amsterdam",
    "Netherlands",
];

#[derive(Debug, Default)]
pub enum ImportState {
    #[default]
    Idle,
    FileChosen(String),
    Parsed {
        rows: Vec<NewClient>,
    },
    Importing,
    Done(usize),
    Failed(ImportError),
}

/// Result handed to the client list once a submission finishes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported(usize),
    Failed(String),
    /// Nothing was ready to import; no request was made.
    Skipped,
}

#[derive(Debug, Default)]
pub struct ImportPipeline {
    state: ImportState,
}

impl ImportPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn choose_file(&mut self, name: impl Into<String>) {
        self.state = ImportState::FileChosen(name.into());
    }

    pub fn file_name(&self) -> Option<&str> {
        match &self.state {
            ImportState::FileChosen(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Parses the chosen sheet. Missing columns or unreadable input move the
    /// pipeline to `Failed` with no rows kept.
    pub fn parse<R: Read>(&mut self, input: R) -> &ImportState {
        self.state = match parse_sheet(input) {
            Ok(sheet) => ImportState::Parsed { rows: sheet.rows },
            Err(err) => {
                log::warn!("Sheet rejected: {err}");
                ImportState::Failed(err)
            }
        };
        &self.state
    }

    pub fn rows(&self) -> &[NewClient] {
        match &self.state {
            ImportState::Parsed { rows } => rows.as_slice(),
            _ => &[],
        }
    }

    pub fn preview(&self) -> &[NewClient] {
        let rows = self.rows();
        &rows[..rows.len().min(PREVIEW_ROWS)]
    }

    pub fn can_import(&self) -> bool {
        !self.rows().is_empty()
    }

    /// Discards the draft.
    pub fn close(&mut self) {
        self.state = ImportState::Idle;
    }

    /// Status line for the dialog.
    pub fn message(&self) -> Option<String> {
        match &self.state {
            ImportState::Parsed { rows } => Some(format!("{} rows ready to import", rows.len())),
            ImportState::Importing => Some("Importing...".to_string()),
            ImportState::Done(count) => Some(format!("Imported {count} clients")),
            ImportState::Failed(err) => Some(err.to_string()),
            ImportState::Idle | ImportState::FileChosen(_) => None,
        }
    }

    /// Sends the parsed rows in one bulk request, falling back to one
    /// request per row when the bulk request fails.
    pub async fn submit<A: ClientsApi + ?Sized>(&mut self, api: &A) -> ImportOutcome {
        if !self.can_import() {
            return ImportOutcome::Skipped;
        }
        let ImportState::Parsed { rows } = std::mem::replace(&mut self.state, ImportState::Importing)
        else {
            return ImportOutcome::Skipped;
        };

        let imported = match api.create_bulk(&rows).await {
            Ok(_) => rows.len(),
            Err(err) => {
                log::warn!("Bulk import failed, importing row by row: {err}");
                import_each(api, &rows).await
            }
        };

        if imported == 0 {
            let err = ImportError::Rejected;
            let outcome = ImportOutcome::Failed(err.to_string());
            self.state = ImportState::Failed(err);
            return outcome;
        }

        log::info!("Imported {imported} of {} clients", rows.len());
        self.state = ImportState::Done(imported);
        ImportOutcome::Imported(imported)
    }
}

async fn import_each<A: ClientsApi + ?Sized>(api: &A, rows: &[NewClient]) -> usize {
    let mut imported = 0;
    for row in rows {
        match api.create(row).await {
            Ok(_) => imported += 1,
            Err(err) => log::error!("Skipping {}: {err}", row.email),
        }
    }
    imported
}

/// Writes the import template: headers plus one sample row.
pub fn write_template<W: Write>(writer: W) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(TEMPLATE_HEADERS)?;
    csv.write_record(TEMPLATE_SAMPLE)?;
    csv.flush()?;
    Ok(())
}

pub fn template() -> Result<Vec<u8>, csv::Error> {
    let mut out = Vec::new();
    write_template(&mut out)?;
    Ok(out)
}
