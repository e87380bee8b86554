use std::io;
use std::path::{Path, PathBuf};

use enricher_core::{BatchState, SiteOutcome};

use crate::batch::{CheckpointError, CheckpointSink};
use crate::persist::AtomicFileWriter;

pub const DEFAULT_WEBSITE_COLUMN: &str = "Website";

const EMAIL_COLUMN: &str = "email";
const FACEBOOK_COLUMN: &str = "facebook";
const INSTAGRAM_COLUMN: &str = "instagram";
const STATUS_COLUMN: &str = "scrape_status";

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("column {0:?} not found in header row")]
    MissingColumn(String),
}

#[derive(Debug, Clone, Copy)]
struct OutputColumns {
    email: usize,
    facebook: usize,
    instagram: usize,
    status: usize,
}

/// An input table of records, one site per row, plus the enrichment columns.
#[derive(Debug, Clone)]
pub struct SiteTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    website: usize,
    output: OutputColumns,
}

impl SiteTable {
    pub fn from_csv_path(path: &Path, website_column: &str) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, website_column)
    }

    /// Rows shorter than the widest row are padded, and rows wider than the
    /// header get blank header cells, so the enrichment columns always land
    /// after every input cell. The website column is matched
    /// case-insensitively. Enrichment columns are appended unless present.
    pub fn from_reader<R: io::Read>(reader: R, website_column: &str) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let mut headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let website = find_column(&headers, website_column)
            .ok_or_else(|| TableError::MissingColumn(website_column.to_string()))?;

        let mut rows = csv_reader
            .records()
            .map(|record| record.map(|record| record.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, _>>()?;

        let input_width = rows.iter().map(Vec::len).fold(headers.len(), usize::max);
        headers.resize(input_width, String::new());

        let mut column = |name: &str| match find_column(&headers, name) {
            Some(index) => index,
            None => {
                headers.push(name.to_string());
                headers.len() - 1
            }
        };
        let output = OutputColumns {
            email: column(EMAIL_COLUMN),
            facebook: column(FACEBOOK_COLUMN),
            instagram: column(INSTAGRAM_COLUMN),
            status: column(STATUS_COLUMN),
        };

        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }

        Ok(Self {
            headers,
            rows,
            website,
            output,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Site strings in row order; blank cells are kept so rows stay aligned.
    pub fn sites(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row[self.website].trim().to_string())
            .collect()
    }

    /// The table with every finished outcome applied, as CSV bytes.
    pub fn render(&self, state: &BatchState) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for (index, row) in self.rows.iter().enumerate() {
            match state.outcome(index) {
                Some(outcome) => writer.write_record(&self.enriched_row(row, outcome))?,
                None => writer.write_record(row)?,
            }
        }
        writer
            .into_inner()
            .map_err(|err| csv::Error::from(err.into_error()))
    }

    fn enriched_row(&self, row: &[String], outcome: &SiteOutcome) -> Vec<String> {
        let mut row = row.to_vec();
        if let Some(result) = outcome.result() {
            if let Some(email) = result.first_email() {
                row[self.output.email] = email.to_string();
            }
            if let Some(facebook) = &result.facebook {
                row[self.output.facebook] = facebook.clone();
            }
            if let Some(instagram) = &result.instagram {
                row[self.output.instagram] = instagram.clone();
            }
        }
        row[self.output.status] = outcome.status().to_string();
        row
    }
}

fn find_column(headers: &[String], name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.eq_ignore_ascii_case(name.trim()))
}

/// Writes the enriched table to one CSV file on every checkpoint.
pub struct CsvCheckpointSink {
    table: SiteTable,
    writer: AtomicFileWriter,
    writes: usize,
}

impl CsvCheckpointSink {
    pub fn new(table: SiteTable, output_path: PathBuf) -> Self {
        Self {
            table,
            writer: AtomicFileWriter::new(output_path),
            writes: 0,
        }
    }

    pub fn output_path(&self) -> &Path {
        self.writer.target()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl CheckpointSink for CsvCheckpointSink {
    fn checkpoint(&mut self, state: &BatchState) -> Result<(), CheckpointError> {
        let bytes = self.table.render(state)?;
        self.writer.write(&bytes)?;
        self.writes += 1;
        Ok(())
    }
}
