use crate::core::normalize::{normalize_csv, normalize_workbook};
use crate::core::session::Session;
use crate::domain::model::{ImportSummary, NormalizedImport};
use crate::domain::ports::{Repository, Storage, WorkbookReader};
use crate::utils::error::{AttendanceError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    /// Picks the format from the file extension, ignoring case.
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" => Ok(SourceFormat::Xlsx),
            _ => Err(AttendanceError::UnsupportedFileType { extension }),
        }
    }
}

/// Raw file content after the extract step.
pub enum Extracted {
    Csv(String),
    Xlsx(Vec<u8>),
}

/// Runs one import file through extract, transform and load.
///
/// Nothing reaches the session until the whole file has been normalized.
pub struct ImportEngine<S: Storage, W: WorkbookReader> {
    storage: S,
    workbook_reader: W,
}

impl<S: Storage, W: WorkbookReader> ImportEngine<S, W> {
    pub fn new(storage: S, workbook_reader: W) -> Self {
        Self {
            storage,
            workbook_reader,
        }
    }

    pub async fn run<R: Repository>(&self, path: &str, session: &mut Session<R>) -> Result<ImportSummary> {
        tracing::info!("Starting import of {}", path);

        tracing::debug!("Extracting {}", path);
        let extracted = self.extract(path).await?;

        tracing::debug!("Normalizing rows");
        let normalized = self.transform(extracted)?;
        tracing::info!(
            rows = normalized.rows.len(),
            skipped = normalized.skipped,
            "Normalized import rows"
        );

        tracing::debug!("Applying rows to session");
        let summary = session.absorb(normalized).await?;
        tracing::info!("{}", summary);

        Ok(summary)
    }

    pub async fn extract(&self, path: &str) -> Result<Extracted> {
        let format = SourceFormat::from_path(path)?;
        let bytes = self.storage.read_file(path).await?;
        tracing::debug!(?format, bytes = bytes.len(), "Read import file");

        match format {
            SourceFormat::Csv => {
                let text = String::from_utf8(bytes).map_err(|e| AttendanceError::ImportFormatError {
                    message: format!("CSV file is not valid UTF-8: {}", e),
                })?;
                Ok(Extracted::Csv(text))
            }
            SourceFormat::Xlsx => Ok(Extracted::Xlsx(bytes)),
        }
    }

    pub fn transform(&self, extracted: Extracted) -> Result<NormalizedImport> {
        match extracted {
            Extracted::Csv(text) => normalize_csv(&text),
            Extracted::Xlsx(bytes) => {
                let workbook = self.workbook_reader.read_workbook(&bytes)?;
                tracing::debug!(sheets = ?workbook.sheet_names(), "Opened workbook");
                normalize_workbook(&workbook)
            }
        }
    }
}
