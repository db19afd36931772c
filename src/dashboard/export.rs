//! CSV export of the records currently on display.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::error;

use super::models::DatasetRecord;
use crate::error::{PortalError, Result};

pub const EXPORT_FILENAME: &str = "filtered_data.csv";

/// A generated file ready to be offered to the user as a download.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportFile {
    pub filename: &'static str,
    pub content_type: mime::Mime,
    pub bytes: Vec<u8>,
}

/// Serialize `records` as CSV: one header row of field names, then one row
/// per record in display order.
pub fn export_records(records: &[DatasetRecord]) -> Result<ExportFile> {
    if records.is_empty() {
        return Err(PortalError::ExportPrecondition);
    }

    let bytes = write_csv(records).map_err(|err| {
        error!(%err, rows = records.len(), "failed to write CSV export");
        PortalError::ExportFailure(err.to_string())
    })?;

    Ok(ExportFile {
        filename: EXPORT_FILENAME,
        content_type: mime::TEXT_CSV_UTF_8,
        bytes,
    })
}

fn write_csv(records: &[DatasetRecord]) -> csv::Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}
