//! Raw dataset loading

use crate::error::{ChurnError, Result};
use polars::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Load the raw churn dataset from a CSV file with a header row.
///
/// The schema is inferred from every row so a single blank value late in a
/// numeric-looking column turns the column into text instead of failing the
/// parse.
pub fn load_raw_data(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(ChurnError::DataError(format!(
            "Data file not found at: {}",
            path.display()
        )));
    }

    let start = Instant::now();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Loaded raw data"
    );

    Ok(df)
}
