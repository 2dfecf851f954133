use std::fs::File;
use std::path::Path;

use crate::error::{AnalyticsError, Result};

pub(crate) fn ensure_not_empty<T>(items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(AnalyticsError::EmptyExport);
    }

    Ok(())
}

pub(crate) fn create_output_file(path: &Path) -> Result<File> {
    tracing::debug!(path = %path.display(), "creating export file");
    Ok(File::create(path)?)
}
