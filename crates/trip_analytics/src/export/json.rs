use serde::Serialize;

use crate::error::Result;

pub(crate) fn export_json_impl<T: Serialize>(items: &[T], file: std::fs::File) -> Result<()> {
    serde_json::to_writer_pretty(file, items)?;
    Ok(())
}
