use crate::constants::*;
use crate::errors::{AppError, AppResult};
use crate::models::Country;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Writes the countries to `directory/filename` as an XML document.
///
/// # Behavior
///
/// - **No-op on empty input**: nothing is created or touched when `countries` is empty.
/// - **Directory creation**: `directory` is created with its parents if missing.
/// - **Atomic replace**: the document goes to a `.part` file first and is renamed
///   over the destination, so a failed run never leaves a partial file behind.
///
/// # Returns
///
/// The path of the written file, or `None` for the empty no-op.
///
/// # Errors
///
/// Returns `ExportError` if the directory or file cannot be created or written.
pub async fn export_countries(
    countries: &[Country],
    directory: &Path,
    filename: &str,
) -> AppResult<Option<PathBuf>> {
    if countries.is_empty() {
        warn!("No countries to export, skipping");
        return Ok(None);
    }

    let mut document = Vec::new();
    write_countries(countries, &mut document)?;

    fs::create_dir_all(directory).await.map_err(|e| {
        AppError::ExportError(format!(
            "Failed to create export directory {}: {}",
            directory.display(),
            e
        ))
    })?;

    let file_path = directory.join(filename);
    let tmp_path = directory.join(format!("{filename}{PARTIAL_FILE_SUFFIX}"));

    if let Err(e) = write_then_rename(&tmp_path, &file_path, &document).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e);
    }

    info!(
        countries = countries.len(),
        path = %file_path.display(),
        "Countries exported"
    );
    Ok(Some(file_path))
}

async fn write_then_rename(tmp_path: &Path, file_path: &Path, document: &[u8]) -> AppResult<()> {
    fs::write(tmp_path, document).await.map_err(|e| {
        AppError::ExportError(format!(
            "Failed to write temp file {}: {}",
            tmp_path.display(),
            e
        ))
    })?;

    fs::rename(tmp_path, file_path).await.map_err(|e| {
        AppError::ExportError(format!(
            "Failed to rename temp file {} to {}: {}",
            tmp_path.display(),
            file_path.display(),
            e
        ))
    })
}

/// Serializes the countries as an indented XML document.
///
/// Only `name` and `code` are written; the sort order is not part of the format.
pub fn write_countries<W: Write>(countries: &[Country], writer: W) -> AppResult<()> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
    )?;
    emit(&mut writer, Event::Start(BytesStart::new(EXPORT_ROOT_ELEMENT)))?;
    for country in countries {
        emit(&mut writer, Event::Start(BytesStart::new(EXPORT_COUNTRY_ELEMENT)))?;
        write_leaf(&mut writer, EXPORT_NAME_ELEMENT, &country.name)?;
        write_leaf(&mut writer, EXPORT_CODE_ELEMENT, &country.code)?;
        emit(&mut writer, Event::End(BytesEnd::new(EXPORT_COUNTRY_ELEMENT)))?;
    }
    emit(&mut writer, Event::End(BytesEnd::new(EXPORT_ROOT_ELEMENT)))?;

    writer
        .into_inner()
        .write_all(b"\n")
        .map_err(|e| AppError::ExportError(format!("Failed to write XML: {e}")))
}

fn write_leaf<W: Write>(writer: &mut Writer<W>, tag: &str, value: &str) -> AppResult<()> {
    emit(writer, Event::Start(BytesStart::new(tag)))?;
    emit(writer, Event::Text(BytesText::new(value)))?;
    emit(writer, Event::End(BytesEnd::new(tag)))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event) -> AppResult<()> {
    writer
        .write_event(event)
        .map_err(|e| AppError::ExportError(format!("Failed to write XML: {e}")))
}
