use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::models::RawEntry;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::reader::Reader;
use tracing::{debug, warn};

/// Direct child of an entry being collected: tag and accumulated text.
struct OpenChild {
    tag: String,
    text: String,
}

/// Parses the source document and collects the entry elements under its root.
///
/// The root is the first element of the document. Entries are direct children of
/// the root whose tag equals `config.entry_element`; every direct child of an entry
/// becomes a `(tag, text)` pair, where the text is all character data below that
/// child, trimmed.
///
/// # Returns
///
/// - `Some(entries)` when the root tag matches `config.root_element` and at least
///   one entry is present
/// - `None` when the root tag differs or no entries are found
///
/// # Errors
///
/// Returns `ParseError` for malformed XML: mismatched or missing end tags, a
/// missing or repeated root element, text outside the root, or unknown entity
/// references.
pub fn parse_entries(xml: &str, config: &ResolvedConfig) -> AppResult<Option<Vec<RawEntry>>> {
    let mut reader = Reader::from_str(xml);

    let mut depth = 0usize;
    let mut root: Option<String> = None;
    let mut entries = Vec::new();
    let mut entry: Option<RawEntry> = None;
    let mut child: Option<OpenChild> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match depth {
                    0 => set_root(&mut root, tag)?,
                    1 if tag == config.entry_element => entry = Some(RawEntry::default()),
                    2 if entry.is_some() => {
                        child = Some(OpenChild {
                            tag,
                            text: String::new(),
                        })
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match depth {
                    0 => set_root(&mut root, tag)?,
                    1 if tag == config.entry_element => entries.push(RawEntry::default()),
                    2 => {
                        if let Some(entry) = entry.as_mut() {
                            entry.push_child(tag, String::new());
                        }
                    }
                    _ => {}
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    1 => {
                        if let Some(done) = entry.take() {
                            entries.push(done);
                        }
                    }
                    2 => {
                        if let (Some(entry), Some(done)) = (entry.as_mut(), child.take()) {
                            entry.push_child(done.tag, done.text.trim().to_string());
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(e) => {
                let text = e
                    .decode()
                    .map_err(|e| AppError::ParseError(format!("Failed to decode XML text: {e}")))?;
                if let Some(open) = child.as_mut() {
                    open.text.push_str(&text);
                } else if depth == 0 && !text.trim().is_empty() {
                    return Err(AppError::ParseError(
                        "Text found outside the root element".into(),
                    ));
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e);
                if let Some(open) = child.as_mut() {
                    open.text.push_str(&text);
                } else if depth == 0 && !text.trim().is_empty() {
                    return Err(AppError::ParseError(
                        "CDATA found outside the root element".into(),
                    ));
                }
            }
            Event::GeneralRef(e) => {
                let resolved = resolve_reference(&e)?;
                if let Some(open) = child.as_mut() {
                    open.text.push_str(&resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(AppError::ParseError(format!(
            "Unexpected end of document with {depth} unclosed element(s)"
        )));
    }

    let root = root.ok_or_else(|| AppError::ParseError("Document has no root element".into()))?;
    if root != config.root_element {
        warn!(
            expected = %config.root_element,
            found = %root,
            "Unexpected root element, nothing to convert"
        );
        return Ok(None);
    }

    if entries.is_empty() {
        warn!(entry_element = %config.entry_element, "No entry elements found");
        return Ok(None);
    }

    debug!(entries = entries.len(), "Source document parsed");
    Ok(Some(entries))
}

fn set_root(root: &mut Option<String>, tag: String) -> AppResult<()> {
    if let Some(existing) = root {
        return Err(AppError::ParseError(format!(
            "Multiple root elements: '{existing}' and '{tag}'"
        )));
    }
    *root = Some(tag);
    Ok(())
}

/// Resolves a character reference or one of the predefined XML entities.
fn resolve_reference(reference: &BytesRef) -> AppResult<String> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| AppError::ParseError(format!("Invalid character reference: {e}")))?
    {
        return Ok(ch.to_string());
    }

    let name = reference
        .decode()
        .map_err(|e| AppError::ParseError(format!("Failed to decode entity reference: {e}")))?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| AppError::ParseError(format!("Unknown entity reference '&{name};'")))
}
