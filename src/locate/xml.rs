//! XML variant of the structured locator.
//!
//! Streams the document with quick-xml's pull reader, pushing each start-tag
//! name onto a path stack and popping on end-tags. When a character-data
//! event fires while the stack matches a requested path, the raw text and
//! the reader's byte position are recorded. The position after a text event
//! is the offset of the `<` that terminates it, i.e. the end of the text
//! node, so `begin = end - text.len()` holds without any entity decoding.

use crate::locate::{DocumentPath, Located, LocateError, LocatedValue};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Locate the values at `wanted` paths in an XML document.
///
/// First occurrence wins; a second text node at an already-matched path is
/// an [`LocateError::AmbiguousPath`]. Paths absent from the document are
/// absent from the returned map.
pub fn locate(document: &str, wanted: &[DocumentPath]) -> Result<Located, LocateError> {
    // quick-xml skips a leading BOM without counting it in buffer_position(),
    // which would leave every span short. Strip it ourselves and bias the
    // recorded offsets instead.
    let (body, bias) = super::strip_bom(document);
    let mut reader = Reader::from_str(body);
    let mut stack: Vec<String> = Vec::new();
    let mut found = Located::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                stack.push(name);
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Empty(_)) => {
                // Self-closing element carries no text node.
            }
            Ok(Event::Text(text)) => {
                let Some(path) = wanted.iter().find(|p| p.matches(&stack)) else {
                    continue;
                };
                if found.contains_key(path) {
                    return Err(LocateError::AmbiguousPath {
                        path: path.to_string(),
                    });
                }
                // Raw bytes, entities left as written; decoding would break
                // the end-minus-length span arithmetic.
                let raw = String::from_utf8_lossy(text.as_ref()).into_owned();
                let end = reader.buffer_position() as usize + bias;
                found.insert(
                    path.clone(),
                    LocatedValue {
                        path: path.clone(),
                        text: raw,
                        end,
                    },
                );
            }
            Ok(Event::Eof) => break,
            Ok(_) => {
                // Comments, CDATA, declarations, PIs: no path or text of
                // interest.
            }
            Err(source) => {
                return Err(LocateError::Malformed {
                    format: "XML",
                    offset: reader.buffer_position() as usize + bias,
                    message: source.to_string(),
                });
            }
        }
    }

    Ok(found)
}
