//! Well-formedness check for compressed output.
//!
//! The compressor never looks at structure, so this re-reads its output with
//! an XML parser and reports what broke. Nothing is repaired.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::AssetError;

/// Check that `svg` parses as XML with a single `<svg>` root element.
pub fn check_svg(svg: &str) -> Result<(), AssetError> {
    let mut reader = Reader::from_str(svg);

    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if depth == 0 {
                    check_root(&start, &mut roots)?;
                }
                check_attributes(&start)?;
                depth += 1;
            }
            Event::Empty(start) => {
                if depth == 0 {
                    check_root(&start, &mut roots)?;
                }
                check_attributes(&start)?;
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| AssetError::InvalidSvg("Unmatched closing tag".into()))?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth > 0 {
        return Err(AssetError::InvalidSvg("Unexpected end of file".into()));
    }

    if roots == 0 {
        return Err(AssetError::InvalidSvg("No root element found".into()));
    }

    Ok(())
}

fn check_root(start: &BytesStart, roots: &mut usize) -> Result<(), AssetError> {
    *roots += 1;
    if *roots > 1 {
        return Err(AssetError::InvalidSvg("Multiple root elements".into()));
    }

    let local = start.local_name();
    let name = std::str::from_utf8(local.as_ref())?;
    if name != "svg" {
        return Err(AssetError::InvalidSvg(format!(
            "Root element is <{}>, expected <svg>",
            name
        )));
    }

    Ok(())
}

fn check_attributes(start: &BytesStart) -> Result<(), AssetError> {
    for attr in start.attributes() {
        attr.map_err(|e| AssetError::InvalidSvg(format!("Invalid attribute: {}", e)))?;
    }
    Ok(())
}
