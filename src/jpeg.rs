//! JPEG marker segments, just enough to swap the EXIF APP1 block.
//!
//! JPEG layout: https://www.w3.org/Graphics/JPEG/itu-t81.pdf (Annex B)

use crate::error::AssetError;

const MARKER_PREFIX: u8 = 0xFF;
const SOI: u8 = 0xD8;
const EOI: u8 = 0xD9;
const SOS: u8 = 0xDA;
const APP0: u8 = 0xE0;
const APP1: u8 = 0xE1;
const TEM: u8 = 0x01;

/// Signature that opens an EXIF APP1 payload.
pub const EXIF_SIGNATURE: &[u8] = b"Exif\0\0";

/// Largest payload a segment length field can describe.
const MAX_SEGMENT_PAYLOAD: usize = u16::MAX as usize - 2;

/// A marker segment before the scan data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub marker: u8,
    /// Payload without the length field; empty for standalone markers.
    pub data: &'a [u8],
}

impl Segment<'_> {
    pub fn is_exif(&self) -> bool {
        self.marker == APP1 && self.data.starts_with(EXIF_SIGNATURE)
    }

    fn has_length(&self) -> bool {
        !is_standalone(self.marker)
    }
}

/// A JPEG split into its header segments and everything from SOS on.
#[derive(Debug, Clone)]
pub struct Jpeg<'a> {
    pub segments: Vec<Segment<'a>>,
    /// Scan header, entropy-coded data and EOI, copied through untouched.
    pub tail: &'a [u8],
}

fn is_standalone(marker: u8) -> bool {
    marker == TEM || (0xD0..=0xD7).contains(&marker)
}

/// Split a JPEG file into segments.
pub fn parse_jpeg(bytes: &[u8]) -> Result<Jpeg<'_>, AssetError> {
    if !bytes.starts_with(&[MARKER_PREFIX, SOI]) {
        return Err(AssetError::InvalidJpeg("Missing start-of-image marker".into()));
    }

    let mut segments = Vec::new();
    let mut pos = 2;

    loop {
        let marker_start = pos;
        if bytes.get(pos) != Some(&MARKER_PREFIX) {
            return Err(AssetError::InvalidJpeg(format!(
                "Expected marker at offset {}",
                pos
            )));
        }
        // Any number of 0xFF fill bytes may precede a marker
        while bytes.get(pos) == Some(&MARKER_PREFIX) {
            pos += 1;
        }
        let marker = *bytes
            .get(pos)
            .ok_or_else(|| AssetError::InvalidJpeg("Truncated marker".into()))?;
        pos += 1;

        if marker == SOS || marker == EOI {
            return Ok(Jpeg {
                segments,
                tail: &bytes[marker_start..],
            });
        }

        if is_standalone(marker) {
            segments.push(Segment { marker, data: &[] });
            continue;
        }

        let len_bytes = bytes
            .get(pos..pos + 2)
            .ok_or_else(|| AssetError::InvalidJpeg("Truncated segment length".into()))?;
        let len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
        if len < 2 {
            return Err(AssetError::InvalidJpeg(format!(
                "Segment length {} at offset {}",
                len, pos
            )));
        }

        let data = bytes
            .get(pos + 2..pos + len)
            .ok_or_else(|| AssetError::InvalidJpeg("Truncated segment".into()))?;
        segments.push(Segment { marker, data });
        pos += len;
    }
}

impl<'a> Jpeg<'a> {
    /// The payload of the first EXIF APP1 segment, signature stripped.
    pub fn exif(&self) -> Option<&'a [u8]> {
        self.segments
            .iter()
            .find(|s| s.is_exif())
            .map(|s| {
                let data: &'a [u8] = s.data;
                &data[EXIF_SIGNATURE.len()..]
            })
    }

    /// Serialize with `tiff` as the only EXIF block.
    ///
    /// The new block takes the place of the first existing one, or goes after
    /// the leading APP0 segments when there was none.
    pub fn write_with_exif(&self, tiff: &[u8]) -> Result<Vec<u8>, AssetError> {
        let payload_len = EXIF_SIGNATURE.len() + tiff.len();
        if payload_len > MAX_SEGMENT_PAYLOAD {
            return Err(AssetError::ExifTooLarge(tiff.len()));
        }

        let insert_at = self
            .segments
            .iter()
            .position(|s| s.is_exif())
            .unwrap_or_else(|| self.segments.iter().take_while(|s| s.marker == APP0).count());

        let mut out = Vec::with_capacity(self.tail.len() + payload_len + 1024);
        out.extend_from_slice(&[MARKER_PREFIX, SOI]);

        for (i, segment) in self.segments.iter().enumerate() {
            if i == insert_at {
                write_exif_segment(&mut out, tiff);
            }
            if !segment.is_exif() {
                write_segment(&mut out, segment);
            }
        }
        if insert_at == self.segments.len() {
            write_exif_segment(&mut out, tiff);
        }

        out.extend_from_slice(self.tail);
        Ok(out)
    }
}

fn write_exif_segment(out: &mut Vec<u8>, tiff: &[u8]) {
    let len = (2 + EXIF_SIGNATURE.len() + tiff.len()) as u16;
    out.extend_from_slice(&[MARKER_PREFIX, APP1]);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(EXIF_SIGNATURE);
    out.extend_from_slice(tiff);
}

fn write_segment(out: &mut Vec<u8>, segment: &Segment) {
    out.extend_from_slice(&[MARKER_PREFIX, segment.marker]);
    if segment.has_length() {
        let len = (segment.data.len() + 2) as u16;
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(segment.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment_bytes(marker: u8, data: &[u8]) -> Vec<u8> {
        let mut out = vec![MARKER_PREFIX, marker];
        out.extend_from_slice(&((data.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(data);
        out
    }

    fn jpeg_with(segments: &[Vec<u8>]) -> Vec<u8> {
        let mut out = vec![MARKER_PREFIX, SOI];
        for s in segments {
            out.extend_from_slice(s);
        }
        out.extend_from_slice(&[MARKER_PREFIX, SOS, 0x00, 0x02, 0x12, 0x34]);
        out.extend_from_slice(&[MARKER_PREFIX, EOI]);
        out
    }

    fn markers(jpeg: &Jpeg) -> Vec<u8> {
        jpeg.segments.iter().map(|s| s.marker).collect()
    }

    #[test]
    fn test_rejects_non_jpeg() {
        assert!(matches!(
            parse_jpeg(b"\x89PNG\r\n"),
            Err(AssetError::InvalidJpeg(_))
        ));
    }

    #[test]
    fn test_rejects_truncated_segment() {
        let mut bytes = vec![MARKER_PREFIX, SOI, MARKER_PREFIX, APP0, 0x00, 0x10];
        bytes.extend_from_slice(b"JFIF");
        assert!(parse_jpeg(&bytes).is_err());
    }

    #[test]
    fn test_parse_segments() {
        let bytes = jpeg_with(&[segment_bytes(APP0, b"JFIF\0"), segment_bytes(0xDB, &[0; 5])]);
        let jpeg = parse_jpeg(&bytes).unwrap();
        assert_eq!(markers(&jpeg), vec![APP0, 0xDB]);
        assert!(jpeg.tail.starts_with(&[MARKER_PREFIX, SOS]));
        assert!(jpeg.exif().is_none());
    }

    #[test]
    fn test_insert_after_app0() {
        let bytes = jpeg_with(&[segment_bytes(APP0, b"JFIF\0"), segment_bytes(0xDB, &[0; 5])]);
        let out = parse_jpeg(&bytes).unwrap().write_with_exif(b"MM\0*").unwrap();

        let jpeg = parse_jpeg(&out).unwrap();
        assert_eq!(markers(&jpeg), vec![APP0, APP1, 0xDB]);
        assert_eq!(jpeg.exif(), Some(&b"MM\0*"[..]));
        assert!(out.ends_with(&[0x12, 0x34, MARKER_PREFIX, EOI]));
    }

    #[test]
    fn test_insert_after_soi_without_app0() {
        let bytes = jpeg_with(&[segment_bytes(0xDB, &[0; 5])]);
        let out = parse_jpeg(&bytes).unwrap().write_with_exif(b"II*\0").unwrap();
        assert_eq!(markers(&parse_jpeg(&out).unwrap()), vec![APP1, 0xDB]);
    }

    #[test]
    fn test_replaces_existing_exif_in_place() {
        let mut old = EXIF_SIGNATURE.to_vec();
        old.extend_from_slice(b"old");
        let bytes = jpeg_with(&[
            segment_bytes(APP0, b"JFIF\0"),
            segment_bytes(0xE2, b"ICC"),
            segment_bytes(APP1, &old),
            segment_bytes(0xDB, &[0; 5]),
        ]);

        let out = parse_jpeg(&bytes).unwrap().write_with_exif(b"new").unwrap();
        let jpeg = parse_jpeg(&out).unwrap();
        assert_eq!(markers(&jpeg), vec![APP0, 0xE2, APP1, 0xDB]);
        assert_eq!(jpeg.exif(), Some(&b"new"[..]));
    }

    #[test]
    fn test_keeps_non_exif_app1() {
        let bytes = jpeg_with(&[segment_bytes(APP1, b"http://ns.adobe.com/xap/1.0/\0<x/>")]);
        let out = parse_jpeg(&bytes).unwrap().write_with_exif(b"new").unwrap();
        let jpeg = parse_jpeg(&out).unwrap();
        assert_eq!(markers(&jpeg), vec![APP1, APP1]);
        assert_eq!(jpeg.exif(), Some(&b"new"[..]));
    }

    #[test]
    fn test_rejects_oversize_exif() {
        let bytes = jpeg_with(&[]);
        let tiff = vec![0u8; u16::MAX as usize];
        assert!(matches!(
            parse_jpeg(&bytes).unwrap().write_with_exif(&tiff),
            Err(AssetError::ExifTooLarge(_))
        ));
    }
}
