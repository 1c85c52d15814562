//! Artist/Copyright EXIF stamping for JPEG files.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use exif::experimental::Writer;
use exif::{Exif, Field, In, Tag, Value};

use crate::batch::{BatchReport, Outcome};
use crate::error::AssetError;
use crate::jpeg::parse_jpeg;
use crate::output::{ensure_dir, parent_dir, write_output};

pub const DEFAULT_ARTIST: &str = "Forgotten Private Coalition";
pub const DEFAULT_COPYRIGHT: &str =
    "Atmospect Launcher (C) 2025 Forgotten Private Coalition CC BY-NC 4.0 License";

/// Suffix added to the file stem of stamped copies.
pub const STAMPED_SUFFIX: &str = "_meta";

/// Fields the EXIF writer lays out itself.
const SYNTHESIZED_TAGS: [Tag; 9] = [
    Tag::ExifIFDPointer,
    Tag::GPSInfoIFDPointer,
    Tag::InteropIFDPointer,
    Tag::StripOffsets,
    Tag::StripByteCounts,
    Tag::TileOffsets,
    Tag::TileByteCounts,
    Tag::JPEGInterchangeFormat,
    Tag::JPEGInterchangeFormatLength,
];

/// Attribution written into IFD0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub artist: String,
    pub copyright: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            artist: DEFAULT_ARTIST.into(),
            copyright: DEFAULT_COPYRIGHT.into(),
        }
    }
}

/// Return a copy of `jpeg` whose EXIF carries `metadata`.
///
/// Existing primary-image fields are kept, apart from Artist and Copyright
/// which are replaced. A JPEG thumbnail is kept along with its IFD1 fields.
pub fn stamp_exif(jpeg: &[u8], metadata: &Metadata) -> Result<Vec<u8>, AssetError> {
    let jpeg = parse_jpeg(jpeg)?;
    let existing = match jpeg.exif() {
        Some(tiff) => Some(exif::Reader::new().read_raw(tiff.to_vec())?),
        None => None,
    };

    let artist = ascii_field(Tag::Artist, &metadata.artist);
    let copyright = ascii_field(Tag::Copyright, &metadata.copyright);

    let mut writer = Writer::new();
    if let Some(exif) = &existing {
        let thumb = thumbnail(exif);
        for field in exif.fields().filter(|f| carries_over(f)) {
            if field.ifd_num == In::THUMBNAIL && thumb.is_none() {
                continue;
            }
            writer.push_field(field);
        }
        if let Some(thumb) = thumb {
            writer.set_jpeg(thumb, In::THUMBNAIL);
        }
    }
    writer.push_field(&artist);
    writer.push_field(&copyright);

    // Big-endian unless the file already used little-endian
    let little_endian = existing.as_ref().is_some_and(|e| e.little_endian());
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, little_endian)?;

    jpeg.write_with_exif(tiff.get_ref())
}

fn ascii_field(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

fn carries_over(field: &Field) -> bool {
    let replaced =
        field.ifd_num == In::PRIMARY && matches!(field.tag, Tag::Artist | Tag::Copyright);
    (field.ifd_num == In::PRIMARY || field.ifd_num == In::THUMBNAIL)
        && !replaced
        && !SYNTHESIZED_TAGS.contains(&field.tag)
        && !matches!(field.value, Value::Unknown(..))
}

/// The IFD1 JPEG thumbnail bytes, if present and in bounds.
fn thumbnail(exif: &Exif) -> Option<&[u8]> {
    let offset = exif
        .get_field(Tag::JPEGInterchangeFormat, In::THUMBNAIL)?
        .value
        .get_uint(0)? as usize;
    let len = exif
        .get_field(Tag::JPEGInterchangeFormatLength, In::THUMBNAIL)?
        .value
        .get_uint(0)? as usize;
    exif.buf().get(offset..offset.checked_add(len)?)
}

/// `<dir>/<stem>_meta.jpg`
pub fn stamped_path(input: &Path, dir: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
    name.push(STAMPED_SUFFIX);
    name.push(".jpg");
    dir.join(name)
}

/// Stamp one JPEG, writing the copy next to it unless `output_dir` is given.
pub fn stamp_file(
    input: &Path,
    output_dir: Option<&Path>,
    metadata: &Metadata,
) -> Result<Outcome, AssetError> {
    let bytes = fs::read(input).map_err(|e| AssetError::file(input, e))?;
    let stamped = stamp_exif(&bytes, metadata)?;

    let dir = output_dir.map_or_else(|| parent_dir(input), Path::to_path_buf);
    let output = stamped_path(input, &dir);
    write_output(&output, &stamped)?;

    Ok(Outcome {
        input: input.to_path_buf(),
        output,
        input_len: bytes.len() as u64,
        output_len: stamped.len() as u64,
    })
}

/// Stamp every input; a failing file doesn't stop the rest.
pub fn stamp_files(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    metadata: &Metadata,
) -> Result<BatchReport, AssetError> {
    if let Some(dir) = output_dir {
        ensure_dir(dir)?;
    }

    let mut report = BatchReport::default();
    for input in inputs {
        report.record(input, stamp_file(input, output_dir, metadata));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamped_path() {
        assert_eq!(
            stamped_path(Path::new("photos/cat.jpeg"), Path::new("photos")),
            PathBuf::from("photos/cat_meta.jpg")
        );
        assert_eq!(
            stamped_path(Path::new("a.b.jpg"), Path::new("out")),
            PathBuf::from("out/a.b_meta.jpg")
        );
    }

    #[test]
    fn test_carries_over() {
        let artist = ascii_field(Tag::Artist, "someone");
        assert!(!carries_over(&artist));

        let make = ascii_field(Tag::Make, "Camera Co");
        assert!(carries_over(&make));

        let thumb = Field {
            ifd_num: In::THUMBNAIL,
            ..ascii_field(Tag::Make, "Camera Co")
        };
        assert!(carries_over(&thumb));

        // only the primary image's attribution is replaced
        let thumb_artist = Field {
            ifd_num: In::THUMBNAIL,
            ..ascii_field(Tag::Artist, "someone")
        };
        assert!(carries_over(&thumb_artist));

        let offset = Field {
            tag: Tag::JPEGInterchangeFormat,
            ifd_num: In::THUMBNAIL,
            value: Value::Long(vec![8]),
        };
        assert!(!carries_over(&offset));
    }

    #[test]
    fn test_rejects_non_jpeg() {
        assert!(matches!(
            stamp_exif(b"GIF89a", &Metadata::default()),
            Err(AssetError::InvalidJpeg(_))
        ));
    }
}
