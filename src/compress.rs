//! SVG compression passes.
//!
//! Every pass is a regex rewrite over the raw text. Nothing here parses the
//! document, so numbers are rounded wherever they appear (path data, colours,
//! text content) and attributes are matched by name only.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::Options;
use crate::number::round_number;

/// A black stroke declared inline, which is what SVG draws without a stroke anyway.
pub const DEFAULT_STROKE_STYLE: &str = "stroke: rgb(0, 0, 0);";

static XML_DECLARATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<\?xml.*?\?>").unwrap());

static SVG_OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<svg[^>]*>").unwrap());

static ROOT_SIZE_ATTRS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s(width|height)="[^"]*""#).unwrap());

static ROOT_META_ATTRS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s(version|id|enable-background)="[^"]*""#).unwrap());

static ROOT_ZERO_POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\s(x|y)="0(px)?""#).unwrap());

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?[0-9]+\.[0-9]+|-?[0-9]+").unwrap());

static DEFAULT_OPACITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\sopacity="1""#).unwrap());

static STROKE_NONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\sstroke="none""#).unwrap());

static STYLE_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\s+)style="([^"]*)""#).unwrap());

static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Apply all enabled passes to the text, in their fixed order.
pub fn compress_svg(svg: &str, options: &Options) -> String {
    let mut text = svg.to_string();

    if options.remove_xml_declaration {
        text = remove_xml_declaration(&text);
    }

    if options.normalize_root {
        text = normalize_root_tag(&text);
    }

    if options.round_numbers {
        text = round_numbers(&text, options.precision);
    }

    if options.remove_default_opacity {
        text = remove_default_opacity(&text);
    }

    if options.remove_stroke_none {
        text = remove_stroke_none(&text);
    }

    if options.clean_styles {
        text = clean_styles(&text);
    }

    if options.collapse_blank_lines {
        text = collapse_blank_lines(&text);
    }

    text.trim().to_string()
}

/// Remove `<?xml ...?>` declarations.
fn remove_xml_declaration(text: &str) -> String {
    XML_DECLARATION.replace_all(text, "").into_owned()
}

/// Drop sizing, identity and zero-position attributes from the first `<svg>` tag.
fn normalize_root_tag(text: &str) -> String {
    SVG_OPEN_TAG
        .replacen(text, 1, |caps: &Captures| {
            let tag = ROOT_SIZE_ATTRS.replace_all(&caps[0], "");
            let tag = ROOT_META_ATTRS.replace_all(&tag, "");
            ROOT_ZERO_POSITION.replace_all(&tag, "").into_owned()
        })
        .into_owned()
}

fn round_numbers(text: &str, precision: u8) -> String {
    NUMBER
        .replace_all(text, |caps: &Captures| round_number(&caps[0], precision))
        .into_owned()
}

fn remove_default_opacity(text: &str) -> String {
    DEFAULT_OPACITY.replace_all(text, "").into_owned()
}

fn remove_stroke_none(text: &str) -> String {
    STROKE_NONE.replace_all(text, "").into_owned()
}

/// Trim style values; drop empty ones and the redundant black stroke.
fn clean_styles(text: &str) -> String {
    STYLE_ATTR
        .replace_all(text, |caps: &Captures| {
            let content = caps[2].trim();
            if is_trivial_style(content) {
                String::new()
            } else {
                format!("{}style=\"{}\"", &caps[1], content)
            }
        })
        .into_owned()
}

fn is_trivial_style(content: &str) -> bool {
    content.is_empty() || content == DEFAULT_STROKE_STYLE
}

fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINES.replace_all(text, "\n").into_owned()
}
