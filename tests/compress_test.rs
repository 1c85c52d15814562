//! Compression behaviour on whole documents, plus a run over the editor
//! exports in `tests/corpus`.

use std::fs;
use std::path::Path;

use assetpress::{Options, check_svg, compress, compress_with_options};
use ignore::WalkBuilder;

/// Compress every corpus SVG and check the output is smaller, stable under a
/// second run and still well-formed whenever the input was.
#[test]
fn test_corpus_compression() {
    let corpus_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/corpus");
    assert!(corpus_dir.is_dir(), "missing {}", corpus_dir.display());

    let mut total = 0;
    let mut failed = 0;
    let mut total_original = 0usize;
    let mut total_compressed = 0usize;

    for entry in WalkBuilder::new(&corpus_dir).git_ignore(false).build() {
        let entry = entry.unwrap();
        let path = entry.path();

        if path.extension().is_some_and(|e| e == "svg") {
            let rel_path = path.strip_prefix(&corpus_dir).unwrap_or(path);
            let content = match fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("  SKIP {}: {}", rel_path.display(), e);
                    continue;
                }
            };
            total += 1;

            let compressed = compress(&content);
            if compressed.len() >= content.len() {
                eprintln!("  FAIL {}: output not smaller", rel_path.display());
                failed += 1;
                continue;
            }
            if compress(&compressed) != compressed {
                eprintln!("  FAIL {}: second pass changed output", rel_path.display());
                failed += 1;
                continue;
            }
            if check_svg(&content).is_ok()
                && let Err(e) = check_svg(&compressed)
            {
                eprintln!("  FAIL {}: output invalid: {}", rel_path.display(), e);
                failed += 1;
                continue;
            }

            total_original += content.len();
            total_compressed += compressed.len();
        }
    }

    println!("\nCorpus: {}/{} passed", total - failed, total);
    println!("Size: {} -> {} bytes", total_original, total_compressed);

    assert!(total > 0, "no SVG files in {}", corpus_dir.display());
    assert_eq!(failed, 0, "{} SVG files failed", failed);
}

#[test]
fn test_inkscape_export_drops_root_size_and_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/corpus/inkscape-logo.svg");
    let out = compress(&fs::read_to_string(path).unwrap());

    assert!(out.starts_with("<!-- Created with Inkscape"));
    assert!(out.contains(r#"viewBox="0 0 33.9 33.9""#));
    assert!(!out.contains(r#"width="128""#));
    assert!(!out.contains(r#"id="svg5""#));
    assert!(!out.contains("rgb(0, 0, 0)"));
    assert!(!out.contains("\n\n"));
    check_svg(&out).unwrap();
}

#[test]
fn test_full_pipeline_example() {
    let svg = "<?xml version=\"1.0\"?>\n<svg width=\"10\" height=\"10\" version=\"1.1\" x=\"0px\" y=\"0\"><rect opacity=\"1\" stroke=\"none\" style=\"stroke: rgb(0, 0, 0);\" /></svg>";
    assert_eq!(compress(svg), "<svg><rect /></svg>");
}

/// A typical editor export.
#[test]
fn test_illustrator_export() {
    let svg = r##"<?xml version="1.0" encoding="utf-8"?>
<!-- Generator: Adobe Illustrator 24.0 -->
<svg version="1.1" id="Layer_1" xmlns="http://www.w3.org/2000/svg" x="0px" y="0px"
     width="48.000px" height="48.000px" viewBox="0 0 48 48" enable-background="new 0 0 48 48">


<g opacity="1">
  <path fill="#336699" stroke="none" d="M12.3456,7.891 L40.0001,7.949 C41.26,8.05 42.66,9.44 42.66,10.99z"/>
  <circle style="  " cx="24.04" cy="23.96" r="3.3333"/>
  <rect style="fill: red; " x="-0.04" y="1.55" width="5" height="5"/>
</g>

</svg>
"##;

    let expected = r##"<!-- Generator: Adobe Illustrator 24 -->
<svg xmlns="http://www.w3.org/2000/svg"
     viewBox="0 0 48 48">
<g>
  <path fill="#336699" d="M12.3,7.9 L40,7.9 C41.3,8.1 42.7,9.4 42.7,11z"/>
  <circle cx="24" cy="24" r="3.3"/>
  <rect style="fill: red;" x="0" y="1.6" width="5" height="5"/>
</g>
</svg>"##;

    assert_eq!(compress(svg), expected);
}

#[test]
fn test_output_is_smaller() {
    let svg = r#"<svg width="100" height="100"><path d="M 10.123456789 20.987654321 L 30.111111111 40.222222222"/></svg>"#;
    let out = compress(svg);
    assert!(out.len() < svg.len());
    assert!(!out.contains("123456789"), "High precision not reduced");
}

#[test]
fn test_idempotent() {
    let svg = r#"<?xml version="1.0"?>
<svg id="a" width="1" height="2"><text x="12.3" y="-4.56">Line 7.25</text>


<rect style=" fill: blue; " opacity="1" transform="rotate(33.333)"/></svg>"#;
    let once = compress(svg);
    assert_eq!(compress(&once), once);
}

#[test]
fn test_blank_lines_collapse() {
    assert_eq!(compress("<svg>\n\n\n<g/>\n</svg>"), "<svg>\n<g/>\n</svg>");
}

#[test]
fn test_whitespace_style_removed_without_double_space() {
    assert_eq!(
        compress(r#"<svg><rect fill="red" style="  " x="2"/></svg>"#),
        r#"<svg><rect fill="red" x="2"/></svg>"#
    );
}

#[test]
fn test_no_optimize_only_trims() {
    let svg = "  <?xml version=\"1.0\"?><svg width=\"1.2345\"/>\n\n";
    assert_eq!(
        compress_with_options(svg, &Options::none()),
        "<?xml version=\"1.0\"?><svg width=\"1.2345\"/>"
    );
}

#[test]
fn test_precision_option() {
    let options = Options {
        precision: 3,
        ..Options::default()
    };
    assert_eq!(
        compress_with_options(r#"<svg><path d="M1.23456 7.0001"/></svg>"#, &options),
        r#"<svg><path d="M1.235 7"/></svg>"#
    );
}

#[test]
fn test_keep_xml_declaration_option() {
    let options = Options {
        remove_xml_declaration: false,
        round_numbers: false,
        ..Options::default()
    };
    assert_eq!(
        compress_with_options("<?xml version=\"1.0\"?>\n<svg/>", &options),
        "<?xml version=\"1.0\"?>\n<svg/>"
    );
}
