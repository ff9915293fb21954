use super::{parse_converter_meta, parse_toc, FileSource, StaticSource};
use crate::error::Error;
use crate::outline::{Bookmark, DocumentSource, HeadingMeta};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_parse_toc_reads_level_and_title() {
    let text = "1;Introduction;None;None;None\n2;Background;;;\n\n1;Methods\n";

    let bookmarks = parse_toc(text, "toc.txt").unwrap().unwrap();

    assert_eq!(
        bookmarks,
        vec![
            Bookmark::new(1, "Introduction"),
            Bookmark::new(2, "Background"),
            Bookmark::new(1, "Methods"),
        ]
    );
}

#[test]
fn test_parse_toc_blank_means_no_bookmarks() {
    assert!(parse_toc("", "toc.txt").unwrap().is_none());
    assert!(parse_toc("\n  \n", "toc.txt").unwrap().is_none());
}

#[test]
fn test_parse_toc_rejects_garbage() {
    let err = parse_toc("No outlines found.\n", "toc.txt").unwrap_err();
    assert!(matches!(err, Error::SourceUnreadable { .. }), "got {err}");

    let err = parse_toc("one;Introduction\n", "toc.txt").unwrap_err();
    assert!(err.to_string().contains("bad level"), "got {err}");
}

#[test]
fn test_parse_converter_meta_uses_polygon_height() {
    let json = r#"{
        "table_of_contents": [
            {"title": "Denoising Diffusion", "polygon": [[10.0, 100.2], [200.0, 100.2], [200.0, 124.6], [10.0, 124.6]]},
            {"title": "Abstract", "polygon": [[10.0, 150.0], [90.0, 150.0], [90.0, 164.0], [10.0, 164.0]]},
            {"title": "No box"}
        ],
        "page_stats": []
    }"#;

    let headings = parse_converter_meta(json, "meta.json").unwrap();

    assert_eq!(headings.len(), 3);
    assert_eq!(headings[0].title, "Denoising Diffusion");
    assert_eq!(headings[0].size(), Some(24));
    assert_eq!(headings[1].size(), Some(14));
    assert_eq!(headings[2], HeadingMeta::new("No box"));
    assert_eq!(headings[2].size(), None);
}

#[test]
fn test_parse_converter_meta_without_toc_is_empty() {
    assert!(parse_converter_meta("{}", "meta.json").unwrap().is_empty());
}

#[test]
fn test_parse_converter_meta_rejects_invalid_json() {
    let err = parse_converter_meta("{not json", "meta.json").unwrap_err();
    assert!(matches!(err, Error::SourceUnreadable { .. }));
}

#[test]
fn test_file_source_reads_both_files() {
    let mut toc = NamedTempFile::new().unwrap();
    writeln!(toc, "1;Intro;;;\n2;Details;;;").unwrap();
    let mut meta = NamedTempFile::new().unwrap();
    write!(meta, r#"{{"table_of_contents": [{{"title": "Intro"}}]}}"#).unwrap();

    let source = FileSource::new(
        Some(toc.path().to_path_buf()),
        Some(meta.path().to_path_buf()),
    );

    assert_eq!(source.bookmarks().unwrap().unwrap().len(), 2);
    assert_eq!(source.headings().unwrap().unwrap().len(), 1);
}

#[test]
fn test_file_source_without_paths_has_nothing() {
    let source = FileSource::default();

    assert!(source.bookmarks().unwrap().is_none());
    assert!(source.headings().unwrap().is_none());
}

#[test]
fn test_file_source_missing_file_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let source = FileSource::new(Some(dir.path().join("missing.toc")), None);

    let err = source.bookmarks().unwrap_err();
    assert!(matches!(err, Error::SourceUnreadable { .. }));
}

#[test]
fn test_static_source_returns_what_it_holds() {
    let source = StaticSource::with_bookmarks(vec![Bookmark::new(1, "Intro")]);

    assert_eq!(source.bookmarks().unwrap().unwrap()[0].title, "Intro");
    assert!(source.headings().unwrap().is_none());
}
