use std::fs;
use tvscrape_rs::{ChannelEntry, OutputDocument, Section, write_document};

fn sample() -> OutputDocument {
    OutputDocument::Sections(vec![Section {
        title: "Deportes".into(),
        entries: vec![ChannelEntry {
            name: "Espn".into(),
            image_url: "https://img/espn.png".into(),
            stream_urls: vec!["https://x/1".into()],
        }],
    }])
}

#[test]
fn creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/nested/canales.json");

    write_document(&sample(), &path).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.ends_with('\n'));
    let back: OutputDocument = serde_json::from_str(&written).unwrap();
    assert_eq!(back, sample());
}

#[test]
fn replaces_existing_file_and_leaves_no_temporaries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("canales.json");
    fs::write(&path, "stale").unwrap();

    write_document(&sample(), &path).unwrap();

    assert!(fs::read_to_string(&path).unwrap().contains("\"nombre\": \"Espn\""));
    let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[test]
fn empty_document_is_an_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("agenda.json");

    write_document(&OutputDocument::Events(Vec::new()), &path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");
}
