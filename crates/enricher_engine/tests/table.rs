use std::fs;

use enricher_core::{BatchState, SiteOutcome, SiteResult};
use enricher_engine::{
    AtomicFileWriter, CheckpointSink, CsvCheckpointSink, SiteTable, TableError,
    DEFAULT_WEBSITE_COLUMN,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const INPUT: &str = "Name,website,Notes\n\
Lake Camp,https://lake.example,\n\
Broken,lake.example,bad\n\
Quiet Camp,https://quiet.example/\n";

fn table() -> SiteTable {
    SiteTable::from_reader(INPUT.as_bytes(), DEFAULT_WEBSITE_COLUMN).expect("table parses")
}

fn lake_result() -> SiteOutcome {
    SiteOutcome::Scraped(SiteResult {
        emails: vec!["hi@lake.example".to_string(), "two@lake.example".to_string()],
        facebook: Some("https://facebook.com/lake".to_string()),
        instagram: None,
    })
}

#[test]
fn sites_are_read_from_website_column_case_insensitively() {
    let table = table();
    assert_eq!(table.len(), 3);
    assert_eq!(
        table.sites(),
        vec![
            "https://lake.example".to_string(),
            "lake.example".to_string(),
            "https://quiet.example/".to_string(),
        ]
    );
    assert_eq!(
        table.headers(),
        ["Name", "website", "Notes", "email", "facebook", "instagram", "scrape_status"]
    );
}

#[test]
fn missing_website_column_is_an_error() {
    let err = SiteTable::from_reader("Name,Url\nA,https://a.example\n".as_bytes(), "Website")
        .unwrap_err();
    assert!(matches!(err, TableError::MissingColumn(name) if name == "Website"));
}

#[test]
fn existing_output_columns_are_reused() {
    let input = "Website,scrape_status,email\nhttps://a.example,success,old@a.example\n";
    let table = SiteTable::from_reader(input.as_bytes(), "Website").unwrap();
    assert_eq!(
        table.headers(),
        ["Website", "scrape_status", "email", "facebook", "instagram"]
    );

    let mut state = BatchState::new(1);
    state.record_batch(vec![SiteOutcome::Scraped(SiteResult::default())]);
    let rendered = String::from_utf8(table.render(&state).unwrap()).unwrap();
    assert_eq!(
        rendered,
        "Website,scrape_status,email,facebook,instagram\nhttps://a.example,no_contact,old@a.example,,\n"
    );
}

#[test]
fn cells_beyond_the_header_stay_out_of_enrichment_columns() {
    let input = "Website,Name\nlake.example,Lake,stray-note\nhttps://quiet.example,Quiet\n";
    let table = SiteTable::from_reader(input.as_bytes(), "Website").unwrap();
    assert_eq!(
        table.headers(),
        ["Website", "Name", "", "email", "facebook", "instagram", "scrape_status"]
    );

    let mut state = BatchState::new(2);
    state.record_batch(vec![
        SiteOutcome::Scraped(SiteResult::default()),
        SiteOutcome::Scraped(SiteResult::default()),
    ]);
    let rendered = String::from_utf8(table.render(&state).unwrap()).unwrap();
    assert_eq!(
        rendered,
        "Website,Name,,email,facebook,instagram,scrape_status\n\
lake.example,Lake,stray-note,,,,no_contact\n\
https://quiet.example,Quiet,,,,,no_contact\n"
    );
}

#[test]
fn render_fills_finished_rows_and_leaves_pending_rows() {
    let table = table();
    let mut state = BatchState::new(3);
    state.record_batch(vec![lake_result(), SiteOutcome::Invalid]);

    let rendered = String::from_utf8(table.render(&state).unwrap()).unwrap();
    assert_eq!(
        rendered,
        "Name,website,Notes,email,facebook,instagram,scrape_status\n\
Lake Camp,https://lake.example,,hi@lake.example,https://facebook.com/lake,,success\n\
Broken,lake.example,bad,,,,invalid_url\n\
Quiet Camp,https://quiet.example/,,,,,\n"
    );
}

#[test]
fn csv_sink_overwrites_output_on_every_checkpoint() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("nested").join("camps_enriched.csv");
    let mut sink = CsvCheckpointSink::new(table(), output.clone());

    let mut state = BatchState::new(3);
    state.record_batch(vec![lake_result()]);
    sink.checkpoint(&state).unwrap();
    let first = fs::read_to_string(&output).unwrap();
    assert!(first.contains("hi@lake.example"));
    assert!(!first.contains("invalid_url"));

    state.record_batch(vec![SiteOutcome::Invalid, SiteOutcome::Scraped(SiteResult::default())]);
    sink.checkpoint(&state).unwrap();
    let second = fs::read_to_string(&output).unwrap();
    assert!(second.contains("invalid_url"));
    assert!(second.ends_with("Quiet Camp,https://quiet.example/,,,,,no_contact\n"));
    assert_eq!(second.lines().count(), 4);
    assert_eq!(sink.writes(), 2);
    assert_eq!(sink.output_path(), output.as_path());
}

#[test]
fn atomic_writer_replaces_existing_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out.csv");
    let writer = AtomicFileWriter::new(target.clone());

    writer.write(b"hello").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "hello");

    writer.write(b"world").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "world");
}

#[test]
fn atomic_writer_fails_when_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.join("out.csv"));
    assert!(writer.write(b"data").is_err());
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "x");
}
