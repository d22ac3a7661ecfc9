use std::fs::File;
use std::io::Write;

use eclean_config::load_produce_csv;
use rstest::rstest;
use tempfile::tempdir;

fn write_csv(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("produce.csv");
    let mut f = File::create(&path).expect("create csv");
    f.write_all(body.as_bytes()).expect("write csv");
    (dir, path)
}

#[rstest]
fn loads_valid_table() {
    let (_dir, path) = write_csv("produce,seconds\nTomato,30\nPotato, 90\n");
    let table = load_produce_csv(&path).expect("load");
    assert_eq!(table.get("Tomato"), Some(&30));
    assert_eq!(table.get("Potato"), Some(&90));
    assert_eq!(table.len(), 2);
}

#[rstest]
fn rejects_wrong_headers() {
    let (_dir, path) = write_csv("name,secs\nTomato,30\n");
    let err = load_produce_csv(&path).expect_err("bad headers");
    assert!(format!("{err}").contains("must have headers 'produce,seconds'"));
}

#[rstest]
#[case("produce,seconds\nCabbage,70\n", "unknown produce")]
#[case("produce,seconds\nTomato,0\n", "must be >= 1")]
#[case("produce,seconds\nTomato,abc\n", "invalid CSV row 2")]
#[case("produce,seconds\nTomato,30\nTomato,31\n", "duplicate produce")]
fn rejects_bad_rows(#[case] body: &str, #[case] needle: &str) {
    let (_dir, path) = write_csv(body);
    let err = load_produce_csv(&path).expect_err("bad row");
    assert!(format!("{err}").contains(needle), "{err}");
}

#[rstest]
fn missing_file_reports_path() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nope.csv");
    let err = load_produce_csv(&path).expect_err("missing");
    assert!(format!("{err}").contains("open produce CSV"));
}
