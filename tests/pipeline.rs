use anyhow::{Result, bail};
use chrono::{NaiveDate, TimeZone, Utc};
use quina_lib::{Dataset, DrawResult, Extractor, JsonStore, MarkupSource, Reconciler, run};
use std::fs;
use tempfile::TempDir;

struct StaticPage(String);

impl MarkupSource for StaticPage {
    async fn fetch(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

struct DeadPage;

impl MarkupSource for DeadPage {
    async fn fetch(&self) -> Result<String> {
        bail!("error fetching page: connection refused")
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn draw(number: u32, date: NaiveDate, balls: [u8; 5]) -> DrawResult {
    DrawResult::new(number, date, &balls).unwrap()
}

fn row(number: u32, date: &str, balls: [u8; 5]) -> String {
    let items: String = balls
        .iter()
        .map(|b| format!(r#"<li class="ball">{}</li>"#, b))
        .collect();
    format!(r#"<tr><td>Draw Number: {number}</td><td>{date}</td><td><ul>{items}</ul></td></tr>"#)
}

fn page(rows: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html><html><body>
        <table class="results archive quina"><tr><th>Draw</th><th>Result</th></tr>{}</table>
        </body></html>"#,
        rows.concat()
    )
}

fn existing() -> Dataset {
    Dataset {
        last_updated: Some(Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap()),
        source: "megasena.com".to_string(),
        results: vec![
            draw(1001, ymd(2024, 1, 2), [3, 14, 25, 36, 47]),
            draw(1000, ymd(2024, 1, 1), [1, 2, 3, 4, 5]),
            draw(999, ymd(2023, 12, 30), [10, 20, 30, 40, 50]),
        ],
    }
}

#[tokio::test]
async fn new_draw_is_added_and_identical_draw_kept() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path().join("data").join("results.json"), "megasena.com");
    store.save(&existing()).unwrap();

    let source = StaticPage(page(&[
        row(1002, "Wednesday, 3rd January 2024", [71, 9, 40, 22, 5]),
        row(1001, "Tuesday, 2nd January 2024", [47, 36, 25, 14, 3]),
    ]));
    let now = Utc.with_ymd_and_hms(2024, 1, 3, 22, 15, 0).unwrap();

    let summary = run(&source, &store, &Extractor::new(ymd(2024, 1, 3)), &Reconciler::default(), now)
        .await
        .unwrap();

    assert_eq!(summary.candidates, 2);
    assert_eq!(summary.existing, 3);
    assert_eq!(summary.added_draws, vec![1002]);
    assert!(summary.corrected_draws.is_empty());
    assert_eq!(summary.saved, 4);
    assert_eq!(
        summary.latest,
        Some(draw(1002, ymd(2024, 1, 3), [5, 9, 22, 40, 71]))
    );

    let saved = store.load();
    assert_eq!(saved.last_updated, Some(now));
    let draws: Vec<u32> = saved.results.iter().map(DrawResult::draw_number).collect();
    assert_eq!(draws, vec![1002, 1001, 1000, 999]);
}

#[tokio::test]
async fn corrupt_store_is_replaced_by_scraped_draws() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.json");
    fs::write(&path, "<<garbage>>").unwrap();
    let store = JsonStore::new(&path, "megasena.com");

    let source = StaticPage(page(&[
        row(2001, "1st May 2024", [1, 2, 3, 4, 5]),
        row(2003, "3rd May 2024", [6, 7, 8, 9, 10]),
        row(2001, "1st May 2024", [1, 2, 3, 4, 5]),
    ]));
    let now = Utc.with_ymd_and_hms(2024, 5, 3, 22, 0, 0).unwrap();

    let summary = run(&source, &store, &Extractor::new(ymd(2024, 5, 3)), &Reconciler::default(), now)
        .await
        .unwrap();

    assert_eq!(summary.existing, 0);
    assert_eq!(summary.added_draws, vec![2003, 2001]);
    let saved = store.load();
    assert_eq!(saved.source, "megasena.com");
    let draws: Vec<u32> = saved.results.iter().map(DrawResult::draw_number).collect();
    assert_eq!(draws, vec![2003, 2001]);
}

#[tokio::test]
async fn page_without_draws_still_saves() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::new(dir.path().join("results.json"), "megasena.com");
    store.save(&existing()).unwrap();

    let source = StaticPage("<html><body><p>Results are being updated</p></body></html>".to_string());
    let now = Utc.with_ymd_and_hms(2024, 1, 4, 8, 0, 0).unwrap();

    let summary = run(&source, &store, &Extractor::new(ymd(2024, 1, 4)), &Reconciler::default(), now)
        .await
        .unwrap();

    assert_eq!(summary.candidates, 0);
    assert!(summary.added_draws.is_empty());
    let saved = store.load();
    assert_eq!(saved.results, existing().results);
    assert_eq!(saved.last_updated, Some(now));
}

#[tokio::test]
async fn fetch_failure_aborts_without_writing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.json");
    let store = JsonStore::new(&path, "megasena.com");

    let result = run(
        &DeadPage,
        &store,
        &Extractor::new(ymd(2024, 1, 4)),
        &Reconciler::default(),
        Utc::now(),
    )
    .await;

    assert!(result.is_err());
    assert!(!path.exists());
}
