use crate::types::{BALLS_PER_DRAW, DrawResult, MAX_BALL, MIN_BALL, RecordError};
use crate::utils::{ball_value, element_text, parse_draw_date};
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;

static DRAW_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Draw\s*(?:Number)?:?\s*(\d{4,})").expect("valid draw regex")
});
static DRAW_HASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\d{4,})").expect("valid hash regex"));
static ARCHIVE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)results.*archive.*quina").expect("valid class regex"));
static BALL_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ball").expect("valid class regex"));
static NUMBER_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)number|ball").expect("valid class regex"));
static CARD_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)result|draw").expect("valid class regex"));

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("li"));
static SPAN_OR_DIV: LazyLock<Selector> = LazyLock::new(|| selector("span, div"));
static DIV: LazyLock<Selector> = LazyLock::new(|| selector("div"));
static BALL_HOLDER: LazyLock<Selector> = LazyLock::new(|| selector("li, span, div"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid css selector")
}

/// Why a single table row or result card did not become a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("no draw identifier in fragment")]
    MissingDrawNumber,
    #[error("draw identifier {0:?} is not a usable number")]
    InvalidDrawNumber(String),
    #[error("expected 5 balls, found {0}")]
    BallCount(usize),
    #[error("ball {0} appears more than once")]
    DuplicateBall(u8),
    #[error("ball {0} is outside 1..=80")]
    BallOutOfRange(u8),
}

impl ParseError {
    /// Header rows, navigation blocks and similar fragments fail these checks
    /// on every page; they are not worth a warning.
    pub fn is_expected(&self) -> bool {
        matches!(self, ParseError::MissingDrawNumber | ParseError::BallCount(_))
    }
}

impl From<RecordError> for ParseError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::ZeroDrawNumber => ParseError::InvalidDrawNumber("0".to_string()),
            RecordError::WrongCount(n) => ParseError::BallCount(n),
            RecordError::OutOfRange(n) => ParseError::BallOutOfRange(n),
            RecordError::Duplicate(n) => ParseError::DuplicateBall(n),
        }
    }
}

/// Pulls draw records out of a results page.
///
/// Two independent passes run over the document: archive tables first, then
/// result cards. A card only contributes a draw the tables did not already
/// yield. A fragment that fails to parse is logged and skipped.
#[derive(Debug, Clone)]
pub struct Extractor {
    today: NaiveDate,
}

impl Extractor {
    /// `today` stands in for any draw whose date cannot be read.
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn extract(&self, markup: &str) -> Vec<DrawResult> {
        if markup.trim().is_empty() {
            tracing::warn!("empty markup, nothing to extract");
            return Vec::new();
        }

        let document = Html::parse_document(markup);
        let mut results = self.table_pass(&document);
        let from_tables = results.len();

        let mut seen: HashSet<u32> = results.iter().map(DrawResult::draw_number).collect();
        for draw in self.card_pass(&document) {
            if seen.insert(draw.draw_number()) {
                results.push(draw);
            }
        }

        tracing::info!(
            tables = from_tables,
            cards = results.len() - from_tables,
            "extracted draw candidates"
        );
        results
    }

    fn table_pass(&self, document: &Html) -> Vec<DrawResult> {
        let mut tables: Vec<ElementRef<'_>> = document
            .select(&TABLE)
            .filter(|t| class_matches(t, &ARCHIVE_TABLE))
            .collect();
        if tables.is_empty() {
            tracing::debug!("no archive tables, falling back to every table");
            tables = document.select(&TABLE).collect();
        }

        tables
            .iter()
            .flat_map(|table| table.select(&ROW))
            .filter_map(|row| keep("row", self.parse_row(&row)))
            .collect()
    }

    fn card_pass(&self, document: &Html) -> Vec<DrawResult> {
        document
            .select(&DIV)
            .filter(|div| class_matches(div, &CARD_CLASS))
            .filter_map(|card| keep("card", self.parse_card(&card)))
            .collect()
    }

    pub fn parse_row(&self, row: &ElementRef<'_>) -> Result<DrawResult, ParseError> {
        let text = element_text(row);
        let draw_number = labelled_draw_number(&text)?;

        let mut numbers: Vec<u32> = row
            .select(&LIST_ITEM)
            .filter(|li| class_matches(li, &BALL_CLASS))
            .filter_map(|li| ball_value(&li))
            .collect();
        if numbers.is_empty() {
            numbers = row
                .select(&SPAN_OR_DIV)
                .filter(|e| class_matches(e, &NUMBER_CLASS))
                .filter_map(|e| ball_value(&e))
                .collect();
        }

        let balls = in_range(&numbers);
        if balls.len() != BALLS_PER_DRAW {
            return Err(ParseError::BallCount(balls.len()));
        }
        self.build(draw_number, &text, &balls)
    }

    pub fn parse_card(&self, card: &ElementRef<'_>) -> Result<DrawResult, ParseError> {
        let text = element_text(card);
        let draw_number = match labelled_draw_number(&text) {
            Err(ParseError::MissingDrawNumber) => hashed_draw_number(&text)?,
            other => other?,
        };

        let mut balls: Vec<u8> = Vec::with_capacity(BALLS_PER_DRAW);
        for holder in card
            .select(&BALL_HOLDER)
            .filter(|e| class_matches(e, &NUMBER_CLASS))
        {
            if let Some(n) = ball_value(&holder).and_then(as_ball) {
                if !balls.contains(&n) {
                    balls.push(n);
                }
            }
        }

        if balls.len() != BALLS_PER_DRAW {
            return Err(ParseError::BallCount(balls.len()));
        }
        self.build(draw_number, &text, &balls)
    }

    fn build(&self, draw_number: u32, text: &str, balls: &[u8]) -> Result<DrawResult, ParseError> {
        let date = parse_draw_date(text).unwrap_or_else(|| {
            tracing::debug!(draw_number, "no readable date, using today");
            self.today
        });
        Ok(DrawResult::new(draw_number, date, balls)?)
    }
}

fn keep(kind: &str, parsed: Result<DrawResult, ParseError>) -> Option<DrawResult> {
    match parsed {
        Ok(draw) => Some(draw),
        Err(e) if e.is_expected() => {
            tracing::debug!(kind, "skipping fragment: {}", e);
            None
        }
        Err(e) => {
            tracing::warn!(kind, "error parsing fragment: {}", e);
            None
        }
    }
}

fn class_matches(element: &ElementRef<'_>, pattern: &Regex) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|class| pattern.is_match(class))
}

fn as_ball(n: u32) -> Option<u8> {
    u8::try_from(n)
        .ok()
        .filter(|b| (MIN_BALL..=MAX_BALL).contains(b))
}

fn in_range(numbers: &[u32]) -> Vec<u8> {
    numbers.iter().copied().filter_map(as_ball).collect()
}

fn labelled_draw_number(text: &str) -> Result<u32, ParseError> {
    let caps = DRAW_LABEL
        .captures(text)
        .ok_or(ParseError::MissingDrawNumber)?;
    to_draw_number(&caps[1])
}

fn hashed_draw_number(text: &str) -> Result<u32, ParseError> {
    let caps = DRAW_HASH.captures(text).ok_or(ParseError::MissingDrawNumber)?;
    to_draw_number(&caps[1])
}

fn to_draw_number(digits: &str) -> Result<u32, ParseError> {
    digits
        .parse()
        .map_err(|_| ParseError::InvalidDrawNumber(digits.to_string()))
}
