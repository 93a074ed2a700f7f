use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const BALLS_PER_DRAW: usize = 5;
pub const MIN_BALL: u8 = 1;
pub const MAX_BALL: u8 = 80;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("draw number must be positive")]
    ZeroDrawNumber,
    #[error("expected 5 numbers, found {0}")]
    WrongCount(usize),
    #[error("number {0} is outside 1..=80")]
    OutOfRange(u8),
    #[error("number {0} appears more than once")]
    Duplicate(u8),
}

/// One Quina draw. Numbers are always held in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDrawResult")]
pub struct DrawResult {
    draw_number: u32,
    date: NaiveDate,
    numbers: [u8; BALLS_PER_DRAW],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDrawResult {
    draw_number: u32,
    date: NaiveDate,
    numbers: Vec<u8>,
}

impl TryFrom<RawDrawResult> for DrawResult {
    type Error = RecordError;

    fn try_from(raw: RawDrawResult) -> Result<Self, Self::Error> {
        DrawResult::new(raw.draw_number, raw.date, &raw.numbers)
    }
}

impl DrawResult {
    /// Validates and canonicalises a candidate record.
    pub fn new(draw_number: u32, date: NaiveDate, numbers: &[u8]) -> Result<Self, RecordError> {
        if draw_number == 0 {
            return Err(RecordError::ZeroDrawNumber);
        }
        let mut balls: [u8; BALLS_PER_DRAW] = numbers
            .try_into()
            .map_err(|_| RecordError::WrongCount(numbers.len()))?;

        if let Some(&n) = balls.iter().find(|n| !(MIN_BALL..=MAX_BALL).contains(*n)) {
            return Err(RecordError::OutOfRange(n));
        }

        balls.sort_unstable();
        if let Some(pair) = balls.windows(2).find(|w| w[0] == w[1]) {
            return Err(RecordError::Duplicate(pair[0]));
        }

        Ok(Self {
            draw_number,
            date,
            numbers: balls,
        })
    }

    pub fn draw_number(&self) -> u32 {
        self.draw_number
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn numbers(&self) -> &[u8; BALLS_PER_DRAW] {
        &self.numbers
    }

    /// Copy with numbers in ascending order. Records built through `new` are
    /// already canonical; this guards values assembled any other way.
    pub fn canonicalize(&self) -> Self {
        let mut copy = self.clone();
        copy.numbers.sort_unstable();
        copy
    }

    /// Same draw, different numbers.
    pub fn conflicts_with(&self, other: &DrawResult) -> bool {
        self.draw_number == other.draw_number && self.numbers != other.numbers
    }
}

pub fn is_valid(draw_number: u32, numbers: &[u8]) -> bool {
    draw_number > 0
        && numbers.len() == BALLS_PER_DRAW
        && numbers.iter().all(|n| (MIN_BALL..=MAX_BALL).contains(n))
        && numbers
            .iter()
            .enumerate()
            .all(|(i, n)| !numbers[..i].contains(n))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub last_updated: Option<DateTime<Utc>>,
    pub source: String,
    pub results: Vec<DrawResult>,
}

impl Dataset {
    pub fn empty(source: &str) -> Self {
        Self {
            last_updated: None,
            source: source.to_string(),
            results: Vec::new(),
        }
    }
}
