// src/services/reporting.rs

use serde::Serialize;

use crate::{error::AppError, models::result::ResultRow, services::grading::round_half_even};

pub const CSV_HEADER: [&str; 4] = ["Name", "Username", "Score", "Date"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSummary {
    pub count: usize,
    /// Mean score rounded half-to-even to two decimals.
    pub average: f64,
    pub max: i64,
}

pub fn summarize(scores: &[i64]) -> ResultSummary {
    if scores.is_empty() {
        return ResultSummary {
            count: 0,
            average: 0.0,
            max: 0,
        };
    }

    let count = scores.len();
    let sum: i64 = scores.iter().sum();
    let hundredths = round_half_even(sum * 100, count as i64);

    ResultSummary {
        count,
        average: hundredths as f64 / 100.0,
        max: scores.iter().copied().max().unwrap_or(0),
    }
}

/// Renders results as CSV: `Name,Username,Score,Date`, one CRLF-terminated
/// line per attempt. Fields are quoted only when they need it.
pub fn to_csv(rows: &[ResultRow]) -> Result<String, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for row in rows {
        let score = row.score.to_string();
        let date = row.taken_at.format("%Y-%m-%d %H:%M:%S").to_string();
        writer
            .write_record([row.display_name(), row.username.as_str(), score.as_str(), date.as_str()])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::InternalServerError(e.to_string()))
}

fn csv_error(err: csv::Error) -> AppError {
    tracing::error!("Failed to write CSV: {:?}", err);
    AppError::InternalServerError(err.to_string())
}
