// SPDX-FileCopyrightText: 2026 Insight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chart suggestion heuristic.
//!
//! A result shaped like (label, value) gets a chart hint: a line chart when
//! the labels look like dates, a bar chart otherwise. Anything else gets no
//! suggestion. This never fails a request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::Display;

use insight_core::Row;

/// Suggested chart family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
}

/// A renderable chart suggestion for a two-column result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartHint {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub label_column: String,
    pub value_column: String,
}

/// Suggests a chart for a result set, or `None` when the shape doesn't fit.
///
/// The hint applies iff each record has exactly two columns and exactly one
/// of them is numeric in the first record. A label that parses as a date
/// (`YYYY-MM-DD`, `YYYY/MM/DD`, or a `YYYY-MM` month) suggests a time
/// series; anything else suggests categories.
pub fn suggest_chart(rows: &[Row]) -> Option<ChartHint> {
    let first = rows.first()?;
    if first.len() != 2 {
        return None;
    }

    let columns: Vec<(&String, &serde_json::Value)> = first.iter().collect();
    let numeric: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, (_, value))| value.is_number())
        .map(|(idx, _)| idx)
        .collect();
    if numeric.len() != 1 {
        return None;
    }

    let value_idx = numeric[0];
    let label_idx = 1 - value_idx;
    let (label_column, label_value) = columns[label_idx];
    let (value_column, _) = columns[value_idx];

    let chart_type = match label_value.as_str() {
        Some(label) if parses_as_date(label) => ChartType::Line,
        _ => ChartType::Bar,
    };

    Some(ChartHint {
        chart_type,
        label_column: label_column.clone(),
        value_column: value_column.clone(),
    })
}

fn parses_as_date(label: &str) -> bool {
    NaiveDate::parse_from_str(label, "%Y-%m-%d").is_ok()
        || NaiveDate::parse_from_str(label, "%Y/%m/%d").is_ok()
        || NaiveDate::parse_from_str(&format!("{label}-01"), "%Y-%m-%d").is_ok()
}
