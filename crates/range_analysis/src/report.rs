//! Characterization report rendering

use std::fmt;

use contracts::RangeErrorStats;
use serde::{Deserialize, Serialize};

const COLUMNS: [&str; 3] = ["true_range_m", "mean_error_m", "std_dev_m"];

/// Rows in the order the distances were tested
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterizationReport {
    pub rows: Vec<RangeErrorStats>,
}

impl CharacterizationReport {
    pub fn new(rows: Vec<RangeErrorStats>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header line plus one line per row
    pub fn to_csv(&self) -> String {
        let mut out = COLUMNS.join(",");
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "{},{},{}\n",
                row.true_distance, row.mean_error, row.std_dev_error
            ));
        }
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for CharacterizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12}  {:>14}  {:>12}", COLUMNS[0], COLUMNS[1], COLUMNS[2])?;
        for row in &self.rows {
            writeln!(
                f,
                "{:>12.3}  {:>14.6}  {:>12.6}",
                row.true_distance, row.mean_error, row.std_dev_error
            )?;
        }
        Ok(())
    }
}
