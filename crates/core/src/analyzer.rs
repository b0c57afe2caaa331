//! Read-only heuristics over a field.
//!
//! The metrics are the classic stacking features used to rank placements:
//! column heights, holes, wells, row and column transitions and bumpiness.
//! Walls and the floor count as full for the transition metrics.

use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Weights for [`FieldAnalyzer::evaluate`]; negative weights penalize a metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerWeights {
    pub aggregate_height: f32,
    pub holes: f32,
    pub wells: f32,
    pub row_transitions: f32,
    pub column_transitions: f32,
    pub bumpiness: f32,
    pub rows_cleared: f32,
}

impl Default for AnalyzerWeights {
    fn default() -> Self {
        Self {
            aggregate_height: -0.51,
            holes: -7.9,
            wells: -3.4,
            row_transitions: -3.2,
            column_transitions: -9.3,
            bumpiness: -0.18,
            rows_cleared: 3.4,
        }
    }
}

pub struct FieldAnalyzer<'a> {
    field: &'a Field,
}

impl<'a> FieldAnalyzer<'a> {
    pub fn new(field: &'a Field) -> Self {
        Self { field }
    }

    fn full(&self, x: i32, y: i32) -> bool {
        self.field.is_full(x, y)
    }

    /// Height of a column: rows from the floor up to and including its top block
    pub fn column_height(&self, x: usize) -> usize {
        let rows = self.field.num_rows();
        (0..rows)
            .find(|&y| self.full(x as i32, y as i32))
            .map_or(0, |top| rows - top)
    }

    pub fn column_heights(&self) -> Vec<usize> {
        (0..self.field.num_columns())
            .map(|x| self.column_height(x))
            .collect()
    }

    pub fn aggregate_height(&self) -> usize {
        self.column_heights().iter().sum()
    }

    pub fn max_height(&self) -> usize {
        self.column_heights().into_iter().max().unwrap_or(0)
    }

    /// Empty cells with at least one block above them in the same column
    pub fn holes(&self) -> usize {
        let rows = self.field.num_rows();
        (0..self.field.num_columns())
            .map(|x| {
                let height = self.column_height(x);
                (rows - height..rows)
                    .filter(|&y| !self.full(x as i32, y as i32))
                    .count()
            })
            .sum()
    }

    /// Sum of well depths, counted cumulatively down each well
    pub fn wells(&self) -> usize {
        let columns = self.field.num_columns() as i32;
        let mut total = 0;
        for x in 0..columns {
            let mut depth = 0;
            for y in 0..self.field.num_rows() as i32 {
                let left = x == 0 || self.full(x - 1, y);
                let right = x == columns - 1 || self.full(x + 1, y);
                if !self.full(x, y) && left && right {
                    depth += 1;
                    total += depth;
                } else {
                    depth = 0;
                }
            }
        }
        total
    }

    /// Horizontal full/empty changes, walls included
    pub fn row_transitions(&self) -> usize {
        let columns = self.field.num_columns() as i32;
        let mut total = 0;
        for y in 0..self.field.num_rows() as i32 {
            let mut prev = true;
            for x in 0..columns {
                let cur = self.full(x, y);
                if cur != prev {
                    total += 1;
                }
                prev = cur;
            }
            if !prev {
                total += 1;
            }
        }
        total
    }

    /// Vertical full/empty changes, floor included
    pub fn column_transitions(&self) -> usize {
        let rows = self.field.num_rows() as i32;
        let mut total = 0;
        for x in 0..self.field.num_columns() as i32 {
            let mut prev = false;
            for y in 0..rows {
                let cur = self.full(x, y);
                if cur != prev {
                    total += 1;
                }
                prev = cur;
            }
            if !prev {
                total += 1;
            }
        }
        total
    }

    /// Sum of height differences between neighbouring columns
    pub fn bumpiness(&self) -> usize {
        self.column_heights()
            .windows(2)
            .map(|w| w[0].abs_diff(w[1]))
            .sum()
    }

    pub fn num_full_rows(&self) -> usize {
        self.field.detect_full_rows().len()
    }

    /// Weighted score of the field; higher is better
    pub fn evaluate(&self, weights: &AnalyzerWeights, rows_cleared: usize) -> f32 {
        weights.aggregate_height * self.aggregate_height() as f32
            + weights.holes * self.holes() as f32
            + weights.wells * self.wells() as f32
            + weights.row_transitions * self.row_transitions() as f32
            + weights.column_transitions * self.column_transitions() as f32
            + weights.bumpiness * self.bumpiness() as f32
            + weights.rows_cleared * rows_cleared as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(rows: &[&str]) -> Field {
        Field::from_ascii(rows).unwrap()
    }

    #[test]
    fn empty_field_metrics() {
        let f = field(&["....", "....", "....", "...."]);
        let a = FieldAnalyzer::new(&f);
        assert_eq!(a.aggregate_height(), 0);
        assert_eq!(a.holes(), 0);
        assert_eq!(a.bumpiness(), 0);
        // Every row: wall|empty and empty|wall
        assert_eq!(a.row_transitions(), 8);
        // Every column: empty above the floor
        assert_eq!(a.column_transitions(), 4);
    }

    #[test]
    fn heights_and_holes() {
        let f = field(&[
            "....", //
            ".#..", //
            ".#.#", //
            "#..#", //
        ]);
        let a = FieldAnalyzer::new(&f);
        assert_eq!(a.column_heights(), vec![1, 3, 0, 2]);
        assert_eq!(a.max_height(), 3);
        assert_eq!(a.holes(), 1);
        assert_eq!(a.bumpiness(), 2 + 3 + 2);
    }

    #[test]
    fn wells_are_cumulative() {
        let f = field(&[
            "#.##", //
            "#.##", //
            "#.##", //
            "####", //
        ]);
        let a = FieldAnalyzer::new(&f);
        assert_eq!(a.wells(), 1 + 2 + 3);
    }

    #[test]
    fn evaluate_prefers_flat_fields() {
        let flat = field(&["....", "....", "....", "####"]);
        let holey = field(&["....", "....", "####", "#.##"]);
        let w = AnalyzerWeights::default();
        let flat_score = FieldAnalyzer::new(&flat).evaluate(&w, 0);
        let holey_score = FieldAnalyzer::new(&holey).evaluate(&w, 0);
        assert!(flat_score > holey_score);
    }
}
