//! Scoring module - landing points and star rating

use crate::level::StarThresholds;
use crate::types::{BOMB_CELL_SCORE, LANDING_SCORE, ROW_SCORES};

/// Score calculation result for one landing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    pub landing_score: u32,
    pub rows_score: u32,
    pub bomb_score: u32,
    pub total: u32,
}

/// Points for removing `rows` rows at once; more than four scores as four
pub fn calculate_rows_score(rows: usize) -> u32 {
    ROW_SCORES[rows.min(ROW_SCORES.len() - 1)]
}

/// Score for one landing
pub fn calculate_score(rows_cleared: usize, bomb_cells_cleared: usize) -> ScoreResult {
    let rows_score = calculate_rows_score(rows_cleared);
    let bomb_score = BOMB_CELL_SCORE.saturating_mul(bomb_cells_cleared as u32);
    ScoreResult {
        landing_score: LANDING_SCORE,
        rows_score,
        bomb_score,
        total: LANDING_SCORE + rows_score + bomb_score,
    }
}

/// Stars for a completed level; completing always earns at least one
pub fn stars_for_moves(moves: u32, thresholds: &StarThresholds) -> u8 {
    if moves <= thresholds.three_stars {
        3
    } else if moves <= thresholds.two_stars {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_score() {
        assert_eq!(calculate_rows_score(0), 0);
        assert_eq!(calculate_rows_score(1), 40);
        assert_eq!(calculate_rows_score(4), 1200);
        assert_eq!(calculate_rows_score(6), 1200);
    }

    #[test]
    fn test_calculate_score_sums_parts() {
        let r = calculate_score(2, 3);
        assert_eq!(r.rows_score, 100);
        assert_eq!(r.bomb_score, 15);
        assert_eq!(r.total, 1 + 100 + 15);
    }

    #[test]
    fn test_stars() {
        let t = StarThresholds {
            three_stars: 5,
            two_stars: 8,
        };
        assert_eq!(stars_for_moves(5, &t), 3);
        assert_eq!(stars_for_moves(6, &t), 2);
        assert_eq!(stars_for_moves(8, &t), 2);
        assert_eq!(stars_for_moves(100, &t), 1);
    }
}
