//! Level records - static layout data consumed as plain structs
//!
//! A level names its field dimensions, the goal, the piece set the preview
//! queue draws from, and the move thresholds that decide the star rating.
//! Levels are built in ([`builtin_levels`]) or loaded through the engine's
//! JSON configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::{Blueprint, Cell, Field, FieldError};
use crate::types::{BlockColor, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level {index}: {source}")]
    Field {
        index: u32,
        #[source]
        source: FieldError,
    },
    #[error("level {index} has an empty piece set")]
    EmptyPieceSet { index: u32 },
    #[error("level {index} has a blueprint goal but no blueprint")]
    MissingBlueprint { index: u32 },
    #[error("level {index} blueprint row {row} spans the whole field and would clear when filled")]
    FullBlueprintRow { index: u32, row: usize },
    #[error("level {index} prefill has {prefill} rows but the field only has {rows}")]
    PrefillTooTall { index: u32, prefill: usize, rows: usize },
}

/// What completes a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LevelGoal {
    /// Clear at least this many rows
    ClearRows { rows: u32 },
    /// Cover every blueprint slot
    Blueprint,
}

/// Move counts at or below which a completed level earns three or two stars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarThresholds {
    pub three_stars: u32,
    pub two_stars: u32,
}

impl Default for StarThresholds {
    fn default() -> Self {
        Self {
            three_stars: 15,
            two_stars: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub index: u32,
    #[serde(default)]
    pub name: String,
    pub num_columns: usize,
    pub num_rows: usize,
    pub goal: LevelGoal,
    /// Piece kinds shuffled into each bag; repeat a kind to weight it
    pub pieces: Vec<PieceKind>,
    #[serde(default = "default_seed")]
    pub seed: u32,
    /// Blueprint rows, top row first (`#` = slot)
    #[serde(default)]
    pub blueprint: Option<Vec<String>>,
    /// Pre-filled rows at the bottom of the field, top row first (`#` = block)
    #[serde(default)]
    pub prefill: Vec<String>,
    #[serde(default)]
    pub stars: StarThresholds,
    /// Landing more pieces than this without completing the goal ends the level
    #[serde(default)]
    pub max_moves: Option<u32>,
}

fn default_seed() -> u32 {
    1
}

impl LevelConfig {
    pub fn validate(&self) -> Result<(), LevelError> {
        self.build_field().map(|_| ())
    }

    /// Build the level's starting field (blueprint and prefill applied)
    pub fn build_field(&self) -> Result<Field, LevelError> {
        let index = self.index;
        let wrap = |source: FieldError| LevelError::Field { index, source };

        if self.pieces.is_empty() {
            return Err(LevelError::EmptyPieceSet { index });
        }

        let mut field = match (&self.blueprint, self.goal) {
            (Some(rows), goal) => {
                let bp = Blueprint::from_rows(rows.as_slice()).map_err(wrap)?;
                if goal == LevelGoal::Blueprint {
                    if let Some(row) = bp.first_full_row() {
                        return Err(LevelError::FullBlueprintRow { index, row });
                    }
                }
                Field::with_blueprint(self.num_columns, self.num_rows, bp).map_err(wrap)?
            }
            (None, LevelGoal::Blueprint) => return Err(LevelError::MissingBlueprint { index }),
            (None, _) => Field::new(self.num_columns, self.num_rows).map_err(wrap)?,
        };

        if self.prefill.len() > self.num_rows {
            return Err(LevelError::PrefillTooTall {
                index,
                prefill: self.prefill.len(),
                rows: self.num_rows,
            });
        }
        let first_row = self.num_rows - self.prefill.len();
        for (i, row) in self.prefill.iter().enumerate() {
            if row.chars().count() != self.num_columns {
                return Err(wrap(FieldError::RaggedGrid));
            }
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '#' => {
                        field.set(x as i32, (first_row + i) as i32, Cell::full(BlockColor::Gray));
                    }
                    '.' => {}
                    _ => return Err(wrap(FieldError::InvalidGridRow { row: i, ch })),
                }
            }
        }

        Ok(field)
    }
}

/// The levels shipped with the game
pub fn builtin_levels() -> Vec<LevelConfig> {
    vec![
        LevelConfig {
            index: 0,
            name: "Warm-up".to_owned(),
            num_columns: 6,
            num_rows: 14,
            goal: LevelGoal::ClearRows { rows: 4 },
            pieces: vec![
                PieceKind::I,
                PieceKind::O,
                PieceKind::L,
                PieceKind::MirroredL,
                PieceKind::ShortI,
                PieceKind::Domino,
            ],
            seed: 7,
            blueprint: None,
            prefill: Vec::new(),
            stars: StarThresholds {
                three_stars: 12,
                two_stars: 18,
            },
            max_moves: None,
        },
        LevelConfig {
            index: 1,
            name: "Demolition".to_owned(),
            num_columns: 7,
            num_rows: 16,
            goal: LevelGoal::ClearRows { rows: 6 },
            pieces: vec![
                PieceKind::T,
                PieceKind::S,
                PieceKind::Z,
                PieceKind::ShortL,
                PieceKind::Plus,
                PieceKind::Bomb,
                PieceKind::RowBomb,
            ],
            seed: 21,
            blueprint: None,
            prefill: vec![
                "##.####".to_owned(),
                "#.###.#".to_owned(),
                "###.###".to_owned(),
            ],
            stars: StarThresholds {
                three_stars: 14,
                two_stars: 22,
            },
            max_moves: Some(40),
        },
        LevelConfig {
            index: 2,
            name: "Blueprint".to_owned(),
            num_columns: 6,
            num_rows: 12,
            goal: LevelGoal::Blueprint,
            pieces: vec![
                PieceKind::O,
                PieceKind::Domino,
                PieceKind::Single,
                PieceKind::ShortL,
                PieceKind::U,
            ],
            seed: 3,
            blueprint: Some(
                [
                    "......", "......", "......", "......", "......", "......", //
                    "......", "......", ".####.", ".#..#.", ".#..#.", "#####.",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ),
            prefill: Vec::new(),
            stars: StarThresholds {
                three_stars: 8,
                two_stars: 12,
            },
            max_moves: Some(30),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_levels_are_valid() {
        for level in builtin_levels() {
            level.validate().unwrap();
        }
    }

    #[test]
    fn prefill_lands_at_the_bottom() {
        let level = &builtin_levels()[1];
        let field = level.build_field().unwrap();
        assert!(field.is_full(0, 15));
        assert!(!field.is_full(2, 13));
        assert!(field.row_is_empty(12));
        assert_eq!(field.num_occupied_rows(), 3);
    }

    #[test]
    fn blueprint_goal_requires_blueprint() {
        let mut level = builtin_levels()[2].clone();
        level.blueprint = None;
        assert_eq!(
            level.validate(),
            Err(LevelError::MissingBlueprint { index: 2 })
        );
    }

    #[test]
    fn blueprint_goal_rejects_full_blueprint_row() {
        let mut level = builtin_levels()[2].clone();
        if let Some(rows) = level.blueprint.as_mut() {
            rows[11] = "######".to_owned();
        }
        assert_eq!(
            level.validate(),
            Err(LevelError::FullBlueprintRow { index: 2, row: 11 })
        );

        // A full row is fine when the blueprint is only decoration
        level.goal = LevelGoal::ClearRows { rows: 2 };
        level.validate().unwrap();
    }

    #[test]
    fn level_config_from_json() {
        let json = r#"{
            "index": 9,
            "num_columns": 5,
            "num_rows": 10,
            "goal": { "type": "clear_rows", "rows": 2 },
            "pieces": ["I", "Bomb"]
        }"#;
        let level: LevelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(level.goal, LevelGoal::ClearRows { rows: 2 });
        assert_eq!(level.seed, 1);
        assert_eq!(level.stars, StarThresholds::default());
        level.validate().unwrap();
    }

    #[test]
    fn empty_piece_set_is_rejected() {
        let mut level = builtin_levels()[0].clone();
        level.pieces.clear();
        assert_eq!(level.validate(), Err(LevelError::EmptyPieceSet { index: 0 }));
    }
}
