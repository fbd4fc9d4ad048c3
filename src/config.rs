use std::{fs, path::Path};

use bracket_random::prelude::{DiceType, parse_dice_string};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

pub const DEFAULT_MAP_WIDTH: i32 = 80;
pub const DEFAULT_MAP_HEIGHT: i32 = 40;
pub const DEFAULT_MESSAGE_LIMIT: usize = 5;
pub const DEFAULT_PLAYER_SIGHT: i32 = 8;
pub const DEFAULT_MONSTER_DICE: &str = "1d6+3";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapStrategyKind {
    #[default]
    RandomRooms,
    BorderOnly,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub strategy: MapStrategyKind,
    pub min_rooms: i32,
    pub max_rooms: i32,
    pub room_min_size: i32,
    pub room_max_size: i32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            strategy: MapStrategyKind::RandomRooms,
            min_rooms: 20,
            max_rooms: 20,
            room_min_size: 5,
            room_max_size: 10,
        }
    }
}

/// Everything needed to build an engine. Missing JSON fields fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: i32,
    pub height: i32,
    pub map: MapConfig,
    /// Dice expression for the number of monsters, e.g. `1d6+3`.
    pub monster_dice: String,
    pub player_sight: i32,
    pub message_limit: usize,
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
            map: MapConfig::default(),
            monster_dice: DEFAULT_MONSTER_DICE.to_string(),
            player_sight: DEFAULT_PLAYER_SIGHT,
            message_limit: DEFAULT_MESSAGE_LIMIT,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width < 3 || self.height < 3 {
            return Err(EngineError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.map.room_min_size < 3 || self.map.room_min_size > self.map.room_max_size {
            return Err(EngineError::InvalidRoomSize {
                min: self.map.room_min_size,
                max: self.map.room_max_size,
            });
        }
        if self.player_sight < 0 {
            return Err(EngineError::InvalidSight(self.player_sight));
        }
        self.monster_dice()?;
        Ok(())
    }

    pub fn monster_dice(&self) -> Result<DiceType> {
        parse_dice(&self.monster_dice)
    }
}

/// Parses `NdS+B` notation, case-insensitive on the `d`.
pub fn parse_dice(expr: &str) -> Result<DiceType> {
    let normalized = expr.trim().to_ascii_lowercase();
    let dice = parse_dice_string(&normalized)
        .map_err(|_| EngineError::InvalidDice(expr.to_string()))?;
    if dice.n_dice < 0 || dice.die_type < 1 {
        return Err(EngineError::InvalidDice(expr.to_string()));
    }
    Ok(dice)
}

/// Inclusive bounds of a dice roll.
pub fn dice_range(dice: &DiceType) -> (i32, i32) {
    (
        dice.n_dice + dice.bonus,
        dice.n_dice * dice.die_type + dice.bonus,
    )
}
