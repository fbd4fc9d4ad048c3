use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};

/// A command from the presentation layer. `None` waits a turn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerInput {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl PlayerInput {
    pub const ALL: [PlayerInput; 9] = [
        PlayerInput::None,
        PlayerInput::Up,
        PlayerInput::Down,
        PlayerInput::Left,
        PlayerInput::Right,
        PlayerInput::UpLeft,
        PlayerInput::UpRight,
        PlayerInput::DownLeft,
        PlayerInput::DownRight,
    ];

    /// Compass step for this input; `None` for inputs that don't move.
    pub fn delta(self) -> Option<Point> {
        let (dx, dy) = match self {
            PlayerInput::None => return None,
            PlayerInput::Up => (0, -1),
            PlayerInput::Down => (0, 1),
            PlayerInput::Left => (-1, 0),
            PlayerInput::Right => (1, 0),
            PlayerInput::UpLeft => (-1, -1),
            PlayerInput::UpRight => (1, -1),
            PlayerInput::DownLeft => (-1, 1),
            PlayerInput::DownRight => (1, 1),
        };
        Some(Point::new(dx, dy))
    }
}
