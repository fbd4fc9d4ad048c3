use std::{fs, path::Path};

use megadungeon::PlayerInput;
use tracing::warn;

/// Keypresses replayed from a text file, one character per turn.
/// Blank lines and lines starting with `#` are skipped.
pub struct ScriptedInput {
    commands: Vec<PlayerInput>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    pub fn parse(script: &str) -> Self {
        let mut commands = Vec::new();
        for line in script.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            for key in line.chars().filter(|c| !c.is_whitespace()) {
                match char_to_input(key) {
                    Some(input) => commands.push(input),
                    None => warn!("unknown key in script: {key:?}"),
                }
            }
        }
        Self {
            commands,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

impl Iterator for ScriptedInput {
    type Item = PlayerInput;

    fn next(&mut self) -> Option<PlayerInput> {
        let input = self.commands.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(input)
    }
}

/// Numpad digits, vi keys and WASD; `.` and `5` wait.
pub fn char_to_input(c: char) -> Option<PlayerInput> {
    let input = match c.to_ascii_lowercase() {
        '8' | 'k' | 'w' => PlayerInput::Up,
        '2' | 'j' | 's' => PlayerInput::Down,
        '4' | 'h' | 'a' => PlayerInput::Left,
        '6' | 'l' | 'd' => PlayerInput::Right,
        '7' | 'y' => PlayerInput::UpLeft,
        '9' | 'u' => PlayerInput::UpRight,
        '1' | 'b' => PlayerInput::DownLeft,
        '3' | 'n' => PlayerInput::DownRight,
        '5' | '.' => PlayerInput::None,
        _ => return None,
    };
    Some(input)
}
