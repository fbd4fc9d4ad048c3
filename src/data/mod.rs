pub mod monsters;

pub use monsters::{ActorTemplate, MonsterTemplate};

/// Stats the player starts with.
pub const PLAYER: ActorTemplate = ActorTemplate {
    name: "Player",
    hp: 30,
    power: 5,
    defense: 1,
    speed: 100,
    sight: crate::config::DEFAULT_PLAYER_SIGHT,
};
