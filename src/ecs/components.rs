use bracket_geometry::prelude::Point;
use specs::prelude::{Component, DenseVecStorage, NullStorage, VecStorage};

/// Energy needed for one action (an attack or a step).
pub const ACTION_COST: i32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub point: Point,
}

impl Component for Location {
    type Storage = VecStorage<Self>;
}

/// Where the entity wants to step this turn. Consumed by the movement system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Destination {
    pub point: Point,
}

impl Component for Destination {
    type Storage = DenseVecStorage<Self>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Faction {
    Player,
    Monster,
}

impl Faction {
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }
}

impl Component for Faction {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SightStat {
    pub range: i32,
}

impl Component for SightStat {
    type Storage = VecStorage<Self>;
}

#[derive(Default)]
pub struct WanderingMonster;

impl Component for WanderingMonster {
    type Storage = NullStorage<Self>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

impl Component for Health {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Energy {
    pub current: i32,
    pub gain: i32,
}

impl Energy {
    pub fn can_act(&self) -> bool {
        self.current >= ACTION_COST
    }

    pub fn spend(&mut self) {
        self.current -= ACTION_COST;
    }

    /// Banks at most one action's worth.
    pub fn recharge(&mut self) {
        self.current = self.current.saturating_add(self.gain).min(ACTION_COST);
    }
}

impl Component for Energy {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatStats {
    pub power: i32,
    pub defense: i32,
}

impl CombatStats {
    pub fn damage_against(&self, defense: i32) -> i32 {
        (self.power - defense).max(1)
    }
}

impl Component for CombatStats {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Name {
    pub name: String,
}

impl Component for Name {
    type Storage = VecStorage<Self>;
}
