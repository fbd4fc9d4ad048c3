use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::*;
use tracing::{debug, trace};

use super::{
    components::{
        CombatStats, Destination, Energy, Faction, Health, Location, Name, WanderingMonster,
    },
    resources::{ActiveEntity, MessageLog},
};
use crate::{ai::random_step, map::OccupancyGrid};

// Every system below looks only at the entity named by `ActiveEntity`; the
// pipeline walks the roster and points the resource at each one in turn.

#[derive(Default)]
pub struct CombatSystem;

impl<'a> System<'a> for CombatSystem {
    type SystemData = (
        Entities<'a>,
        WriteExpect<'a, ActiveEntity>,
        ReadStorage<'a, Location>,
        ReadStorage<'a, Faction>,
        ReadStorage<'a, CombatStats>,
        ReadStorage<'a, Name>,
        WriteStorage<'a, Health>,
        WriteStorage<'a, Energy>,
        WriteExpect<'a, MessageLog>,
    );

    fn run(
        &mut self,
        (
            entities,
            mut active,
            locations,
            factions,
            stats,
            names,
            mut healths,
            mut energies,
            mut log,
        ): Self::SystemData,
    ) {
        let attacker = active.entity;
        let (Some(location), Some(faction), Some(attack)) = (
            locations.get(attacker),
            factions.get(attacker),
            stats.get(attacker),
        ) else {
            return;
        };
        if !active.ready || healths.get(attacker).is_some_and(Health::is_dead) {
            return;
        }

        let Some(target) = adjacent_enemy(
            &entities,
            &locations,
            &factions,
            |entity| healths.get(entity).is_some_and(|health| !health.is_dead()),
            attacker,
            location.point,
            *faction,
        ) else {
            return;
        };

        let defense = stats.get(target).map_or(0, |s| s.defense);
        let damage = attack.damage_against(defense);
        if let Some(health) = healths.get_mut(target) {
            health.current -= damage;
        }
        if let Some(energy) = energies.get_mut(attacker) {
            energy.spend();
        }
        active.ready = false;
        log.push(format!(
            "{} hits {} for {damage}.",
            display_name(&names, attacker),
            display_name(&names, target)
        ));
    }
}

#[derive(Default)]
pub struct HealthSystem;

impl<'a> System<'a> for HealthSystem {
    type SystemData = (
        Entities<'a>,
        ReadExpect<'a, ActiveEntity>,
        ReadStorage<'a, Health>,
        ReadStorage<'a, Name>,
        ReadStorage<'a, Location>,
        WriteExpect<'a, MessageLog>,
    );

    fn run(&mut self, (entities, active, healths, names, locations, mut log): Self::SystemData) {
        let entity = active.entity;
        if !healths.get(entity).is_some_and(Health::is_dead) {
            return;
        }
        let name = display_name(&names, entity);
        if entities.delete(entity).is_ok() {
            if let Some(location) = locations.get(entity) {
                debug!("{name} died at ({},{})", location.point.x, location.point.y);
            }
            log.push(format!("{name} dies."));
        }
    }
}

#[derive(Default)]
pub struct EnergySystem;

impl<'a> System<'a> for EnergySystem {
    type SystemData = (ReadExpect<'a, ActiveEntity>, WriteStorage<'a, Energy>);

    fn run(&mut self, (active, mut energies): Self::SystemData) {
        if let Some(energy) = energies.get_mut(active.entity) {
            energy.recharge();
        }
    }
}

#[derive(Default)]
pub struct WanderSystem;

impl<'a> System<'a> for WanderSystem {
    type SystemData = (
        Entities<'a>,
        ReadExpect<'a, ActiveEntity>,
        ReadStorage<'a, WanderingMonster>,
        ReadStorage<'a, Location>,
        ReadStorage<'a, Faction>,
        ReadStorage<'a, Health>,
        WriteStorage<'a, Destination>,
        ReadExpect<'a, OccupancyGrid>,
        WriteExpect<'a, RandomNumberGenerator>,
    );

    fn run(
        &mut self,
        (
            entities,
            active,
            wanderers,
            locations,
            factions,
            healths,
            mut destinations,
            grid,
            mut rng,
        ): Self::SystemData,
    ) {
        let entity = active.entity;
        if !wanderers.contains(entity) || destinations.contains(entity) {
            return;
        }
        let Some(location) = locations.get(entity) else {
            return;
        };
        // Hold position next to an enemy.
        if let Some(faction) = factions.get(entity) {
            let enemy = adjacent_enemy(
                &entities,
                &locations,
                &factions,
                |other| healths.get(other).is_some_and(|health| !health.is_dead()),
                entity,
                location.point,
                *faction,
            );
            if enemy.is_some() {
                return;
            }
        }
        if let Some(point) = random_step(&grid, location.point, &mut rng) {
            let _ = destinations.insert(entity, Destination { point });
        }
    }
}

#[derive(Default)]
pub struct MovementSystem;

impl<'a> System<'a> for MovementSystem {
    type SystemData = (
        Entities<'a>,
        ReadExpect<'a, ActiveEntity>,
        WriteStorage<'a, Location>,
        WriteStorage<'a, Destination>,
        WriteStorage<'a, Energy>,
        ReadExpect<'a, OccupancyGrid>,
    );

    fn run(
        &mut self,
        (entities, active, mut locations, mut destinations, mut energies, grid): Self::SystemData,
    ) {
        let entity = active.entity;
        let Some(destination) = destinations.remove(entity) else {
            return;
        };
        if !locations.contains(entity) {
            return;
        }
        if !active.ready {
            trace!(?entity, "no action left to move");
            return;
        }

        let target = destination.point;
        let occupied = (&entities, &locations)
            .join()
            .any(|(other, location)| other != entity && location.point == target);
        if !grid.is_walkable(target) || occupied {
            trace!(?entity, x = target.x, y = target.y, "move rejected");
            return;
        }

        if let Some(location) = locations.get_mut(entity) {
            location.point = target;
        }
        if let Some(energy) = energies.get_mut(entity) {
            energy.spend();
        }
    }
}

/// First living entity hostile to `faction` standing next to `at`.
fn adjacent_enemy(
    entities: &Entities<'_>,
    locations: &ReadStorage<'_, Location>,
    factions: &ReadStorage<'_, Faction>,
    living: impl Fn(Entity) -> bool,
    who: Entity,
    at: Point,
    faction: Faction,
) -> Option<Entity> {
    (entities, locations, factions)
        .join()
        .find(|(entity, location, other)| {
            *entity != who
                && faction.is_hostile_to(**other)
                && adjacent(at, location.point)
                && living(*entity)
        })
        .map(|(entity, ..)| entity)
}

fn adjacent(a: Point, b: Point) -> bool {
    a != b && (a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1
}

fn display_name(names: &ReadStorage<'_, Name>, entity: Entity) -> String {
    names
        .get(entity)
        .map(|n| n.name.clone())
        .unwrap_or_else(|| "Something".to_string())
}
