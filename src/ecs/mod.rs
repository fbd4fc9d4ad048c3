pub mod components;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::{DiceType, RandomNumberGenerator};
use specs::prelude::{Builder, Entity, Join, RunNow, World as SpecsWorld, WorldExt};
use tracing::{debug, trace};

use crate::{
    data::{ActorTemplate, MonsterTemplate},
    error::{EngineError, Result},
    map::CellPool,
};

use self::{
    components::{
        ACTION_COST, CombatStats, Destination, Energy, Faction, Health, Location, Name, SightStat,
        WanderingMonster,
    },
    resources::ActiveEntity,
    systems::{CombatSystem, EnergySystem, HealthSystem, MovementSystem, WanderSystem},
};

pub fn register_components(world: &mut SpecsWorld) {
    world.register::<Location>();
    world.register::<Destination>();
    world.register::<Faction>();
    world.register::<SightStat>();
    world.register::<WanderingMonster>();
    world.register::<Health>();
    world.register::<Energy>();
    world.register::<CombatStats>();
    world.register::<Name>();
}

pub fn spawn_player(world: &mut SpecsWorld, template: &ActorTemplate, point: Point) -> Entity {
    let player = spawn_actor(world, template, point, Faction::Player)
        .with(Energy {
            current: ACTION_COST,
            gain: template.speed,
        })
        .build();
    debug!("spawned {} at ({},{})", template.name, point.x, point.y);
    player
}

pub fn spawn_monster(world: &mut SpecsWorld, template: &MonsterTemplate, point: Point) -> Entity {
    let stats = &template.stats;
    let monster = spawn_actor(world, stats, point, Faction::Monster)
        .with(Energy {
            current: 0,
            gain: stats.speed,
        })
        .with(WanderingMonster)
        .build();
    debug!("spawned {} at ({},{})", stats.name, point.x, point.y);
    monster
}

fn spawn_actor<'w>(
    world: &'w mut SpecsWorld,
    template: &ActorTemplate,
    point: Point,
    faction: Faction,
) -> specs::world::EntityBuilder<'w> {
    world
        .create_entity()
        .with(Location { point })
        .with(faction)
        .with(SightStat {
            range: template.sight,
        })
        .with(Health::full(template.hp))
        .with(CombatStats {
            power: template.power,
            defense: template.defense,
        })
        .with(Name {
            name: template.name.to_string(),
        })
}

/// Places the player and a dice-rolled number of monsters, each on its own cell from `pool`.
pub fn populate(
    world: &mut SpecsWorld,
    pool: &mut CellPool,
    rng: &mut RandomNumberGenerator,
    player: &ActorTemplate,
    monster_dice: DiceType,
) -> Result<(Entity, usize)> {
    let monster_count =
        (rng.roll_dice(monster_dice.n_dice, monster_dice.die_type) + monster_dice.bonus).max(0)
            as usize;
    let required = monster_count + 1;
    let exhausted = |placed: usize| EngineError::PoolExhausted { required, placed };

    let spot = pool.take_random(rng).ok_or_else(|| exhausted(0))?;
    let player = spawn_player(world, player, spot);

    let roster = MonsterTemplate::roster();
    let mut spawned = 0;
    for placed in 0..monster_count {
        let Some(template) = MonsterTemplate::choose(&roster, rng) else {
            break;
        };
        let spot = pool.take_random(rng).ok_or_else(|| exhausted(placed + 1))?;
        spawn_monster(world, template, spot);
        spawned += 1;
    }
    Ok((player, spawned))
}

type BoxedSystem = Box<dyn for<'a> RunNow<'a>>;

fn stage<S>(name: &'static str, system: S) -> (&'static str, BoxedSystem)
where
    S: for<'a> RunNow<'a> + 'static,
{
    (name, Box::new(system))
}

/// The per-turn systems, in the order each entity passes through them.
pub struct TurnPipeline {
    systems: Vec<(&'static str, BoxedSystem)>,
    reaper: HealthSystem,
}

impl TurnPipeline {
    pub fn new(world: &mut SpecsWorld) -> Self {
        let mut pipeline = Self {
            systems: vec![
                stage("combat", CombatSystem),
                stage("health", HealthSystem),
                stage("energy", EnergySystem),
                stage("wander", WanderSystem),
                stage("movement", MovementSystem),
            ],
            reaper: HealthSystem,
        };
        for (_, system) in &mut pipeline.systems {
            system.setup(world);
        }
        pipeline
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|(name, _)| *name).collect()
    }

    /// Runs every entity alive at the start of the pass through every system.
    /// An entity removed part way stops there; anything spawned waits for the next pass.
    pub fn run(&mut self, world: &mut SpecsWorld) {
        let roster: Vec<Entity> = {
            let entities = world.entities();
            let locations = world.read_storage::<Location>();
            let roster = (&entities, &locations)
                .join()
                .map(|(entity, _)| entity)
                .collect();
            roster
        };

        for entity in roster {
            if !world.is_alive(entity) {
                continue;
            }
            let ready = world
                .read_storage::<Energy>()
                .get(entity)
                .is_none_or(Energy::can_act);
            world.insert(ActiveEntity { entity, ready });
            for (name, system) in &mut self.systems {
                system.run_now(world);
                world.maintain();
                if !world.is_alive(entity) {
                    trace!(?entity, "removed during {name}");
                    break;
                }
            }
        }

        self.remove_fallen(world);
    }

    /// Entities struck down after their own pass this turn still leave before it ends.
    fn remove_fallen(&mut self, world: &mut SpecsWorld) {
        let fallen: Vec<Entity> = {
            let entities = world.entities();
            let healths = world.read_storage::<Health>();
            let fallen = (&entities, &healths)
                .join()
                .filter(|(_, health)| health.is_dead())
                .map(|(entity, _)| entity)
                .collect();
            fallen
        };
        for entity in fallen {
            world.insert(ActiveEntity {
                entity,
                ready: false,
            });
            self.reaper.run_now(world);
        }
        world.maintain();
    }
}
