use std::collections::HashSet;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::{Entity, Join, World as SpecsWorld, WorldExt};
use tracing::{debug, info};

use crate::{
    config::EngineConfig,
    data::{ActorTemplate, PLAYER},
    ecs::{
        self, TurnPipeline,
        components::{Destination, Faction, Health, Location, Name, SightStat},
        resources::MessageLog,
    },
    error::{EngineError, Result},
    input::PlayerInput,
    map::{CellPool, Glyph, GlyphGrid, OccupancyGrid, classify, generator, visible_cells},
};

/// Maps glyph categories to whatever the presentation layer draws with.
pub trait TileManager {
    type Asset;

    fn asset(&self, glyph: Glyph) -> Self::Asset;
}

/// Hands the glyph itself back, for callers that only want codes.
impl TileManager for () {
    type Asset = Glyph;

    fn asset(&self, glyph: Glyph) -> Glyph {
        glyph
    }
}

/// An actor the player can currently see.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorView {
    pub point: Point,
    pub name: String,
    pub faction: Faction,
}

/// Headless dungeon simulation, advanced one turn per `do_turn`.
pub struct Engine<T: TileManager = ()> {
    world: SpecsWorld,
    pipeline: TurnPipeline,
    tiles: T,
    glyphs: GlyphGrid,
    view: GlyphGrid,
    visible: HashSet<Point>,
    player: Entity,
    player_location: Point,
    player_sight: i32,
    turn: u64,
}

impl<T: TileManager> Engine<T> {
    /// Builds an engine, seeding the RNG from `config.seed` or entropy.
    ///
    /// # Errors
    /// Fails if the config is invalid, the map has no walkable cells, or there
    /// is not room for every actor.
    pub fn new(config: &EngineConfig, tiles: T) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => RandomNumberGenerator::seeded(seed),
            None => RandomNumberGenerator::new(),
        };
        Self::with_rng(config, rng, tiles)
    }

    /// Default settings on a `width` x `height` map.
    pub fn with_size(width: i32, height: i32, tiles: T) -> Result<Self> {
        Self::new(&EngineConfig::with_size(width, height), tiles)
    }

    pub fn with_rng(config: &EngineConfig, mut rng: RandomNumberGenerator, tiles: T) -> Result<Self> {
        config.validate()?;
        let strategy = generator::strategy_for(&config.map);
        let grid = strategy.generate(config.width, config.height, &mut rng);
        Self::from_grid(config, grid, rng, tiles)
    }

    /// Builds an engine around an existing occupancy grid; `config`'s size and map
    /// settings are ignored.
    pub fn from_grid(
        config: &EngineConfig,
        grid: OccupancyGrid,
        mut rng: RandomNumberGenerator,
        tiles: T,
    ) -> Result<Self> {
        let monster_dice = config.monster_dice()?;
        if grid.walkable_count() == 0 {
            return Err(EngineError::NoWalkableCells);
        }

        let glyphs = classify(&grid);
        let mut world = SpecsWorld::new();
        ecs::register_components(&mut world);
        world.insert(MessageLog::new(config.message_limit));

        let player_template = ActorTemplate {
            sight: config.player_sight,
            ..PLAYER
        };
        let mut pool = CellPool::new(&grid);
        let (player, monsters) =
            ecs::populate(&mut world, &mut pool, &mut rng, &player_template, monster_dice)?;
        debug!(remaining = pool.len(), "actors placed");

        let player_location = world
            .read_storage::<Location>()
            .get(player)
            .map(|loc| loc.point)
            .unwrap_or_else(Point::zero);
        let (width, height) = (grid.width, grid.height);
        world.insert(grid);
        world.insert(rng);
        let pipeline = TurnPipeline::new(&mut world);

        let mut engine = Self {
            world,
            pipeline,
            tiles,
            view: GlyphGrid::dark(width, height),
            glyphs,
            visible: HashSet::new(),
            player,
            player_location,
            player_sight: config.player_sight,
            turn: 0,
        };
        engine.update_views();
        info!(width, height, monsters, "engine ready");
        Ok(engine)
    }

    /// Advances the simulation by one turn.
    pub fn do_turn(&mut self, input: PlayerInput) {
        if self.is_player_alive() {
            if let Some(delta) = input.delta() {
                let point = self.player_location + delta;
                let _ = self
                    .world
                    .write_storage::<Destination>()
                    .insert(self.player, Destination { point });
            }
        }

        self.pipeline.run(&mut self.world);
        self.turn += 1;
        self.update_views();
        self.world.write_resource::<MessageLog>().trim();
    }

    fn update_views(&mut self) {
        if self.is_player_alive() {
            if let Some(location) = self.world.read_storage::<Location>().get(self.player) {
                self.player_location = location.point;
            }
            if let Some(sight) = self.world.read_storage::<SightStat>().get(self.player) {
                self.player_sight = sight.range;
            }
        }
        let grid = self.world.read_resource::<OccupancyGrid>();
        self.visible = visible_cells(&grid, self.player_location, self.player_sight);
        self.view = self.glyphs.masked(&self.visible);
    }

    pub fn width(&self) -> i32 {
        self.glyphs.width
    }

    pub fn height(&self) -> i32 {
        self.glyphs.height
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Glyphs masked to what the player sees this turn.
    pub fn floor(&self) -> &GlyphGrid {
        &self.view
    }

    pub fn glyph_at(&self, point: Point) -> Glyph {
        self.view.get(point)
    }

    pub fn asset_at(&self, point: Point) -> T::Asset {
        self.tiles.asset(self.glyph_at(point))
    }

    pub fn tiles(&self) -> &T {
        &self.tiles
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.world.read_resource::<OccupancyGrid>().is_walkable(point)
    }

    /// Last known player position; frozen once the player dies.
    pub fn player_location(&self) -> Point {
        self.player_location
    }

    pub fn player_sight(&self) -> i32 {
        self.player_sight
    }

    pub fn is_player_alive(&self) -> bool {
        self.world.is_alive(self.player)
    }

    pub fn player_health(&self) -> Option<Health> {
        self.world.read_storage::<Health>().get(self.player).copied()
    }

    pub fn visible(&self) -> &HashSet<Point> {
        &self.visible
    }

    pub fn messages(&self) -> Vec<String> {
        self.world.read_resource::<MessageLog>().to_vec()
    }

    pub fn message_limit(&self) -> usize {
        self.world.read_resource::<MessageLog>().limit()
    }

    pub fn monster_count(&self) -> usize {
        let factions = self.world.read_storage::<Faction>();
        (&factions)
            .join()
            .filter(|faction| **faction == Faction::Monster)
            .count()
    }

    /// Every placed actor's position, player included.
    pub fn actor_locations(&self) -> Vec<Point> {
        let locations = self.world.read_storage::<Location>();
        (&locations).join().map(|loc| loc.point).collect()
    }

    /// Actors standing on currently visible cells.
    pub fn actors(&self) -> Vec<ActorView> {
        let locations = self.world.read_storage::<Location>();
        let factions = self.world.read_storage::<Faction>();
        let names = self.world.read_storage::<Name>();
        let mut views = Vec::new();
        for (location, faction, name) in (&locations, &factions, &names).join() {
            if self.visible.contains(&location.point) {
                views.push(ActorView {
                    point: location.point,
                    name: name.name.clone(),
                    faction: *faction,
                });
            }
        }
        views
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::MapStrategyKind,
        ecs::components::{CombatStats, WanderingMonster},
        map::visibility::circle_cells,
    };

    fn open_config(size: i32) -> EngineConfig {
        let mut config = EngineConfig::with_size(size, size);
        config.map.strategy = MapStrategyKind::BorderOnly;
        config.seed = Some(99);
        config
    }

    fn open_engine(size: i32, sight: i32) -> Engine {
        let mut config = open_config(size);
        config.player_sight = sight;
        Engine::new(&config, ()).unwrap()
    }

    fn monsters(engine: &Engine) -> Vec<Entity> {
        let entities = engine.world.entities();
        let factions = engine.world.read_storage::<Faction>();
        let found = (&entities, &factions)
            .join()
            .filter(|(_, faction)| **faction == Faction::Monster)
            .map(|(entity, _)| entity)
            .collect();
        found
    }

    fn remove_monsters(engine: &mut Engine) {
        for monster in monsters(engine) {
            engine.world.delete_entity(monster).unwrap();
        }
    }

    fn teleport(engine: &mut Engine, entity: Entity, point: Point) {
        engine
            .world
            .write_storage::<Location>()
            .get_mut(entity)
            .unwrap()
            .point = point;
        engine.update_views();
    }

    #[test]
    fn open_room_shows_the_full_sight_circle() {
        let mut engine = open_engine(20, 5);
        remove_monsters(&mut engine);
        let player = engine.player;
        teleport(&mut engine, player, Point::new(10, 10));

        let grid: OccupancyGrid = (*engine.world.read_resource::<OccupancyGrid>()).clone();
        let expected = circle_cells(&grid, Point::new(10, 10), 5);
        assert_eq!(engine.visible(), &expected);

        engine.do_turn(PlayerInput::None);
        assert_eq!(engine.player_location(), Point::new(10, 10));
        assert_eq!(engine.visible(), &expected);
    }

    #[test]
    fn walking_into_a_wall_goes_nowhere() {
        let mut engine = open_engine(20, 5);
        remove_monsters(&mut engine);
        let player = engine.player;
        teleport(&mut engine, player, Point::new(1, 5));

        engine.do_turn(PlayerInput::Left);
        assert_eq!(engine.player_location(), Point::new(1, 5));
        assert!(
            engine
                .world
                .read_storage::<Destination>()
                .get(player)
                .is_none()
        );

        engine.do_turn(PlayerInput::Right);
        assert_eq!(engine.player_location(), Point::new(2, 5));
    }

    #[test]
    fn occupied_cells_reject_moves() {
        let mut engine = open_engine(20, 5);
        let blocker = monsters(&engine)[0];
        for other in monsters(&engine).into_iter().filter(|m| *m != blocker) {
            engine.world.delete_entity(other).unwrap();
        }
        // A sturdy statue: never wanders, never swings back.
        engine.world.write_storage::<WanderingMonster>().remove(blocker);
        engine.world.write_storage::<CombatStats>().remove(blocker);
        engine.world.write_storage::<Health>().get_mut(blocker).unwrap().current = 1000;
        let player = engine.player;
        teleport(&mut engine, player, Point::new(5, 5));
        teleport(&mut engine, blocker, Point::new(7, 5));

        engine.do_turn(PlayerInput::Right);
        assert_eq!(engine.player_location(), Point::new(6, 5));

        engine.do_turn(PlayerInput::Right);
        assert_eq!(engine.player_location(), Point::new(6, 5));
        assert_eq!(
            engine.world.read_storage::<Location>().get(blocker).unwrap().point,
            Point::new(7, 5)
        );
    }

    #[test]
    fn dead_monsters_leave_with_a_message() {
        let mut engine = open_engine(20, 5);
        let victim = monsters(&engine)[0];
        for other in monsters(&engine).into_iter().filter(|m| *m != victim) {
            engine.world.delete_entity(other).unwrap();
        }
        let player = engine.player;
        teleport(&mut engine, player, Point::new(3, 3));
        teleport(&mut engine, victim, Point::new(15, 15));
        engine.world.write_storage::<Health>().get_mut(victim).unwrap().current = 0;

        let before = engine.messages().len();
        engine.do_turn(PlayerInput::None);

        assert!(!engine.world.is_alive(victim));
        assert_eq!(engine.monster_count(), 0);
        let messages = engine.messages();
        assert_eq!(messages.len(), (before + 1).min(engine.message_limit()));
        assert!(messages.last().unwrap().ends_with("dies."));
    }

    #[test]
    fn player_kills_an_adjacent_monster() {
        let mut engine = open_engine(20, 5);
        let victim = monsters(&engine)[0];
        for other in monsters(&engine).into_iter().filter(|m| *m != victim) {
            engine.world.delete_entity(other).unwrap();
        }
        let player = engine.player;
        teleport(&mut engine, player, Point::new(8, 8));
        teleport(&mut engine, victim, Point::new(9, 8));
        engine.world.write_storage::<Health>().get_mut(victim).unwrap().current = 1;

        engine.do_turn(PlayerInput::None);

        assert!(!engine.world.is_alive(victim));
        let messages = engine.messages();
        assert!(messages.iter().any(|m| m.starts_with("Player hits")));
        assert!(messages.last().unwrap().ends_with("dies."));
        assert!(engine.actors().iter().all(|a| a.faction == Faction::Player));
    }

    fn face_off(engine: &mut Engine) -> Entity {
        let attacker = monsters(engine)[0];
        for other in monsters(engine).into_iter().filter(|m| *m != attacker) {
            engine.world.delete_entity(other).unwrap();
        }
        engine.world.write_storage::<Health>().get_mut(attacker).unwrap().current = 1000;
        let player = engine.player;
        teleport(engine, player, Point::new(8, 8));
        teleport(engine, attacker, Point::new(8, 9));
        attacker
    }

    #[test]
    fn monsters_attack_whenever_they_have_an_action() {
        let mut engine = open_engine(20, 5);
        let attacker = face_off(&mut engine);
        let player = engine.player;
        engine.world.write_storage::<Health>().get_mut(player).unwrap().current = 1000;

        let damage = {
            let stats = engine.world.read_storage::<CombatStats>();
            stats
                .get(attacker)
                .unwrap()
                .damage_against(stats.get(player).unwrap().defense)
        };
        for _ in 0..20 {
            engine.do_turn(PlayerInput::None);
        }

        // Spawned empty, a monster banks a full action on its third turn and
        // every other turn after that.
        let hits = (1000 - engine.player_health().unwrap().current) / damage;
        assert!(hits >= 8, "only {hits} hits in 20 turns");
        assert_eq!(
            engine.world.read_storage::<Location>().get(attacker).unwrap().point,
            Point::new(8, 9)
        );
    }

    #[test]
    fn a_slain_player_leaves_the_same_turn() {
        let mut engine = open_engine(20, 5);
        face_off(&mut engine);
        let player = engine.player;
        engine.world.write_storage::<Health>().get_mut(player).unwrap().current = 1;

        for _ in 0..5 {
            engine.do_turn(PlayerInput::None);
            if !engine.is_player_alive() {
                break;
            }
            assert!(engine.player_health().unwrap().current > 0);
        }

        assert!(!engine.is_player_alive());
        assert_eq!(engine.player_health(), None);
        assert_eq!(engine.messages().last().map(String::as_str), Some("Player dies."));
        assert_eq!(engine.player_location(), Point::new(8, 8));

        engine.do_turn(PlayerInput::Up);
        assert_eq!(engine.player_location(), Point::new(8, 8));
    }

    #[test]
    fn fatal_when_actors_outnumber_cells() {
        let grid = OccupancyGrid::from_rows(&["#####", "#...#", "#####"]);
        let config = EngineConfig::default();
        let result = Engine::from_grid(&config, grid, RandomNumberGenerator::seeded(1), ());
        assert!(matches!(
            result,
            Err(EngineError::PoolExhausted { placed: 3, .. })
        ));
    }

    #[test]
    fn fatal_without_walkable_cells() {
        let grid = OccupancyGrid::blocked(10, 10);
        let config = EngineConfig::default();
        let result = Engine::from_grid(&config, grid, RandomNumberGenerator::seeded(1), ());
        assert!(matches!(result, Err(EngineError::NoWalkableCells)));
    }

    #[test]
    fn bad_dice_fails_construction() {
        let mut config = open_config(20);
        config.monster_dice = "many".to_string();
        assert!(matches!(
            Engine::new(&config, ()),
            Err(EngineError::InvalidDice(_))
        ));
    }

    #[test]
    fn pipeline_order_is_fixed() {
        let engine = open_engine(20, 5);
        assert_eq!(
            engine.pipeline.names(),
            vec!["combat", "health", "energy", "wander", "movement"]
        );
    }

    #[test]
    fn custom_tile_manager_sees_masked_glyphs() {
        struct Chars;
        impl TileManager for Chars {
            type Asset = char;
            fn asset(&self, glyph: Glyph) -> char {
                match glyph {
                    Glyph::Dark => ' ',
                    _ => '.',
                }
            }
        }
        let config = open_config(20);
        let engine = Engine::new(&config, Chars).unwrap();
        let here = engine.player_location();
        assert_eq!(engine.asset_at(here), '.');
        assert_eq!(engine.asset_at(Point::new(-1, -1)), ' ');
    }
}
