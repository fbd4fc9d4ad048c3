//! Invariants that hold for any seed and any sequence of player inputs.

use std::collections::HashSet;

use bracket_random::prelude::RandomNumberGenerator;
use megadungeon::{
    Engine, EngineConfig, Glyph, PlayerInput,
    config::{MapConfig, dice_range, parse_dice},
    map::{classify, generator::strategy_for, visibility::within_circle},
};
use proptest::prelude::*;

fn seeded_config(seed: u64) -> EngineConfig {
    EngineConfig {
        seed: Some(seed),
        ..EngineConfig::default()
    }
}

fn inputs() -> impl Strategy<Value = Vec<PlayerInput>> {
    prop::collection::vec(prop::sample::select(PlayerInput::ALL.to_vec()), 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn classified_glyphs_agree_with_occupancy(seed in any::<u64>()) {
        let mut rng = RandomNumberGenerator::seeded(seed);
        let grid = strategy_for(&MapConfig::default()).generate(80, 40, &mut rng);
        let glyphs = classify(&grid);

        for point in grid.walkable_cells() {
            prop_assert!(glyphs.get(point).is_walkable(), "{point:?} is open but drawn as {:?}", glyphs.get(point));
        }
        for y in 0..grid.height {
            for x in 0..grid.width {
                let point = bracket_geometry::prelude::Point::new(x, y);
                let glyph = glyphs.get(point);
                if matches!(glyph, Glyph::VerticalWall | Glyph::HorizontalWall | Glyph::Dark) {
                    prop_assert!(!grid.is_walkable(point), "{glyph:?} at {point:?} is walkable");
                }
            }
        }
    }

    #[test]
    fn placement_respects_dice_and_cells(seed in any::<u64>()) {
        let config = seeded_config(seed);
        let engine = Engine::new(&config, ()).unwrap();

        let (min, max) = dice_range(&parse_dice(&config.monster_dice).unwrap());
        let monsters = engine.monster_count() as i32;
        prop_assert!((min..=max).contains(&monsters), "{monsters} monsters outside {min}..={max}");

        let locations = engine.actor_locations();
        prop_assert_eq!(locations.len(), engine.monster_count() + 1);
        let distinct: HashSet<_> = locations.iter().copied().collect();
        prop_assert_eq!(distinct.len(), locations.len());
        for point in locations {
            prop_assert!(engine.is_walkable(point));
        }
    }

    #[test]
    fn turns_keep_the_player_grounded(seed in any::<u64>(), script in inputs()) {
        let mut engine = Engine::new(&seeded_config(seed), ()).unwrap();
        for input in script {
            engine.do_turn(input);

            let at = engine.player_location();
            prop_assert!(engine.is_walkable(at));
            prop_assert!(engine.messages().len() <= engine.message_limit());

            let sight = engine.player_sight();
            for point in engine.visible() {
                prop_assert!(within_circle(at, *point, sight), "{point:?} seen from {at:?}");
            }
            for y in 0..engine.height() {
                for x in 0..engine.width() {
                    let point = bracket_geometry::prelude::Point::new(x, y);
                    if engine.glyph_at(point) != Glyph::Dark {
                        prop_assert!(engine.visible().contains(&point));
                    }
                }
            }
        }
    }

    #[test]
    fn same_seed_same_dungeon(seed in any::<u64>(), script in inputs()) {
        let config = seeded_config(seed);
        let mut first = Engine::new(&config, ()).unwrap();
        let mut second = Engine::new(&config, ()).unwrap();
        for input in script {
            first.do_turn(input);
            second.do_turn(input);
        }
        prop_assert_eq!(first.floor(), second.floor());
        prop_assert_eq!(first.player_location(), second.player_location());
        prop_assert_eq!(first.messages(), second.messages());
    }
}
