use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use megadungeon::{
    Engine, Glyph, TileManager,
    ecs::components::Faction,
};

pub const LOG_ROWS: i32 = 7;

/// Character and colour for one glyph category.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TerminalTile {
    pub glyph: FontCharType,
    pub fg: RGB,
}

/// Code page 437 tiles for a `bracket-terminal` console.
pub struct TerminalTiles;

impl TileManager for TerminalTiles {
    type Asset = TerminalTile;

    fn asset(&self, glyph: Glyph) -> TerminalTile {
        let fg = match glyph {
            Glyph::Dark => RGB::named(BLACK),
            Glyph::Floor => RGB::named(DARK_GRAY),
            Glyph::Corridor => RGB::named(GRAY),
            Glyph::Door => RGB::named(ORANGE),
            Glyph::VerticalWall | Glyph::HorizontalWall => RGB::named(LIGHT_BLUE),
        };
        TerminalTile {
            glyph: to_cp437(glyph_char(glyph)),
            fg,
        }
    }
}

pub fn glyph_char(glyph: Glyph) -> char {
    match glyph {
        Glyph::Dark => ' ',
        Glyph::Floor => '.',
        Glyph::Corridor => '#',
        Glyph::Door => '+',
        Glyph::VerticalWall => '|',
        Glyph::HorizontalWall => '-',
    }
}

fn actor_char(name: &str, faction: Faction) -> char {
    match faction {
        Faction::Player => '@',
        Faction::Monster => name.chars().next().unwrap_or('m'),
    }
}

pub fn draw_map(ctx: &mut BTerm, engine: &Engine<TerminalTiles>, origin: Point) {
    let (screen_w, screen_h) = ctx.get_char_size();
    let max_x = screen_w as i32;
    let max_y = screen_h as i32 - LOG_ROWS;

    for y in 0..engine.height() {
        let screen_y = origin.y + y;
        if screen_y >= max_y {
            break;
        }
        for x in 0..engine.width() {
            let screen_x = origin.x + x;
            if screen_x >= max_x {
                break;
            }
            let tile = engine.asset_at(Point::new(x, y));
            ctx.set(screen_x, screen_y, tile.fg, RGB::named(BLACK), tile.glyph);
        }
    }

    for actor in engine.actors() {
        let fg = match actor.faction {
            Faction::Player => RGB::named(YELLOW),
            Faction::Monster => RGB::named(RED),
        };
        ctx.set(
            origin.x + actor.point.x,
            origin.y + actor.point.y,
            fg,
            RGB::named(BLACK),
            to_cp437(actor_char(&actor.name, actor.faction)),
        );
    }
}

pub fn draw_log(ctx: &mut BTerm, log: &[String]) {
    let (width, height) = ctx.get_char_size();
    let top = height as i32 - LOG_ROWS;
    ctx.draw_box(
        0,
        top,
        width as i32 - 1,
        LOG_ROWS - 1,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    for (row, entry) in log.iter().take((LOG_ROWS - 2) as usize).enumerate() {
        ctx.print(2, top + 1 + row as i32, entry);
    }
}

/// Plain-text dump of the visible floor with actors overlaid, one line per row.
pub fn ascii_floor<T: TileManager>(engine: &Engine<T>) -> String {
    let width = engine.width().max(0) as usize;
    let mut rows: Vec<Vec<char>> = (0..engine.height())
        .map(|y| {
            (0..engine.width())
                .map(|x| glyph_char(engine.glyph_at(Point::new(x, y))))
                .collect()
        })
        .collect();
    for actor in engine.actors() {
        if let Some(cell) = rows
            .get_mut(actor.point.y as usize)
            .and_then(|row| row.get_mut(actor.point.x as usize))
        {
            *cell = actor_char(&actor.name, actor.faction);
        }
    }

    let mut out = String::with_capacity((width + 1) * rows.len());
    for row in rows {
        out.extend(row);
        out.push('\n');
    }
    out
}
