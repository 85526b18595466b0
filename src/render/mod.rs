use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use keycrawl::{
    Phase, Session,
    data::{CLASSES, CharacterClass},
    map::Cell,
};

pub const MAP_ORIGIN: Point = Point { x: 2, y: 3 };

fn class_color(class: CharacterClass) -> RGB {
    match class {
        CharacterClass::Warrior => RGB::named(ORANGE),
        CharacterClass::Thief => RGB::named(LIGHT_GREEN),
        CharacterClass::Mage => RGB::named(LIGHT_BLUE),
    }
}

pub fn draw_class_select(ctx: &mut BTerm) {
    ctx.print_color_centered(8, RGB::named(YELLOW), RGB::named(BLACK), "KEYCRAWL");
    ctx.print_color_centered(
        10,
        RGB::named(WHITE),
        RGB::named(BLACK),
        "Defeat the boss, take its Key, find the exit.",
    );
    for (idx, class) in CLASSES.iter().enumerate() {
        let stats = class.base_stats();
        let line = format!(
            "[{}] {:<8} HP {:>3}  ATK {:>2}  DEF {:>2}",
            idx + 1,
            class.as_str(),
            stats.health,
            stats.attack,
            stats.defense
        );
        ctx.print_color_centered(14 + idx as i32 * 2, class_color(*class), RGB::named(BLACK), &line);
    }
}

/// One glyph per grid cell; entities snap to the cell holding their centre.
pub fn draw_dungeon(ctx: &mut BTerm, session: &Session) {
    let Some(dungeon) = session.dungeon() else {
        return;
    };
    let half = dungeon.cell_size / 2;
    let to_screen = |x: i32, y: i32| {
        let cell = dungeon.pixel_to_cell(Point::new(x + half, y + half));
        Point::new(MAP_ORIGIN.x + cell.x, MAP_ORIGIN.y + cell.y)
    };

    for y in 0..dungeon.grid.height {
        for x in 0..dungeon.grid.width {
            let cell = dungeon.grid.cell_at(Point::new(x, y)).unwrap_or(Cell::Wall);
            let fg = match cell {
                Cell::Wall => RGB::from_u8(139, 69, 19),
                Cell::Floor => RGB::from_u8(34, 139, 34),
            };
            ctx.set(
                MAP_ORIGIN.x + x,
                MAP_ORIGIN.y + y,
                fg,
                RGB::named(BLACK),
                to_cp437(cell.glyph()),
            );
        }
    }

    if let Some(exit) = session.exit_bounds() {
        let at = to_screen(exit.x1, exit.y1);
        ctx.set(at.x, at.y, RGB::named(YELLOW), RGB::named(BLACK), to_cp437('>'));
    }

    for enemy in session.enemies() {
        let at = to_screen(enemy.bounds.x1, enemy.bounds.y1);
        let (glyph, color) = if enemy.is_boss {
            ('B', RGB::named(MAGENTA))
        } else {
            ('e', RGB::named(RED))
        };
        ctx.set(at.x, at.y, color, RGB::named(BLACK), to_cp437(glyph));
    }

    if let (Some(player), Some(bounds)) = (session.player(), session.player_bounds()) {
        let at = to_screen(bounds.x1, bounds.y1);
        ctx.set(
            at.x,
            at.y,
            class_color(player.class),
            RGB::named(BLACK),
            to_cp437(player.class.glyph()),
        );
    }
}

pub fn draw_stats(ctx: &mut BTerm, session: &Session, x: i32, y: i32) {
    let Some(player) = session.player() else {
        return;
    };
    let stats = player.stats();
    ctx.draw_box(x, y, 24, 6, RGB::named(GRAY), RGB::named(BLACK));
    ctx.print_color(x + 2, y + 1, RGB::named(WHITE), RGB::named(BLACK), player.class.as_str());
    ctx.print(x + 2, y + 2, format!("Health  {}", stats.health));
    ctx.print(x + 2, y + 3, format!("Attack  {}", stats.attack));
    ctx.print(x + 2, y + 4, format!("Defense {}", stats.defense));
    ctx.print(x + 2, y + 5, format!("Defeated {}", session.enemies_defeated()));
}

pub fn draw_inventory(ctx: &mut BTerm, session: &Session, x: i32, y: i32) {
    let Some(player) = session.player() else {
        return;
    };
    let rows = player.inventory().len().max(1) as i32;
    ctx.draw_box(x, y, 52, rows + 2, RGB::named(GRAY), RGB::named(BLACK));
    ctx.print_color(x + 2, y, RGB::named(WHITE), RGB::named(BLACK), " Inventory ");
    if player.inventory().is_empty() {
        ctx.print(x + 2, y + 1, "(empty)");
    }
    for (idx, item) in player.inventory().iter().enumerate() {
        let fg = if item.is_key() {
            RGB::named(YELLOW)
        } else {
            RGB::named(PINK)
        };
        ctx.print_color(
            x + 2,
            y + 1 + idx as i32,
            fg,
            RGB::named(BLACK),
            format!("[{}] {} - {}", idx + 1, item.name(), item.description()),
        );
    }
}

pub fn draw_combat(ctx: &mut BTerm, session: &Session, top: i32) {
    let (Some(encounter), Some(player)) = (session.encounter(), session.player()) else {
        return;
    };
    let (width, _) = ctx.get_char_size();
    let width = width as i32;
    ctx.draw_box(0, top, width - 1, 14, RGB::named(RED), RGB::named(BLACK));
    ctx.print_color(
        2,
        top,
        RGB::named(WHITE),
        RGB::named(BLACK),
        format!(" Combat: {} ", encounter.enemy_name),
    );
    ctx.print(
        2,
        top + 1,
        format!(
            "Player Health: {}    {} Health: {}",
            player.stats().health,
            encounter.enemy_name,
            encounter.enemy_stats().health
        ),
    );
    let prompt = if encounter.counter_pending() {
        "The enemy is striking back..."
    } else {
        "[A] Attack   [F] Flee   [1-9] Use item"
    };
    ctx.print_color(2, top + 2, RGB::named(YELLOW), RGB::named(BLACK), prompt);

    let entries = encounter.log().entries();
    let visible = entries.len().saturating_sub(10);
    for (row, line) in entries[visible..].iter().enumerate() {
        ctx.print(2, top + 3 + row as i32, line);
    }
}

pub fn draw_log(ctx: &mut BTerm, log: &[String], start_y: i32) {
    let (width, _) = ctx.get_char_size();
    let height = (log.len() as i32).min(5) + 2;
    let top = (start_y - 1).max(0);
    ctx.draw_box(
        0,
        top,
        width as i32 - 1,
        height,
        RGB::named(DARK_GRAY),
        RGB::named(BLACK),
    );
    ctx.print_color(2, top + 1, RGB::named(WHITE), RGB::named(BLACK), "Event Log");
    for (row, entry) in log.iter().take(5).enumerate() {
        ctx.print(2, top + 2 + row as i32, entry);
    }
}

pub fn draw_end_screen(ctx: &mut BTerm, session: &Session) {
    let (title, color) = match session.phase() {
        Phase::Completed => ("Dungeon Completed!", RGB::named(GOLD)),
        _ => ("Game Over", RGB::named(RED)),
    };
    ctx.print_color_centered(18, color, RGB::named(BLACK), title);
    ctx.print_color_centered(
        20,
        RGB::named(WHITE),
        RGB::named(BLACK),
        format!("You defeated {} enemies.", session.enemies_defeated()),
    );
    ctx.print_color_centered(23, RGB::named(GRAY), RGB::named(BLACK), "[R] Restart");
}
