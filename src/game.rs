use std::{f32::consts::TAU, thread::sleep, time::{Duration, Instant}};

use crate::{Coords, Position, TermInt};
use crate::config::{TILES_X, TILES_Y};
use crate::entities::{FoodKind, PowerUpKind};
use crate::input::{self, Command, Intent};
use crate::particle::Hue;
use crate::store::ScoreStore;
use crate::term::{Canvas, Glyph, TermManager};
use crate::world::{in_bounds, Snapshot, World};

use anyhow::{bail, Result};
use crossterm::style::Color;
use log::info;

const FRAME_INTERVAL_MS: u64 = 16;

/// Rows above the board reserved for the score line and status effects
const BOARD_TOP: TermInt = 2;
/// Every grid cell is two terminal columns wide
pub const SCREEN_SIZE: Coords = (TILES_X as TermInt * 2 + 2, TILES_Y as TermInt + BOARD_TOP + 2);

const SNAKE_BODY_CHAR: char = '█';
const OBSTACLE_CHAR: char = '▓';
const POWER_UP_FRAMES: [char; 4] = ['◐', '◓', '◑', '◒'];

const GOLD: Color = Color::Rgb { r: 255, g: 215, b: 0 };
const ORANGE: Color = Color::Rgb { r: 255, g: 102, b: 0 };

pub struct SnakeGame {
    term: TermManager,
    world: World,
    intent: Intent,
}

impl SnakeGame {
    pub fn new(store: Box<dyn ScoreStore>) -> Result<Self> {
        Ok(SnakeGame { term: TermManager::new()?, world: World::new(store), intent: Intent::default() })
    }

    pub fn check_terminal(&self) -> Result<()> {
        let (w, h) = self.term.get_terminal_size();
        if w < SCREEN_SIZE.0 || h < SCREEN_SIZE.1 {
            bail!("terminal is {}x{}, the board needs at least {}x{}", w, h, SCREEN_SIZE.0, SCREEN_SIZE.1);
        }
        Ok(())
    }

    pub fn setup(&mut self) -> Result<()> {
        self.term.setup()
    }

    pub fn restore(&mut self) -> Result<()> {
        self.term.restore()
    }

    /// Runs until the player quits. Rendering happens every frame; the world
    /// only steps once its current interval has elapsed.
    pub fn run(&mut self) -> Result<()> {
        if !self.show_intro()? {
            return Ok(());
        }

        let mut last_step = Instant::now();

        loop {
            sleep(Duration::from_millis(FRAME_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                match input::command_for(&key_ev) {
                    Command::Quit => {
                        info!("quit with score {} (best {})", self.world.score(), self.world.high_score());
                        return Ok(());
                    }
                    Command::Steer(dir) => self.intent.press(dir),
                    Command::Restart => self.intent.restart = true,
                    Command::None => {}
                }
            }

            if !self.world.is_running() {
                if self.intent.restart {
                    self.world.reset();
                    self.intent = Intent::default();
                    last_step = Instant::now();
                }
            } else if last_step.elapsed() >= self.world.interval() {
                self.world.tick(&self.intent);
                // Restart requests made while alive are dropped here too
                self.intent = Intent::default();
                last_step = Instant::now();
            }

            let frame = render(&self.world.snapshot());
            self.term.present(&frame)?;
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Returns false if the player quit from the intro.
    fn show_intro(&mut self) -> Result<bool> {
        let mut canvas = Canvas::new(SCREEN_SIZE.0, SCREEN_SIZE.1);
        canvas.draw_borders((0, BOARD_TOP), (SCREEN_SIZE.0, SCREEN_SIZE.1 - BOARD_TOP), Color::DarkGrey);
        canvas.draw_message(&[
            ("N E O N   S N A K E", Color::Cyan),
            ("", Color::White),
            ("Arrow keys or WASD to move", Color::White),
            ("Eat food, grab power-ups, dodge the red blocks", Color::White),
            ("R to restart after a crash", Color::White),
            ("Q or CTRL+C to quit", Color::White),
            ("", Color::White),
            ("Press any key to begin", Color::Yellow),
        ]);
        self.term.present(&canvas)?;

        let key = self.term.read_key_blocking()?;
        Ok(input::command_for(&key) != Command::Quit)
    }
}

/// Draws one frame of the board from a world snapshot.
pub fn render(world: &Snapshot<'_>) -> Canvas {
    let mut canvas = Canvas::new(SCREEN_SIZE.0, SCREEN_SIZE.1);

    for star in world.stars {
        let hue = star.hue();
        put_point(&mut canvas, star.pos(), Glyph::new('.', dim_hue(hue)));
    }

    canvas.draw_borders((0, BOARD_TOP), (SCREEN_SIZE.0, SCREEN_SIZE.1 - BOARD_TOP), Color::DarkGrey);

    for obstacle in world.obstacles {
        let color = if obstacle.intensity() > 0.7 {Color::Red} else {Color::DarkRed};
        put_cell(&mut canvas, obstacle.pos(), [Glyph::new(OBSTACLE_CHAR, color); 2]);
    }

    for food in world.food {
        let color = match food.kind() {
            FoodKind::Normal => Color::Green,
            FoodKind::Golden => GOLD,
            FoodKind::Speed => ORANGE,
        };
        let ch = if food.pulse().sin() > 0.0 {'●'} else {'•'};
        put_cell(&mut canvas, food.pos(), [Glyph::new(ch, color), Glyph::BLANK]);
    }

    for power_up in world.power_ups {
        let color = match power_up.kind() {
            PowerUpKind::Shield => Color::Green,
            PowerUpKind::Magnet => Color::Magenta,
        };
        let frame = (power_up.rotation() / (TAU / 4.0)) as usize % POWER_UP_FRAMES.len();
        put_cell(&mut canvas, power_up.pos(), [Glyph::new(POWER_UP_FRAMES[frame], color), Glyph::BLANK]);
    }

    let snake = world.snake;
    let body = snake.body();
    for (i, pos) in body.iter().enumerate().skip(1).rev() {
        let color = if snake.has_magnet() {
            Color::Magenta
        } else if i * 2 > snake.len() {
            Color::Grey
        } else {
            Color::White
        };
        put_cell(&mut canvas, *pos, [Glyph::new(SNAKE_BODY_CHAR, color); 2]);
    }
    let head_color = if snake.has_shield() {Color::Green} else {Color::Cyan};
    put_cell(&mut canvas, snake.head(), [Glyph::new(snake.head_char(), head_color); 2]);

    for particle in world.particles {
        let ch = if particle.fade() < 0.4 {
            '.'
        } else if particle.size() > 0.2 {
            '*'
        } else {
            '·'
        };
        put_point(&mut canvas, particle.pos(), Glyph::new(ch, hue_color(particle.hue())));
    }

    canvas.text((1, 0), &format!("Score: {}", world.score), Color::Cyan);
    canvas.text((24, 0), &format!("High Score: {}", world.high_score), Color::Yellow);
    let mut x = 1;
    if snake.has_shield() {
        canvas.text((x, 1), "SHIELD ACTIVE", Color::Green);
        x += 23;
    }
    if snake.has_magnet() {
        canvas.text((x, 1), "MAGNET ACTIVE", Color::Magenta);
    }

    if !world.running {
        let final_score = format!("Final Score: {}", world.score);
        let mut lines = vec![("GAME OVER", Color::Red), (final_score.as_str(), Color::White)];
        if world.new_record {
            lines.push(("NEW HIGH SCORE!", GOLD));
        }
        lines.push(("", Color::White));
        lines.push(("Press R to Restart", Color::Cyan));
        lines.push(("or CTRL+C to quit", Color::Cyan));
        canvas.draw_message(&lines);
    }

    canvas
}

/// Terminal position of the left half of a board cell.
fn cell_coords(cell: Position) -> Option<Coords> {
    if !in_bounds(cell) {
        return None;
    }
    Some((1 + 2 * cell.0 as TermInt, BOARD_TOP + 1 + cell.1 as TermInt))
}

fn put_cell(canvas: &mut Canvas, cell: Position, glyphs: [Glyph; 2]) {
    if let Some((x, y)) = cell_coords(cell) {
        canvas.put((x, y), glyphs[0]);
        canvas.put((x + 1, y), glyphs[1]);
    }
}

/// Places a single glyph at a fractional board position.
fn put_point(canvas: &mut Canvas, pos: (f32, f32), glyph: Glyph) {
    let (col, row) = ((pos.0 * 2.0).floor(), pos.1.floor());
    if col < 0.0 || row < 0.0 || col >= (TILES_X * 2) as f32 || row >= TILES_Y as f32 {
        return;
    }
    canvas.put((1 + col as TermInt, BOARD_TOP + 1 + row as TermInt), glyph);
}

fn hue_color(hue: Hue) -> Color {
    match hue {
        Hue::Green => Color::Green,
        Hue::Gold => GOLD,
        Hue::Orange => ORANGE,
        Hue::Red => Color::Red,
    }
}

/// Dark color for a hue angle in degrees, for the background.
fn dim_hue(hue: f32) -> Color {
    let sector = (hue / 60.0).rem_euclid(6.0);
    let rising = (sector.fract() * 90.0) as u8;
    let falling = 90 - rising;
    let (r, g, b) = match sector as u8 {
        0 => (90, rising, 0),
        1 => (falling, 90, 0),
        2 => (0, 90, rising),
        3 => (0, falling, 90),
        4 => (rising, 0, 90),
        _ => (90, 0, falling),
    };
    Color::Rgb { r, g, b }
}
