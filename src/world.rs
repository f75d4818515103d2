//! The simulation core. All session state lives in [`World`] and changes only
//! through [`World::tick`] and [`World::reset`].

use std::cmp::max;
use std::time::Duration;

use log::{debug, info, warn};
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::config::*;
use crate::entities::{Food, FoodKind, Obstacle, PowerUp, PowerUpKind};
use crate::input::Intent;
use crate::particle::{Hue, Particle, Star};
use crate::snake::{Direction, Snake};
use crate::store::ScoreStore;
use crate::Position;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Placement {
    Food,
    PowerUp,
    Obstacle,
}

/// Read-only view handed to the renderer once per frame.
pub struct Snapshot<'a> {
    pub snake: &'a Snake,
    pub food: &'a [Food],
    pub obstacles: &'a [Obstacle],
    pub power_ups: &'a [PowerUp],
    pub particles: &'a [Particle],
    pub stars: &'a [Star],
    pub score: u32,
    pub high_score: u32,
    pub new_record: bool,
    pub running: bool,
}

pub struct World<R = ThreadRng> {
    rng: R,
    store: Box<dyn ScoreStore>,
    snake: Snake,
    food: Vec<Food>,
    obstacles: Vec<Obstacle>,
    power_ups: Vec<PowerUp>,
    particles: Vec<Particle>,
    stars: Vec<Star>,
    score: u32,
    high_score: u32,
    new_record: bool,
    running: bool,
    interval_ms: u64,
    power_up_timer: u32,
}

impl World<ThreadRng> {
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        World::with_rng(rand::thread_rng(), store)
    }
}

impl<R: Rng> World<R> {
    pub fn with_rng(mut rng: R, store: Box<dyn ScoreStore>) -> Self {
        let high_score = store.high_score();
        let stars = (0..STAR_COUNT).map(|_| Star::random(&mut rng)).collect();

        let mut world = World {
            rng,
            store,
            snake: Snake::new(START_HEAD, START_LENGTH, Direction::Right),
            food: vec![],
            obstacles: vec![],
            power_ups: vec![],
            particles: vec![],
            stars,
            score: 0,
            high_score,
            new_record: false,
            running: true,
            interval_ms: BASE_INTERVAL_MS,
            power_up_timer: 0,
        };
        world.populate();
        info!("session started, high score {}", high_score);
        world
    }

    /// Starts a fresh game in place. The high score is kept.
    pub fn reset(&mut self) {
        self.snake = Snake::new(START_HEAD, START_LENGTH, Direction::Right);
        self.food.clear();
        self.obstacles.clear();
        self.power_ups.clear();
        self.particles.clear();
        self.score = 0;
        self.new_record = false;
        self.running = true;
        self.interval_ms = BASE_INTERVAL_MS;
        self.power_up_timer = 0;

        self.populate();
        info!("game restarted");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Time between two simulation steps
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.snake,
            food: &self.food,
            obstacles: &self.obstacles,
            power_ups: &self.power_ups,
            particles: &self.particles,
            stars: &self.stars,
            score: self.score,
            high_score: self.high_score,
            new_record: self.new_record,
            running: self.running,
        }
    }

    /// Advances the simulation by one step. Does nothing once the game is over.
    pub fn tick(&mut self, intent: &Intent) {
        if !self.running {
            return;
        }

        for direction in intent.directions() {
            self.snake.change_direction(direction);
        }
        self.snake.advance();
        let head = self.snake.head();

        // Hazards, in order. A shield soaks up one of them; anything else ends the game.
        if !in_bounds(head) && !self.absorb_hit(head, "wall") {
            return;
        }
        if self.snake.bites_itself() && !self.absorb_hit(head, "own tail") {
            return;
        }
        if self.obstacles.iter().any(|o| o.pos() == head) && !self.absorb_hit(head, "obstacle") {
            return;
        }

        self.eat_food(head);
        self.collect_power_up(head);

        if self.snake.has_magnet() {
            let pulled = self.food.iter_mut().map(|f| f.pull_toward(head, MAGNET_RANGE_SQ)).filter(|&pulled| pulled).count();
            if pulled > 0 {
                debug!("magnet pulled {} food towards {:?}", pulled, head);
            }
        }

        self.power_up_timer += 1;
        if self.power_up_timer >= POWER_UP_SPAWN_TICKS && self.power_ups.len() < MAX_POWER_UPS {
            self.spawn_power_up();
            self.power_up_timer = 0;
        }

        self.animate();
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Returns true if the game goes on.
    fn absorb_hit(&mut self, cell: Position, what: &str) -> bool {
        if self.snake.has_shield() {
            debug!("shield absorbed a hit ({}) at {:?}", what, cell);
            self.snake.remove_shield();
            self.burst(cell, Hue::Red, EXPLOSION_PARTICLES);
            true
        } else {
            info!("crashed into {} at {:?}", what, cell);
            self.game_over();
            false
        }
    }

    fn game_over(&mut self) {
        self.running = false;

        if self.score > self.high_score {
            self.high_score = self.score;
            self.new_record = true;
            self.store.set_high_score(self.score);
        }

        info!("game over, score {} (best {})", self.score, self.high_score);
    }

    fn eat_food(&mut self, head: Position) {
        // Latest spawned wins if a magnet stacked several on one cell
        let index = match self.food.iter().rposition(|f| f.pos() == head) {
            Some(i) => i,
            None => return,
        };
        let food = self.food.remove(index);

        self.snake.grow();
        self.burst(head, food.kind().hue(), FOOD_PARTICLES);
        self.score += food.kind().points();

        if food.kind() == FoodKind::Speed {
            self.interval_ms = max(MIN_INTERVAL_MS, self.interval_ms.saturating_sub(SPEED_STEP_MS));
        }
        debug!("ate {:?} food, score {}, interval {}ms", food.kind(), self.score, self.interval_ms);

        self.spawn_food();
    }

    fn collect_power_up(&mut self, head: Position) {
        let index = match self.power_ups.iter().rposition(|p| p.pos() == head) {
            Some(i) => i,
            None => return,
        };
        let power_up = self.power_ups.remove(index);

        self.burst(head, Hue::Red, EXPLOSION_PARTICLES);
        match power_up.kind() {
            PowerUpKind::Shield => self.snake.activate_shield(),
            PowerUpKind::Magnet => self.snake.activate_magnet(),
        }
        self.score += POWER_UP_POINTS;
        debug!("picked up {:?}, score {}", power_up.kind(), self.score);
    }

    fn populate(&mut self) {
        for _ in 0..OBSTACLE_COUNT {
            if let Some(cell) = self.free_cell(Placement::Obstacle) {
                let obstacle = Obstacle::new(cell, &mut self.rng);
                self.obstacles.push(obstacle);
            }
        }
        for _ in 0..INITIAL_FOOD {
            self.spawn_food();
        }
    }

    fn spawn_food(&mut self) {
        if let Some(cell) = self.free_cell(Placement::Food) {
            let kind = FoodKind::random(&mut self.rng);
            self.food.push(Food::new(cell, kind));
        }
    }

    fn spawn_power_up(&mut self) {
        if let Some(cell) = self.free_cell(Placement::PowerUp) {
            let kind = PowerUpKind::random(&mut self.rng);
            debug!("spawned {:?} power-up at {:?}", kind, cell);
            self.power_ups.push(PowerUp::new(cell, kind));
        }
    }

    /// Rejection-samples a random cell that `placement` may occupy.
    fn free_cell(&mut self, placement: Placement) -> Option<Position> {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let cell = (self.rng.gen_range(0..TILES_X), self.rng.gen_range(0..TILES_Y));

            let taken = self.snake.occupies(cell)
                || self.obstacles.iter().any(|o| o.pos() == cell)
                || match placement {
                    Placement::Food | Placement::PowerUp => self.food.iter().any(|f| f.pos() == cell),
                    Placement::Obstacle => in_safe_zone(cell),
                };

            if !taken {
                return Some(cell);
            }
        }

        warn!("no free cell for {:?} after {} attempts", placement, MAX_PLACEMENT_ATTEMPTS);
        None
    }

    fn burst(&mut self, cell: Position, hue: Hue, count: usize) {
        let origin = (cell.0 as f32 + 0.5, cell.1 as f32 + 0.5);
        for _ in 0..count {
            let particle = Particle::new(origin, hue, &mut self.rng);
            self.particles.push(particle);
        }
    }

    /// Cosmetic state only.
    fn animate(&mut self) {
        for star in &mut self.stars {
            star.update(&mut self.rng);
        }
        self.particles.retain_mut(|p| p.update());
        self.food.iter_mut().for_each(Food::update);
        self.power_ups.iter_mut().for_each(PowerUp::update);
        self.obstacles.iter_mut().for_each(Obstacle::update);
    }
}

pub fn in_bounds(cell: Position) -> bool {
    (0..TILES_X).contains(&cell.0) && (0..TILES_Y).contains(&cell.1)
}

fn in_safe_zone(cell: Position) -> bool {
    let ((min_x, min_y), (max_x, max_y)) = SAFE_ZONE;
    (min_x..=max_x).contains(&cell.0) && (min_y..=max_y).contains(&cell.1)
}
