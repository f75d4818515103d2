//! Passive board entities: food, obstacles and power-ups.

use std::f32::consts::TAU;

use rand::Rng;

use crate::config::{
    GOLDEN_FOOD_CHANCE, GOLDEN_POINTS, NORMAL_FOOD_CHANCE, NORMAL_POINTS, SHIELD_CHANCE, SPEED_POINTS,
};
use crate::particle::Hue;
use crate::Position;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FoodKind {
    Normal,
    Golden,
    /// Also shortens the step interval
    Speed,
}

impl FoodKind {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen_bool(NORMAL_FOOD_CHANCE) {
            FoodKind::Normal
        } else if rng.gen_bool(GOLDEN_FOOD_CHANCE) {
            FoodKind::Golden
        } else {
            FoodKind::Speed
        }
    }

    pub fn points(self) -> u32 {
        match self {
            FoodKind::Normal => NORMAL_POINTS,
            FoodKind::Golden => GOLDEN_POINTS,
            FoodKind::Speed => SPEED_POINTS,
        }
    }

    pub fn hue(self) -> Hue {
        match self {
            FoodKind::Normal => Hue::Green,
            FoodKind::Golden => Hue::Gold,
            FoodKind::Speed => Hue::Orange,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Food {
    pos: Position,
    kind: FoodKind,
    pulse: f32,
}

impl Food {
    pub fn new(pos: Position, kind: FoodKind) -> Self {
        Food { pos, kind, pulse: 0.0 }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn kind(&self) -> FoodKind {
        self.kind
    }

    pub fn pulse(&self) -> f32 {
        self.pulse
    }

    pub fn update(&mut self) {
        self.pulse += 0.1;
    }

    /// Moves one cell towards `target` along the dominant axis if it lies
    /// strictly within `range_sq` (squared distance). Ties go to the y axis,
    /// and a food sitting on `target` moves up. Returns whether the food moved.
    pub fn pull_toward(&mut self, target: Position, range_sq: i32) -> bool {
        let dx = target.0 - self.pos.0;
        let dy = target.1 - self.pos.1;

        if dx * dx + dy * dy >= range_sq {
            return false;
        }

        if dx.abs() > dy.abs() {
            self.pos.0 += dx.signum();
        } else {
            self.pos.1 += if dy > 0 {1} else {-1};
        }
        true
    }
}

#[derive(Clone, Debug)]
pub struct Obstacle {
    pos: Position,
    pulse: f32,
}

impl Obstacle {
    pub fn new<R: Rng>(pos: Position, rng: &mut R) -> Self {
        Obstacle { pos, pulse: rng.gen_range(0.0..TAU) }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    /// Glow intensity in [0.4, 1.0]
    pub fn intensity(&self) -> f32 {
        self.pulse.sin() * 0.3 + 0.7
    }

    pub fn update(&mut self) {
        self.pulse += 0.05;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    Shield,
    Magnet,
}

impl PowerUpKind {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        if rng.gen_bool(SHIELD_CHANCE) {
            PowerUpKind::Shield
        } else {
            PowerUpKind::Magnet
        }
    }
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    pos: Position,
    kind: PowerUpKind,
    rotation: f32,
}

impl PowerUp {
    pub fn new(pos: Position, kind: PowerUpKind) -> Self {
        PowerUp { pos, kind, rotation: 0.0 }
    }

    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn kind(&self) -> PowerUpKind {
        self.kind
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn update(&mut self) {
        self.rotation += 0.1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn food_points_follow_the_table() {
        assert_eq!(FoodKind::Normal.points(), 10);
        assert_eq!(FoodKind::Golden.points(), 25);
        assert_eq!(FoodKind::Speed.points(), 15);
    }

    #[test]
    fn food_kind_distribution_is_roughly_right() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut counts = [0u32; 3];
        for _ in 0..10_000 {
            match FoodKind::random(&mut rng) {
                FoodKind::Normal => counts[0] += 1,
                FoodKind::Golden => counts[1] += 1,
                FoodKind::Speed => counts[2] += 1,
            }
        }
        assert!((6500..7500).contains(&counts[0]), "normal: {}", counts[0]);
        assert!((2000..2800).contains(&counts[1]), "golden: {}", counts[1]);
        assert!((350..900).contains(&counts[2]), "speed: {}", counts[2]);
    }

    #[test]
    fn pull_follows_dominant_axis() {
        let mut food = Food::new((13, 11), FoodKind::Normal);
        assert!(food.pull_toward((11, 10), 9));
        assert_eq!(food.pos(), (12, 11));

        let mut food = Food::new((9, 11), FoodKind::Normal);
        assert!(food.pull_toward((10, 9), 9));
        assert_eq!(food.pos(), (9, 10));
    }

    #[test]
    fn pull_breaks_ties_along_y() {
        let mut food = Food::new((13, 12), FoodKind::Golden);
        assert!(food.pull_toward((11, 10), 9));
        assert_eq!(food.pos(), (13, 11));
    }

    #[test]
    fn pull_ignores_food_out_of_range() {
        let mut far = Food::new((14, 10), FoodKind::Normal);
        assert!(!far.pull_toward((11, 10), 9));
        assert_eq!(far.pos(), (14, 10));
    }

    #[test]
    fn food_on_target_is_pushed_up() {
        let mut here = Food::new((11, 10), FoodKind::Normal);
        assert!(here.pull_toward((11, 10), 9));
        assert_eq!(here.pos(), (11, 9));
    }

    #[test]
    fn obstacle_intensity_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut obstacle = Obstacle::new((1, 1), &mut rng);
        for _ in 0..200 {
            let i = obstacle.intensity();
            assert!((0.39..=1.01).contains(&i));
            obstacle.update();
        }
    }
}
