//! Cosmetic effects. Nothing in here feeds back into the simulation.

use rand::Rng;

use crate::config::{PARTICLE_DAMPING, PARTICLE_LIFE, PARTICLE_SPREAD, TILES_X, TILES_Y};

/// Color tag for effects; the renderer decides what it looks like.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Hue {
    Green,
    Gold,
    Orange,
    Red,
}

/// A short-lived spark, positioned in fractional cell units.
#[derive(Clone, Debug)]
pub struct Particle {
    pos: (f32, f32),
    vel: (f32, f32),
    life: u32,
    max_life: u32,
    hue: Hue,
    size: f32,
}

impl Particle {
    pub fn new<R: Rng>(origin: (f32, f32), hue: Hue, rng: &mut R) -> Self {
        let vel = (
            (rng.gen::<f32>() - 0.5) * PARTICLE_SPREAD,
            (rng.gen::<f32>() - 0.5) * PARTICLE_SPREAD,
        );
        Particle {
            pos: origin,
            vel,
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
            hue,
            size: rng.gen_range(0.1..0.3),
        }
    }

    /// Integrates one tick. Returns false once the particle has burnt out.
    pub fn update(&mut self) -> bool {
        self.pos.0 += self.vel.0;
        self.pos.1 += self.vel.1;
        self.vel.0 *= PARTICLE_DAMPING;
        self.vel.1 *= PARTICLE_DAMPING;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    pub fn pos(&self) -> (f32, f32) {
        self.pos
    }

    pub fn hue(&self) -> Hue {
        self.hue
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Remaining life as a fraction of the initial one
    pub fn fade(&self) -> f32 {
        self.life as f32 / self.max_life as f32
    }
}

/// Slowly falling background decoration.
#[derive(Clone, Debug)]
pub struct Star {
    pos: (f32, f32),
    speed: f32,
    hue: f32,
}

impl Star {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Star {
            pos: (rng.gen_range(0.0..TILES_X as f32), rng.gen_range(0.0..TILES_Y as f32)),
            speed: rng.gen_range(0.005..0.03),
            hue: rng.gen_range(0.0..360.0),
        }
    }

    pub fn update<R: Rng>(&mut self, rng: &mut R) {
        self.pos.1 += self.speed;
        if self.pos.1 >= TILES_Y as f32 {
            self.pos = (rng.gen_range(0.0..TILES_X as f32), 0.0);
        }
        self.hue = (self.hue + 0.5) % 360.0;
    }

    pub fn pos(&self) -> (f32, f32) {
        self.pos
    }

    /// Hue angle in degrees
    pub fn hue(&self) -> f32 {
        self.hue
    }
}
