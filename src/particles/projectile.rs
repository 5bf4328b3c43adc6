//! Rockets climbing toward their burst altitude

use crate::config::LaunchParams;
use crate::math::Vec2;
use crate::random::RandomSource;
use super::color::Rgb;

/// Outcome of a single flight tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    /// Still below the burst altitude
    Climbing,
    /// Reached or passed the burst altitude this tick
    Burst,
}

/// A rocket rising straight up from the bottom edge
#[derive(Debug, Clone)]
pub struct Projectile {
    pub position: Vec2,
    /// Canvas y at which the rocket bursts (smaller is higher)
    pub target_y: f64,
    /// Upward pixels per tick
    pub speed: f64,
    pub color: Rgb,
    /// Size multiplier for the head, trail, and burst
    pub scale: f64,
    trail: Vec<Vec2>,
}

impl Projectile {
    pub fn new(position: Vec2, target_y: f64, speed: f64, color: Rgb, scale: f64) -> Self {
        Self {
            position,
            target_y,
            speed,
            color,
            scale,
            trail: Vec::new(),
        }
    }

    /// Roll a new rocket at the bottom edge of a `width` x `height` canvas
    pub fn launch<R: RandomSource + ?Sized>(
        width: f64,
        height: f64,
        params: &LaunchParams,
        rng: &mut R,
    ) -> Self {
        let x = rng.next_f64() * width;
        let target_y = params.target_band.sample(rng) * height;
        let speed = params.ascent_speed.sample(rng);
        let color = Rgb::random(rng);
        let scale = params.scale.sample(rng);

        Self::new(Vec2::new(x, height), target_y, speed, color, scale)
    }

    /// Move one tick upward and record the new point in the trail
    ///
    /// The trail keeps at most `trail_length` points, dropping the oldest.
    pub fn advance(&mut self, trail_length: usize) -> Flight {
        self.position += Vec2::UP * self.speed;

        self.trail.push(self.position);
        if self.trail.len() > trail_length {
            let excess = self.trail.len() - trail_length;
            self.trail.drain(..excess);
        }

        if self.position.y <= self.target_y {
            Flight::Burst
        } else {
            Flight::Climbing
        }
    }

    /// Recent positions, oldest first
    pub fn trail(&self) -> &[Vec2] {
        &self.trail
    }
}
