//! Burst sparks: ballistic, damped, and fading

use std::f64::consts::TAU;

use crate::config::{BurstParams, MAX_BURST_SPARKS};
use crate::math::Vec2;
use crate::random::RandomSource;
use super::color::Rgb;
use super::projectile::Projectile;

/// A single spark thrown out by a burst
#[derive(Debug, Clone)]
pub struct Fragment {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining life, 1.0 at birth; the spark is dead at or below zero
    pub life: f64,
    /// Life lost per tick
    pub decay: f64,
    pub radius: f64,
    pub color: Rgb,
}

impl Fragment {
    pub fn new(position: Vec2, velocity: Vec2, decay: f64, radius: f64, color: Rgb) -> Self {
        Self {
            position,
            velocity,
            life: 1.0,
            decay,
            radius,
            color,
        }
    }

    /// One physics tick. Returns whether the spark is still alive.
    pub fn update(&mut self, gravity: f64, air_resistance: f64) -> bool {
        self.position += self.velocity;
        self.velocity += Vec2::DOWN * gravity;
        self.velocity = self.velocity * air_resistance;
        self.life = (self.life - self.decay).min(1.0);
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Draw opacity, fading linearly with remaining life
    pub fn alpha(&self) -> f64 {
        self.life.clamp(0.0, 1.0)
    }
}

/// Number of sparks a rocket of the given scale bursts into
///
/// Never zero, so every burst is visible, and never above
/// [`MAX_BURST_SPARKS`].
pub fn burst_count<R: RandomSource + ?Sized>(scale: f64, params: &BurstParams, rng: &mut R) -> usize {
    let count = (params.count.sample(rng) * scale).floor();
    if count.is_nan() || count < 1.0 {
        1
    } else {
        count.min(MAX_BURST_SPARKS as f64) as usize
    }
}

/// Sparks for a rocket bursting at its current position
///
/// Directions are spread evenly around the circle, each nudged by a little
/// random jitter. Speed and radius grow with the rocket's scale.
pub fn burst<R: RandomSource + ?Sized>(
    parent: &Projectile,
    params: &BurstParams,
    rng: &mut R,
) -> Vec<Fragment> {
    let count = burst_count(parent.scale, params, rng);
    let mut fragments = Vec::with_capacity(count);

    for i in 0..count {
        let angle = TAU * i as f64 / count as f64 + rng.next_f64() * params.angle_jitter;
        let speed = params.speed.sample(rng) * parent.scale;
        let velocity = Vec2::from_angle(angle) * speed;
        let color = parent.color.jittered(rng, params.color_jitter);
        let decay = params.decay.sample(rng);
        let radius = params.radius.sample(rng) * parent.scale;

        fragments.push(Fragment::new(parent.position, velocity, decay, radius, color));
    }

    fragments
}
