//! Fireworks engine: spawn timer, per-frame physics, and drawing
//!
//! Two independent schedules drive the engine. Every display refresh runs
//! [`FireworksEngine::animate`], which moves, culls, and draws everything.
//! A one-shot timer, re-armed with a fresh random delay after each firing,
//! launches new rockets. Both are owned through [`TaskHandle`]s that exist
//! exactly while the engine is running.

pub mod scheduler;

#[cfg(test)]
mod tests;

use tracing::{debug, trace, warn};

use crate::config::FireworksConfig;
use crate::particles::{burst, Fragment, Flight, Projectile};
use crate::random::RandomSource;
use crate::render::DrawSurface;
use crate::theme::fireworks_enabled;

pub use scheduler::{ManualScheduler, PendingTimer, Scheduler, TaskHandle, TimerKind};

/// The fireworks simulation bound to one drawing surface
pub struct FireworksEngine<S: DrawSurface, R: RandomSource, K: Scheduler> {
    config: FireworksConfig,
    surface: S,
    rng: R,
    scheduler: K,
    projectiles: Vec<Projectile>,
    fragments: Vec<Fragment>,
    /// Pending display-refresh callback
    frame: Option<TaskHandle>,
    /// Pending rocket launch
    spawn_timer: Option<TaskHandle>,
    /// Pending debounced resize
    resize_timer: Option<TaskHandle>,
    width: f64,
    height: f64,
    /// Set from outside; the engine never decides this itself
    active: bool,
    visible: bool,
}

impl<S: DrawSurface, R: RandomSource, K: Scheduler> FireworksEngine<S, R, K> {
    /// Create a stopped, hidden engine sized to the current viewport
    pub fn new(surface: S, rng: R, scheduler: K, config: FireworksConfig) -> Self {
        let mut engine = Self {
            config,
            surface,
            rng,
            scheduler,
            projectiles: Vec::new(),
            fragments: Vec::new(),
            frame: None,
            spawn_timer: None,
            resize_timer: None,
            width: 0.0,
            height: 0.0,
            active: false,
            visible: false,
        };
        engine.surface.set_visible(false);
        engine.resize();
        engine
    }

    // === Lifecycle ===

    /// Turn the fireworks on or off
    ///
    /// Turning on an engine that is already running leaves it alone.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if active {
            if !self.is_running() {
                self.start();
            }
        } else {
            self.stop();
        }
    }

    /// Activate iff the body class list names one of the configured themes
    pub fn apply_theme_classes(&mut self, class_list: &str) {
        let enabled = fireworks_enabled(class_list, &self.config.themes);
        self.set_active(enabled);
    }

    /// (Re)start from an empty sky
    pub fn start(&mut self) {
        self.projectiles.clear();
        self.fragments.clear();
        self.cancel_loop();

        self.visible = true;
        self.surface.set_visible(true);

        self.frame = self.scheduler.request_frame();
        if self.frame.is_none() {
            warn!("scheduler refused an animation frame");
        }
        self.arm_spawn_timer();

        debug!(width = self.width, height = self.height, "fireworks started");
    }

    /// Cancel both schedules, drop every entity, and hide the surface
    pub fn stop(&mut self) {
        self.cancel_loop();
        self.projectiles.clear();
        self.fragments.clear();

        self.visible = false;
        self.surface.set_visible(false);
        self.surface.clear();

        debug!("fireworks stopped");
    }

    /// Stop and also drop any pending resize; used when the host goes away
    pub fn teardown(&mut self) {
        self.stop();
        if let Some(handle) = self.resize_timer.take() {
            self.scheduler.clear_timer(handle);
        }
    }

    fn cancel_loop(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        if let Some(handle) = self.spawn_timer.take() {
            self.scheduler.clear_timer(handle);
        }
    }

    fn arm_spawn_timer(&mut self) {
        let delay = self.config.launch.interval_ms.sample(&mut self.rng).round().max(1.0);
        self.spawn_timer = self.scheduler.set_timer(TimerKind::Spawn, delay as u32);
        if self.spawn_timer.is_none() {
            warn!("scheduler refused the launch timer");
        }
    }

    /// Active and on screen
    fn is_live(&self) -> bool {
        self.active && self.visible
    }

    // === Scheduled callbacks ===

    /// The requested display refresh arrived
    pub fn on_frame(&mut self) {
        self.frame = None;
        self.animate();
    }

    /// A timer armed by this engine fired
    pub fn on_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Spawn => {
                self.spawn_timer = None;
                self.spawn_tick();
            }
            TimerKind::Resize => {
                self.resize_timer = None;
                self.resize();
            }
        }
    }

    fn spawn_tick(&mut self) {
        // Activation may have changed since the timer was armed
        if !self.is_live() {
            debug!("launch timer fired while inactive; not re-arming");
            return;
        }
        self.launch();
        self.arm_spawn_timer();
    }

    // === Viewport ===

    /// Match the surface to the viewport size
    pub fn resize(&mut self) {
        let Some((width, height)) = self.surface.viewport_size() else {
            warn!("viewport size unavailable; keeping {}x{}", self.width, self.height);
            return;
        };
        if !width.is_finite() || !height.is_finite() {
            warn!(width, height, "ignoring non-finite viewport size");
            return;
        }

        self.surface.set_size(width, height);
        self.width = width;
        self.height = height;
        debug!(width, height, "fireworks surface resized");
    }

    /// Viewport changed; resize once things have been quiet for a moment
    pub fn on_viewport_resize(&mut self) {
        if let Some(handle) = self.resize_timer.take() {
            self.scheduler.clear_timer(handle);
        }
        self.resize_timer = self
            .scheduler
            .set_timer(TimerKind::Resize, self.config.resize_debounce_ms);
    }

    // === Simulation ===

    /// Send up one rocket from a random spot on the bottom edge
    pub fn launch(&mut self) {
        let p = Projectile::launch(self.width, self.height, &self.config.launch, &mut self.rng);
        trace!(x = p.position.x, target_y = p.target_y, scale = p.scale, "rocket launched");
        self.projectiles.push(p);
    }

    /// Add a caller-built rocket
    pub fn launch_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    /// Advance a rocket one tick; bursts it in the same call if it arrived
    ///
    /// Returns `false` once the rocket has burst and should be dropped.
    pub fn update_projectile(&mut self, projectile: &mut Projectile) -> bool {
        match projectile.advance(self.config.launch.trail_length) {
            Flight::Climbing => true,
            Flight::Burst => {
                self.explode(projectile);
                false
            }
        }
    }

    /// Throw out the spark batch for a rocket at its current position
    pub fn explode(&mut self, projectile: &Projectile) {
        let sparks = burst(projectile, &self.config.burst, &mut self.rng);
        trace!(count = sparks.len(), scale = projectile.scale, "rocket burst");
        self.fragments.extend(sparks);
    }

    /// Advance a spark one tick; `false` once its life runs out
    pub fn update_fragment(&self, fragment: &mut Fragment) -> bool {
        fragment.update(self.config.burst.gravity, self.config.burst.air_resistance)
    }

    // === Drawing ===

    pub fn draw_projectile(&mut self, projectile: &Projectile) {
        let style = &self.config.style;
        self.surface.stroke_polyline(
            projectile.trail(),
            style.trail_width * projectile.scale,
            projectile.color.with_alpha(style.trail_alpha),
        );
        self.surface.fill_circle(
            projectile.position,
            style.head_radius * projectile.scale,
            projectile.color.with_alpha(1.0),
        );
    }

    pub fn draw_fragment(&mut self, fragment: &Fragment) {
        self.surface.fill_circle(
            fragment.position,
            fragment.radius,
            fragment.color.with_alpha(fragment.alpha()),
        );
    }

    /// One frame: stop if deactivated, else simulate, draw, and ask for the next
    pub fn animate(&mut self) {
        if !self.is_live() {
            self.stop();
            return;
        }

        self.surface.clear();

        let mut projectiles = std::mem::take(&mut self.projectiles);
        projectiles.retain_mut(|p| {
            let alive = self.update_projectile(p);
            if alive {
                self.draw_projectile(p);
            }
            alive
        });
        self.projectiles = projectiles;

        // Sparks from rockets that burst just now move on this same frame
        let mut fragments = std::mem::take(&mut self.fragments);
        fragments.retain_mut(|f| {
            let alive = self.update_fragment(f);
            if alive {
                self.draw_fragment(f);
            }
            alive
        });
        self.fragments = fragments;

        // Never leave two frames outstanding when called outside on_frame
        if let Some(handle) = self.frame.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.frame = self.scheduler.request_frame();
    }

    // === Accessors ===

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Visible with a frame on the way
    pub fn is_running(&self) -> bool {
        self.visible && self.frame.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn frame_handle(&self) -> Option<TaskHandle> {
        self.frame
    }

    pub fn spawn_handle(&self) -> Option<TaskHandle> {
        self.spawn_timer
    }

    pub fn config(&self) -> &FireworksConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[cfg(test)]
    pub(crate) fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn scheduler(&self) -> &K {
        &self.scheduler
    }
}

impl<S: DrawSurface, R: RandomSource> FireworksEngine<S, R, ManualScheduler> {
    /// Deliver the pending frame, if one was requested
    pub fn step_frame(&mut self) -> bool {
        if self.scheduler.take_frame().is_none() {
            return false;
        }
        self.on_frame();
        true
    }

    /// Deliver the oldest pending timer of `kind`, if any
    pub fn fire_timer(&mut self, kind: TimerKind) -> bool {
        if self.scheduler.take_timer(kind).is_none() {
            return false;
        }
        self.on_timer(kind);
        true
    }
}
