//! Browser glue: real timers, the theme observer, and the engine alias
//! the wasm-bindgen entry points drive

pub mod scheduler;
pub mod theme_observer;

use std::cell::RefCell;
use std::rc::Weak;

use tracing::warn;

use crate::engine::FireworksEngine;
use crate::random::MathRandom;
use crate::render::CanvasSurface;

pub use scheduler::BrowserScheduler;
pub use theme_observer::ThemeObserver;

/// The engine as it runs in a page
pub type WebEngine = FireworksEngine<CanvasSurface, MathRandom, BrowserScheduler>;

/// Run `f` against the engine if it is still alive and not already borrowed
///
/// Browser callbacks only hold a weak reference, so a callback that fires
/// after the engine is dropped does nothing. Returns whether `f` ran.
pub(crate) fn with_engine<T>(engine: &Weak<RefCell<T>>, f: impl FnOnce(&mut T)) -> bool {
    let Some(engine) = engine.upgrade() else {
        return false;
    };
    let ran = match engine.try_borrow_mut() {
        Ok(mut engine) => {
            f(&mut engine);
            true
        }
        Err(_) => {
            warn!("fireworks engine busy; dropping callback");
            false
        }
    };
    ran
}
