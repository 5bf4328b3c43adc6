use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

pub mod config;
pub mod engine;
pub mod error;
pub mod math;
pub mod particles;
pub mod random;
pub mod render;
pub mod theme;
pub mod web;

pub use config::FireworksConfig;
pub use engine::FireworksEngine;
pub use error::FireworksError;

use random::MathRandom;
use render::CanvasSurface;
use web::{with_engine, BrowserScheduler, ThemeObserver, WebEngine};

/// Element id the page gives its fireworks canvas
pub const CANVAS_ID: &str = "fireworksCanvas";

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "tracing-wasm")]
    init_logging();
}

/// Route `tracing` events to the browser console
#[cfg(feature = "tracing-wasm")]
fn init_logging() {
    // Only one global subscriber may ever be installed
    if !tracing::dispatcher::has_been_set() {
        tracing_wasm::set_as_global_default();
    }
}

/// Fireworks layer bound to one full-window canvas, exposed to JavaScript
///
/// Starts hidden and inactive. The host turns it on with `set_active` or
/// `apply_theme_classes`.
#[wasm_bindgen]
pub struct FireworksCanvas {
    engine: Rc<RefCell<WebEngine>>,
    window: web_sys::Window,
    resize_listener: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl FireworksCanvas {
    /// Create an engine on `canvas` with the default settings
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<FireworksCanvas, JsValue> {
        Ok(Self::build(canvas, FireworksConfig::default())?)
    }

    /// Create an engine on `canvas` with settings from a YAML document
    #[wasm_bindgen]
    pub fn with_config(canvas: HtmlCanvasElement, yaml: &str) -> Result<FireworksCanvas, JsValue> {
        let config = FireworksConfig::from_yaml(yaml)?;
        Ok(Self::build(canvas, config)?)
    }

    #[wasm_bindgen]
    pub fn set_active(&self, active: bool) {
        self.with_engine(|e| e.set_active(active));
    }

    /// Re-evaluate activation from a `<body>` class list
    #[wasm_bindgen]
    pub fn apply_theme_classes(&self, class_list: &str) {
        self.with_engine(|e| e.apply_theme_classes(class_list));
    }

    #[wasm_bindgen]
    pub fn start(&self) {
        self.with_engine(|e| e.start());
    }

    #[wasm_bindgen]
    pub fn stop(&self) {
        self.with_engine(|e| e.stop());
    }

    /// Send up one rocket right now
    #[wasm_bindgen]
    pub fn launch(&self) {
        self.with_engine(|e| e.launch());
    }

    #[wasm_bindgen(getter)]
    pub fn is_running(&self) -> bool {
        self.engine.try_borrow().map(|e| e.is_running()).unwrap_or(false)
    }

    #[wasm_bindgen(getter)]
    pub fn projectile_count(&self) -> usize {
        self.engine.try_borrow().map(|e| e.projectiles().len()).unwrap_or(0)
    }

    #[wasm_bindgen(getter)]
    pub fn fragment_count(&self) -> usize {
        self.engine.try_borrow().map(|e| e.fragments().len()).unwrap_or(0)
    }
}

impl FireworksCanvas {
    fn build(canvas: HtmlCanvasElement, config: FireworksConfig) -> error::Result<Self> {
        let window = web_sys::window().ok_or_else(|| FireworksError::Js("no window".to_string()))?;
        let surface = CanvasSurface::new(canvas)?;

        let engine = Rc::new_cyclic(|weak: &Weak<RefCell<WebEngine>>| {
            let scheduler = BrowserScheduler::new(window.clone(), weak.clone());
            RefCell::new(FireworksEngine::new(surface, MathRandom, scheduler, config))
        });

        let resize_engine = Rc::downgrade(&engine);
        let resize_listener = Closure::<dyn FnMut()>::new(move || {
            with_engine(&resize_engine, |e| e.on_viewport_resize());
        });
        window.add_event_listener_with_callback("resize", resize_listener.as_ref().unchecked_ref())?;

        Ok(Self {
            engine,
            window,
            resize_listener,
        })
    }

    fn with_engine(&self, f: impl FnOnce(&mut WebEngine)) {
        with_engine(&Rc::downgrade(&self.engine), f);
    }

    fn downgrade(&self) -> Weak<RefCell<WebEngine>> {
        Rc::downgrade(&self.engine)
    }
}

impl Drop for FireworksCanvas {
    fn drop(&mut self) {
        if let Err(e) = self
            .window
            .remove_event_listener_with_callback("resize", self.resize_listener.as_ref().unchecked_ref())
        {
            warn!(?e, "failed to remove resize listener");
        }
        self.with_engine(|e| e.teardown());
    }
}

/// The page-wide fireworks instance created by [`init_fireworks`]
struct PageFireworks {
    // Dropped first so no class change can reach a torn-down engine
    _observer: ThemeObserver,
    _fireworks: FireworksCanvas,
}

thread_local! {
    static PAGE: RefCell<Option<PageFireworks>> = const { RefCell::new(None) };
}

/// Attach fireworks to `#fireworksCanvas` and follow the `<body>` theme
///
/// Safe to call more than once; only the first successful call does work.
/// A page without the canvas gets a console warning and nothing else.
#[wasm_bindgen]
pub fn init_fireworks() -> Result<(), JsValue> {
    PAGE.with(|page| -> Result<(), JsValue> {
        if page.borrow().is_some() {
            return Ok(());
        }

        let window = web_sys::window().ok_or_else(|| FireworksError::Js("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| FireworksError::Js("no document".to_string()))?;

        let Some(element) = document.get_element_by_id(CANVAS_ID) else {
            let err = FireworksError::MissingCanvas(CANVAS_ID.to_string());
            web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
            return Ok(());
        };
        let canvas = element
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| FireworksError::MissingCanvas(CANVAS_ID.to_string()))?;
        let body = document
            .body()
            .ok_or_else(|| FireworksError::Js("no body".to_string()))?;

        let fireworks = FireworksCanvas::new(canvas)?;
        fireworks.apply_theme_classes(&body.class_name());

        let engine = fireworks.downgrade();
        let observer = ThemeObserver::observe(&body, move |classes| {
            with_engine(&engine, |e| e.apply_theme_classes(classes));
        })?;

        info!("fireworks attached to #{}", CANVAS_ID);
        *page.borrow_mut() = Some(PageFireworks {
            _observer: observer,
            _fireworks: fireworks,
        });
        Ok(())
    })
}
