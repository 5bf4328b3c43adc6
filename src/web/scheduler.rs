use std::cell::RefCell;
use std::rc::Weak;

use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::engine::{Scheduler, TaskHandle, TimerKind};
use super::{with_engine, WebEngine};

/// `requestAnimationFrame` and `setTimeout` backed scheduler
///
/// Each task kind owns one closure for the life of the engine. The closures
/// hold only a weak reference back to it.
pub struct BrowserScheduler {
    window: Window,
    frame_callback: Closure<dyn FnMut(f64)>,
    spawn_callback: Closure<dyn FnMut()>,
    resize_callback: Closure<dyn FnMut()>,
}

impl BrowserScheduler {
    pub fn new(window: Window, engine: Weak<RefCell<WebEngine>>) -> Self {
        let frame_engine = engine.clone();
        let frame_callback = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            with_engine(&frame_engine, |e| e.on_frame());
        });

        Self {
            window,
            frame_callback,
            spawn_callback: dispatch_timer(engine.clone(), TimerKind::Spawn),
            resize_callback: dispatch_timer(engine, TimerKind::Resize),
        }
    }

    fn timer_callback(&self, kind: TimerKind) -> &Closure<dyn FnMut()> {
        match kind {
            TimerKind::Spawn => &self.spawn_callback,
            TimerKind::Resize => &self.resize_callback,
        }
    }
}

fn dispatch_timer(engine: Weak<RefCell<WebEngine>>, kind: TimerKind) -> Closure<dyn FnMut()> {
    Closure::<dyn FnMut()>::new(move || {
        with_engine(&engine, |e| e.on_timer(kind));
    })
}

impl Scheduler for BrowserScheduler {
    fn request_frame(&mut self) -> Option<TaskHandle> {
        match self
            .window
            .request_animation_frame(self.frame_callback.as_ref().unchecked_ref())
        {
            Ok(id) => Some(TaskHandle(id)),
            Err(e) => {
                warn!(?e, "requestAnimationFrame failed");
                None
            }
        }
    }

    fn cancel_frame(&mut self, handle: TaskHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            warn!(?e, "cancelAnimationFrame failed");
        }
    }

    fn set_timer(&mut self, kind: TimerKind, delay_ms: u32) -> Option<TaskHandle> {
        let delay = delay_ms.min(i32::MAX as u32) as i32;
        let callback = self.timer_callback(kind);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), delay)
        {
            Ok(id) => Some(TaskHandle(id)),
            Err(e) => {
                warn!(?e, ?kind, "setTimeout failed");
                None
            }
        }
    }

    fn clear_timer(&mut self, handle: TaskHandle) {
        self.window.clear_timeout_with_handle(handle.0);
    }
}
