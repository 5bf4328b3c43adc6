use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MutationObserver, MutationObserverInit};

use crate::error::Result;

/// Watches the `class` attribute of an element, usually `<body>`
///
/// Disconnects when dropped.
pub struct ThemeObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl ThemeObserver {
    /// Call `on_change` with the full class list after every class mutation
    pub fn observe(target: &HtmlElement, mut on_change: impl FnMut(&str) + 'static) -> Result<Self> {
        let element = target.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |_records: js_sys::Array, _observer: MutationObserver| {
                let classes = element.class_name();
                debug!(%classes, "body classes changed");
                on_change(&classes);
            },
        );

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let options = MutationObserverInit::new();
        options.set_attributes(true);
        options.set_attribute_filter(&js_sys::Array::of1(&JsValue::from_str("class")));
        observer.observe_with_options(target, &options)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for ThemeObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
