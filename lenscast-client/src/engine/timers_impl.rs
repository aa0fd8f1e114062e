use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

use crate::engine::{EngineInner, LensCastEngine};
use crate::logger::Logger;

impl LensCastEngine {
    pub(super) fn start_heartbeat(inner: &Rc<RefCell<EngineInner>>, every: Duration) {
        Self::stop_heartbeat(inner);
        let Some(window) = web_sys::window() else {
            return;
        };

        let inner_clone = inner.clone();
        let tick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            Self::drive(&inner_clone, |supervisor| supervisor.on_heartbeat_tick());
        }));

        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            Self::millis(every),
        ) {
            Ok(handle) => inner.borrow_mut().heartbeat = Some((handle, tick)),
            Err(e) => Logger::error(&e),
        }
    }

    pub(super) fn stop_heartbeat(inner: &Rc<RefCell<EngineInner>>) {
        let heartbeat = inner.borrow_mut().heartbeat.take();
        if let (Some((handle, _)), Some(window)) = (heartbeat, web_sys::window()) {
            window.clear_interval_with_handle(handle);
        }
    }

    pub(super) fn schedule_reconnect(inner: &Rc<RefCell<EngineInner>>, after: Duration) {
        Self::cancel_reconnect(inner);
        let Some(window) = web_sys::window() else {
            return;
        };

        let inner_clone = inner.clone();
        let fire = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            // The closure lives in `reconnect_timer`; drop it only after this call returns.
            let fired = inner_clone.borrow_mut().reconnect_timer.take();
            Self::drive(&inner_clone, |supervisor| supervisor.on_reconnect_timer());
            if let Some((_, closure)) = fired {
                closure.forget();
            }
        }));

        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            fire.as_ref().unchecked_ref(),
            Self::millis(after),
        ) {
            Ok(handle) => inner.borrow_mut().reconnect_timer = Some((handle, fire)),
            Err(e) => Logger::error(&e),
        }
    }

    pub(super) fn cancel_reconnect(inner: &Rc<RefCell<EngineInner>>) {
        let timer = inner.borrow_mut().reconnect_timer.take();
        if let (Some((handle, _)), Some(window)) = (timer, web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }

    /// Disconnects explicitly when the page goes away.
    pub(super) fn register_unload(inner: &Rc<RefCell<EngineInner>>) -> Result<(), JsValue> {
        Self::unregister_unload(inner);
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

        let inner_clone = inner.clone();
        let listener = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
            Self::drive(&inner_clone, |supervisor| supervisor.disconnect());
        }));
        window.add_event_listener_with_callback("beforeunload", listener.as_ref().unchecked_ref())?;

        inner.borrow_mut().unload_listener = Some(listener);
        Ok(())
    }

    pub(super) fn unregister_unload(inner: &Rc<RefCell<EngineInner>>) {
        let listener = inner.borrow_mut().unload_listener.take();
        if let (Some(listener), Some(window)) = (listener, web_sys::window()) {
            let _ = window.remove_event_listener_with_callback(
                "beforeunload",
                listener.as_ref().unchecked_ref(),
            );
        }
    }

    fn millis(duration: Duration) -> i32 {
        i32::try_from(duration.as_millis()).unwrap_or(i32::MAX)
    }
}
