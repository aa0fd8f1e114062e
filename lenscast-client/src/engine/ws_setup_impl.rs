use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use web_sys::WebSocket;

use crate::engine::{EngineInner, LensCastEngine};
use crate::logger::Logger;

impl LensCastEngine {
    pub(super) fn open_socket(inner: &Rc<RefCell<EngineInner>>) -> Result<(), JsValue> {
        let url = inner.borrow().config.url.clone();
        let serial = {
            let mut inner = inner.borrow_mut();
            inner.socket_serial += 1;
            if let Some(old) = inner.ws.take() {
                let _ = old.close();
            }
            inner.socket_serial
        };

        Logger::info(&format!("Opening signaling socket to {}", url));
        let ws = WebSocket::new(&url)?;

        let onopen_callback = {
            let inner = inner.clone();
            Closure::<dyn FnMut(JsValue)>::wrap(Box::new(move |_| {
                if !Self::is_current_socket(&inner, serial) {
                    return;
                }
                Logger::info("WS Open");
                Self::drive(&inner, |supervisor| supervisor.on_socket_open());
            }))
        };
        ws.set_onopen(Some(onopen_callback.as_ref().unchecked_ref()));
        onopen_callback.forget();

        let onmessage_callback = {
            let inner = inner.clone();
            Closure::<dyn FnMut(web_sys::MessageEvent)>::wrap(Box::new(
                move |e: web_sys::MessageEvent| {
                    if !Self::is_current_socket(&inner, serial) {
                        return;
                    }
                    match e.data().as_string() {
                        Some(text) => Self::drive(&inner, |supervisor| supervisor.on_frame(&text)),
                        None => Logger::warn("Ignoring non-text signaling frame"),
                    }
                },
            ))
        };
        ws.set_onmessage(Some(onmessage_callback.as_ref().unchecked_ref()));
        onmessage_callback.forget();

        let onclose_callback = {
            let inner = inner.clone();
            Closure::<dyn FnMut(web_sys::CloseEvent)>::wrap(Box::new(
                move |e: web_sys::CloseEvent| {
                    if !Self::is_current_socket(&inner, serial) {
                        return;
                    }
                    Logger::info(&format!("WS Closed ({})", e.code()));
                    inner.borrow_mut().ws = None;
                    Self::drive(&inner, |supervisor| supervisor.on_socket_close(e.code()));
                },
            ))
        };
        ws.set_onclose(Some(onclose_callback.as_ref().unchecked_ref()));
        onclose_callback.forget();

        let onerror_callback = {
            let inner = inner.clone();
            Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_| {
                if !Self::is_current_socket(&inner, serial) {
                    return;
                }
                Logger::warn("WS Error");
                Self::drive(&inner, |supervisor| supervisor.on_socket_error());
            }))
        };
        ws.set_onerror(Some(onerror_callback.as_ref().unchecked_ref()));
        onerror_callback.forget();

        inner.borrow_mut().ws = Some(ws);
        Ok(())
    }

    pub(super) fn send_frame(inner: &Rc<RefCell<EngineInner>>, text: &str) {
        let ws = inner.borrow().ws.clone();
        match ws {
            Some(ws) if ws.ready_state() == WebSocket::OPEN => {
                if let Err(e) = ws.send_with_str(text) {
                    Logger::error(&e);
                }
            }
            _ => Logger::warn("Signaling socket not open, frame dropped"),
        }
    }

    pub(super) fn close_socket(inner: &Rc<RefCell<EngineInner>>, code: u16) {
        let ws = {
            let mut inner = inner.borrow_mut();
            inner.socket_serial += 1;
            inner.ws.take()
        };
        if let Some(ws) = ws {
            if let Err(e) = ws.close_with_code(code) {
                Logger::error(&e);
            }
        }
    }

    fn is_current_socket(inner: &Rc<RefCell<EngineInner>>, serial: u64) -> bool {
        inner.borrow().socket_serial == serial
    }
}
