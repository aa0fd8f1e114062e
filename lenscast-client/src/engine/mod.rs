use std::cell::RefCell;
use std::rc::Rc;

use lenscast_core::Role;
use wasm_bindgen::prelude::*;

use crate::logger::Logger;
use crate::machine::{Action, ClientEvent, ConnectionSupervisor, Generation, SupervisorConfig};

mod apply_actions_impl;
mod bindings;
mod create_pc_impl;
mod peer_ops_impl;
mod timers_impl;
mod ws_setup_impl;

pub use bindings::LensCast;

#[derive(Clone)]
pub struct EngineConfig {
    pub url: String,
    pub supervisor: SupervisorConfig,
}

impl EngineConfig {
    /// `ws://<host>/ws`, or `wss://` when the page itself is served over https.
    pub fn from_location() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let location = window.location();
        let scheme = if location.protocol()? == "https:" {
            "wss"
        } else {
            "ws"
        };

        Ok(Self {
            url: format!("{}://{}/ws", scheme, location.host()?),
            supervisor: SupervisorConfig::default(),
        })
    }
}

pub(crate) struct EngineInner {
    supervisor: ConnectionSupervisor,
    config: EngineConfig,
    ws: Option<web_sys::WebSocket>,
    /// Bumped for every socket; callbacks carrying an older serial are ignored.
    socket_serial: u64,
    pc: Option<(Generation, web_sys::RtcPeerConnection)>,
    local_stream: Option<web_sys::MediaStream>,
    remote_stream: Option<web_sys::MediaStream>,
    heartbeat: Option<(i32, Closure<dyn FnMut()>)>,
    reconnect_timer: Option<(i32, Closure<dyn FnMut()>)>,
    unload_listener: Option<Closure<dyn FnMut(web_sys::Event)>>,
    js_callback: Option<js_sys::Function>,
}

/// Runs a `ConnectionSupervisor` against the browser's WebSocket,
/// RTCPeerConnection and timers.
pub struct LensCastEngine {
    inner: Rc<RefCell<EngineInner>>,
}

impl LensCastEngine {
    pub fn new(
        role: Role,
        config: EngineConfig,
        local_stream: Option<web_sys::MediaStream>,
    ) -> Self {
        let inner = Rc::new(RefCell::new(EngineInner {
            supervisor: ConnectionSupervisor::new(role, config.supervisor.clone()),
            config,
            ws: None,
            socket_serial: 0,
            pc: None,
            local_stream,
            remote_stream: None,
            heartbeat: None,
            reconnect_timer: None,
            unload_listener: None,
            js_callback: None,
        }));

        LensCastEngine { inner }
    }

    pub fn start(&self) -> Result<(), JsValue> {
        Self::register_unload(&self.inner)?;
        let actions = self
            .inner
            .borrow_mut()
            .supervisor
            .connect()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::apply_actions(&self.inner, actions);
        Ok(())
    }

    pub fn disconnect(&self) {
        Self::drive(&self.inner, |supervisor| supervisor.disconnect());
        Self::unregister_unload(&self.inner);
    }

    pub fn renegotiate(&self) -> Result<(), JsValue> {
        let actions = self
            .inner
            .borrow_mut()
            .supervisor
            .renegotiate()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Self::apply_actions(&self.inner, actions);
        Ok(())
    }

    pub fn participant_id(&self) -> Option<String> {
        self.inner
            .borrow()
            .supervisor
            .participant_id()
            .map(|id| id.to_string())
    }

    pub fn remote_stream(&self) -> Option<web_sys::MediaStream> {
        self.inner.borrow().remote_stream.clone()
    }

    pub fn set_event_handler(&self, callback: js_sys::Function) {
        self.inner.borrow_mut().js_callback = Some(callback);
    }

    /// Feeds one input into the supervisor and performs whatever it asks for.
    pub(crate) fn drive(
        inner: &Rc<RefCell<EngineInner>>,
        step: impl FnOnce(&mut ConnectionSupervisor) -> Vec<Action>,
    ) {
        let actions = step(&mut inner.borrow_mut().supervisor);
        Self::apply_actions(inner, actions);
    }

    fn dispatch_event(inner: &Rc<RefCell<EngineInner>>, event: ClientEvent) {
        // The page may call back into the engine from its handler.
        let callback = inner.borrow().js_callback.clone();
        let Some(cb) = callback else {
            return;
        };

        match serde_wasm_bindgen::to_value(&event) {
            Ok(js_val) => {
                if let Err(e) = cb.call1(&JsValue::NULL, &js_val) {
                    Logger::error(&e);
                }
            }
            Err(e) => Logger::warn(&format!("Failed to convert event: {}", e)),
        }
    }
}
