use lenscast_core::Role;
use wasm_bindgen::prelude::*;

use crate::engine::{EngineConfig, LensCastEngine};
use crate::logger::Logger;

/// Browser entry point.
#[wasm_bindgen]
pub struct LensCast {
    engine: LensCastEngine,
}

#[wasm_bindgen]
impl LensCast {
    /// Starts sharing `stream` with every watcher. `url` defaults to `/ws` on the page's host.
    pub fn share(
        stream: web_sys::MediaStream,
        on_event: js_sys::Function,
        url: Option<String>,
    ) -> Result<LensCast, JsValue> {
        Self::start(Role::Sharer, Some(stream), on_event, url)
    }

    pub fn watch(on_event: js_sys::Function, url: Option<String>) -> Result<LensCast, JsValue> {
        Self::start(Role::Watcher, None, on_event, url)
    }

    pub fn disconnect(&self) {
        self.engine.disconnect();
    }

    /// Sharer only: offer again on a fresh peer connection.
    pub fn renegotiate(&self) -> Result<(), JsValue> {
        self.engine.renegotiate()
    }

    #[wasm_bindgen(getter, js_name = participantId)]
    pub fn participant_id(&self) -> Option<String> {
        self.engine.participant_id()
    }

    #[wasm_bindgen(getter, js_name = remoteStream)]
    pub fn remote_stream(&self) -> Option<web_sys::MediaStream> {
        self.engine.remote_stream()
    }
}

impl LensCast {
    fn start(
        role: Role,
        stream: Option<web_sys::MediaStream>,
        on_event: js_sys::Function,
        url: Option<String>,
    ) -> Result<LensCast, JsValue> {
        let mut config = EngineConfig::from_location()?;
        if let Some(url) = url {
            config.url = url;
        }

        Logger::info(&format!("Starting {} session via {}", role, config.url));
        let engine = LensCastEngine::new(role, config, stream);
        engine.set_event_handler(on_event);
        engine.start()?;
        Ok(LensCast { engine })
    }
}
