use std::cell::RefCell;
use std::rc::Rc;

use lenscast_core::{IceCandidate, IceServerConfig};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

use crate::engine::{EngineInner, LensCastEngine};
use crate::logger::Logger;
use crate::machine::{Generation, PeerEvent, TransportState};

impl LensCastEngine {
    pub(super) fn create_pc(
        inner: &Rc<RefCell<EngineInner>>,
        generation: Generation,
        attach_local_media: bool,
    ) -> Result<(), JsValue> {
        let rtc_config = web_sys::RtcConfiguration::new();
        let ice_servers_arr = js_sys::Array::new();
        for server_config in &inner.borrow().config.supervisor.ice_servers {
            ice_servers_arr.push(&Self::rtc_ice_server(server_config));
        }
        rtc_config.set_ice_servers(&ice_servers_arr);

        let pc = web_sys::RtcPeerConnection::new_with_configuration(&rtc_config)?;

        let inner_clone = inner.clone();
        let onice = Closure::wrap(Box::new(move |ev: web_sys::RtcPeerConnectionIceEvent| {
            let Some(candidate) = ev.candidate() else {
                return;
            };
            let candidate = match serde_wasm_bindgen::from_value::<IceCandidate>(
                candidate.to_json().into(),
            ) {
                Ok(candidate) => candidate,
                Err(_) => IceCandidate {
                    candidate: candidate.candidate(),
                    sdp_mid: candidate.sdp_mid(),
                    sdp_m_line_index: candidate.sdp_m_line_index(),
                    username_fragment: None,
                },
            };
            Self::peer_event(
                &inner_clone,
                PeerEvent::LocalCandidate {
                    generation,
                    candidate,
                },
            );
        })
            as Box<dyn FnMut(web_sys::RtcPeerConnectionIceEvent)>);
        pc.set_onicecandidate(Some(onice.as_ref().unchecked_ref()));
        onice.forget();

        let inner_clone = inner.clone();
        let ontrack = Closure::wrap(Box::new(move |ev: web_sys::RtcTrackEvent| {
            Logger::info(&format!("Remote {} track arrived", ev.track().kind()));
            if let Ok(stream) = ev.streams().get(0).dyn_into::<web_sys::MediaStream>() {
                inner_clone.borrow_mut().remote_stream = Some(stream);
            }
            Self::peer_event(&inner_clone, PeerEvent::TrackArrived { generation });
        }) as Box<dyn FnMut(web_sys::RtcTrackEvent)>);
        pc.set_ontrack(Some(ontrack.as_ref().unchecked_ref()));
        ontrack.forget();

        let inner_clone = inner.clone();
        let pc_clone = pc.clone();
        let onicestate = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let state = match pc_clone.ice_connection_state() {
                web_sys::RtcIceConnectionState::New => TransportState::New,
                web_sys::RtcIceConnectionState::Checking => TransportState::Checking,
                web_sys::RtcIceConnectionState::Connected => TransportState::Connected,
                web_sys::RtcIceConnectionState::Completed => TransportState::Completed,
                web_sys::RtcIceConnectionState::Disconnected => TransportState::Disconnected,
                web_sys::RtcIceConnectionState::Failed => TransportState::Failed,
                _ => TransportState::Closed,
            };
            Self::peer_event(
                &inner_clone,
                PeerEvent::TransportChanged { generation, state },
            );
        }) as Box<dyn FnMut(web_sys::Event)>);
        pc.set_oniceconnectionstatechange(Some(onicestate.as_ref().unchecked_ref()));
        onicestate.forget();

        let inner_clone = inner.clone();
        let pc_clone = pc.clone();
        let onconnstate = Closure::wrap(Box::new(move |_: web_sys::Event| {
            let state = match pc_clone.connection_state() {
                web_sys::RtcPeerConnectionState::New => TransportState::New,
                web_sys::RtcPeerConnectionState::Connecting => TransportState::Connecting,
                web_sys::RtcPeerConnectionState::Connected => TransportState::Connected,
                web_sys::RtcPeerConnectionState::Disconnected => TransportState::Disconnected,
                web_sys::RtcPeerConnectionState::Failed => TransportState::Failed,
                _ => TransportState::Closed,
            };
            Self::peer_event(
                &inner_clone,
                PeerEvent::TransportChanged { generation, state },
            );
        }) as Box<dyn FnMut(web_sys::Event)>);
        pc.set_onconnectionstatechange(Some(onconnstate.as_ref().unchecked_ref()));
        onconnstate.forget();

        if attach_local_media {
            let stream = inner.borrow().local_stream.clone();
            match stream {
                Some(stream) => {
                    for track in stream.get_tracks().iter() {
                        if let Ok(track) = track.dyn_into::<web_sys::MediaStreamTrack>() {
                            pc.add_track_0(&track, &stream);
                        }
                    }
                }
                None => Logger::warn("No local media to attach"),
            }
        }

        Logger::info(&format!("Peer connection {} created", generation));
        inner.borrow_mut().pc = Some((generation, pc));
        Ok(())
    }

    fn rtc_ice_server(server_config: &IceServerConfig) -> web_sys::RtcIceServer {
        let rtc_ice_server = web_sys::RtcIceServer::new();

        let urls = js_sys::Array::new();
        for url in &server_config.urls {
            urls.push(&JsValue::from_str(url));
        }
        rtc_ice_server.set_urls(&urls);

        if let Some(username) = &server_config.username {
            rtc_ice_server.set_username(username);
        }
        if let Some(credential) = &server_config.credential {
            rtc_ice_server.set_credential(credential);
        }
        rtc_ice_server
    }
}
