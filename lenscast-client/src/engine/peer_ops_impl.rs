use std::cell::RefCell;
use std::rc::Rc;

use lenscast_core::{IceCandidate, SdpKind, SessionDescription};
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::engine::{EngineInner, LensCastEngine};
use crate::logger::Logger;
use crate::machine::{Generation, PeerEvent};

impl LensCastEngine {
    pub(super) fn peer_event(inner: &Rc<RefCell<EngineInner>>, event: PeerEvent) {
        Self::drive(inner, |supervisor| supervisor.on_peer_event(event));
    }

    pub(super) fn fail_generation(
        inner: &Rc<RefCell<EngineInner>>,
        generation: Generation,
        reason: &str,
    ) {
        Self::peer_event(
            inner,
            PeerEvent::Failed {
                generation,
                reason: reason.to_owned(),
            },
        );
    }

    pub(super) fn create_offer(inner: &Rc<RefCell<EngineInner>>, generation: Generation) {
        let Some(pc) = Self::pc_for(inner, generation) else {
            return;
        };
        let inner = inner.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let options = web_sys::RtcOfferOptions::new();
            options.set_offer_to_receive_audio(true);
            options.set_offer_to_receive_video(true);

            let result = async move {
                let offer = JsFuture::from(pc.create_offer_with_rtc_offer_options(&options)).await?;
                let sdp = Self::sdp_of(&offer)?;
                JsFuture::from(pc.set_local_description(&Self::description_init(SdpKind::Offer, &sdp)))
                    .await?;
                Ok::<_, JsValue>(sdp)
            }
            .await;

            let event = match result {
                Ok(sdp) => PeerEvent::LocalDescription {
                    generation,
                    description: SessionDescription::offer(sdp),
                },
                Err(e) => PeerEvent::Failed {
                    generation,
                    reason: format!("Could not create offer: {}", Self::reason(&e)),
                },
            };
            Self::peer_event(&inner, event);
        });
    }

    pub(super) fn accept_offer(
        inner: &Rc<RefCell<EngineInner>>,
        generation: Generation,
        offer: SessionDescription,
    ) {
        let Some(pc) = Self::pc_for(inner, generation) else {
            return;
        };
        let inner = inner.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let result = async move {
                JsFuture::from(
                    pc.set_remote_description(&Self::description_init(offer.kind, &offer.sdp)),
                )
                .await?;
                let answer = JsFuture::from(pc.create_answer()).await?;
                let sdp = Self::sdp_of(&answer)?;
                JsFuture::from(
                    pc.set_local_description(&Self::description_init(SdpKind::Answer, &sdp)),
                )
                .await?;
                Ok::<_, JsValue>(sdp)
            }
            .await;

            let event = match result {
                Ok(sdp) => PeerEvent::LocalDescription {
                    generation,
                    description: SessionDescription::answer(sdp),
                },
                Err(e) => PeerEvent::Failed {
                    generation,
                    reason: format!("Could not answer offer: {}", Self::reason(&e)),
                },
            };
            Self::peer_event(&inner, event);
        });
    }

    pub(super) fn apply_answer(
        inner: &Rc<RefCell<EngineInner>>,
        generation: Generation,
        answer: SessionDescription,
    ) {
        let Some(pc) = Self::pc_for(inner, generation) else {
            return;
        };
        let inner = inner.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let promise =
                pc.set_remote_description(&Self::description_init(answer.kind, &answer.sdp));
            let event = match JsFuture::from(promise).await {
                Ok(_) => PeerEvent::RemoteDescriptionApplied { generation },
                Err(e) => PeerEvent::Failed {
                    generation,
                    reason: format!("Could not apply answer: {}", Self::reason(&e)),
                },
            };
            Self::peer_event(&inner, event);
        });
    }

    pub(super) fn add_ice_candidate(
        inner: &Rc<RefCell<EngineInner>>,
        generation: Generation,
        candidate: IceCandidate,
    ) {
        let Some(pc) = Self::pc_for(inner, generation) else {
            return;
        };

        let init = web_sys::RtcIceCandidateInit::new(&candidate.candidate);
        init.set_sdp_mid(candidate.sdp_mid.as_deref());
        init.set_sdp_m_line_index(candidate.sdp_m_line_index);
        init.set_username_fragment(candidate.username_fragment.as_deref());

        let promise = pc.add_ice_candidate_with_opt_rtc_ice_candidate_init(Some(&init));
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                Logger::warn(&format!("Error adding ICE: {}", Self::reason(&e)));
            }
        });
    }

    pub(super) fn close_pc(inner: &Rc<RefCell<EngineInner>>, generation: Generation) {
        let pc = {
            let mut inner = inner.borrow_mut();
            match &inner.pc {
                Some((live, _)) if *live == generation => {
                    inner.remote_stream = None;
                    inner.pc.take()
                }
                _ => None,
            }
        };

        if let Some((_, pc)) = pc {
            pc.set_onicecandidate(None);
            pc.set_ontrack(None);
            pc.set_oniceconnectionstatechange(None);
            pc.set_onconnectionstatechange(None);
            pc.close();
            Logger::info(&format!("Peer connection {} closed", generation));
        }
    }

    pub(super) fn release_local_media(inner: &Rc<RefCell<EngineInner>>) {
        let Some(stream) = inner.borrow_mut().local_stream.take() else {
            return;
        };
        for track in stream.get_tracks().iter() {
            if let Ok(track) = track.dyn_into::<web_sys::MediaStreamTrack>() {
                track.stop();
            }
        }
        Logger::info("Local media released");
    }

    fn pc_for(
        inner: &Rc<RefCell<EngineInner>>,
        generation: Generation,
    ) -> Option<web_sys::RtcPeerConnection> {
        match &inner.borrow().pc {
            Some((live, pc)) if *live == generation => Some(pc.clone()),
            _ => {
                Logger::warn(&format!("No peer connection for generation {}", generation));
                None
            }
        }
    }

    fn description_init(kind: SdpKind, sdp: &str) -> web_sys::RtcSessionDescriptionInit {
        let sdp_type = match kind {
            SdpKind::Offer => web_sys::RtcSdpType::Offer,
            SdpKind::Answer => web_sys::RtcSdpType::Answer,
            SdpKind::Pranswer => web_sys::RtcSdpType::Pranswer,
            SdpKind::Rollback => web_sys::RtcSdpType::Rollback,
        };
        let init = web_sys::RtcSessionDescriptionInit::new(sdp_type);
        init.set_sdp(sdp);
        init
    }

    fn sdp_of(description: &JsValue) -> Result<String, JsValue> {
        js_sys::Reflect::get(description, &"sdp".into())?
            .as_string()
            .ok_or_else(|| JsValue::from_str("session description without sdp"))
    }

    fn reason(e: &JsValue) -> String {
        e.as_string().unwrap_or_else(|| format!("{:?}", e))
    }
}
