use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::{EngineInner, LensCastEngine};
use crate::logger::Logger;
use crate::machine::{Action, PeerAction};

impl LensCastEngine {
    pub(crate) fn apply_actions(inner: &Rc<RefCell<EngineInner>>, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::OpenSocket => {
                    if let Err(e) = Self::open_socket(inner) {
                        Logger::error(&e);
                        Self::drive(inner, |supervisor| supervisor.on_socket_error());
                    }
                }
                Action::SendFrame(text) => Self::send_frame(inner, &text),
                Action::CloseSocket { code } => Self::close_socket(inner, code),
                Action::StartHeartbeat { every } => Self::start_heartbeat(inner, every),
                Action::StopHeartbeat => Self::stop_heartbeat(inner),
                Action::ScheduleReconnect { after } => Self::schedule_reconnect(inner, after),
                Action::CancelReconnect => Self::cancel_reconnect(inner),
                Action::Peer(peer) => Self::apply_peer_action(inner, peer),
                Action::Emit(event) => Self::dispatch_event(inner, event),
            }
        }
    }

    fn apply_peer_action(inner: &Rc<RefCell<EngineInner>>, action: PeerAction) {
        match action {
            PeerAction::Open {
                generation,
                attach_local_media,
            } => {
                if let Err(e) = Self::create_pc(inner, generation, attach_local_media) {
                    Logger::error(&e);
                    Self::fail_generation(inner, generation, "Could not create peer connection");
                }
            }
            PeerAction::CreateOffer { generation } => Self::create_offer(inner, generation),
            PeerAction::AcceptOffer { generation, offer } => {
                Self::accept_offer(inner, generation, offer)
            }
            PeerAction::ApplyAnswer { generation, answer } => {
                Self::apply_answer(inner, generation, answer)
            }
            PeerAction::AddIceCandidate {
                generation,
                candidate,
            } => Self::add_ice_candidate(inner, generation, candidate),
            PeerAction::Close { generation } => Self::close_pc(inner, generation),
            PeerAction::ReleaseLocalMedia => Self::release_local_media(inner),
            // Lowered by the supervisor before they reach the engine.
            PeerAction::Signal(_) | PeerAction::Report(_) => {}
        }
    }
}
