use crate::integration::init_tracing;
use crate::utils::FakeBrowser;
use lenscast_client::{ClientEvent, LinkStatus, PeerAction, PeerEvent};
use lenscast_core::{
    Envelope, IceCandidate, IceTarget, ParticipantId, Role, SessionDescription,
};
use std::time::Duration;

#[test]
fn test_sharer_registers_on_open_and_starts_heartbeat() {
    init_tracing();
    let mut browser = FakeBrowser::new(Role::Sharer);

    browser.connect();
    assert_eq!(browser.socket_opens, 1);
    assert!(browser.sent.is_empty());

    browser.open_socket();
    assert_eq!(
        browser.sent,
        vec![Envelope::Register { role: Role::Sharer }]
    );
    assert_eq!(browser.heartbeat, Some(Duration::from_secs(15)));
}

#[test]
fn test_sharer_offers_and_applies_first_answer() {
    init_tracing();
    let mut browser = FakeBrowser::new(Role::Sharer);
    browser.connect_and_open();

    browser.registered("s-1", None);
    assert_eq!(
        browser.events[0],
        ClientEvent::Registered {
            id: ParticipantId::from("s-1")
        }
    );
    assert_eq!(browser.statuses(), vec![&LinkStatus::Sharing]);

    let generation = browser.live_generation();
    assert_eq!(
        browser.peer,
        vec![
            PeerAction::Open {
                generation,
                attach_local_media: true,
            },
            PeerAction::CreateOffer { generation },
        ]
    );

    browser.local_description(SessionDescription::offer("v=0 offer"));
    assert_eq!(
        browser.sent,
        vec![Envelope::Offer {
            offer: SessionDescription::offer("v=0 offer"),
        }]
    );

    browser.clear();
    browser.deliver(&Envelope::Answer {
        answer: SessionDescription::answer("v=0 answer"),
        from: Some(ParticipantId::from("w-1")),
    });
    assert_eq!(
        browser.peer,
        vec![PeerAction::ApplyAnswer {
            generation,
            answer: SessionDescription::answer("v=0 answer"),
        }]
    );

    // A late answer from a second watcher is ignored.
    browser.clear();
    browser.deliver(&Envelope::Answer {
        answer: SessionDescription::answer("v=0 late"),
        from: Some(ParticipantId::from("w-2")),
    });
    assert!(browser.peer.is_empty());
    assert!(browser.events.is_empty());
}

#[test]
fn test_sharer_candidates_follow_the_answering_watcher() {
    init_tracing();
    let mut browser = FakeBrowser::new(Role::Sharer);
    browser.connect_and_open();
    browser.registered("s-1", None);
    browser.local_description(SessionDescription::offer("o"));
    let generation = browser.live_generation();

    browser.clear();
    browser.peer_event(PeerEvent::LocalCandidate {
        generation,
        candidate: IceCandidate::new("candidate:early"),
    });
    assert_eq!(
        browser.sent,
        vec![Envelope::IceCandidate {
            candidate: IceCandidate::new("candidate:early"),
            target: Some(IceTarget::Watcher),
            to: None,
            from: None,
        }]
    );

    browser.deliver(&Envelope::Answer {
        answer: SessionDescription::answer("a"),
        from: Some(ParticipantId::from("w-7")),
    });
    browser.clear();
    browser.peer_event(PeerEvent::LocalCandidate {
        generation,
        candidate: IceCandidate::new("candidate:late"),
    });
    assert_eq!(
        browser.sent,
        vec![Envelope::IceCandidate {
            candidate: IceCandidate::new("candidate:late"),
            target: Some(IceTarget::Watcher),
            to: Some(ParticipantId::from("w-7")),
            from: None,
        }]
    );
}

#[test]
fn test_sharer_ignores_watcher_bound_envelopes() {
    init_tracing();
    let mut browser = FakeBrowser::new(Role::Sharer);
    browser.connect_and_open();
    browser.registered("s-1", None);
    browser.clear();

    browser.deliver(&Envelope::SharerConnected);
    browser.deliver(&Envelope::Offer {
        offer: SessionDescription::offer("someone else"),
    });
    assert!(browser.peer.is_empty());
    assert!(browser.sent.is_empty());
}
