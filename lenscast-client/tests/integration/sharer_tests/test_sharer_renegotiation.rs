use crate::integration::init_tracing;
use crate::utils::FakeBrowser;
use lenscast_client::{PeerAction, PeerEvent, SessionError};
use lenscast_core::{Role, SessionDescription};

#[test]
fn test_renegotiate_replaces_the_peer_connection() {
    init_tracing();
    let mut browser = FakeBrowser::new(Role::Sharer);
    browser.connect_and_open();
    browser.registered("s-1", None);
    let first = browser.live_generation();
    browser.clear();

    let actions = browser.supervisor.renegotiate().expect("registered sharer");
    browser.apply(actions);
    let second = browser.live_generation();
    assert!(second > first);
    assert_eq!(
        browser.peer,
        vec![
            PeerAction::Close { generation: first },
            PeerAction::Open {
                generation: second,
                attach_local_media: true,
            },
            PeerAction::CreateOffer { generation: second },
        ]
    );

    // The first createOffer resolving late must not reach the watchers.
    browser.clear();
    browser.peer_event(PeerEvent::LocalDescription {
        generation: first,
        description: SessionDescription::offer("stale"),
    });
    assert!(browser.sent.is_empty());

    browser.local_description(SessionDescription::offer("fresh"));
    assert_eq!(browser.sent.len(), 1);
}

#[test]
fn test_renegotiate_requires_a_registered_sharer() {
    init_tracing();
    let mut sharer = FakeBrowser::new(Role::Sharer);
    assert_eq!(
        sharer.supervisor.renegotiate(),
        Err(SessionError::NotRegistered)
    );

    sharer.connect_and_open();
    assert_eq!(
        sharer.supervisor.renegotiate(),
        Err(SessionError::NotRegistered)
    );

    let mut watcher = FakeBrowser::new(Role::Watcher);
    watcher.connect_and_open();
    watcher.registered("w-1", Some(true));
    assert!(matches!(
        watcher.supervisor.renegotiate(),
        Err(SessionError::WrongRole {
            expected: Role::Sharer,
            ..
        })
    ));
}
