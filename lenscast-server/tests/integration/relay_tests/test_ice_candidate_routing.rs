use lenscast_core::{Envelope, IceTarget, ParticipantId, Role};

use crate::integration::{create_test_service, init_tracing};
use crate::utils::{TestParticipant, test_candidate};

fn relayed(n: u8, from: &str) -> Envelope {
    Envelope::IceCandidate {
        candidate: test_candidate(n),
        target: None,
        to: None,
        from: Some(ParticipantId::from(from)),
    }
}

#[tokio::test]
async fn test_ice_candidate_to_specific_watcher() -> anyhow::Result<()> {
    init_tracing();
    let service = create_test_service();

    let mut sharer = TestParticipant::connect(&service, "sharer").await?;
    sharer.register(Role::Sharer).await?;

    let mut w1 = TestParticipant::connect(&service, "w1").await?;
    let mut w2 = TestParticipant::connect(&service, "w2").await?;
    let mut w3 = TestParticipant::connect(&service, "w3").await?;
    for w in [&mut w1, &mut w2, &mut w3] {
        w.register(Role::Watcher).await?;
    }

    sharer
        .send(&Envelope::IceCandidate {
            candidate: test_candidate(1),
            target: Some(IceTarget::Watcher),
            to: Some(ParticipantId::from("w2")),
            from: None,
        })
        .await?;

    assert_eq!(w2.drain().await?, vec![relayed(1, "sharer")]);
    w1.assert_silent().await?;
    w3.assert_silent().await?;
    sharer.assert_silent().await?;

    Ok(())
}

#[tokio::test]
async fn test_ice_candidate_broadcast_skips_closed_watchers() -> anyhow::Result<()> {
    init_tracing();
    let service = create_test_service();

    let mut sharer = TestParticipant::connect(&service, "sharer").await?;
    sharer.register(Role::Sharer).await?;

    let mut w1 = TestParticipant::connect(&service, "w1").await?;
    let mut w2 = TestParticipant::connect(&service, "w2").await?;
    let mut closed = TestParticipant::connect(&service, "closed").await?;
    for w in [&mut w1, &mut w2, &mut closed] {
        w.register(Role::Watcher).await?;
    }
    closed.close_socket();

    sharer
        .send(&Envelope::IceCandidate {
            candidate: test_candidate(2),
            target: Some(IceTarget::Watcher),
            to: None,
            from: None,
        })
        .await?;

    assert_eq!(w1.drain().await?, vec![relayed(2, "sharer")]);
    assert_eq!(w2.drain().await?, vec![relayed(2, "sharer")]);
    assert!(closed.drain().await?.is_empty());
    sharer.assert_silent().await?;
    assert_eq!(service.status().await?.dropped_relays, 1);

    Ok(())
}

#[tokio::test]
async fn test_ice_candidate_to_sharer() -> anyhow::Result<()> {
    init_tracing();
    let service = create_test_service();

    let mut sharer = TestParticipant::connect(&service, "sharer").await?;
    sharer.register(Role::Sharer).await?;
    let mut watcher = TestParticipant::connect(&service, "watcher").await?;
    let mut other = TestParticipant::connect(&service, "other").await?;
    watcher.register(Role::Watcher).await?;
    other.register(Role::Watcher).await?;

    watcher
        .send(&Envelope::IceCandidate {
            candidate: test_candidate(3),
            target: Some(IceTarget::Sharer),
            to: None,
            from: None,
        })
        .await?;

    assert_eq!(sharer.drain().await?, vec![relayed(3, "watcher")]);
    watcher.assert_silent().await?;
    other.assert_silent().await?;

    Ok(())
}

#[tokio::test]
async fn test_unroutable_ice_candidates_are_dropped() -> anyhow::Result<()> {
    init_tracing();
    let service = create_test_service();

    let mut watcher = TestParticipant::connect(&service, "watcher").await?;
    watcher.register(Role::Watcher).await?;

    // No sharer registered yet.
    watcher
        .send(&Envelope::IceCandidate {
            candidate: test_candidate(4),
            target: Some(IceTarget::Sharer),
            to: None,
            from: None,
        })
        .await?;

    // Addressed to an id nobody holds.
    watcher
        .send(&Envelope::IceCandidate {
            candidate: test_candidate(5),
            target: Some(IceTarget::Watcher),
            to: Some(ParticipantId::from("nobody")),
            from: None,
        })
        .await?;

    // No target at all.
    watcher
        .send(&Envelope::IceCandidate {
            candidate: test_candidate(6),
            target: None,
            to: None,
            from: None,
        })
        .await?;

    watcher.assert_silent().await?;
    assert_eq!(service.status().await?.dropped_relays, 3);

    Ok(())
}
