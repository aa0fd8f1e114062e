use lenscast_core::{Envelope, Role};

use crate::integration::{create_test_service, init_tracing};
use crate::utils::TestParticipant;

#[tokio::test]
async fn test_heartbeat_ack_goes_to_sender_only() -> anyhow::Result<()> {
    init_tracing();
    let service = create_test_service();

    let mut sharer = TestParticipant::connect(&service, "sharer").await?;
    sharer.register(Role::Sharer).await?;
    let mut watcher = TestParticipant::connect(&service, "watcher").await?;
    watcher.register(Role::Watcher).await?;

    let before = service.status().await?;
    watcher.send(&Envelope::Heartbeat).await?;

    assert_eq!(watcher.recv().await?, Envelope::HeartbeatAck);
    sharer.assert_silent().await?;
    assert_eq!(service.status().await?, before);

    Ok(())
}

#[tokio::test]
async fn test_heartbeat_before_register_is_answered() -> anyhow::Result<()> {
    init_tracing();
    let service = create_test_service();

    let mut fresh = TestParticipant::connect(&service, "fresh").await?;
    fresh.send(&Envelope::Heartbeat).await?;
    assert_eq!(fresh.recv().await?, Envelope::HeartbeatAck);

    Ok(())
}
