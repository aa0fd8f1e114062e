use lenscast_core::Role;

use crate::integration::{create_test_service, init_tracing};
use crate::utils::TestParticipant;

#[tokio::test]
async fn test_watcher_sees_sharer_availability() -> anyhow::Result<()> {
    init_tracing();
    let service = create_test_service();

    let mut early = TestParticipant::connect(&service, "early-watcher").await?;
    assert_eq!(early.register(Role::Watcher).await?, Some(false));

    let mut sharer = TestParticipant::connect(&service, "sharer").await?;
    assert_eq!(sharer.register(Role::Sharer).await?, None);

    let mut late = TestParticipant::connect(&service, "late-watcher").await?;
    assert_eq!(late.register(Role::Watcher).await?, Some(true));

    Ok(())
}

#[tokio::test]
async fn test_closed_sharer_socket_is_not_available() -> anyhow::Result<()> {
    init_tracing();
    let service = create_test_service();

    let mut sharer = TestParticipant::connect(&service, "sharer").await?;
    sharer.register(Role::Sharer).await?;
    sharer.close_socket();

    let mut watcher = TestParticipant::connect(&service, "watcher").await?;
    assert_eq!(watcher.register(Role::Watcher).await?, Some(false));

    let status = service.status().await?;
    assert!(!status.sharer_connected);
    assert_eq!(status.watcher_count, 1);

    Ok(())
}
