use lenscast_core::{Envelope, Role};

use crate::integration::{create_test_service, init_tracing};
use crate::utils::TestParticipant;

#[tokio::test]
async fn test_sharer_drop_and_return() -> anyhow::Result<()> {
    init_tracing();
    let service = create_test_service();

    let mut sharer = TestParticipant::connect(&service, "sharer").await?;
    sharer.register(Role::Sharer).await?;

    let mut w1 = TestParticipant::connect(&service, "w1").await?;
    let mut w2 = TestParticipant::connect(&service, "w2").await?;
    w1.register(Role::Watcher).await?;
    w2.register(Role::Watcher).await?;

    // Socket drops mid-session.
    sharer.disconnect().await?;
    assert_eq!(w1.drain().await?, vec![Envelope::SharerDisconnected]);
    assert_eq!(w2.drain().await?, vec![Envelope::SharerDisconnected]);

    // The sharer comes back on a fresh socket with a fresh id.
    let mut returning = TestParticipant::connect(&service, "sharer-again").await?;
    returning.register(Role::Sharer).await?;
    assert_eq!(w1.drain().await?, vec![Envelope::SharerConnected]);
    assert_eq!(w2.drain().await?, vec![Envelope::SharerConnected]);

    assert!(service.status().await?.sharer_connected);
    Ok(())
}
