use lenscast_core::{Envelope, Role};

use crate::integration::{create_test_service, init_tracing};
use crate::utils::TestParticipant;

#[tokio::test]
async fn test_sharer_disconnect_notifies_open_watchers_once() -> anyhow::Result<()> {
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

    sharer.disconnect().await?;

    assert_eq!(w1.drain().await?, vec![Envelope::SharerDisconnected]);
    assert_eq!(w2.drain().await?, vec![Envelope::SharerDisconnected]);

    let status = service.status().await?;
    assert!(!status.sharer_connected);
    assert_eq!(status.watcher_count, 3);

    Ok(())
}
