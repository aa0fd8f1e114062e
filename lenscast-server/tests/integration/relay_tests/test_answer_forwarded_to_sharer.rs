use lenscast_core::{Envelope, ParticipantId, Role};

use crate::integration::{create_test_service, init_tracing};
use crate::utils::{TestParticipant, test_answer};

#[tokio::test]
async fn test_answer_forwarded_to_sharer() -> anyhow::Result<()> {
    init_tracing();
    let service = create_test_service();

    let mut sharer = TestParticipant::connect(&service, "sharer").await?;
    sharer.register(Role::Sharer).await?;

    let mut watcher = TestParticipant::connect(&service, "watcher").await?;
    let mut bystander = TestParticipant::connect(&service, "bystander").await?;
    watcher.register(Role::Watcher).await?;
    bystander.register(Role::Watcher).await?;

    watcher
        .send(&Envelope::Answer {
            answer: test_answer(),
            from: None,
        })
        .await?;

    assert_eq!(
        sharer.recv().await?,
        Envelope::Answer {
            answer: test_answer(),
            from: Some(ParticipantId::from("watcher")),
        }
    );
    watcher.assert_silent().await?;
    bystander.assert_silent().await?;

    Ok(())
}

#[tokio::test]
async fn test_answer_without_sharer_is_counted() -> anyhow::Result<()> {
    init_tracing();
    let service = create_test_service();

    let mut watcher = TestParticipant::connect(&service, "watcher").await?;
    watcher.register(Role::Watcher).await?;

    watcher
        .send(&Envelope::Answer {
            answer: test_answer(),
            from: None,
        })
        .await?;

    watcher.assert_silent().await?;
    assert_eq!(service.status().await?.dropped_relays, 1);

    Ok(())
}
