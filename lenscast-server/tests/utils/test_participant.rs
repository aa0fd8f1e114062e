use anyhow::{Context, Result, bail};
use axum::extract::ws::Message;
use lenscast_core::{Envelope, ParticipantId, Role};
use lenscast_server::{SignalingService, SocketHandle};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use super::signal_helpers::{RECV_TIMEOUT_MS, settle};

/// A participant whose "socket" is a channel the test reads from.
pub struct TestParticipant {
    pub id: ParticipantId,
    service: SignalingService,
    rx: Option<mpsc::Receiver<Message>>,
}

impl TestParticipant {
    pub async fn connect(service: &SignalingService, label: &str) -> Result<Self> {
        let id = ParticipantId::from(label);
        let (socket, rx) = SocketHandle::channel();
        service
            .connect(id.clone(), socket)
            .await
            .context("attach socket")?;

        Ok(Self {
            id,
            service: service.clone(),
            rx: Some(rx),
        })
    }

    pub async fn send(&self, envelope: &Envelope) -> Result<()> {
        self.send_raw(envelope.encode()?).await
    }

    pub async fn send_raw(&self, text: impl Into<String>) -> Result<()> {
        self.service
            .frame(self.id.clone(), text.into())
            .await
            .context("submit frame")
    }

    /// Sends `register` and returns `sharerAvailable` from the ack.
    pub async fn register(&mut self, role: Role) -> Result<Option<bool>> {
        self.send(&Envelope::Register { role }).await?;
        match self.recv().await? {
            Envelope::Registered {
                id,
                sharer_available,
            } => {
                assert_eq!(id, self.id, "ack must carry the socket's id");
                Ok(sharer_available)
            }
            other => bail!("expected registered, got {}", other.kind()),
        }
    }

    pub async fn recv(&mut self) -> Result<Envelope> {
        let rx = self.rx.as_mut().context("socket already closed")?;
        let msg = tokio::time::timeout(Duration::from_millis(RECV_TIMEOUT_MS), rx.recv())
            .await
            .context("timed out waiting for envelope")?
            .context("socket channel closed")?;
        decode(msg)
    }

    /// Everything already delivered, without waiting.
    pub async fn drain(&mut self) -> Result<Vec<Envelope>> {
        settle(&self.service).await?;
        let Some(rx) = self.rx.as_mut() else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(msg) => out.push(decode(msg)?),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        Ok(out)
    }

    pub async fn assert_silent(&mut self) -> Result<()> {
        let pending = self.drain().await?;
        let kinds: Vec<_> = pending.iter().map(Envelope::kind).collect();
        assert!(pending.is_empty(), "{} got unexpected {:?}", self.id, kinds);
        Ok(())
    }

    /// Socket goes to the closed state; the coordinator is not told yet.
    pub fn close_socket(&mut self) {
        self.rx = None;
    }

    /// Socket closes and the coordinator processes the disconnect.
    pub async fn disconnect(mut self) -> Result<()> {
        self.close_socket();
        self.service
            .disconnect(self.id.clone())
            .await
            .context("submit disconnect")?;
        settle(&self.service).await?;
        Ok(())
    }
}

fn decode(msg: Message) -> Result<Envelope> {
    match msg {
        Message::Text(text) => Ok(Envelope::decode(text.as_str())?),
        other => bail!("unexpected frame {:?}", other),
    }
}
