use crate::machine::SessionState;
use lenscast_core::Role;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("{operation} is only valid for a {expected}")]
    WrongRole {
        operation: &'static str,
        expected: Role,
    },

    #[error("ICE candidate arrived before any peer connection exists")]
    NoPeerConnection,

    #[error("answer arrived while the session is {0:?}")]
    UnexpectedAnswer(SessionState),

    #[error("an answer was already applied to this peer connection")]
    AnswerAlreadyApplied,

    #[error("local media has already been released")]
    MediaReleased,

    #[error("not registered with the coordinator")]
    NotRegistered,
}
