use metrics::counter;

/// Why a frame did not reach anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    AnswerWithoutSharer,
    IceWithoutSharer,
    IceUnknownWatcher,
    IceWithoutTarget,
    ClosedRecipient,
    ReplyToClosedSocket,
}

impl DropKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DropKind::AnswerWithoutSharer => "answer_without_sharer",
            DropKind::IceWithoutSharer => "ice_without_sharer",
            DropKind::IceUnknownWatcher => "ice_unknown_watcher",
            DropKind::IceWithoutTarget => "ice_without_target",
            DropKind::ClosedRecipient => "closed_recipient",
            DropKind::ReplyToClosedSocket => "reply_to_closed_socket",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RelayStats {
    pub dropped: u64,
    pub rejected_sharers: u64,
    pub invalid_frames: u64,
}

impl RelayStats {
    pub fn record_drop(&mut self, kind: DropKind) {
        self.dropped += 1;
        counter!("lenscast_relay_dropped_total", 1, "kind" => kind.as_str());
    }

    pub fn record_rejected_sharer(&mut self) {
        self.rejected_sharers += 1;
        counter!("lenscast_sharer_rejected_total", 1);
    }

    pub fn record_invalid_frame(&mut self) {
        self.invalid_frames += 1;
        counter!("lenscast_invalid_frames_total", 1);
    }
}
