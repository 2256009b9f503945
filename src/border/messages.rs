use std::sync::mpsc::{channel, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    UserRequest,
    Hotkey,
    SurfaceLost,
    /// Every request sender was dropped.
    Disconnected,
}

/// Requests posted to the render loop from other threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopRequest {
    TogglePause,
    SetPaused(bool),
    Quit { reason: ExitReason },
}

/// Cloneable, thread-safe way to reach the render loop.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    tx: Sender<LoopRequest>,
}

impl LoopHandle {
    /// Returns `false` when the render loop is gone.
    pub fn post(&self, request: LoopRequest) -> bool {
        self.tx.send(request).is_ok()
    }

    pub fn quit(&self, reason: ExitReason) -> bool {
        self.post(LoopRequest::Quit { reason })
    }
}

pub fn request_channel() -> (LoopHandle, Receiver<LoopRequest>) {
    let (tx, rx) = channel();
    (LoopHandle { tx }, rx)
}
