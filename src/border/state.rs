#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Active,
    Paused,
    Stopped,
}

impl RenderState {
    pub fn is_running(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

pub fn can_transition(from: RenderState, to: RenderState) -> bool {
    matches!(
        (from, to),
        (RenderState::Active, RenderState::Paused)
            | (RenderState::Paused, RenderState::Active)
            | (RenderState::Active, RenderState::Stopped)
            | (RenderState::Paused, RenderState::Stopped)
    ) || from == to
}
