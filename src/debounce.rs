// src/debounce.rs

/// Trailing-edge debounce over an externally supplied clock (milliseconds).
///
/// Every `signal` pushes the deadline out to `now + delay`; `fire` reports
/// true exactly once, when called at or after the last deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer {
    delay_ms: f64,
    deadline: Option<f64>,
}

/// What a resize timer should do when it goes off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// The quiet period is over: recompute and render.
    Update,
    /// Went off before the deadline; arm again for this many ms.
    Rearm(u32),
    /// Nothing pending (cancelled or already handled).
    Idle,
}

/// Render pass bookkeeping for the controller. Re-entry is already ruled out
/// by the `RefCell` around the controller state, so this only records where
/// a pass is for observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    #[default]
    Idle,
    Rendering,
}

impl Debouncer {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms: delay_ms as f64,
            deadline: None,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms as u32
    }

    pub fn signal(&mut self, now_ms: f64) {
        self.deadline = Some(now_ms + self.delay_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Consume the pending deadline if it has passed.
    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Decide what an expiring timer does at `now_ms`.
    pub fn on_timer(&mut self, now_ms: f64) -> TimerAction {
        if self.fire(now_ms) {
            return TimerAction::Update;
        }
        match self.remaining_ms(now_ms) {
            Some(remaining) => TimerAction::Rearm(remaining),
            None => TimerAction::Idle,
        }
    }

    /// Milliseconds left until the pending deadline, rounded up.
    pub fn remaining_ms(&self, now_ms: f64) -> Option<u32> {
        self.deadline
            .map(|deadline| (deadline - now_ms).max(0.0).ceil() as u32)
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl RenderState {
    pub fn begin(&mut self) {
        *self = RenderState::Rendering;
    }

    pub fn finish(&mut self) {
        *self = RenderState::Idle;
    }
}
