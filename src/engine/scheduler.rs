//! Frame and timer scheduling seam
//!
//! The engine asks its [`Scheduler`] for callbacks and keeps the returned
//! [`TaskHandle`]s. It is told when a task fires through
//! `FireworksEngine::on_frame` / `on_timer`.

/// Token for a pending frame or timer callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub i32);

/// Which one-shot timer fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Next rocket launch
    Spawn,
    /// End of the resize quiet period
    Resize,
}

/// Source of display-refresh and timeout callbacks
pub trait Scheduler {
    /// Ask for one callback on the next display refresh
    fn request_frame(&mut self) -> Option<TaskHandle>;

    fn cancel_frame(&mut self, handle: TaskHandle);

    /// Ask for one `kind` callback after `delay_ms`
    fn set_timer(&mut self, kind: TimerKind, delay_ms: u32) -> Option<TaskHandle>;

    fn clear_timer(&mut self, handle: TaskHandle);
}

/// Scheduler that only records requests; the host fires them by hand
///
/// Used for headless runs and tests: nothing happens until the owner pops a
/// pending task and hands it to the engine.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: i32,
    frame: Option<TaskHandle>,
    timers: Vec<PendingTimer>,
    frames_requested: usize,
}

/// A timer waiting to be fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub handle: TaskHandle,
    pub kind: TimerKind,
    pub delay_ms: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> TaskHandle {
        self.next_id += 1;
        TaskHandle(self.next_id)
    }

    pub fn frame_pending(&self) -> bool {
        self.frame.is_some()
    }

    /// Total frames ever requested
    pub fn frames_requested(&self) -> usize {
        self.frames_requested
    }

    pub fn pending_timers(&self) -> &[PendingTimer] {
        &self.timers
    }

    pub fn pending_timer(&self, kind: TimerKind) -> Option<PendingTimer> {
        self.timers.iter().copied().find(|t| t.kind == kind)
    }

    /// Remove the pending frame, returning its handle
    pub fn take_frame(&mut self) -> Option<TaskHandle> {
        self.frame.take()
    }

    /// Remove the oldest pending timer of `kind`
    pub fn take_timer(&mut self, kind: TimerKind) -> Option<PendingTimer> {
        let index = self.timers.iter().position(|t| t.kind == kind)?;
        Some(self.timers.remove(index))
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<TaskHandle> {
        let handle = self.allocate();
        self.frame = Some(handle);
        self.frames_requested += 1;
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: TaskHandle) {
        if self.frame == Some(handle) {
            self.frame = None;
        }
    }

    fn set_timer(&mut self, kind: TimerKind, delay_ms: u32) -> Option<TaskHandle> {
        let handle = self.allocate();
        self.timers.push(PendingTimer { handle, kind, delay_ms });
        Some(handle)
    }

    fn clear_timer(&mut self, handle: TaskHandle) {
        self.timers.retain(|t| t.handle != handle);
    }
}
