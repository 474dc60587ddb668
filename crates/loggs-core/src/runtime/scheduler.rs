//! Frame-driven callback scheduler
//!
//! Models the three callback shapes views rely on (next-frame, fixed
//! interval and one-shot timeout) against a virtual clock the host advances.
//! Callbacks are identified by [`TaskId`]; the scheduler reports which ids
//! fired and the owning view reacts. Nothing runs after [`FrameScheduler::cancel`].

use std::collections::BTreeMap;

/// Handle to a scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
enum TaskKind {
    /// Fires once on the next advance
    Frame,
    /// Fires every `period` seconds until cancelled
    Interval { period: f64, next_due: f64 },
    /// Fires once at `due`
    Timeout { due: f64 },
}

/// What fired during [`FrameScheduler::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FiredKind {
    Frame,
    Interval,
    Timeout,
}

/// One callback invocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fired {
    pub id: TaskId,
    pub kind: FiredKind,
    /// Frame-clock timestamp of the invocation, in seconds
    pub at: f64,
}

/// Single-threaded scheduler on a virtual clock
#[derive(Debug, Default)]
pub struct FrameScheduler {
    now: f64,
    next_id: u64,
    tasks: BTreeMap<TaskId, TaskKind>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current frame-clock time in seconds
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of callbacks still scheduled
    #[inline]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    fn insert(&mut self, kind: TaskKind) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.insert(id, kind);
        id
    }

    /// Run once on the next [`advance`](Self::advance)
    pub fn request_frame(&mut self) -> TaskId {
        self.insert(TaskKind::Frame)
    }

    /// Run every `period` seconds, first after one period
    pub fn set_interval(&mut self, period: f64) -> TaskId {
        // A non-positive period would fire unboundedly within one advance
        let period = period.max(1e-3);
        self.insert(TaskKind::Interval {
            period,
            next_due: self.now + period,
        })
    }

    /// Run once after `delay` seconds
    pub fn set_timeout(&mut self, delay: f64) -> TaskId {
        self.insert(TaskKind::Timeout {
            due: self.now + delay.max(0.0),
        })
    }

    /// Cancel a callback; returns false if it was not pending
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    /// Move the clock forward by `dt` seconds and collect what fired
    ///
    /// Results are ordered by timestamp. An interval that elapsed several
    /// times fires once per elapsed period. Callbacks requested while the
    /// caller handles the result fire no earlier than the next advance.
    pub fn advance(&mut self, dt: f64) -> Vec<Fired> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.now += dt;
        let now = self.now;

        let mut fired = Vec::new();
        let mut finished = Vec::new();

        for (&id, kind) in self.tasks.iter_mut() {
            match kind {
                TaskKind::Frame => {
                    fired.push(Fired {
                        id,
                        kind: FiredKind::Frame,
                        at: now,
                    });
                    finished.push(id);
                }
                TaskKind::Interval { period, next_due } => {
                    while *next_due <= now {
                        fired.push(Fired {
                            id,
                            kind: FiredKind::Interval,
                            at: *next_due,
                        });
                        *next_due += *period;
                    }
                }
                TaskKind::Timeout { due } => {
                    if *due <= now {
                        fired.push(Fired {
                            id,
                            kind: FiredKind::Timeout,
                            at: *due,
                        });
                        finished.push(id);
                    }
                }
            }
        }

        for id in finished {
            self.tasks.remove(&id);
        }

        fired.sort_by(|a, b| a.at.total_cmp(&b.at).then(a.id.cmp(&b.id)));
        fired
    }
}
