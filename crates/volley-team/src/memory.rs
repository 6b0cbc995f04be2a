use volley_core::Vector3;

use crate::decision::DecisionTrace;

/// Per-vehicle state kept across ticks for the whole match.
#[derive(Debug, Clone)]
pub struct DecisionMemory {
    locked_role_until: f64,
    last_role: Option<usize>,
    last_support_target: Option<Vector3>,
    last_repath_time: f64,
    last_trace: Option<DecisionTrace>,
}

impl Default for DecisionMemory {
    fn default() -> Self {
        Self {
            locked_role_until: 0.0,
            last_role: None,
            last_support_target: None,
            last_repath_time: f64::NEG_INFINITY,
            last_trace: None,
        }
    }
}

impl DecisionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything, as at the start of a match.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_role_locked(&self, now: f64) -> bool {
        now < self.locked_role_until
    }

    pub fn last_role(&self) -> Option<usize> {
        self.last_role
    }

    /// Remember `role` and keep it locked until at least `now + duration`. An
    /// existing longer lock is kept.
    pub fn lock_role(&mut self, role: usize, now: f64, duration: f64) {
        self.last_role = Some(role);
        if duration > 0.0 {
            self.locked_role_until = self.locked_role_until.max(now + duration);
        }
    }

    pub fn locked_role_until(&self) -> f64 {
        self.locked_role_until
    }

    /// Whether the support anchor may be recomputed.
    pub fn can_repath(&self, now: f64, cooldown: f64) -> bool {
        now >= self.last_repath_time + cooldown.max(0.0)
    }

    pub fn last_support_target(&self) -> Option<Vector3> {
        self.last_support_target
    }

    pub fn remember_support_target(&mut self, target: Vector3, now: f64) {
        self.last_support_target = Some(target);
        self.last_repath_time = now;
    }

    pub fn last_trace(&self) -> Option<&DecisionTrace> {
        self.last_trace.as_ref()
    }

    pub(crate) fn set_trace(&mut self, trace: DecisionTrace) {
        self.last_trace = Some(trace);
    }
}
