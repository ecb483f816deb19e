//! Cancellation policy engine.
//!
//! A pure decision function: given the job's lifecycle snapshot, who is
//! asking, and the current time, decide whether the cancellation is free,
//! requires a reason, or is illegal outright. The HTTP layer enforces the
//! `RequireReason` outcome (missing reason → `InvalidArgument`); this
//! module never inspects the reason text itself.

use chrono::Duration;

use crate::types::Timestamp;

/// Default free-cancellation window after assignment, in minutes.
pub const DEFAULT_GRACE_PERIOD_MINS: i64 = 5;

/// Who is asking to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCaller {
    /// The job's owner.
    Owner,
    /// The currently assigned walker.
    AssignedWalker,
}

/// Snapshot of the job state relevant to a cancellation request.
#[derive(Debug, Clone, Copy)]
pub struct CancellationContext {
    pub caller: CancelCaller,
    /// Whether the job is currently in the `Assigned` state.
    pub assigned: bool,
    pub on_my_way: bool,
    /// When the current walker was assigned. `None` is treated as an
    /// expired grace period (the invariant says it cannot happen while
    /// the job is assigned, but a conservative answer beats a panic).
    pub assigned_at: Option<Timestamp>,
    pub now: Timestamp,
}

/// Outcome of a cancellation policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationDecision {
    /// Cancellation is free; no reason needed.
    Allow,
    /// Cancellation is permitted only with a non-empty reason.
    RequireReason,
    /// Cancellation is illegal in the current state.
    Deny,
}

/// The cancellation policy, parameterized by the grace period.
#[derive(Debug, Clone, Copy)]
pub struct CancellationPolicy {
    grace_period: Duration,
}

impl CancellationPolicy {
    pub fn new(grace_period: Duration) -> Self {
        Self { grace_period }
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Decide whether a cancellation may proceed.
    ///
    /// Rules, in order:
    /// 1. Only an assigned job can be cancelled.
    /// 2. The assigned walker may always cancel their own assignment.
    /// 3. The owner cancels free within the grace period.
    /// 4. After the grace period, a reason becomes mandatory once the
    ///    walker has marked on-the-way; otherwise cancellation stays free.
    pub fn decide(&self, ctx: &CancellationContext) -> CancellationDecision {
        if !ctx.assigned {
            return CancellationDecision::Deny;
        }

        if ctx.caller == CancelCaller::AssignedWalker {
            return CancellationDecision::Allow;
        }

        let within_grace = ctx
            .assigned_at
            .is_some_and(|at| ctx.now - at <= self.grace_period);

        if within_grace || !ctx.on_my_way {
            CancellationDecision::Allow
        } else {
            CancellationDecision::RequireReason
        }
    }
}

impl Default for CancellationPolicy {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_GRACE_PERIOD_MINS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ctx_at(elapsed_secs: i64, caller: CancelCaller, on_my_way: bool) -> CancellationContext {
        let assigned_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        CancellationContext {
            caller,
            assigned: true,
            on_my_way,
            assigned_at: Some(assigned_at),
            now: assigned_at + Duration::seconds(elapsed_secs),
        }
    }

    #[test]
    fn unassigned_job_is_denied() {
        let policy = CancellationPolicy::default();
        let mut ctx = ctx_at(0, CancelCaller::Owner, false);
        ctx.assigned = false;

        assert_eq!(policy.decide(&ctx), CancellationDecision::Deny);
    }

    #[test]
    fn walker_may_always_cancel() {
        let policy = CancellationPolicy::default();

        // Even long after the grace period, with motion started.
        let ctx = ctx_at(3600, CancelCaller::AssignedWalker, true);
        assert_eq!(policy.decide(&ctx), CancellationDecision::Allow);
    }

    #[test]
    fn owner_free_within_grace_period() {
        let policy = CancellationPolicy::default();

        // 4m59s after assignment, walker already on the way.
        let ctx = ctx_at(299, CancelCaller::Owner, true);
        assert_eq!(policy.decide(&ctx), CancellationDecision::Allow);
    }

    #[test]
    fn owner_needs_reason_after_grace_when_on_the_way() {
        let policy = CancellationPolicy::default();

        // 5m01s after assignment, walker on the way.
        let ctx = ctx_at(301, CancelCaller::Owner, true);
        assert_eq!(policy.decide(&ctx), CancellationDecision::RequireReason);
    }

    #[test]
    fn owner_free_after_grace_when_not_on_the_way() {
        let policy = CancellationPolicy::default();

        // 5m01s after assignment, but no motion started.
        let ctx = ctx_at(301, CancelCaller::Owner, false);
        assert_eq!(policy.decide(&ctx), CancellationDecision::Allow);
    }

    #[test]
    fn exact_grace_boundary_is_still_free() {
        let policy = CancellationPolicy::default();

        let ctx = ctx_at(300, CancelCaller::Owner, true);
        assert_eq!(policy.decide(&ctx), CancellationDecision::Allow);
    }

    #[test]
    fn missing_assignment_timestamp_counts_as_expired() {
        let policy = CancellationPolicy::default();
        let mut ctx = ctx_at(0, CancelCaller::Owner, true);
        ctx.assigned_at = None;

        assert_eq!(policy.decide(&ctx), CancellationDecision::RequireReason);
    }

    #[test]
    fn grace_period_is_configurable() {
        let policy = CancellationPolicy::new(Duration::minutes(15));

        // 10 minutes in: outside the default window, inside this one.
        let ctx = ctx_at(600, CancelCaller::Owner, true);
        assert_eq!(policy.decide(&ctx), CancellationDecision::Allow);
    }
}
