use std::time::Duration;

use coinsafe_core::domain::totp_code::TOTP_CODE_LEN;

/// Settle delay after the final keystroke before an auto-verify dispatch.
pub const TYPED_SETTLE: Duration = Duration::from_millis(500);
/// Settle delay after a paste, slightly longer so the input finishes updating.
pub const PASTE_SETTLE: Duration = Duration::from_millis(600);

/// How the latest code change reached the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Typed,
    Pasted,
}

/// Session context the trigger needs but does not own.
#[derive(Debug, Clone, Copy)]
pub struct TriggerContext {
    pub is_verifying: bool,
    pub backup_mode: bool,
    pub has_succeeded: bool,
    pub source: InputSource,
}

/// Outcome of evaluating the trigger against the current code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerDecision {
    /// No dispatch; the user is still editing or a guard suppressed firing.
    Idle,
    /// Schedule a dispatch after `delay`. `seq` identifies this arming so a
    /// stale debounce task can recognize it has been superseded.
    Arm { delay: Duration, seq: u64 },
}

/// Decides, on every normalized-code change, whether to fire a verification
/// attempt automatically once six digits are present.
///
/// The failed-code latch is keyed to the exact rejected value: without it, a
/// rejected code would be re-submitted every time the trigger is re-evaluated
/// with the same (still wrong) six digits. Editing any digit passes through a
/// length below six, which clears the latch and re-enables auto-verify.
#[derive(Debug)]
pub struct AutoVerifyTrigger {
    has_auto_verified: bool,
    has_error_occurred: bool,
    last_failed_code: Option<String>,
    arm_seq: u64,
    typed_settle: Duration,
    paste_settle: Duration,
}

impl Default for AutoVerifyTrigger {
    fn default() -> Self {
        Self::new(TYPED_SETTLE, PASTE_SETTLE)
    }
}

impl AutoVerifyTrigger {
    pub fn new(typed_settle: Duration, paste_settle: Duration) -> Self {
        Self {
            has_auto_verified: false,
            has_error_occurred: false,
            last_failed_code: None,
            arm_seq: 0,
            typed_settle,
            paste_settle,
        }
    }

    /// Evaluate the trigger for `code` (already normalized). Arms at most
    /// once per code cycle; the caller must re-validate every guard when the
    /// settle delay expires, since state may have changed during the wait.
    pub fn evaluate(&mut self, code: &str, ctx: TriggerContext) -> TriggerDecision {
        if code.len() < TOTP_CODE_LEN {
            // User is still editing. Clearing the latches here is what lets
            // a corrected code auto-verify again after a rejection.
            self.has_auto_verified = false;
            self.has_error_occurred = false;
            self.last_failed_code = None;
            return TriggerDecision::Idle;
        }

        if !code.chars().all(|c| c.is_ascii_digit()) {
            return TriggerDecision::Idle;
        }

        let same_failed_code =
            self.has_error_occurred && self.last_failed_code.as_deref() == Some(code);

        if ctx.is_verifying
            || ctx.backup_mode
            || ctx.has_succeeded
            || self.has_auto_verified
            || same_failed_code
            || self.has_error_occurred
        {
            return TriggerDecision::Idle;
        }

        // Set the guard before any delay so re-entrant evaluations of the
        // same value cannot arm a second dispatch.
        self.has_auto_verified = true;
        self.arm_seq += 1;
        let delay = match ctx.source {
            InputSource::Typed => self.typed_settle,
            InputSource::Pasted => self.paste_settle,
        };
        TriggerDecision::Arm {
            delay,
            seq: self.arm_seq,
        }
    }

    /// True while the arming identified by `seq` is still current.
    pub fn is_armed(&self, seq: u64) -> bool {
        self.has_auto_verified && self.arm_seq == seq
    }

    /// Latch a failed attempt. `code` is the exact value the backend rejected
    /// (None for failures not tied to a value, e.g. connectivity). Clears the
    /// armed guard so the user's next edit can retry.
    pub fn record_failure(&mut self, code: Option<&str>) {
        self.has_error_occurred = true;
        self.last_failed_code = code.map(str::to_owned);
        self.has_auto_verified = false;
    }

    /// Drop the armed guard without latching an error (timeout path).
    pub fn disarm(&mut self) {
        self.has_auto_verified = false;
    }

    /// Reset every latch (mode switch, session reset, success).
    pub fn clear(&mut self) {
        self.has_auto_verified = false;
        self.has_error_occurred = false;
        self.last_failed_code = None;
    }

    pub fn has_error_occurred(&self) -> bool {
        self.has_error_occurred
    }

    pub fn last_failed_code(&self) -> Option<&str> {
        self.last_failed_code.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(source: InputSource) -> TriggerContext {
        TriggerContext {
            is_verifying: false,
            backup_mode: false,
            has_succeeded: false,
            source,
        }
    }

    #[test]
    fn short_code_is_idle_and_clears_latches() {
        let mut trigger = AutoVerifyTrigger::default();
        trigger.record_failure(Some("123456"));

        assert_eq!(trigger.evaluate("12345", ctx(InputSource::Typed)), TriggerDecision::Idle);
        assert!(!trigger.has_error_occurred());
        assert_eq!(trigger.last_failed_code(), None);
    }

    #[test]
    fn arms_exactly_once_per_code_cycle() {
        let mut trigger = AutoVerifyTrigger::default();

        let first = trigger.evaluate("123456", ctx(InputSource::Typed));
        assert!(matches!(first, TriggerDecision::Arm { delay, .. } if delay == TYPED_SETTLE));

        // Re-evaluating the same value (e.g. a re-render) must not arm again.
        assert_eq!(trigger.evaluate("123456", ctx(InputSource::Typed)), TriggerDecision::Idle);
    }

    #[test]
    fn paste_uses_longer_settle_delay() {
        let mut trigger = AutoVerifyTrigger::default();
        let decision = trigger.evaluate("123456", ctx(InputSource::Pasted));
        assert!(matches!(decision, TriggerDecision::Arm { delay, .. } if delay == PASTE_SETTLE));
    }

    #[test]
    fn suppressed_while_verifying_backup_mode_or_after_success() {
        let mut trigger = AutoVerifyTrigger::default();

        let mut verifying = ctx(InputSource::Typed);
        verifying.is_verifying = true;
        assert_eq!(trigger.evaluate("123456", verifying), TriggerDecision::Idle);

        let mut backup = ctx(InputSource::Typed);
        backup.backup_mode = true;
        assert_eq!(trigger.evaluate("123456", backup), TriggerDecision::Idle);

        let mut succeeded = ctx(InputSource::Typed);
        succeeded.has_succeeded = true;
        assert_eq!(trigger.evaluate("123456", succeeded), TriggerDecision::Idle);
    }

    #[test]
    fn rejected_code_does_not_rearm_until_edited() {
        let mut trigger = AutoVerifyTrigger::default();
        assert!(matches!(
            trigger.evaluate("123456", ctx(InputSource::Typed)),
            TriggerDecision::Arm { .. }
        ));
        trigger.record_failure(Some("123456"));

        // Same rejected value: suppressed.
        assert_eq!(trigger.evaluate("123456", ctx(InputSource::Typed)), TriggerDecision::Idle);

        // Editing a digit passes through length five, clearing the latch.
        assert_eq!(trigger.evaluate("12345", ctx(InputSource::Typed)), TriggerDecision::Idle);
        assert!(matches!(
            trigger.evaluate("123457", ctx(InputSource::Typed)),
            TriggerDecision::Arm { .. }
        ));
    }

    #[test]
    fn new_arming_supersedes_the_previous_sequence() {
        let mut trigger = AutoVerifyTrigger::default();
        let TriggerDecision::Arm { seq: first, .. } =
            trigger.evaluate("123456", ctx(InputSource::Typed))
        else {
            panic!("expected arm");
        };

        // Deleting a digit disarms; retyping the same code arms a new cycle.
        trigger.evaluate("12345", ctx(InputSource::Typed));
        let TriggerDecision::Arm { seq: second, .. } =
            trigger.evaluate("123456", ctx(InputSource::Typed))
        else {
            panic!("expected arm");
        };

        assert!(!trigger.is_armed(first));
        assert!(trigger.is_armed(second));
    }

    #[test]
    fn failure_clears_armed_guard_for_retry() {
        let mut trigger = AutoVerifyTrigger::default();
        let TriggerDecision::Arm { seq, .. } = trigger.evaluate("123456", ctx(InputSource::Typed))
        else {
            panic!("expected arm");
        };
        trigger.record_failure(Some("123456"));
        assert!(!trigger.is_armed(seq));
    }
}
