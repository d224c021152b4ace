//! Fee payment cycle arithmetic
//!
//! A student pays once per fixed-length cycle. The next payment falls due one
//! cycle after the last recorded payment; once that moment passes the cycle
//! rolls over and the paid flag resets.

use crate::error::PaymentError;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a payment cycle in days
pub const DEFAULT_CYCLE_LENGTH_DAYS: u32 = 30;

/// Longest cycle accepted: one leap year
pub const MAX_CYCLE_LENGTH_DAYS: u32 = 366;

fn default_cycle_length_days() -> u32 {
    DEFAULT_CYCLE_LENGTH_DAYS
}

/// When a student who has never paid owes their first payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeverPaidPolicy {
    /// Due one full cycle from now
    #[default]
    DueAfterCycle,
    /// Due now, so an unpaid student shows as overdue
    DueImmediately,
}

/// Payment cycle settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfig {
    #[serde(default = "default_cycle_length_days")]
    pub cycle_length_days: u32,
    #[serde(default)]
    pub never_paid: NeverPaidPolicy,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            cycle_length_days: DEFAULT_CYCLE_LENGTH_DAYS,
            never_paid: NeverPaidPolicy::DueAfterCycle,
        }
    }
}

impl PaymentConfig {
    pub fn validate(&self) -> Result<(), PaymentError> {
        check_cycle_length(self.cycle_length_days)
    }

    pub fn cycle_length(&self) -> Duration {
        Duration::days(i64::from(self.cycle_length_days))
    }
}

/// Derived due-date view of a payment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub next_payment_due: DateTime<Utc>,
    /// Whole days until the due date, floored and never negative
    pub days_left: i64,
    pub is_overdue: bool,
}

/// Due date, days left and overdue flag, never-paid students due one cycle from now
pub fn compute_status(
    last_payment_date: Option<DateTime<Utc>>,
    has_paid: bool,
    now: DateTime<Utc>,
    cycle_length_days: u32,
) -> Result<PaymentStatus, PaymentError> {
    let config = PaymentConfig {
        cycle_length_days,
        ..PaymentConfig::default()
    };
    compute_status_with(last_payment_date, has_paid, now, &config)
}

/// Due date, days left and overdue flag under an explicit configuration
pub fn compute_status_with(
    last_payment_date: Option<DateTime<Utc>>,
    has_paid: bool,
    now: DateTime<Utc>,
    config: &PaymentConfig,
) -> Result<PaymentStatus, PaymentError> {
    config.validate()?;

    let next_payment_due = match (last_payment_date, config.never_paid) {
        (Some(last), _) => last.checked_add_signed(config.cycle_length()),
        (None, NeverPaidPolicy::DueAfterCycle) => now.checked_add_signed(config.cycle_length()),
        (None, NeverPaidPolicy::DueImmediately) => Some(now),
    }
    .ok_or(PaymentError::DateOutOfRange)?;

    let days_left = next_payment_due
        .signed_duration_since(now)
        .num_days()
        .max(0);
    let is_overdue = days_left == 0 && !has_paid;

    Ok(PaymentStatus {
        next_payment_due,
        days_left,
        is_overdue,
    })
}

/// Paid/pending label shown next to a student's fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentLabel {
    Paid,
    Pending,
}

impl fmt::Display for PaymentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentLabel::Paid => f.write_str("Paid"),
            PaymentLabel::Pending => f.write_str("Pending"),
        }
    }
}

/// One student's fee payment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentState {
    pub payment_amount: f64,
    pub has_paid: bool,
    #[serde(default)]
    pub last_payment_date: Option<DateTime<Utc>>,
    #[serde(default = "default_cycle_length_days")]
    pub cycle_length_days: u32,
}

impl PaymentState {
    /// Fresh record for a student who has never paid
    pub fn new(payment_amount: f64) -> Result<Self, PaymentError> {
        check_amount(payment_amount)?;
        Ok(Self {
            payment_amount,
            has_paid: false,
            last_payment_date: None,
            cycle_length_days: DEFAULT_CYCLE_LENGTH_DAYS,
        })
    }

    /// Reject records built outside [`PaymentState::new`], e.g. deserialized from a request
    pub fn validate(&self) -> Result<(), PaymentError> {
        check_amount(self.payment_amount)?;
        check_cycle_length(self.cycle_length_days)
    }

    pub fn status(&self, now: DateTime<Utc>) -> Result<PaymentStatus, PaymentError> {
        self.status_with(now, NeverPaidPolicy::default())
    }

    pub fn status_with(&self, now: DateTime<Utc>, never_paid: NeverPaidPolicy) -> Result<PaymentStatus, PaymentError> {
        let config = PaymentConfig {
            cycle_length_days: self.cycle_length_days,
            never_paid,
        };
        compute_status_with(self.last_payment_date, self.has_paid, now, &config)
    }

    pub fn label(&self) -> PaymentLabel {
        if self.has_paid {
            PaymentLabel::Paid
        } else {
            PaymentLabel::Pending
        }
    }

    /// True once a full cycle has passed since the last payment
    pub fn is_cycle_elapsed(&self, now: DateTime<Utc>) -> Result<bool, PaymentError> {
        if self.last_payment_date.is_none() {
            return Ok(false);
        }
        Ok(self.status(now)?.days_left == 0)
    }

    /// Start a new cycle if the current one has elapsed, clearing the paid flag
    pub fn roll_over(&self, now: DateTime<Utc>) -> Result<Self, PaymentError> {
        let mut next = self.clone();
        if self.has_paid && self.is_cycle_elapsed(now)? {
            debug!("payment cycle elapsed at {}, resetting paid flag", now);
            next.has_paid = false;
        }
        Ok(next)
    }

    /// Current view of the record: validated, rolled over, then evaluated
    ///
    /// Every surface that reports a student's payment status goes through here.
    pub fn assess(
        &self,
        now: DateTime<Utc>,
        never_paid: NeverPaidPolicy,
    ) -> Result<(PaymentState, PaymentStatus), PaymentError> {
        self.validate()?;
        let current = self.roll_over(now)?;
        let status = current.status_with(now, never_paid)?;
        if status.is_overdue {
            debug!("payment overdue since {}", status.next_payment_due);
        }
        Ok((current, status))
    }
}

fn check_amount(amount: f64) -> Result<(), PaymentError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(PaymentError::InvalidAmount(amount));
    }
    Ok(())
}

fn check_cycle_length(days: u32) -> Result<(), PaymentError> {
    if days == 0 || days > MAX_CYCLE_LENGTH_DAYS {
        return Err(PaymentError::InvalidCycleLength {
            days,
            max: MAX_CYCLE_LENGTH_DAYS,
        });
    }
    Ok(())
}

/// Apply an admin's payment update
///
/// Marking paid stamps `now` as the last payment date; marking unpaid keeps
/// the previous date so payment history survives a status toggle.
pub fn record_payment(
    state: &PaymentState,
    amount: f64,
    paid: bool,
    now: DateTime<Utc>,
) -> Result<PaymentState, PaymentError> {
    check_amount(amount)?;

    let mut next = state.clone();
    next.payment_amount = amount;
    next.has_paid = paid;
    if paid {
        next.last_payment_date = Some(now);
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_unpaid_full_cycle_is_overdue() {
        let status = compute_status(Some(now() - Duration::days(30)), false, now(), 30).unwrap();
        assert_eq!(status.days_left, 0);
        assert!(status.is_overdue);
        assert_eq!(status.next_payment_due, now());
    }

    #[test]
    fn test_paid_mid_cycle() {
        let status = compute_status(Some(now() - Duration::days(10)), true, now(), 30).unwrap();
        assert_eq!(status.days_left, 20);
        assert!(!status.is_overdue);
    }

    #[test]
    fn test_days_left_floors_partial_days() {
        let last = now() - Duration::days(10) - Duration::hours(6);
        let status = compute_status(Some(last), false, now(), 30).unwrap();
        // 19 days 18 hours left
        assert_eq!(status.days_left, 19);
    }

    #[test]
    fn test_days_left_clamped_when_long_past_due() {
        let status = compute_status(Some(now() - Duration::days(45)), false, now(), 30).unwrap();
        assert_eq!(status.days_left, 0);
        assert!(status.is_overdue);
    }

    #[test]
    fn test_paid_student_never_overdue() {
        let status = compute_status(Some(now() - Duration::days(45)), true, now(), 30).unwrap();
        assert_eq!(status.days_left, 0);
        assert!(!status.is_overdue);
    }

    #[test]
    fn test_never_paid_policies() {
        let after_cycle = compute_status(None, false, now(), 30).unwrap();
        assert_eq!(after_cycle.days_left, 30);
        assert!(!after_cycle.is_overdue);

        let config = PaymentConfig {
            never_paid: NeverPaidPolicy::DueImmediately,
            ..PaymentConfig::default()
        };
        let immediate = compute_status_with(None, false, now(), &config).unwrap();
        assert_eq!(immediate.days_left, 0);
        assert!(immediate.is_overdue);
    }

    #[test]
    fn test_record_payment_stamps_date() {
        let state = PaymentState::new(1500.0).unwrap();
        let paid = record_payment(&state, 1500.0, true, now()).unwrap();

        assert!(paid.has_paid);
        assert_eq!(paid.last_payment_date, Some(now()));
        assert_eq!(paid.status(now()).unwrap().days_left, 30);
        assert_eq!(paid.label(), PaymentLabel::Paid);
    }

    #[test]
    fn test_unpaid_toggle_keeps_history() {
        let earlier = now() - Duration::days(12);
        let state = PaymentState {
            payment_amount: 1200.0,
            has_paid: true,
            last_payment_date: Some(earlier),
            cycle_length_days: 30,
        };

        let toggled = record_payment(&state, 1300.0, false, now()).unwrap();
        assert!(!toggled.has_paid);
        assert_eq!(toggled.payment_amount, 1300.0);
        assert_eq!(toggled.last_payment_date, Some(earlier));
        assert_eq!(toggled.label(), PaymentLabel::Pending);
    }

    #[test]
    fn test_rejects_invalid_amounts() {
        let state = PaymentState::new(0.0).unwrap();
        assert!(matches!(
            record_payment(&state, -5.0, true, now()),
            Err(PaymentError::InvalidAmount(_))
        ));
        assert!(record_payment(&state, f64::NAN, true, now()).is_err());
        assert!(PaymentState::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_roll_over_resets_paid_flag() {
        let state = PaymentState {
            payment_amount: 1000.0,
            has_paid: true,
            last_payment_date: Some(now() - Duration::days(31)),
            cycle_length_days: 30,
        };
        let rolled = state.roll_over(now()).unwrap();
        assert!(!rolled.has_paid);
        assert_eq!(rolled.last_payment_date, state.last_payment_date);
        assert!(rolled.status(now()).unwrap().is_overdue);

        let fresh = record_payment(&state, 1000.0, true, now() - Duration::days(5)).unwrap();
        assert!(fresh.roll_over(now()).unwrap().has_paid);
    }

    #[test]
    fn test_state_json_shape() {
        let json = r#"{"paymentAmount": 1200, "hasPaid": false, "lastPaymentDate": "2024-02-14T10:30:00Z"}"#;
        let state: PaymentState = serde_json::from_str(json).unwrap();
        assert_eq!(state.cycle_length_days, 30);

        let status = serde_json::to_value(state.status(now()).unwrap()).unwrap();
        assert_eq!(status["daysLeft"], 0);
        assert_eq!(status["isOverdue"], true);
    }

    #[test]
    fn test_rejects_cycle_length_out_of_range() {
        let last = Some(now() - Duration::days(3));
        assert!(matches!(
            compute_status(last, true, now(), 0),
            Err(PaymentError::InvalidCycleLength { days: 0, .. })
        ));
        assert!(matches!(
            compute_status(last, true, now(), 4_000_000_000),
            Err(PaymentError::InvalidCycleLength { .. })
        ));
        assert_eq!(
            compute_status(last, true, now(), MAX_CYCLE_LENGTH_DAYS).unwrap().days_left,
            363
        );
    }

    #[test]
    fn test_due_date_overflow_is_an_error() {
        let status = compute_status(Some(DateTime::<Utc>::MAX_UTC), true, now(), 30);
        assert!(matches!(status, Err(PaymentError::DateOutOfRange)));
    }

    #[test]
    fn test_validate_deserialized_state() {
        let json = r#"{"paymentAmount": -500, "hasPaid": false}"#;
        let state: PaymentState = serde_json::from_str(json).unwrap();
        assert!(matches!(state.validate(), Err(PaymentError::InvalidAmount(_))));
        assert!(state.assess(now(), NeverPaidPolicy::default()).is_err());

        let json = r#"{"paymentAmount": 500, "hasPaid": false, "cycleLengthDays": 0}"#;
        let state: PaymentState = serde_json::from_str(json).unwrap();
        assert!(matches!(state.validate(), Err(PaymentError::InvalidCycleLength { .. })));
    }

    #[test]
    fn test_assess_rolls_over_elapsed_cycle() {
        let state = PaymentState {
            payment_amount: 1200.0,
            has_paid: true,
            last_payment_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            cycle_length_days: 30,
        };
        let (current, status) = state.assess(now(), NeverPaidPolicy::default()).unwrap();
        assert_eq!(current.label(), PaymentLabel::Pending);
        assert!(status.is_overdue);
        assert_eq!(status.days_left, 0);

        let recent = record_payment(&state, 1200.0, true, now() - Duration::days(2)).unwrap();
        let (current, status) = recent.assess(now(), NeverPaidPolicy::default()).unwrap();
        assert_eq!(current.label(), PaymentLabel::Paid);
        assert_eq!(status.days_left, 28);
    }
}
