//! Payment totals across a class or school

use super::{NeverPaidPolicy, PaymentState};
use crate::error::PaymentError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Fee totals across a set of students, as shown in the admin payment table footer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub student_count: usize,
    pub total_amount: f64,
    pub paid_count: usize,
    pub pending_count: usize,
    pub overdue_count: usize,
}

impl PaymentSummary {
    /// Totals as of `now`, after rolling over any elapsed cycles
    pub fn from_states<'a, I>(states: I, now: DateTime<Utc>, never_paid: NeverPaidPolicy) -> Result<Self, PaymentError>
    where
        I: IntoIterator<Item = &'a PaymentState>,
    {
        states.into_iter().try_fold(Self::default(), |mut summary, state| {
            let (current, status) = state.assess(now, never_paid)?;
            summary.student_count += 1;
            summary.total_amount += current.payment_amount;
            if current.has_paid {
                summary.paid_count += 1;
            } else {
                summary.pending_count += 1;
            }
            if status.is_overdue {
                summary.overdue_count += 1;
            }
            Ok(summary)
        })
    }
}
