//! Monthly fee payment tracking: due dates, overdue status and admin updates

mod cycle;
mod summary;
pub mod loader;

pub use cycle::{
    compute_status, compute_status_with, record_payment, NeverPaidPolicy, PaymentConfig, PaymentLabel,
    PaymentState, PaymentStatus, DEFAULT_CYCLE_LENGTH_DAYS, MAX_CYCLE_LENGTH_DAYS,
};
pub use summary::PaymentSummary;
pub use loader::{load_payments, load_payments_from_reader, StudentPayment, DEFAULT_PAYMENTS_PATH};
