//! Load student payment records from CSV
//!
//! Columns: `student_id,payment_amount,has_paid,last_payment_date`, the date
//! in RFC 3339 or blank for students who have never paid.

use super::{PaymentState, DEFAULT_CYCLE_LENGTH_DAYS};
use crate::error::LoadError;
use chrono::{DateTime, Utc};
use csv::Reader;
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Default location of the sample payments table
pub const DEFAULT_PAYMENTS_PATH: &str = "data/payments.csv";

#[derive(Debug, Deserialize)]
struct PaymentRow {
    student_id: String,
    payment_amount: f64,
    has_paid: bool,
    last_payment_date: Option<String>,
}

/// A payment record tagged with its student
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayment {
    pub student_id: String,
    #[serde(flatten)]
    pub state: PaymentState,
}

pub fn load_payments_from_reader<R: Read>(reader: R) -> Result<Vec<StudentPayment>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut payments = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let line = index + 1;
        let row: PaymentRow = result?;

        let last_payment_date = match row.last_payment_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| LoadError::Row {
                        row: line,
                        message: format!("invalid last_payment_date '{}': {}", raw, e),
                    })?
                    .with_timezone(&Utc),
            ),
        };

        let mut state = PaymentState::new(row.payment_amount)?;
        state.has_paid = row.has_paid;
        state.last_payment_date = last_payment_date;
        state.cycle_length_days = DEFAULT_CYCLE_LENGTH_DAYS;

        payments.push(StudentPayment {
            student_id: row.student_id,
            state,
        });
    }

    debug!("loaded {} payment records", payments.len());
    Ok(payments)
}

pub fn load_payments<P: AsRef<Path>>(path: P) -> Result<Vec<StudentPayment>, LoadError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    load_payments_from_reader(file)
}
