use crate::domain::payment::{PaymentRequest, PaymentScheme};
use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct PaymentRecord {
    debtor: String,
    creditor: String,
    amount: Decimal,
    scheme: String,
    #[serde(default)]
    date: Option<String>,
}

impl TryFrom<PaymentRecord> for PaymentRequest {
    type Error = PaymentError;

    fn try_from(record: PaymentRecord) -> Result<Self> {
        let scheme: PaymentScheme = record.scheme.parse()?;
        let payment_date = match record.date.as_deref().map(str::trim) {
            None | Some("") => Utc::now(),
            Some(date) => DateTime::parse_from_rfc3339(date)
                .map_err(|e| PaymentError::ValidationError(format!("Invalid date {date}: {e}")))?
                .with_timezone(&Utc),
        };

        Ok(PaymentRequest {
            creditor_account_id: record.creditor,
            debtor_account_id: record.debtor,
            amount: record.amount,
            payment_date,
            scheme,
        })
    }
}

/// Reads payment requests from a CSV source with the columns
/// `debtor, creditor, amount, scheme, date`.
///
/// `date` is optional RFC 3339 and defaults to the time the row is read.
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    /// Creates a new `PaymentReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads payment requests.
    ///
    /// A malformed row, such as an unknown scheme, yields an `Err` for that row
    /// only; iteration continues with the next one.
    pub fn payments(self) -> impl Iterator<Item = Result<PaymentRequest>> {
        self.reader
            .into_deserialize::<PaymentRecord>()
            .map(|result| -> Result<PaymentRequest> { result?.try_into() })
    }
}
