use crate::domain::account::{Account, Balance};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct AccountRecord {
    id: String,
    #[serde(default)]
    schemes: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    balance: Option<Decimal>,
}

impl TryFrom<AccountRecord> for Account {
    type Error = PaymentError;

    fn try_from(record: AccountRecord) -> Result<Self> {
        Ok(Account {
            id: record.id,
            allowed_schemes: record.schemes.parse()?,
            status: record.status.parse()?,
            balance: Balance::new(record.balance.unwrap_or(Decimal::ZERO)),
        })
    }
}

/// Reads seed accounts from a CSV source with the columns
/// `id, schemes, status, balance`.
///
/// `schemes` is a `|`-separated list (`bacs|chaps`); empty means no scheme.
/// `status` defaults to `live`, `balance` to zero.
pub struct AccountReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> AccountReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn accounts(self) -> impl Iterator<Item = Result<Account>> {
        self.reader
            .into_deserialize::<AccountRecord>()
            .map(|result| -> Result<Account> { result?.try_into() })
    }
}
