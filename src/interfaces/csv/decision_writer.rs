use crate::domain::payment::{PaymentDecision, PaymentRequest, PaymentScheme, RejectionReason};
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct DecisionRecord<'a> {
    debtor: &'a str,
    scheme: PaymentScheme,
    amount: Decimal,
    approved: bool,
    reason: Option<RejectionReason>,
}

/// Writes one CSV row per processed payment:
/// `debtor,scheme,amount,approved,reason`.
pub struct DecisionWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> DecisionWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_decision(
        &mut self,
        request: &PaymentRequest,
        decision: &PaymentDecision,
    ) -> Result<()> {
        self.writer.serialize(DecisionRecord {
            debtor: &request.debtor_account_id,
            scheme: request.scheme,
            amount: request.amount,
            approved: decision.approved,
            reason: decision.rejection,
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
