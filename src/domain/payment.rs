use crate::error::PaymentError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The payment rails an instruction can be routed over.
///
/// Each rail carries its own eligibility rules, see [`crate::domain::validator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentScheme {
    /// Same-day bulk settlement.
    Bacs,
    /// Instant transfer, must be fully funded at authorization time.
    FasterPayments,
    /// High-value transfer, requires a live account.
    Chaps,
}

impl PaymentScheme {
    pub const ALL: [PaymentScheme; 3] = [Self::Bacs, Self::FasterPayments, Self::Chaps];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bacs => "bacs",
            Self::FasterPayments => "fasterpayments",
            Self::Chaps => "chaps",
        }
    }
}

impl fmt::Display for PaymentScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentScheme {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| PaymentError::ValidationError(format!("Unknown payment scheme: {s}")))
    }
}

/// A single-debit payment instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub creditor_account_id: String,
    pub debtor_account_id: String,
    /// Signed: a negative amount credits the debtor when approved.
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub scheme: PaymentScheme,
}

impl PaymentRequest {
    pub fn new(
        debtor_account_id: impl Into<String>,
        creditor_account_id: impl Into<String>,
        amount: Decimal,
        scheme: PaymentScheme,
    ) -> Self {
        Self {
            creditor_account_id: creditor_account_id.into(),
            debtor_account_id: debtor_account_id.into(),
            amount,
            payment_date: Utc::now(),
            scheme,
        }
    }
}

/// Why a payment was not approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    AccountNotFound,
    SchemeNotPermitted,
    InsufficientFunds,
    AccountNotLive,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccountNotFound => "account_not_found",
            Self::SchemeNotPermitted => "scheme_not_permitted",
            Self::InsufficientFunds => "insufficient_funds",
            Self::AccountNotLive => "account_not_live",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating a payment request.
///
/// `rejection` is set exactly when `approved` is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDecision {
    pub approved: bool,
    pub rejection: Option<RejectionReason>,
}

impl PaymentDecision {
    pub fn approve() -> Self {
        Self {
            approved: true,
            rejection: None,
        }
    }

    pub fn reject(reason: RejectionReason) -> Self {
        Self {
            approved: false,
            rejection: Some(reason),
        }
    }
}
