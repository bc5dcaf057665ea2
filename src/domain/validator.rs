//! Scheme eligibility rules.
//!
//! Validation is a pure function of the request and the debtor account. A
//! failed rule is a rejected [`PaymentDecision`], never an error.

use crate::domain::account::{Account, AccountStatus, Balance};
use crate::domain::payment::{PaymentDecision, PaymentRequest, PaymentScheme, RejectionReason};

/// Decides whether `account` can satisfy `request`.
///
/// Every scheme rejects a missing account and an account without the scheme
/// flag. On top of that, Faster Payments requires `balance >= amount` and
/// CHAPS requires a live account. BACS has no further checks.
pub fn validate(request: &PaymentRequest, account: Option<&Account>) -> PaymentDecision {
    let Some(account) = account else {
        return PaymentDecision::reject(RejectionReason::AccountNotFound);
    };

    if !account.allowed_schemes.permits(request.scheme) {
        return PaymentDecision::reject(RejectionReason::SchemeNotPermitted);
    }

    match request.scheme {
        PaymentScheme::Bacs => PaymentDecision::approve(),
        PaymentScheme::FasterPayments => {
            if account.balance < Balance::from(request.amount) {
                PaymentDecision::reject(RejectionReason::InsufficientFunds)
            } else {
                PaymentDecision::approve()
            }
        }
        PaymentScheme::Chaps => {
            if account.status != AccountStatus::Live {
                PaymentDecision::reject(RejectionReason::AccountNotLive)
            } else {
                PaymentDecision::approve()
            }
        }
    }
}
