//! Application layer containing the payment orchestration.
//!
//! This module defines the `PaymentService`, which picks the account store for
//! each payment, runs the scheme rules and applies the debit only when the
//! payment is approved.

pub mod payment_service;
