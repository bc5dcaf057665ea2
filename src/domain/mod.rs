//! Domain layer: accounts, payment requests, the eligibility rules and the
//! ports the application layer depends on.

pub mod account;
pub mod payment;
pub mod ports;
pub mod validator;
