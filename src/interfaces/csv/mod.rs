pub mod account_reader;
pub mod decision_writer;
pub mod payment_reader;
