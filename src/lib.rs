pub mod api;
pub mod config;
pub mod csv_utils;
mod dto;
mod error;
pub mod import;
pub mod logging;
mod service;
pub mod stores;
pub mod validation;

pub use dto::{NewTransaction, Transaction, TransactionPatch, TransactionType};
pub use error::Error;
pub use import::{import_csv, import_csv_async, ImportSummary};
pub use service::TransactionService;
