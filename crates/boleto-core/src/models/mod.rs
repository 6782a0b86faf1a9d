//! Data models: payment slips and configuration.

pub mod config;
pub mod slip;

pub use config::{BankSettings, BoletoConfig, OutputConfig, OutputFormat};
pub use slip::{Address, BankIdentifiers, Currency, PaymentSlip, Party, UnionDues};
