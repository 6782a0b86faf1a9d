//! Core library for Brazilian bank payment slips (boletos).
//!
//! This crate provides:
//! - Modulo-10 and configurable modulo-11 check digits
//! - Fixed-width field formatting
//! - Per-bank free-field layouts (Caixa SIGCB, Caixa union dues, Santander)
//! - 44-digit barcode assembly and the 47-digit typeable line
//! - A registry mapping bank selectors to variants

pub mod banks;
pub mod barcode;
pub mod checksum;
pub mod encoder;
pub mod error;
pub mod format;
pub mod models;
pub mod registry;

pub use banks::{BankVariant, Caixa, GuiaSindicalCaixa, Santander};
pub use barcode::{Barcode, BarcodeFields, TypeableLine};
pub use encoder::{encode, EncodedSlip};
pub use error::{BoletoError, ConfigurationError, FieldWidthError, PreconditionError, Result};
pub use models::config::{BankSettings, BoletoConfig, OutputConfig, OutputFormat};
pub use models::slip::{PaymentSlip, Party, UnionDues};
pub use registry::VariantRegistry;
