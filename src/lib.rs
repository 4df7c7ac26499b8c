// src/lib.rs

pub mod config;
pub mod core;
pub mod document;
pub mod persistence;

pub use crate::config::ConverterConfig;
pub use crate::core::converter::{convert, IpaConverter};
pub use crate::core::engine::{ConversionReport, LexiconConverter};
pub use crate::core::table::{MappingTable, TableBuilder};
pub use crate::core::types::{Conversion, Diagnostic, MappingEntry};
