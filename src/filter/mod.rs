//! Row filtering for prepared tables
//!
//! Expressions are evaluated into boolean masks, which are then applied to
//! every column of the batch.

pub mod core;
pub mod expr;

pub use self::core::filter_record_batch;
pub use expr::{Expr, LiteralValue, evaluate_expr};
