//! Star-schema transformation for loanstar.
//!
//! - **filter**: two-stage missing-value column filter and complete-row filter
//! - **rules**: named per-column conversions (`issue_d`, `int_rate`)
//! - **dimension**: distinct-value dimensions with dense surrogate keys
//! - **fact**: fact assembly through dimension key maps
//! - **pipeline**: the stages above chained into [`build_star_schema`]

pub mod dimension;
pub mod error;
pub mod fact;
pub mod filter;
pub mod pipeline;
pub mod rules;

pub use dimension::{DimensionSet, MONTH_COLUMN, YEAR_COLUMN, build_dimension, build_dimensions};
pub use error::{Result, TransformError};
pub use fact::{assemble_fact, verify_referential_integrity};
pub use filter::{DroppedColumn, FilterOutcome, filter_missing};
pub use pipeline::{StarRun, build_star_schema};
pub use rules::{RuleKind, TransformRule, apply_rules, default_rules};
