//! # praxis-extract
//!
//! Recovers structured tool calls from raw model output.
//!
//! Model output arrives as prose, fenced JSON, almost-JSON, or function-call
//! syntax. [`ActionExtractor`] tries a fixed sequence of strategies and
//! returns either a [`praxis_contracts::action::ProposedAction`] whose tool name is
//! in the catalog, or the text classified as a conversational reply.
//!
//! The scanners in [`scan`] balance brackets rather than pattern-match, so
//! nested objects are always recovered whole.

pub mod call;
pub mod extractor;
pub mod normalize;
pub mod reasoning;
pub mod repair;
pub mod scan;

pub use extractor::{ActionExtractor, Extraction, Strategy};
