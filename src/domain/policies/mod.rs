//! Domain Policies
//!
//! Business rules shared by the compiler and the selector.

mod posting_rule;

pub use posting_rule::PostingRule;
