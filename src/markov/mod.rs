//! Discrete-time Markov chain building blocks.
//!
//! A [`MarkovAction`] is one homogeneous chain over a fixed state set:
//! a named, validated row-stochastic matrix that can also be sampled or
//! estimated from observed transitions.

mod action;

pub use action::{check_row_stochastic, MarkovAction, ROW_SUM_TOLERANCE};
pub(crate) use action::sample_row;
