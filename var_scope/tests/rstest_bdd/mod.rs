//! `rstest-bdd` behavioural suite for `var_scope`.
//!
//! [`fixtures`] holds the per-scenario state, [`steps`] the step
//! implementations, and [`scenarios`] binds the `.feature` files under
//! `tests/features` to them.

mod fixtures;
mod scenarios;
mod steps;
