//! Domain value types - amounts and token snapshots

mod state;
mod units;

pub use state::TokenState;
pub use units::{format_units, parse_units, TokenAmount, UnitsError};
