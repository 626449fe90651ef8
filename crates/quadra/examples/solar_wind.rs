//! Quadratizes a rational system, the radial solar-wind equation
//! `v_r = omega * v_phi / v`.
//!
//! The polynomial pass exhausts immediately, so the search falls back
//! to reciprocal candidates and closes the system with `1/v`.

use quadra::core::catalog;
use quadra::prelude::*;

fn main() {
    match quadratize(&catalog::solar_wind(), &QuadratizeOptions::default()) {
        Ok(SearchOutcome::Found(q)) => {
            println!("rational variables: {:?}", q.rational_vars());
            println!("{q}");
        }
        Ok(SearchOutcome::NotFound { nodes_visited }) => {
            println!("no quadratization within bounds ({nodes_visited} nodes visited)");
        }
        Err(err) => eprintln!("invalid input: {err}"),
    }
}
