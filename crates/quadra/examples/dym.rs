//! Quadratizes the Dym equation `u_t = u^3 * u_xxx`.
//!
//! The answer depends on the derivative budget: with prolongations up
//! to order four a two-variable set exists, while the default budget
//! (the order of the equation itself) has none.

use quadra::prelude::*;

fn main() {
    let mut input = PdeInput::new("t", "x");
    let u = input.unknown("u");
    input.equation(u, u.expr().pow(3) * u.dx(3));

    let options = QuadratizeOptions {
        max_der_order: Some(4),
        ..QuadratizeOptions::default()
    };
    match quadratize(&input, &options) {
        Ok(SearchOutcome::Found(q)) => {
            println!("auxiliary variables: {:?}", q.polynomial_vars());
            println!("nodes visited: {}", q.nodes_visited);
            println!("{q}");
        }
        Ok(SearchOutcome::NotFound { nodes_visited }) => {
            println!("no quadratization within bounds ({nodes_visited} nodes visited)");
        }
        Err(err) => eprintln!("invalid input: {err}"),
    }
}
