//! Command-line surface (§6), implemented with `clap`'s derive API.

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Solver {
    Integral,
    Rational,
    Quadratic,
}

/// Solve Tchisla-style number puzzles: reach a target using repeated
/// copies of one digit.
#[derive(Debug, Parser)]
#[command(name = "tchisla", about, version)]
pub struct Cli {
    /// Problem string: `target` or `target#digit`, each side accepting a
    /// single number, a range (`3-5`), or a bracketed comma list
    /// (`[3-5,10]`).
    pub problem: String,

    /// Stop searching past this many digits.
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Solvers to run, in order. Defaults to integral, rational, quadratic.
    #[arg(long = "add-solver", value_enum)]
    pub solvers: Vec<Solver>,

    /// Print the fully-expanded top-level expression in addition to the
    /// reverse-topological value listing.
    #[arg(long, short)]
    pub verbose: bool,

    /// Look up the world-record depth before searching and bound
    /// `max_depth` by it.
    #[arg(long)]
    pub check_wr: bool,

    /// Only report a solution if it beats (or ties) the known world
    /// record; implies `--check-wr`.
    #[arg(long)]
    pub try_wr: bool,
}

impl Cli {
    pub fn solver_chain(&self) -> Vec<Solver> {
        if self.solvers.is_empty() {
            vec![Solver::Integral, Solver::Rational, Solver::Quadratic]
        } else {
            self.solvers.clone()
        }
    }
}
