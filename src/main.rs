use clap::Parser;
use tchisla::cli::Cli;
use tchisla::{driver, problem, records};

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let parsed = match problem::parse(&cli.problem) {
        Ok(p) => p,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let chain = cli.solver_chain();
    let mut any_solved = false;

    for &n in &parsed.digits {
        for target in &parsed.targets {
            let mut max_depth = cli.max_depth;

            if cli.check_wr || cli.try_wr {
                if let Some(record_depth) = records::best_known_depth(n, &target.to_string()) {
                    log::info!("world record for {target}#{n} is {record_depth} digits");
                    max_depth = Some(match max_depth {
                        Some(d) => d.min(record_depth),
                        None => record_depth,
                    });
                }
            }

            println!("{target} # {n}");
            match driver::solve(n, target, &chain, max_depth, cli.verbose) {
                Some(solution) => {
                    any_solved = true;
                    print!("{}", solution.report);
                }
                None => {
                    println!("No solution found.");
                }
            }
        }
    }

    if !any_solved {
        log::warn!("no target in this problem was solved within the given depth bound");
    }
}
