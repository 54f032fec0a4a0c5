use std::time::Duration;

use choco_solver::prelude::*;
use choco_solver::statistics::configure_statistic_logging;
use clap::Parser;
use clap::ValueEnum;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Strategy {
    Default,
    DomOverWDeg,
    MinDomLb,
    InputOrderLb,
    Random,
}

#[derive(Parser)]
struct Cli {
    /// The size of the chess board.
    n: u32,

    /// The variable selection heuristic of the search.
    #[arg(short, long, value_enum, default_value_t = Strategy::Default)]
    strategy: Strategy,

    /// The seed of the random strategy.
    #[arg(long, default_value_t = 42)]
    seed: i64,

    /// The time limit of the search in seconds.
    ///
    /// If no limit is given, the search runs until it has an answer.
    #[arg(short, long)]
    time_limit: Option<u64>,

    /// Print the counters of the search after it has finished.
    #[arg(long)]
    statistics: bool,
}

#[cfg(feature = "native")]
fn runtime() -> Runtime {
    Runtime::native()
}

#[cfg(not(feature = "native"))]
fn runtime() -> Runtime {
    Runtime::reference()
}

fn main() {
    env_logger::init();

    let Cli {
        n,
        strategy,
        seed,
        time_limit,
        statistics,
    } = Cli::parse();

    if n < 2 {
        println!("Please provide an 'n > 1'");
        return;
    }

    if statistics {
        configure_statistic_logging("%%%mzn-stat:", Some("%%%mzn-stat-end"), None, None);
    }

    let runtime = runtime();
    match solve(&runtime, n, strategy, seed, time_limit, statistics) {
        Ok(Some(rows)) => print_board(n, &rows),
        Ok(None) => println!("No placement of {n} queens was found."),
        Err(error) => eprintln!("Solving {n}-queens failed: {error}"),
    }
    runtime.cleanup();
}

fn solve(
    runtime: &Runtime,
    n: u32,
    strategy: Strategy,
    seed: i64,
    time_limit: Option<u64>,
    statistics: bool,
) -> ChocoResult<Option<Vec<i32>>> {
    let size = n as i32;
    let model = runtime.create_model(Some(&format!("{n}-queens")))?;

    let queens = (0..n)
        .map(|i| model.named_intvar(&format!("q{i}"), 0, size - 1))
        .collect::<ChocoResult<Vec<_>>>()?;

    model.all_different(&queens)?.post()?;
    for i in 0..queens.len() {
        for j in i + 1..queens.len() {
            let offset = (j - i) as i32;
            model
                .distance(&queens[i], &queens[j], Operator::Ne, offset)?
                .post()?;
        }
    }

    let mut solver = model.solver()?;
    let strategy = match strategy {
        Strategy::Default => None,
        Strategy::DomOverWDeg => Some(SearchStrategy::DomOverWDeg),
        Strategy::MinDomLb => Some(SearchStrategy::MinDomLb),
        Strategy::InputOrderLb => Some(SearchStrategy::InputOrderLb),
        Strategy::Random => Some(SearchStrategy::Random { seed }),
    };
    if let Some(strategy) = strategy {
        solver.set_search(strategy, &queens)?;
    }

    let limits = time_limit.map_or_else(SearchLimits::default, |seconds| {
        SearchLimits::default().with_time_limit(Duration::from_secs(seconds))
    });
    if statistics {
        solver.show_statistics()?;
    }
    let solution = solver.find_solution(&limits)?;

    solution
        .map(|solution| {
            queens
                .iter()
                .map(|queen| solution.int_value(queen))
                .collect::<ChocoResult<Vec<_>>>()
        })
        .transpose()
}

fn print_board(n: u32, rows: &[i32]) {
    let row_separator = format!("{}+", "+---".repeat(n as usize));

    for &queen_col in rows {
        println!("{row_separator}");

        for col in 0..n as i32 {
            let string = if queen_col == col { "| * " } else { "|   " };

            print!("{string}");
        }

        println!("|");
    }

    println!("{row_separator}");
}
