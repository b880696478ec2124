// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This example solves the traveling salesman problem with pickup and
//! delivery (TSPPD): find the least cost route which starts in `+0`, visits
//! each pickup `+k` before its delivery `-k` and ends in `-0`. The problem
//! is formulated either as a sequence of visits (`sequential`) or as the
//! assignment of a successor to each node (`successor`).
//!
//! Example:
//! ```plain
//! cargo run --release --example tsppd -- --input demos/resources/tsppd/small.json --form sequential --infer ap --verbosity 1
//! cargo run --release --example tsppd -- --input demos/resources/tsppd/small.json --form successor --ordering regret
//! ```

use std::{path::Path, process, sync::Arc};

use clap::{builder::RangedU64ValueParser, Parser, ValueEnum};
use dd_bnb::{Bound, ParallelSolver, Solver, SolverConfig, State, Statistics};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

use output::{Format, Output, Run};
use problem::{read_problem, Error, Problem, Route};
use sequential::Sequential;
use successor::{Order, Successor};

mod apdual;
mod output;
mod problem;
mod sequential;
mod successor;


#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Form {
    /// A layer per visited node
    Sequential,
    /// A layer per assigned successor
    Successor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Infer {
    /// No inference dual
    None,
    /// Assignment problem relaxation
    Ap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Relax {
    /// No relaxation diagram
    None,
    /// Relaxation diagram merging the most costly states
    Dd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    Csv,
    CsvHeader,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The json file holding the instance to solve ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    input: String,
    /// The formulation of the problem
    #[arg(short, long, value_enum)]
    form: Form,
    /// The order in which the successors are assigned (successor form only)
    #[arg(long, value_enum, required_if_eq("form", "successor"))]
    ordering: Option<Order>,
    /// The inference dual used to bound the search nodes
    #[arg(long, value_enum, default_value_t = Infer::None)]
    infer: Infer,
    /// The relaxation dual used to bound the search nodes (sequential form only)
    #[arg(long, value_enum, default_value_t = Relax::None)]
    relax: Relax,
    /// The maximum width of the diagrams (0 = unbounded)
    #[arg(short, long, default_value_t = 0)]
    width: usize,
    /// The number of nodes each worker bounds per round
    #[arg(short, long, default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    batch: usize,
    /// The number of workers bounding nodes in parallel
    #[arg(long, default_value_t = 1, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    workers: usize,
    /// The maximum duration of the search in milliseconds (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    maxmillis: u64,
    /// The maximum number of explored nodes, fails included (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    maxnodes: u64,
    /// Print the improving solutions as csv
    #[arg(short, long, value_enum)]
    output: Option<OutputKind>,
    /// 0 = quiet, 1 = improving solutions, 2 = every expanded state
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    verbosity: u8,
}

impl Args {
    fn format(&self) -> Format {
        match (self.verbosity, self.output) {
            (1, _)                          => Format::Table,
            (_, Some(OutputKind::Csv))       => Format::Csv { header: false },
            (_, Some(OutputKind::CsvHeader)) => Format::Csv { header: true  },
            _                               => Format::Quiet,
        }
    }
    fn run(&self, problem: &Problem) -> Run {
        Run {
            instance  : problem.name.clone(),
            size      : problem.nb_nodes(),
            form      : match self.form { Form::Sequential => "sequential", Form::Successor => "successor" },
            infer     : match self.infer { Infer::None => "none", Infer::Ap => "ap" },
            relax     : match self.relax { Relax::None => "none", Relax::Dd => "dd" },
            ordering  : self.ordering.map_or("none", Order::name),
            width     : self.width,
            batch     : self.batch,
            workers   : self.workers,
            max_millis: self.maxmillis,
            max_nodes : self.maxnodes,
        }
    }
    fn config(&self) -> SolverConfig {
        SolverConfig {
            batch_size: self.batch,
            workers   : self.workers,
            max_millis: self.maxmillis,
            max_nodes : self.maxnodes,
        }
    }
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(error) = run(&args) {
        eprintln!("{error}");
        process::exit(1);
    }
}

/// Solves the instance given in `args` and returns the cost of the best
/// route found (if any).
fn run(args: &Args) -> Result<Option<i64>, Error> {
    let problem = Arc::new(read_problem(Path::new(&args.input))?);
    let infer   = args.infer == Infer::Ap;

    let output = Output::new(args.run(&problem), args.format());
    output.start();

    let best = match args.form {
        Form::Sequential => {
            let relax = args.relax == Relax::Dd;
            let root  = Sequential::root(problem, infer, relax, args.width, args.verbosity);
            solve(root, &output, args.config())
        },
        Form::Successor  => {
            let order = args.ordering.unwrap_or(Order::Input);
            let root  = Successor::root(problem, infer, order, args.width, args.verbosity);
            solve(root, &output, args.config())
        },
    };
    Ok(best)
}

fn solve<S: State + Route>(root: S, output: &Output, config: SolverConfig) -> Option<i64> {
    let progress   = |bound: &Bound<S>, stats: &Statistics| output.write(bound, stats);
    let mut solver = ParallelSolver::custom(root, progress, config);
    solver.minimize().map(|best| best.cost())
}

/// Engine logs go to stderr. They are filtered with `RUST_LOG` (warnings
/// only by default).
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
