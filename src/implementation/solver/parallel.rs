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

//! This module provides the implementation of the parallel solver. That is
//! a solver that bounds the search nodes on as many threads as requested.
//! By default, it uses as many threads as the number of hardware threads
//! available on the machine.
//!
//! The search proceeds in rounds. During each round, the coordinating thread
//! pops a batch of nodes for each worker. The workers then bound their nodes
//! in parallel and, once they are all done, the coordinating thread collects
//! their results (in worker order), updates the incumbent and pushes the new
//! search nodes onto the queue. Only the coordinating thread ever touches the
//! queue and the incumbent: no lock is required.
use std::panic;

use tracing::{debug, info, trace};

use crate::{BatchQueue, Bound, Clock, Label, Node, Progress, Solver, SolverConfig, State, Statistics};

pub struct ParallelSolver<S: State, P: Progress<S>> {
    /// The nodes that are still to be explored
    queue: BatchQueue<S>,
    /// The best solution found so far (if any)
    incumbent: Option<S>,
    /// The callback that is notified about each improvement of the incumbent
    progress: P,
    /// The tuning parameters of this solver
    config: SolverConfig,
    /// Measures the time spent since this solver was created
    clock: Clock,
    /// The number of rounds that have been started
    rounds: u64,
    /// The number of explored nodes (failed ones excluded)
    nodes: u64,
    /// The number of failed nodes
    fails: u64,
    /// Has the incumbent been proved optimal ?
    optimal: bool,
}

impl <S: State, P: Progress<S>> ParallelSolver<S, P> {
    /// Creates a solver for the problem rooted in `root` using the default
    /// configuration.
    pub fn new(root: S, progress: P) -> Self {
        Self::custom(root, progress, SolverConfig::default())
    }
    /// Creates a solver for the problem rooted in `root` using the given
    /// configuration.
    pub fn custom(root: S, progress: P, config: SolverConfig) -> Self {
        ParallelSolver {
            queue    : BatchQueue::new(root),
            incumbent: None,
            progress,
            config   : config.normalized(),
            clock    : Clock::start(),
            rounds   : 0,
            nodes    : 0,
            fails    : 0,
            optimal  : false,
        }
    }
    /// Sets the number of nodes bounded by each worker per round (at least 1)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size.max(1);
        self
    }
    /// Sets the number of workers (at least 1)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.workers = workers.max(1);
        self
    }
    /// Sets the maximum wall clock duration of the search (0 = unlimited)
    pub fn with_max_millis(mut self, max_millis: u64) -> Self {
        self.config.max_millis = max_millis;
        self
    }
    /// Sets the maximum number of explored nodes (0 = unlimited)
    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.config.max_nodes = max_nodes;
        self
    }
    /// The configuration of this solver
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Pops the nodes to be bounded during this round: `batch_size` nodes per
    /// worker (or less when the queue runs dry). A popped node which cannot
    /// improve on the incumbent is counted as a fail and is not replaced.
    fn dispatch(&mut self) -> Vec<Vec<S>> {
        let mut batches = Vec::with_capacity(self.config.workers);
        for _ in 0..self.config.workers {
            let size = self.config.batch_size.min(self.queue.len());
            let mut batch = Vec::with_capacity(size);
            for _ in 0..size {
                let Some(node) = self.queue.pop() else { break };
                if self.can_improve(node.state.cost()) {
                    batch.push(node.state);
                } else {
                    self.fails += 1;
                }
            }
            batches.push(batch);
        }
        batches
    }
    /// Bounds all batches in parallel (one thread per batch) and returns the
    /// results in the same order as the batches. All threads are joined
    /// before this method returns.
    ///
    /// # Panics
    /// If any of the workers panicked, the panic is propagated.
    fn bound_all(&self, batches: Vec<Vec<S>>) -> Vec<Vec<Bound<S>>> {
        let snapshot  = self.incumbent.clone();
        let incumbent = snapshot.as_ref();

        let outcome = crossbeam::thread::scope(|s| {
            let workers = batches.into_iter().enumerate()
                .map(|(worker, batch)| s.spawn(move |_| {
                    trace!(worker, size = batch.len(), "bounding batch");
                    batch.into_iter()
                        .map(|state| Bound::compute(state, incumbent))
                        .collect::<Vec<_>>()
                }))
                .collect::<Vec<_>>();

            workers.into_iter()
                .map(|worker| worker.join())
                .collect::<Vec<_>>()
        });

        match outcome {
            Ok(results) => results.into_iter()
                .map(|result| result.unwrap_or_else(|cause| panic::resume_unwind(cause)))
                .collect(),
            Err(cause)  => panic::resume_unwind(cause),
        }
    }
    /// Accounts for one bound: updates the counters, the incumbent, and
    /// appends the children of a relaxed node to the candidates.
    fn collect(&mut self, bound: Bound<S>, candidates: &mut Vec<Node<S>>) {
        if bound.is_failed() {
            self.fails += 1;
            return;
        }
        self.nodes += 1;

        if bound.is_better_than(self.incumbent.as_ref()) {
            self.incumbent = Some(bound.primal.clone());
            info!(cost = bound.primal_bound(), nodes = self.nodes, fails = self.fails, "new incumbent");
            let stats = self.statistics();
            self.progress.report(&bound, &stats);
        }

        if bound.is_relaxed() {
            let dual = bound.dual_bound();
            let best = self.incumbent.as_ref().map(|s| s.cost());
            for state in bound.root.expand(bound.inference_dual.as_ref(), best) {
                let primal = state.cost();
                if self.can_improve(primal) {
                    candidates.push(Node { state, dual, primal });
                }
            }
        }
    }
    /// Emits the proof of optimality of the incumbent
    fn report_optimal(&mut self) {
        let Some(best) = self.incumbent.clone() else { return };
        self.optimal = true;
        info!(cost = best.cost(), nodes = self.nodes, fails = self.fails, "optimal solution");

        let bound = Bound {
            root           : best.clone(),
            inference_dual : None,
            relaxation_dual: Some(best.clone()),
            primal         : best,
            label          : Label::Exact,
        };
        let stats = self.statistics();
        self.progress.report(&bound, &stats);
    }
    /// Returns true iff a state with the given cost could improve on the
    /// incumbent.
    fn can_improve(&self, cost: i64) -> bool {
        self.incumbent.as_ref().map_or(true, |best| cost < best.cost())
    }
    /// Returns true iff the time or node budget is exhausted.
    fn must_stop(&self) -> bool {
        let SolverConfig { max_millis, max_nodes, .. } = self.config;
        (max_millis > 0 && self.clock.elapsed_millis() >= max_millis)
            || (max_nodes > 0 && self.nodes + self.fails >= max_nodes)
    }
}

impl <S: State, P: Progress<S>> Solver<S> for ParallelSolver<S, P> {
    fn minimize(&mut self) -> Option<S> {
        let mut stopped = false;

        while !stopped && !self.queue.is_empty() {
            self.rounds += 1;
            debug!(round = self.rounds, queue = self.queue.len(), nodes = self.nodes, fails = self.fails, "round");

            let batches = self.dispatch();
            let results = self.bound_all(batches);

            let mut candidates = vec![];
            for bounds in results {
                if self.must_stop() {
                    stopped = true;
                    break;
                }
                for bound in bounds {
                    self.collect(bound, &mut candidates);
                }
            }
            self.queue.extend(candidates, self.incumbent.as_ref());
            stopped = stopped || self.must_stop();
        }

        if stopped {
            info!(nodes = self.nodes, fails = self.fails, "search cut off");
        } else {
            self.report_optimal();
        }
        self.incumbent.clone()
    }

    fn incumbent(&self) -> Option<&S> {
        self.incumbent.as_ref()
    }

    fn statistics(&self) -> Statistics {
        Statistics {
            clock_seconds: self.clock.clock_seconds(),
            cpu_seconds  : self.clock.cpu_seconds(),
            optimal      : self.optimal,
            fails        : self.fails,
            nodes        : self.nodes,
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_parallel_solver {
    use std::sync::Arc;

    use crate::{Bound, NoProgress, ParallelSolver, Solver, SolverConfig, State, Statistics, test_utils::{Tour, dead_end, four_nodes, five_nodes}};

    /// (path, cost, nodes, fails, optimal)
    type Report = (Vec<usize>, i64, u64, u64, bool);

    fn config(workers: usize, batch_size: usize, max_nodes: u64) -> SolverConfig {
        SolverConfig { batch_size, workers, max_millis: 0, max_nodes }
    }
    fn solve(root: Tour, config: SolverConfig) -> (Option<Tour>, Statistics, Vec<Report>) {
        let mut reports = vec![];
        let mut solver  = ParallelSolver::custom(root, |bound: &Bound<Tour>, stats: &Statistics| {
            reports.push((bound.primal.path().to_vec(), bound.primal_bound(), stats.nodes, stats.fails, stats.optimal));
        }, config);
        let best  = solver.minimize();
        let stats = solver.statistics();
        drop(solver);
        (best, stats, reports)
    }
    fn four(width: usize) -> Tour {
        Tour::new(Arc::new(four_nodes()), width)
    }
    fn five(width: usize) -> Tour {
        Tour::new(Arc::new(five_nodes()), width)
    }

    #[test]
    fn it_finds_the_optimum_of_four_nodes_without_merging() {
        let (best, stats, reports) = solve(four(0), config(1, 1, 0));
        let best = best.unwrap();
        assert_eq!(&[0, 1, 2, 3], best.path());
        assert_eq!(6, best.cost());
        assert!(stats.optimal);
        assert_eq!(1, stats.nodes);
        assert_eq!(2, stats.fails);
        assert_eq!(vec![
            (vec![0, 1, 2, 3], 6, 1, 0, false),
            (vec![0, 1, 2, 3], 6, 1, 2, true),
        ], reports);
    }
    #[test]
    fn an_exact_relaxation_proves_optimality_at_the_root() {
        let (best, stats, _) = solve(four(0).with_relaxation(), config(1, 1, 0));
        assert_eq!(6, best.unwrap().cost());
        assert!(stats.optimal);
        assert_eq!(1, stats.nodes);
        assert_eq!(0, stats.fails);
    }
    #[test]
    fn the_outcome_on_four_nodes_does_not_depend_on_the_configuration() {
        for width in 0..=2 {
            for workers in 1..=3 {
                for batch in 1..=2 {
                    let (best, stats, _) = solve(four(width), config(workers, batch, 0));
                    assert_eq!(&[0, 1, 2, 3], best.unwrap().path());
                    assert!(stats.optimal);
                    assert_eq!(1, stats.nodes);
                    assert_eq!(2, stats.fails);
                }
            }
        }
    }
    #[test]
    fn the_node_budget_cuts_the_search_off() {
        let (best, stats, reports) = solve(four(0), config(1, 1, 2));
        assert_eq!(6, best.unwrap().cost());
        assert!(!stats.optimal);
        assert_eq!(1, stats.nodes);
        assert_eq!(1, stats.fails);
        assert_eq!(1, reports.len());
    }
    #[test]
    fn a_budget_exhausted_by_the_last_round_forbids_the_optimality_claim() {
        let (best, stats, reports) = solve(four(0), config(1, 1, 3));
        assert_eq!(6, best.unwrap().cost());
        assert!(!stats.optimal);
        assert_eq!(3, stats.nodes + stats.fails);
        assert_eq!(vec![(vec![0, 1, 2, 3], 6, 1, 0, false)], reports);
    }
    #[test]
    fn an_expired_time_budget_stops_after_the_first_round() {
        let mut solver = ParallelSolver::custom(five(1), NoProgress, config(1, 1, 0))
            .with_max_millis(1);
        std::thread::sleep(std::time::Duration::from_millis(5));
        let best = solver.minimize();
        assert!(best.is_none());
        assert_eq!(1, solver.rounds);
        let stats = solver.statistics();
        assert!(!stats.optimal);
        assert_eq!(0, stats.nodes);
        assert_eq!(0, stats.fails);
    }
    #[test]
    fn without_merging_the_root_is_solved_right_away() {
        let (best, stats, reports) = solve(five(0), config(1, 1, 0));
        assert_eq!(&[0, 4, 1, 3, 2], best.unwrap().path());
        assert!(stats.optimal);
        assert_eq!(1, stats.nodes);
        assert_eq!(3, stats.fails);
        assert_eq!(2, reports.len());
    }
    #[test]
    fn a_narrow_restriction_improves_the_incumbent_step_by_step() {
        let (best, stats, reports) = solve(five(1), config(1, 1, 0));
        assert_eq!(&[0, 4, 1, 3, 2], best.unwrap().path());
        assert!(stats.optimal);
        assert_eq!(6, stats.nodes);
        assert_eq!(6, stats.fails);
        assert_eq!(vec![
            (vec![0, 2, 3, 4, 1], 19, 1, 0, false),
            (vec![0, 2, 4, 1, 3], 17, 4, 2, false),
            (vec![0, 4, 1, 3, 2], 16, 6, 4, false),
            (vec![0, 4, 1, 3, 2], 16, 6, 6, true),
        ], reports);
    }
    #[test]
    fn a_wider_restriction_explores_fewer_nodes() {
        let (best, stats, reports) = solve(five(2), config(1, 1, 0));
        assert_eq!(16, best.unwrap().cost());
        assert_eq!(4, stats.nodes);
        assert_eq!(7, stats.fails);
        assert_eq!(vec![
            (vec![0, 2, 3, 4, 1], 19, 1, 0, false),
            (vec![0, 2, 4, 1, 3], 17, 3, 1, false),
            (vec![0, 4, 1, 3, 2], 16, 4, 4, false),
            (vec![0, 4, 1, 3, 2], 16, 4, 7, true),
        ], reports);
    }
    #[test]
    fn relaxation_fathoms_nodes() {
        let (best, stats, _) = solve(five(0).with_relaxation(), config(1, 1, 0));
        assert_eq!(16, best.unwrap().cost());
        assert_eq!(1, stats.nodes);
        assert_eq!(0, stats.fails);

        let (best, stats, _) = solve(five(1).with_relaxation(), config(1, 1, 0));
        assert_eq!(16, best.unwrap().cost());
        assert_eq!(6, stats.nodes);
        assert_eq!(5, stats.fails);
    }
    #[test]
    fn results_are_collected_in_worker_order() {
        let (best, stats, reports) = solve(five(1), config(2, 2, 0));
        assert_eq!(&[0, 4, 1, 3, 2], best.unwrap().path());
        assert!(stats.optimal);
        assert_eq!(5, stats.nodes);
        assert_eq!(7, stats.fails);
        assert_eq!(vec![
            (vec![0, 2, 3, 4, 1], 19, 1, 0, false),
            (vec![0, 4, 1, 3, 2], 16, 4, 3, false),
            (vec![0, 4, 1, 3, 2], 16, 5, 7, true),
        ], reports);
    }
    #[test]
    fn a_cut_off_search_returns_the_best_known_solution() {
        let (best, stats, reports) = solve(five(1), config(1, 1, 3));
        assert_eq!(&[0, 2, 3, 4, 1], best.unwrap().path());
        assert!(!stats.optimal);
        assert_eq!(2, stats.nodes);
        assert_eq!(1, stats.fails);
        assert_eq!(1, reports.len());
    }
    #[test]
    fn an_infeasible_problem_yields_no_solution() {
        let (best, stats, reports) = solve(Tour::new(Arc::new(dead_end()), 0), config(1, 1, 0));
        assert!(best.is_none());
        assert!(!stats.optimal);
        assert_eq!(0, stats.nodes);
        assert_eq!(1, stats.fails);
        assert!(reports.is_empty());

        let (best, stats, _) = solve(Tour::new(Arc::new(dead_end()), 1), config(1, 1, 0));
        assert!(best.is_none());
        assert_eq!(1, stats.nodes);
        assert_eq!(3, stats.fails);
    }
    #[test]
    fn the_incumbent_is_available_after_the_search() {
        let mut solver = ParallelSolver::custom(five(1), NoProgress, config(1, 1, 0));
        assert!(solver.incumbent().is_none());
        solver.minimize();
        assert_eq!(Some(16), solver.incumbent().map(|s| s.cost()));
    }
    #[test]
    fn statistics_start_at_zero() {
        let solver = ParallelSolver::new(five(1), NoProgress);
        let stats  = solver.statistics();
        assert_eq!(0, stats.nodes);
        assert_eq!(0, stats.fails);
        assert!(!stats.optimal);
    }
    #[test]
    fn batch_size_and_workers_are_clamped_to_one() {
        let solver = ParallelSolver::new(five(1), NoProgress)
            .with_batch_size(0)
            .with_workers(0)
            .with_max_millis(10)
            .with_max_nodes(20);
        assert_eq!(1, solver.config().batch_size);
        assert_eq!(1, solver.config().workers);
        assert_eq!(10, solver.config().max_millis);
        assert_eq!(20, solver.config().max_nodes);

        let solver = ParallelSolver::custom(five(1), NoProgress, config(0, 0, 0));
        assert_eq!(1, solver.config().batch_size);
        assert_eq!(1, solver.config().workers);
    }
    #[test]
    fn default_configuration_solves_to_optimality() {
        let mut solver = ParallelSolver::new(five(2), NoProgress);
        let best = solver.minimize();
        assert_eq!(Some(16), best.map(|s| s.cost()));
        assert!(solver.statistics().optimal);
    }
}
