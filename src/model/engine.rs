//! The only module in this crate that names `good_lp` types directly. Everything downstream
//! (`vars`, `objective`, `constraints`) works through `Var`/`Expr` and these free helpers, which is
//! what keeps the LP/ILP backend swappable per spec §9 "Solver abstraction".

use good_lp::{
    constraint, default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};

pub type Var = Variable;
pub type Expr = Expression;

pub fn new_problem() -> ProblemVariables {
    ProblemVariables::new()
}

pub fn new_bool_var(problem: &mut ProblemVariables) -> Var {
    problem.add(variable().binary())
}

pub fn at_most<M: SolverModel>(model: &mut M, lhs: Expr, rhs: f64) {
    model.add_constraint(constraint!(lhs <= rhs));
}

pub fn at_least<M: SolverModel>(model: &mut M, lhs: Expr, rhs: f64) {
    model.add_constraint(constraint!(lhs >= rhs));
}

pub fn exactly<M: SolverModel>(model: &mut M, lhs: Expr, rhs: f64) {
    model.add_constraint(constraint!(lhs == rhs));
}

/// Turns accumulated problem variables plus an objective expression into a constrainable model,
/// pinning a single deterministic worker and fixed seed per spec §4.6/§5 — reproducible given
/// identical inputs (property P9). `timeout_secs` bounds HiGHS's wall-clock search budget so an
/// adaptive run never hangs on one profile (spec §4.6).
pub fn finalize(problem: ProblemVariables, objective: Expr, seed: u64, timeout_secs: u64) -> impl SolverModel {
    problem
        .maximise(objective)
        .using(default_solver)
        .set_option("threads", 1)
        .set_option("random_seed", seed as i32)
        .set_option("log_to_console", "false")
        .set_option("time_limit", timeout_secs as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    Sat,
    Unsat,
    Timeout,
}

/// Maps HiGHS's termination status through `good_lp::ResolutionError`: a proven-infeasible model is
/// `Unsat`, anything else (time limit reached, unbounded, solver-internal failure) is `Timeout` so
/// the adaptive driver can report `CoreError::Timeout` instead of conflating it with infeasibility.
pub fn solve<M: SolverModel>(model: M) -> (SolveOutcome, Option<M::Solution>) {
    match model.solve() {
        Ok(solution) => (SolveOutcome::Sat, Some(solution)),
        Err(ResolutionError::Infeasible) => (SolveOutcome::Unsat, None),
        Err(_) => (SolveOutcome::Timeout, None),
    }
}

pub fn value<S: Solution>(solution: &S, var: Var) -> f64 {
    solution.value(var)
}
