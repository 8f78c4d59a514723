//! Constraint Model Builder: ties the decision-variable arena, objective shaper, and constraint
//! layers into one solver-ready model (spec §4.4).

pub mod constraints;
pub mod engine;
pub mod objective;
pub mod vars;

use good_lp::SolverModel;

use crate::config::RunConfig;
use crate::reduce::ReducedCatalog;
use vars::VarArena;

pub struct BuiltModel<M: SolverModel> {
    pub model: M,
    pub arena: VarArena,
}

/// Returns `None` when the reduced catalog admits zero decision variables (spec §7 `ModelEmpty`) —
/// the caller should not invoke the solver in that case.
pub fn build(reduced: &ReducedCatalog, config: &RunConfig) -> Option<BuiltModel<impl SolverModel>> {
    let (problem, arena) = vars::build(reduced);
    if arena.index.is_empty() {
        return None;
    }

    let objective = objective::build(reduced, &arena, config);
    let mut model = engine::finalize(problem, objective, config.seed, config.timeout_secs);
    constraints::post_all(&mut model, &arena, reduced, config);

    Some(BuiltModel { model, arena })
}
