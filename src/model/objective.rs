//! Objective Shaper: a weighted linear objective encoding soft time-of-day and staggering
//! preferences (spec §4.5). All slot positions below are 0-indexed into the admitted-slots list.

use super::engine::Expr;
use super::vars::VarArena;
use crate::catalog::CourseKind;
use crate::config::RunConfig;
use crate::reduce::ReducedCatalog;

const LAB_EARLY_BONUS: f64 = 0.3;
const LAB_MID_MORNING_BONUS: f64 = 0.1;
const THEORY_MID_DAY_BONUS: f64 = 0.1;
const STAGGER_BONUS: f64 = 0.15;

const WAVE_PREFERRED: [&[usize]; 3] = [&[0, 3, 6], &[1, 4, 7], &[2, 5]];

pub fn build(reduced: &ReducedCatalog, arena: &VarArena, config: &RunConfig) -> Expr {
    let mut objective = Expr::from(0.0);

    for (key, &var) in &arena.index {
        let mut weight = 1.0_f64;
        let pos = reduced.slots.iter().position(|&s| s == key.slot).unwrap_or(0);
        let course = &reduced.courses[key.course];

        match course.kind {
            CourseKind::Lab => {
                if pos < 4 {
                    weight += LAB_EARLY_BONUS;
                } else if pos < 6 {
                    weight += LAB_MID_MORNING_BONUS;
                }
            }
            CourseKind::Theory => {
                if (3..=6).contains(&pos) {
                    weight += THEORY_MID_DAY_BONUS;
                }
            }
        }

        if config.staggered {
            let wave = key.room % 3;
            if WAVE_PREFERRED[wave].contains(&pos) {
                weight += STAGGER_BONUS;
            }
        }

        objective = objective + weight * var;
    }

    objective
}
