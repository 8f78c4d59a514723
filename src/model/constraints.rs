//! Posts the rule set in layers toggled by the run's strictness profile (spec §4.4). T1-T6 are
//! always posted; lunch/lab-consecutivity/cohort-conflict/stagger are gated.

use std::collections::{HashMap, HashSet};

use good_lp::SolverModel;

use super::engine::{at_least, at_most, Expr};
use super::vars::{VarArena, VarKey};
use crate::catalog::CourseKind;
use crate::config::RunConfig;
use crate::reduce::ReducedCatalog;
use crate::timegrid::LUNCH_SLOTS;

const MAX_TEACHER_DAILY_LOAD: f64 = 5.0;

pub fn post_all<M: SolverModel>(
    model: &mut M,
    arena: &VarArena,
    reduced: &ReducedCatalog,
    config: &RunConfig,
) {
    post_teacher_slot_exclusivity(model, arena);
    post_course_slot_exclusivity(model, arena);
    post_room_slot_exclusivity(model, arena);
    post_daily_teacher_load(model, arena);
    post_min_instances(model, arena, config);

    if config.profile.lunch_enabled(&config.overrides) {
        post_lunch(model, arena, reduced);
    }

    if config.profile.lab_consecutive_enabled(&config.overrides) {
        post_lab_consecutivity(model, arena, reduced);
    } else {
        post_lab_soft(model, arena, reduced);
    }

    if config.profile.cohort_conflict_enabled(&config.overrides) {
        post_cohort_conflict(model, arena, reduced);
    }

    if config.overrides.stagger {
        post_stagger_cap(model, arena, reduced);
    }
}

/// Groups variables by `key_fn` and returns the groups sorted by key. Posting constraints in
/// `HashMap` iteration order would make row order — and therefore the solver's branch-and-bound
/// tie-breaking among equally-optimal solutions — depend on per-process hash randomization, which
/// would break property P9 (byte-identical output for a fixed seed). Sorting first keeps posting
/// order tied only to the keys themselves, which are derived deterministically from catalog order.
fn sum_grouped<K: std::hash::Hash + Eq + Ord, F: Fn(&VarKey) -> K>(
    arena: &VarArena,
    key_fn: F,
) -> Vec<(K, Expr)> {
    let mut groups: HashMap<K, Expr> = HashMap::new();
    for (key, &var) in &arena.index {
        let entry = groups.entry(key_fn(key)).or_insert_with(|| Expr::from(0.0));
        *entry = entry.clone() + var;
    }
    let mut grouped: Vec<(K, Expr)> = groups.into_iter().collect();
    grouped.sort_by(|a, b| a.0.cmp(&b.0));
    grouped
}

/// T1: for each (teacher, day, slot), at most one class.
fn post_teacher_slot_exclusivity<M: SolverModel>(model: &mut M, arena: &VarArena) {
    for (_, expr) in sum_grouped(arena, |k| (k.teacher, k.day, k.slot)) {
        at_most(model, expr, 1.0);
    }
}

/// T2: for each (course, day, slot), at most one section.
fn post_course_slot_exclusivity<M: SolverModel>(model: &mut M, arena: &VarArena) {
    for (_, expr) in sum_grouped(arena, |k| (k.course, k.day, k.slot)) {
        at_most(model, expr, 1.0);
    }
}

/// T3: for each (room, day, slot), at most one occupant.
fn post_room_slot_exclusivity<M: SolverModel>(model: &mut M, arena: &VarArena) {
    for (_, expr) in sum_grouped(arena, |k| (k.room, k.day, k.slot)) {
        at_most(model, expr, 1.0);
    }
}

/// T4: for each (teacher, day), at most 5 classes.
fn post_daily_teacher_load<M: SolverModel>(model: &mut M, arena: &VarArena) {
    for (_, expr) in sum_grouped(arena, |k| (k.teacher, k.day)) {
        at_most(model, expr, MAX_TEACHER_DAILY_LOAD);
    }
}

/// T5: for each course with >= N candidate variables, at least N are scheduled.
fn post_min_instances<M: SolverModel>(model: &mut M, arena: &VarArena, config: &RunConfig) {
    let n = config.profile.min_course_instances() as f64;
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for key in arena.index.keys() {
        *counts.entry(key.course).or_insert(0) += 1;
    }
    for (course, expr) in sum_grouped(arena, |k| k.course) {
        if counts.get(&course).copied().unwrap_or(0) as f64 >= n {
            at_least(model, expr, n);
        }
    }
}

/// For every (teacher, day), at least one lunch-window slot (among admitted lunch slots) is free.
fn post_lunch<M: SolverModel>(model: &mut M, arena: &VarArena, reduced: &ReducedCatalog) {
    let admitted_lunch: HashSet<u32> =
        reduced.slots.iter().copied().filter(|s| LUNCH_SLOTS.contains(s)).collect();
    if admitted_lunch.is_empty() {
        return;
    }
    let cap = admitted_lunch.len() as f64 - 1.0;
    let mut groups: HashMap<(usize, usize), Expr> = HashMap::new();
    for (key, &var) in &arena.index {
        if !admitted_lunch.contains(&key.slot) {
            continue;
        }
        let entry = groups.entry((key.teacher, key.day)).or_insert_with(|| Expr::from(0.0));
        *entry = entry.clone() + var;
    }
    let mut grouped: Vec<((usize, usize), Expr)> = groups.into_iter().collect();
    grouped.sort_by(|a, b| a.0.cmp(&b.0));
    for (_, expr) in grouped {
        at_most(model, expr, cap);
    }
}

/// For every lab course and every admitted consecutive slot pair, a start at `s` forces `s+1`.
fn post_lab_consecutivity<M: SolverModel>(model: &mut M, arena: &VarArena, reduced: &ReducedCatalog) {
    let admitted: HashSet<u32> = reduced.slots.iter().copied().collect();
    let lab_courses: HashSet<usize> = reduced
        .courses
        .iter()
        .enumerate()
        .filter(|(_, c)| c.kind == CourseKind::Lab)
        .map(|(i, _)| i)
        .collect();

    let mut keys: Vec<&VarKey> = arena.index.keys().collect();
    keys.sort();
    for key in keys {
        if !lab_courses.contains(&key.course) {
            continue;
        }
        let next_slot = key.slot + 1;
        if !admitted.contains(&next_slot) {
            continue;
        }
        let next_key = VarKey { slot: next_slot, ..*key };
        if let (Some(&var), Some(&next_var)) = (arena.index.get(key), arena.index.get(&next_key)) {
            // x[s] - x[s+1] <= 0  <=>  x[s+1] >= x[s]
            at_most(model, Expr::from(var) - Expr::from(next_var), 0.0);
        }
    }
}

/// Softer fallback when lab consecutivity is off: every lab course with candidate variables gets
/// at least one scheduled instance somewhere.
fn post_lab_soft<M: SolverModel>(model: &mut M, arena: &VarArena, reduced: &ReducedCatalog) {
    for (c, course) in reduced.courses.iter().enumerate() {
        if course.kind != CourseKind::Lab {
            continue;
        }
        let mut expr = Expr::from(0.0);
        let mut count = 0usize;
        for (_, &var) in arena.vars_for_course(c) {
            expr = expr + var;
            count += 1;
        }
        if count > 0 {
            at_least(model, expr, 1.0);
        }
    }
}

/// For every `(dept, year)` cohort with >= 2 courses, at most one of them occupies a given slot.
fn post_cohort_conflict<M: SolverModel>(model: &mut M, arena: &VarArena, reduced: &ReducedCatalog) {
    let mut cohort_keys: Vec<&(String, u32)> = reduced.cohorts.keys().collect();
    cohort_keys.sort();

    for cohort_key in cohort_keys {
        let courses = &reduced.cohorts[cohort_key];
        let course_set: HashSet<usize> = courses.iter().copied().collect();
        let mut groups: HashMap<(usize, u32), Expr> = HashMap::new();
        for (key, &var) in &arena.index {
            if !course_set.contains(&key.course) {
                continue;
            }
            let entry = groups.entry((key.day, key.slot)).or_insert_with(|| Expr::from(0.0));
            *entry = entry.clone() + var;
        }
        let mut grouped: Vec<((usize, u32), Expr)> = groups.into_iter().collect();
        grouped.sort_by(|a, b| a.0.cmp(&b.0));
        for (_, expr) in grouped {
            at_most(model, expr, 1.0);
        }
    }
}

/// For each (day, slot), total scheduled sections <= min(25, floor(rooms/2)).
fn post_stagger_cap<M: SolverModel>(model: &mut M, arena: &VarArena, reduced: &ReducedCatalog) {
    let cap = 25usize.min(reduced.rooms.len() / 2) as f64;
    for (_, expr) in sum_grouped(arena, |k| (k.day, k.slot)) {
        at_most(model, expr, cap);
    }
}
