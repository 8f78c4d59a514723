//! Sparse decision-variable arena keyed by `(teacher, course, day, slot, room)` indices into the
//! reduced catalog. A dense five-dimensional array is never allocated — the valid-combination
//! filter below makes the space 1-3% populated (spec §9).

use std::collections::HashMap;

use good_lp::ProblemVariables;

use super::engine::{new_bool_var, new_problem, Var};
use crate::reduce::ReducedCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarKey {
    pub teacher: usize,
    pub course: usize,
    pub day: usize,
    pub slot: u32,
    pub room: usize,
}

pub struct VarArena {
    pub index: HashMap<VarKey, Var>,
}

/// Returns the still-open `ProblemVariables` (needed once, to finalize the objective) alongside
/// the arena that every other component borrows from for the rest of the run.
pub fn build(reduced: &ReducedCatalog) -> (ProblemVariables, VarArena) {
    let mut problem = new_problem();
    let mut index = HashMap::new();

    for (t, teacher) in reduced.teachers.iter().enumerate() {
        let Some(course_idxs) = reduced.teacher_courses.get(&teacher.teacher_id) else { continue };
        for &c in course_idxs {
            let Some(room_idxs) = reduced.course_rooms.get(&c) else { continue };
            for (d, _) in reduced.days.iter().enumerate() {
                for &slot in &reduced.slots {
                    for &r in room_idxs {
                        let key = VarKey { teacher: t, course: c, day: d, slot, room: r };
                        let var = new_bool_var(&mut problem);
                        index.insert(key, var);
                    }
                }
            }
        }
    }

    (problem, VarArena { index })
}

impl VarArena {
    pub fn vars_for_teacher_day(&self, teacher: usize, day: usize) -> impl Iterator<Item = (&VarKey, &Var)> {
        self.index.iter().filter(move |(k, _)| k.teacher == teacher && k.day == day)
    }

    pub fn vars_for_course_day_slot(&self, course: usize, day: usize, slot: u32) -> impl Iterator<Item = (&VarKey, &Var)> {
        self.index.iter().filter(move |(k, _)| k.course == course && k.day == day && k.slot == slot)
    }

    pub fn vars_for_room_day_slot(&self, room: usize, day: usize, slot: u32) -> impl Iterator<Item = (&VarKey, &Var)> {
        self.index.iter().filter(move |(k, _)| k.room == room && k.day == day && k.slot == slot)
    }

    pub fn vars_for_course(&self, course: usize) -> impl Iterator<Item = (&VarKey, &Var)> {
        self.index.iter().filter(move |(k, _)| k.course == course)
    }

    pub fn vars_for_day_slot(&self, day: usize, slot: u32) -> impl Iterator<Item = (&VarKey, &Var)> {
        self.index.iter().filter(move |(k, _)| k.day == day && k.slot == slot)
    }
}
