//! Solution Materializer: decodes a truth assignment into a canonical
//! `(day, slot, course, teacher, room, department)` tuple stream (spec §4.7).

use good_lp::Solution;

use crate::model::engine::value;
use crate::model::vars::VarArena;
use crate::reduce::ReducedCatalog;
use crate::timegrid::slot_time_range;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScheduleEntry {
    pub day: String,
    pub slot: u32,
    pub time: String,
    pub course: String,
    pub teacher: String,
    pub department: String,
    pub room: String,
}

/// Only variables with value > 0.9 count as assigned — T2/T3 guarantee uniqueness per
/// (course, day, slot) and (room, day, slot), so no deduplication is needed here.
pub fn materialize<S: Solution>(reduced: &ReducedCatalog, arena: &VarArena, solution: &S) -> Vec<ScheduleEntry> {
    let mut entries = Vec::new();

    for (key, &var) in &arena.index {
        if value(solution, var) <= 0.9 {
            continue;
        }
        let course = &reduced.courses[key.course];
        let teacher = &reduced.teachers[key.teacher];
        let room = &reduced.rooms[key.room];
        entries.push(ScheduleEntry {
            day: reduced.days[key.day].to_string(),
            slot: key.slot,
            time: slot_time_range(key.slot),
            course: course.course_id.clone(),
            teacher: teacher.teacher_id.clone(),
            department: course.dept_name.clone(),
            room: room.room_id.clone(),
        });
    }

    // canonical (day, slot, course_id, teacher_id, room_id) order so two solver runs that find the
    // same assignment set produce byte-identical output (spec §5).
    entries.sort_by(|a, b| {
        day_index(&a.day)
            .cmp(&day_index(&b.day))
            .then(a.slot.cmp(&b.slot))
            .then(a.course.cmp(&b.course))
            .then(a.teacher.cmp(&b.teacher))
            .then(a.room.cmp(&b.room))
    });

    entries
}

fn day_index(day: &str) -> usize {
    crate::timegrid::DAYS.iter().position(|d| *d == day).unwrap_or(usize::MAX)
}
