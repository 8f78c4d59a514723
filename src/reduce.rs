//! Domain Reducer: caps catalog size to a tractable problem and precomputes the per-teacher
//! valid-course and per-course valid-room index sets the model builder consumes. Consumes an
//! immutable `Catalog` and produces a new, immutable `ReducedCatalog` — it never mutates its input.

use std::collections::HashMap;

use log::info;

use crate::catalog::{Catalog, Course, CourseId, CourseKind, Room, RoomKind, Teacher, TeacherId};
use crate::timegrid::{DAYS, SLOTS_PER_DAY};

const MAX_COURSES: usize = 100;
const MAX_TEACHERS: usize = 200;
const MAX_ROOMS: usize = 50;
const MAX_LAB_ROOMS: usize = 20;
const MAX_COURSES_PER_TEACHER: usize = 5;
const MAX_DAYS: usize = 4;
const MAX_SLOTS: usize = 8;

#[derive(Debug, Clone)]
pub struct ReducedCatalog {
    pub courses: Vec<Course>,
    pub teachers: Vec<Teacher>,
    pub rooms: Vec<Room>,
    pub days: Vec<&'static str>,
    pub slots: Vec<u32>,
    /// teacher_id -> indices into `courses` that teacher is admitted to teach.
    pub teacher_courses: HashMap<TeacherId, Vec<usize>>,
    /// course index -> indices into `rooms` compatible with that course.
    pub course_rooms: HashMap<usize, Vec<usize>>,
    /// (dept_name, year) -> indices into `courses`, for courses whose year resolved (§3).
    pub cohorts: HashMap<(String, u32), Vec<usize>>,
    pub assignments: HashMap<CourseId, Vec<TeacherId>>,
}

pub fn reduce(catalog: &Catalog, apply_caps: bool) -> ReducedCatalog {
    let courses: Vec<Course> = if apply_caps {
        catalog.courses.iter().take(MAX_COURSES).cloned().collect()
    } else {
        catalog.courses.clone()
    };
    let kept_course_ids: std::collections::HashSet<&str> =
        courses.iter().map(|c| c.course_id.as_str()).collect();

    let assignments: HashMap<CourseId, Vec<TeacherId>> = catalog
        .assignments
        .iter()
        .filter(|(cid, _)| kept_course_ids.contains(cid.as_str()))
        .map(|(cid, ts)| (cid.clone(), ts.clone()))
        .collect();

    let assigned_teacher_ids: std::collections::HashSet<&str> =
        assignments.values().flatten().map(String::as_str).collect();

    let teachers: Vec<Teacher> = if apply_caps {
        catalog
            .teachers
            .iter()
            .filter(|t| assigned_teacher_ids.contains(t.teacher_id.as_str()))
            .take(MAX_TEACHERS)
            .cloned()
            .collect()
    } else {
        catalog.teachers.clone()
    };

    let rooms: Vec<Room> = if apply_caps {
        let labs: Vec<Room> = catalog
            .rooms
            .iter()
            .filter(|r| r.kind == RoomKind::Lab)
            .take(MAX_LAB_ROOMS)
            .cloned()
            .collect();
        let remaining = MAX_ROOMS.saturating_sub(labs.len());
        let others: Vec<Room> = catalog
            .rooms
            .iter()
            .filter(|r| r.kind != RoomKind::Lab)
            .take(remaining)
            .cloned()
            .collect();
        let mut all = labs;
        all.extend(others);
        all
    } else {
        catalog.rooms.clone()
    };

    let days: Vec<&'static str> = if apply_caps {
        DAYS.iter().take(MAX_DAYS).copied().collect()
    } else {
        DAYS.to_vec()
    };
    let slot_cap = if apply_caps { MAX_SLOTS as u32 } else { SLOTS_PER_DAY };
    let slots: Vec<u32> = (1..=slot_cap.min(SLOTS_PER_DAY)).collect();

    let teacher_courses: HashMap<TeacherId, Vec<usize>> = teachers
        .iter()
        .map(|t| {
            let mut idxs: Vec<usize> = courses
                .iter()
                .enumerate()
                .filter(|(_, c)| {
                    assignments
                        .get(&c.course_id)
                        .map(|ts| ts.iter().any(|x| x == &t.teacher_id))
                        .unwrap_or(false)
                })
                .map(|(i, _)| i)
                .collect();
            if apply_caps {
                idxs.truncate(MAX_COURSES_PER_TEACHER);
            }
            (t.teacher_id.clone(), idxs)
        })
        .collect();

    let lab_room_idxs: Vec<usize> = rooms
        .iter()
        .enumerate()
        .filter(|(_, r)| r.kind == RoomKind::Lab)
        .map(|(i, _)| i)
        .collect();
    let non_lab_room_idxs: Vec<usize> = rooms
        .iter()
        .enumerate()
        .filter(|(_, r)| r.kind != RoomKind::Lab)
        .map(|(i, _)| i)
        .collect();

    let course_rooms: HashMap<usize, Vec<usize>> = courses
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let idxs = match c.kind {
                CourseKind::Lab if !lab_room_idxs.is_empty() => lab_room_idxs.clone(),
                CourseKind::Lab => non_lab_room_idxs.clone(),
                CourseKind::Theory => non_lab_room_idxs.clone(),
            };
            (i, idxs)
        })
        .collect();

    let mut cohorts: HashMap<(String, u32), Vec<usize>> = HashMap::new();
    for (i, c) in courses.iter().enumerate() {
        if let Some(year) = c.year() {
            cohorts.entry((c.dept_name.clone(), year)).or_default().push(i);
        }
    }
    cohorts.retain(|_, idxs| idxs.len() >= 2);

    info!(
        "domain reducer: {} courses, {} teachers, {} rooms, {} days x {} slots (caps {})",
        courses.len(),
        teachers.len(),
        rooms.len(),
        days.len(),
        slots.len(),
        apply_caps
    );

    ReducedCatalog { courses, teachers, rooms, days, slots, teacher_courses, course_rooms, cohorts, assignments }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{CourseKind, RoomKind};

    fn course(id: &str, dept: &str, hours: u32) -> Course {
        Course { course_id: id.into(), dept_name: dept.into(), practical_hours: hours, kind: if hours >= 2 { CourseKind::Lab } else { CourseKind::Theory } }
    }

    #[test]
    fn labs_fall_back_to_regular_rooms_when_no_lab_room_survives() {
        let mut cat = Catalog::default();
        cat.courses.push(course("CS201", "CS", 2));
        cat.rooms.push(Room { room_id: "R1".into(), capacity: 30, kind: RoomKind::Regular });
        let reduced = reduce(&cat, false);
        assert_eq!(reduced.course_rooms[&0], vec![0]);
    }

    #[test]
    fn cohorts_require_at_least_two_courses() {
        let mut cat = Catalog::default();
        cat.courses.push(course("CS21A", "CS", 0));
        let reduced = reduce(&cat, false);
        assert!(reduced.cohorts.is_empty());
    }
}
