//! Solver Driver: builds the model for the configured profile, invokes the LP/ILP engine, and —
//! in adaptive mode — retries against progressively looser profiles on infeasible/timeout outcomes
//! (spec §4.6). First feasible solution wins; the model is rebuilt from scratch each attempt since
//! the constraint set itself changes between profiles.

use log::{info, warn};

use crate::config::RunConfig;
use crate::error::{CoreError, CoreResult};
use crate::materialize::{materialize, ScheduleEntry};
use crate::model::{self, engine::SolveOutcome};
use crate::reduce::ReducedCatalog;

#[derive(Debug, Clone)]
pub struct SolveReport {
    pub entries: Vec<ScheduleEntry>,
    pub profile_used: crate::config::Profile,
    pub attempts: u32,
}

pub fn solve(reduced: &ReducedCatalog, config: &RunConfig) -> CoreResult<SolveReport> {
    let mut working = config.clone();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        info!("solver attempt {attempts}: profile {:?}", working.profile);

        let Some(built) = model::build(reduced, &working) else {
            return Err(CoreError::ModelEmpty);
        };

        let (outcome, solution) = model::engine::solve(built.model);

        if let SolveOutcome::Sat = outcome {
            let solution = solution.expect("Sat outcome always carries a solution");
            let entries = materialize(reduced, &built.arena, &solution);
            return Ok(SolveReport { entries, profile_used: working.profile, attempts });
        }

        let exhausted = attempts >= working.max_attempts;
        if working.adaptive && !exhausted {
            if let Some(next) = working.profile.relax() {
                warn!(
                    "profile {:?} {}, relaxing to {:?}",
                    working.profile,
                    if outcome == SolveOutcome::Timeout { "timed out" } else { "infeasible" },
                    next
                );
                working.profile = next;
                continue;
            }
        }

        return Err(match outcome {
            SolveOutcome::Timeout => CoreError::Timeout { profile: working.profile },
            _ => CoreError::Infeasible { profile: working.profile },
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::catalog::types::{Course, CourseKind, Room, RoomKind, Teacher};
    use crate::catalog::Catalog;
    use crate::config::Profile;
    use crate::reduce::reduce;

    fn feasible_catalog() -> Catalog {
        let mut cat = Catalog::default();
        cat.courses.push(Course {
            course_id: "CS101".into(),
            dept_name: "CS".into(),
            practical_hours: 0,
            kind: CourseKind::Theory,
        });
        cat.teachers.push(Teacher { teacher_id: "t1".into(), dept_id: "CS".into(), active: true });
        cat.rooms.push(Room { room_id: "R1".into(), capacity: 30, kind: RoomKind::Regular });
        cat.assignments.insert("CS101".into(), vec!["t1".into()]);
        cat
    }

    #[test]
    fn empty_catalog_reports_model_empty() {
        let cat = Catalog::default();
        let reduced = reduce(&cat, false);
        let config = RunConfig::default();
        let err = solve(&reduced, &config).unwrap_err();
        assert!(matches!(err, CoreError::ModelEmpty));
    }

    #[test]
    fn feasible_catalog_returns_one_entry() {
        let cat = feasible_catalog();
        let reduced = reduce(&cat, false);
        let config = RunConfig::default();
        let report = solve(&reduced, &config).expect("feasible");
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].course, "CS101");
    }

    // --- hand-built `ReducedCatalog` fixtures for the properties/scenarios in spec §8. These
    // mirror `reduce::reduce`'s own derivation of `teacher_courses`/`course_rooms`/`cohorts` from
    // a flat assignment map, but skip the size caps so each fixture can pin exact days/slots/rooms.

    fn course(id: &str, dept: &str, hours: u32) -> Course {
        Course {
            course_id: id.into(),
            dept_name: dept.into(),
            practical_hours: hours,
            kind: if hours >= 2 { CourseKind::Lab } else { CourseKind::Theory },
        }
    }

    fn teacher(id: &str, dept: &str) -> Teacher {
        Teacher { teacher_id: id.into(), dept_id: dept.into(), active: true }
    }

    fn room(id: &str, kind: RoomKind) -> Room {
        Room { room_id: id.into(), capacity: 30, kind }
    }

    fn build_reduced(
        courses: Vec<Course>,
        teachers: Vec<Teacher>,
        rooms: Vec<Room>,
        days: Vec<&'static str>,
        slots: Vec<u32>,
        assignments: HashMap<String, Vec<String>>,
    ) -> ReducedCatalog {
        let teacher_courses: HashMap<String, Vec<usize>> = teachers
            .iter()
            .map(|t| {
                let idxs = courses
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
                (t.teacher_id.clone(), idxs)
            })
            .collect();

        let lab_rooms: Vec<usize> =
            rooms.iter().enumerate().filter(|(_, r)| r.kind == RoomKind::Lab).map(|(i, _)| i).collect();
        let non_lab_rooms: Vec<usize> =
            rooms.iter().enumerate().filter(|(_, r)| r.kind != RoomKind::Lab).map(|(i, _)| i).collect();
        let course_rooms: HashMap<usize, Vec<usize>> = courses
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let idxs = match c.kind {
                    CourseKind::Lab if !lab_rooms.is_empty() => lab_rooms.clone(),
                    _ => non_lab_rooms.clone(),
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

        ReducedCatalog { courses, teachers, rooms, days, slots, teacher_courses, course_rooms, cohorts, assignments }
    }

    fn day_of(day: &str) -> usize {
        crate::timegrid::DAYS.iter().position(|d| *d == day).unwrap()
    }

    /// P4: every lab-course entry at slot s is paired with a same (course, teacher, room) entry at
    /// s+1 or s-1.
    fn assert_lab_consecutivity(entries: &[crate::materialize::ScheduleEntry], lab_course: &str) {
        let at = |day: &str, slot: u32, teacher: &str, room: &str| {
            entries.iter().any(|e| {
                e.course == lab_course && e.day == day && e.slot == slot && e.teacher == teacher && e.room == room
            })
        };
        for e in entries.iter().filter(|e| e.course == lab_course) {
            let paired_after = at(&e.day, e.slot + 1, &e.teacher, &e.room);
            let paired_before = e.slot > 0 && at(&e.day, e.slot - 1, &e.teacher, &e.room);
            assert!(
                paired_after || paired_before,
                "lab entry {:?} has no consecutive partner",
                e
            );
        }
    }

    #[test]
    fn p1_exclusivity_holds_across_two_independent_courses() {
        let courses = vec![course("CS101", "CS", 0), course("CS102", "CS", 0)];
        let teachers = vec![teacher("t1", "CS"), teacher("t2", "CS")];
        let rooms = vec![room("R1", RoomKind::Regular), room("R2", RoomKind::Regular)];
        let days = vec!["Monday", "Tuesday"];
        let slots = vec![1, 2, 3];
        let mut assignments = HashMap::new();
        assignments.insert("CS101".to_string(), vec!["t1".to_string()]);
        assignments.insert("CS102".to_string(), vec!["t2".to_string()]);
        let reduced = build_reduced(courses, teachers, rooms, days, slots, assignments);

        let mut config = RunConfig::default();
        config.profile = Profile::Relaxed;
        let report = solve(&reduced, &config).expect("feasible");

        let mut seen_teacher_slot = std::collections::HashSet::new();
        let mut seen_room_slot = std::collections::HashSet::new();
        let mut seen_course_slot = std::collections::HashSet::new();
        for e in &report.entries {
            assert!(seen_teacher_slot.insert((e.teacher.clone(), e.day.clone(), e.slot)));
            assert!(seen_room_slot.insert((e.room.clone(), e.day.clone(), e.slot)));
            assert!(seen_course_slot.insert((e.course.clone(), e.day.clone(), e.slot)));
        }
    }

    #[test]
    fn scenario2_lab_course_either_absent_or_consecutive_pair() {
        let courses = vec![course("CS201", "CS", 2)];
        let teachers = vec![teacher("t1", "CS")];
        let rooms = vec![room("L1", RoomKind::Lab)];
        let days = vec!["Monday"];
        let slots = vec![1, 2, 3];
        let mut assignments = HashMap::new();
        assignments.insert("CS201".to_string(), vec!["t1".to_string()]);
        let reduced = build_reduced(courses, teachers, rooms, days, slots, assignments);

        let mut config = RunConfig::default();
        config.profile = Profile::Balanced;
        let report = solve(&reduced, &config).expect("feasible");

        assert_lab_consecutivity(&report.entries, "CS201");
    }

    #[test]
    fn scenario3_teacher_daily_cap_never_exceeds_five() {
        let courses: Vec<Course> = (0..10).map(|i| course(&format!("CS1{i:02}"), "CS", 0)).collect();
        let teachers = vec![teacher("t1", "CS")];
        let rooms: Vec<Room> = (0..10).map(|i| room(&format!("R{i}"), RoomKind::Regular)).collect();
        let days = crate::timegrid::DAYS.to_vec();
        let slots: Vec<u32> = (1..=8).collect();
        let mut assignments = HashMap::new();
        for c in &courses {
            assignments.insert(c.course_id.clone(), vec!["t1".to_string()]);
        }
        let reduced = build_reduced(courses, teachers, rooms, days, slots, assignments);

        let mut config = RunConfig::default();
        config.profile = Profile::Relaxed;
        let report = solve(&reduced, &config).expect("feasible");

        let mut per_day: HashMap<(String, String), u32> = HashMap::new();
        for e in &report.entries {
            *per_day.entry((e.teacher.clone(), e.day.clone())).or_insert(0) += 1;
        }
        for count in per_day.values() {
            assert!(*count <= 5, "teacher exceeded the 5/day cap: {count}");
        }
    }

    #[test]
    fn scenario4_lunch_window_always_leaves_one_slot_free() {
        let courses = vec![course("MA101", "MA", 0), course("MA102", "MA", 0)];
        let teachers = vec![teacher("t1", "MA")];
        let rooms = vec![room("R1", RoomKind::Regular)];
        let days = vec!["Monday"];
        let slots = crate::timegrid::LUNCH_SLOTS.to_vec();
        let mut assignments = HashMap::new();
        assignments.insert("MA101".to_string(), vec!["t1".to_string()]);
        assignments.insert("MA102".to_string(), vec!["t1".to_string()]);
        let reduced = build_reduced(courses, teachers, rooms, days, slots, assignments);

        let mut config = RunConfig::default();
        config.profile = Profile::Balanced;
        let report = solve(&reduced, &config).expect("feasible");

        let used: std::collections::HashSet<u32> = report
            .entries
            .iter()
            .filter(|e| e.teacher == "t1" && e.day == "Monday")
            .map(|e| e.slot)
            .collect();
        assert!(
            used.len() < crate::timegrid::LUNCH_SLOTS.len(),
            "no lunch-window slot left free: {used:?}"
        );
    }

    #[test]
    fn scenario5_cohort_conflict_never_double_books_a_slot() {
        let courses = vec![course("CS21A", "CS", 0), course("CS21B", "CS", 0), course("CS21C", "CS", 0)];
        let teachers = vec![teacher("t1", "CS"), teacher("t2", "CS"), teacher("t3", "CS")];
        let rooms = vec![room("R1", RoomKind::Regular), room("R2", RoomKind::Regular), room("R3", RoomKind::Regular)];
        let days = vec!["Monday"];
        let slots = vec![1, 2, 3];
        let mut assignments = HashMap::new();
        assignments.insert("CS21A".to_string(), vec!["t1".to_string()]);
        assignments.insert("CS21B".to_string(), vec!["t2".to_string()]);
        assignments.insert("CS21C".to_string(), vec!["t3".to_string()]);
        let reduced = build_reduced(courses, teachers, rooms, days, slots, assignments);
        assert!(reduced.cohorts.contains_key(&("CS".to_string(), 2)));

        let mut config = RunConfig::default();
        config.profile = Profile::Hybrid;
        let report = solve(&reduced, &config).expect("feasible");

        let cohort = ["CS21A", "CS21B", "CS21C"];
        let mut per_slot: HashMap<(String, u32), u32> = HashMap::new();
        for e in report.entries.iter().filter(|e| cohort.contains(&e.course.as_str())) {
            *per_slot.entry((e.day.clone(), e.slot)).or_insert(0) += 1;
        }
        for count in per_slot.values() {
            assert!(*count <= 1, "cohort double-booked a (day, slot)");
        }
    }

    #[test]
    fn p6_min_instances_scales_with_profile() {
        let courses = vec![course("CS101", "CS", 0)];
        let teachers = vec![teacher("t1", "CS")];
        let rooms = vec![room("R1", RoomKind::Regular)];
        let days = vec!["Monday"];
        let slots = vec![1, 2, 3];
        let mut assignments = HashMap::new();
        assignments.insert("CS101".to_string(), vec!["t1".to_string()]);
        let reduced = build_reduced(courses, teachers, rooms, days, slots, assignments);

        let mut config = RunConfig::default();
        config.profile = Profile::Hybrid;
        let report = solve(&reduced, &config).expect("feasible");
        assert!(report.entries.len() >= 2, "Hybrid profile requires >= 2 instances of CS101");
    }

    #[test]
    fn p5_lab_course_always_lands_in_a_lab_room_when_one_is_admitted() {
        let courses = vec![course("CS201", "CS", 2), course("MA101", "MA", 0)];
        let teachers = vec![teacher("t1", "CS"), teacher("t2", "MA")];
        let rooms = vec![room("L1", RoomKind::Lab), room("R1", RoomKind::Regular)];
        let days = vec!["Monday"];
        let slots = vec![1, 2];
        let mut assignments = HashMap::new();
        assignments.insert("CS201".to_string(), vec!["t1".to_string()]);
        assignments.insert("MA101".to_string(), vec!["t2".to_string()]);
        let reduced = build_reduced(courses, teachers, rooms, days, slots, assignments);

        let mut config = RunConfig::default();
        config.profile = Profile::Relaxed;
        let report = solve(&reduced, &config).expect("feasible");

        for e in report.entries.iter().filter(|e| e.course == "CS201") {
            assert_eq!(e.room, "L1");
        }
        for e in report.entries.iter().filter(|e| e.course == "MA101") {
            assert_eq!(e.room, "R1");
        }
    }

    #[test]
    fn scenario6_adaptive_relaxes_past_real_and_hybrid_to_balanced() {
        let courses = vec![course("CS21A", "CS", 0), course("CS21B", "CS", 0)];
        let teachers = vec![teacher("t1", "CS")];
        let rooms = vec![room("R1", RoomKind::Regular)];
        let days = vec!["Monday"];
        let slots = vec![1, 2];
        let mut assignments = HashMap::new();
        assignments.insert("CS21A".to_string(), vec!["t1".to_string()]);
        assignments.insert("CS21B".to_string(), vec!["t1".to_string()]);
        let reduced = build_reduced(courses, teachers, rooms, days, slots, assignments);
        assert!(reduced.cohorts.contains_key(&("CS".to_string(), 2)));

        let mut config = RunConfig::default();
        config.profile = Profile::Real;
        config.adaptive = true;
        config.max_attempts = 3;
        let report = solve(&reduced, &config).expect("feasible once relaxed to Balanced");

        assert_eq!(report.profile_used, Profile::Balanced);
        assert_eq!(report.attempts, 3);
        assert!(!report.entries.is_empty());
        let _ = day_of("Monday");
    }

    #[test]
    fn low_timeout_still_solves_a_trivial_model() {
        // Exercises that threading `timeout_secs` into `engine::finalize`'s `time_limit` option
        // doesn't interfere with solving a model this small well within the budget.
        let cat = feasible_catalog();
        let reduced = reduce(&cat, false);
        let mut config = RunConfig::default();
        config.timeout_secs = 5;
        let report = solve(&reduced, &config).expect("feasible");
        assert_eq!(report.entries.len(), 1);
    }
}

