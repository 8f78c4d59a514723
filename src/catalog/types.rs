use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type DeptId = String;
pub type RoomId = String;
pub type TeacherId = String;
pub type CourseId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomKind {
    Regular,
    Lab,
    Techlounge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseKind {
    Theory,
    Lab,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub dept_id: DeptId,
    pub dept_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: RoomId,
    pub capacity: u32,
    pub kind: RoomKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub teacher_id: TeacherId,
    pub dept_id: DeptId,
    pub active: bool,
}

/// Subject area is the two-character prefix of `course_id`; course year is the two following
/// characters parsed as a decimal tens value (see spec §9, open question resolved as authoritative).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub course_id: CourseId,
    pub dept_name: String,
    pub practical_hours: u32,
    pub kind: CourseKind,
}

impl Course {
    pub fn subject_area(&self) -> String {
        self.course_id.chars().take(2).collect()
    }

    /// Returns `None` when the course code's third/fourth characters aren't both digits; callers
    /// should then skip this course for cohort-conflict purposes.
    pub fn year(&self) -> Option<u32> {
        let digits: String = self.course_id.chars().skip(2).take(2).collect();
        if digits.len() < 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        digits.parse::<u32>().ok().map(|tens| tens / 10)
    }
}

/// Immutable, stable-ordered snapshot of every entity loaded from the input catalogs. Owned
/// read-only once constructed; the reducer consumes it and produces a new `ReducedCatalog`.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub departments: Vec<Department>,
    pub dept_by_id: HashMap<DeptId, String>,
    pub dept_by_name: HashMap<String, DeptId>,
    pub rooms: Vec<Room>,
    pub teachers: Vec<Teacher>,
    pub courses: Vec<Course>,
    /// course -> teachers assigned to teach it. Empty after load; populated by the expertise
    /// inducer (inference or synthesis mode).
    pub assignments: HashMap<CourseId, Vec<TeacherId>>,
    /// course -> teaching department name, from the optional prior-assignments table. Consulted
    /// only by the expertise inducer's inference mode.
    pub prior_assignment_depts: HashMap<CourseId, String>,
    /// teacher -> subject areas they have expertise in.
    pub expertise: HashMap<TeacherId, Vec<String>>,
    /// present only when `students.csv` was supplied; used by cohort-conflict heuristics.
    pub cohorts_present: bool,
}

impl Catalog {
    pub fn dept_name_for(&self, dept_id: &str) -> Option<&str> {
        self.dept_by_id.get(dept_id).map(String::as_str)
    }
}
