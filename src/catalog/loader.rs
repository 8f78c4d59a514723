//! Reads the five (six with students) tabular catalogs into a `Catalog` snapshot. Missing files are
//! tolerated (empty collection plus a warning); malformed rows are skipped and counted.

use std::collections::HashMap;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use super::types::{Catalog, Course, CourseKind, Department, Room, RoomKind, Teacher};

#[derive(Debug, Deserialize)]
struct DepartmentRow {
    id: String,
    dept_name: String,
}

#[derive(Debug, Deserialize)]
struct RoomRow {
    room_number: String,
    is_lab: Option<String>,
    room_max_cap: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeacherRow {
    teacher_id__email: String,
    dept_id: String,
    resignation_status: String,
}

#[derive(Debug, Deserialize)]
struct CourseRow {
    course_id: String,
    course_dept_id: String,
    practical_hours: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssignmentRow {
    #[serde(rename = "Course Code")]
    course_code: String,
    #[serde(rename = "Faculty")]
    faculty: String,
}

#[derive(Debug, Deserialize)]
struct StudentRow {
    #[allow(dead_code)]
    student_id__email: String,
    dept: String,
    year: String,
    #[allow(dead_code)]
    current_semester: String,
}

fn is_truthy(s: &str) -> bool {
    matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Reads a CSV file into rows of `T`, tolerating a missing file (logs and returns empty) and
/// skipping rows that fail to deserialize (logs with line number and continues).
fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path, label: &str) -> Vec<T> {
    let Ok(mut reader) = csv::ReaderBuilder::new().from_path(path) else {
        warn!("{label}: file missing or unreadable at {}; proceeding with empty set", path.display());
        return Vec::new();
    };
    let mut rows = Vec::new();
    for (idx, record) in reader.deserialize::<T>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => warn!("{label}: skipping malformed row at line {}: {e}", idx + 2),
        }
    }
    rows
}

pub struct CatalogPaths<'a> {
    pub departments: Option<&'a Path>,
    pub rooms: Option<&'a Path>,
    pub teachers: Option<&'a Path>,
    pub courses: Option<&'a Path>,
    pub assignments: Option<&'a Path>,
    pub students: Option<&'a Path>,
}

pub fn load_catalog(paths: CatalogPaths) -> Catalog {
    let mut catalog = Catalog::default();

    if let Some(p) = paths.departments {
        for row in read_rows::<DepartmentRow>(p, "departments.csv") {
            catalog.dept_by_id.insert(row.id.clone(), row.dept_name.clone());
            catalog.dept_by_name.insert(row.dept_name.clone(), row.id.clone());
            catalog.departments.push(Department { dept_id: row.id, dept_name: row.dept_name });
        }
    } else {
        warn!("departments.csv not supplied; department map will be empty");
    }

    if let Some(p) = paths.rooms {
        for row in read_rows::<RoomRow>(p, "rooms.csv") {
            let capacity = row
                .room_max_cap
                .as_deref()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(30);
            let kind = match row.is_lab.as_deref().map(is_truthy) {
                Some(true) => RoomKind::Lab,
                _ => RoomKind::Regular,
            };
            catalog.rooms.push(Room { room_id: row.room_number, capacity, kind });
        }
    } else {
        warn!("rooms.csv not supplied; room set will be empty");
    }

    if let Some(p) = paths.teachers {
        for row in read_rows::<TeacherRow>(p, "teachers.csv") {
            let active = row.resignation_status.trim().eq_ignore_ascii_case("active");
            if !active {
                continue;
            }
            catalog.teachers.push(Teacher {
                teacher_id: row.teacher_id__email,
                dept_id: row.dept_id,
                active,
            });
        }
    } else {
        warn!("teachers.csv not supplied; teacher set will be empty");
    }

    if let Some(p) = paths.courses {
        for row in read_rows::<CourseRow>(p, "course.csv") {
            let practical_hours = row
                .practical_hours
                .as_deref()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(0);
            let kind = if practical_hours >= 2 { CourseKind::Lab } else { CourseKind::Theory };
            catalog.courses.push(Course {
                course_id: row.course_id,
                dept_name: row.course_dept_id,
                practical_hours,
                kind,
            });
        }
    } else {
        warn!("course.csv not supplied; course set will be empty");
    }

    if let Some(p) = paths.assignments {
        let course_ids: HashMap<String, ()> =
            catalog.courses.iter().map(|c| (c.course_id.clone(), ())).collect();
        for row in read_rows::<AssignmentRow>(p, "course_for_the_department_and_thier_faculty.csv") {
            if !course_ids.contains_key(&row.course_code) {
                warn!("assignment row references unknown course '{}'; skipped", row.course_code);
                continue;
            }
            catalog.prior_assignment_depts.insert(row.course_code, row.faculty);
        }
    }

    if let Some(p) = paths.students {
        let mut any = false;
        for row in read_rows::<StudentRow>(p, "students.csv") {
            if catalog.dept_by_name.contains_key(&row.dept) || !row.year.is_empty() {
                any = true;
            }
        }
        catalog.cohorts_present = any;
    }

    catalog
}
