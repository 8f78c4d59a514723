//! Orchestrates a single end-to-end run: load, induce, reduce, solve (with adaptive retry), then
//! emit (spec §4.9). Running the binary performs exactly one pass through this pipeline.

use std::collections::BTreeSet;

use log::info;

use crate::catalog::{load_catalog, Catalog, CatalogPaths};
use crate::config::RunConfig;
use crate::emit::{CsvEmitter, ExpertiseRow, ScheduleEmitter};
use crate::error::CoreResult;
use crate::expertise;
use crate::reduce::reduce;
use crate::solver::{self, SolveReport};

pub fn run(config: &RunConfig) -> CoreResult<SolveReport> {
    let mut catalog = if config.mock { mock_catalog() } else { load_from_config(config) };

    if config.expertise_enabled {
        expertise::induce(&mut catalog, config.seed);
    } else {
        catalog.assignments.clear();
        catalog.expertise.clear();
    }

    let reduced = reduce(&catalog, config.reduced);
    let report = solver::solve(&reduced, config)?;

    let emitter = CsvEmitter::new(config.out_dir.clone());
    emitter.write_master(&report.entries)?;

    let teacher_ids: BTreeSet<&str> = report.entries.iter().map(|e| e.teacher.as_str()).collect();
    for teacher_id in teacher_ids {
        emitter.write_teacher_slice(teacher_id, &report.entries)?;
    }

    let departments: BTreeSet<&str> = report.entries.iter().map(|e| e.department.as_str()).collect();
    for department in departments {
        emitter.write_department_slice(department, &report.entries)?;
    }

    emitter.write_expertise(&expertise_rows(&catalog))?;

    info!(
        "pipeline finished: {} entries, profile {:?}, {} attempt(s)",
        report.entries.len(),
        report.profile_used,
        report.attempts
    );

    Ok(report)
}

fn load_from_config(config: &RunConfig) -> Catalog {
    let paths = CatalogPaths {
        departments: config.departments_path.as_deref(),
        rooms: config.rooms_path.as_deref(),
        teachers: config.teachers_path.as_deref(),
        courses: config.courses_path.as_deref(),
        assignments: config.assignments_path.as_deref(),
        students: config.students_path.as_deref(),
    };
    load_catalog(paths)
}

fn expertise_rows(catalog: &Catalog) -> Vec<ExpertiseRow> {
    let mut rows = Vec::new();
    for teacher in &catalog.teachers {
        let Some(subjects) = catalog.expertise.get(&teacher.teacher_id) else { continue };
        let department = catalog
            .dept_name_for(&teacher.dept_id)
            .map(str::to_string)
            .unwrap_or_else(|| teacher.dept_id.clone());
        for subject in subjects {
            rows.push(ExpertiseRow {
                teacher_id: teacher.teacher_id.clone(),
                teacher_name: local_part(&teacher.teacher_id).to_string(),
                department: department.clone(),
                subject_area: subject.clone(),
            });
        }
    }
    rows
}

fn local_part(teacher_id: &str) -> &str {
    teacher_id.split('@').next().unwrap_or(teacher_id)
}

/// Small built-in catalog for `--mock` runs, mirroring the trivial scenario of spec §8.
fn mock_catalog() -> Catalog {
    use crate::catalog::types::{Course, CourseKind, Department, Room, RoomKind, Teacher};

    let mut catalog = Catalog::default();
    catalog.dept_by_id.insert("D1".into(), "Mathematics".into());
    catalog.dept_by_name.insert("Mathematics".into(), "D1".into());
    catalog.departments.push(Department { dept_id: "D1".into(), dept_name: "Mathematics".into() });
    catalog.teachers.push(Teacher { teacher_id: "t@x.edu".into(), dept_id: "D1".into(), active: true });
    catalog.courses.push(Course {
        course_id: "MA101".into(),
        dept_name: "Mathematics".into(),
        practical_hours: 0,
        kind: CourseKind::Theory,
    });
    catalog.rooms.push(Room { room_id: "R1".into(), capacity: 60, kind: RoomKind::Regular });
    catalog.assignments.insert("MA101".into(), vec!["t@x.edu".into()]);
    catalog
}
