//! Emitter Interface: hands the materialized tuple stream to a CSV-writing collaborator (spec
//! §4.8). `ScheduleEmitter` is the one interface this crate fixes on the output side; `CsvEmitter`
//! is the one concrete implementation it ships.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::materialize::ScheduleEntry;

const MASTER_HEADER: [&str; 7] = ["Day", "Slot", "Time", "Course", "Teacher", "Department", "Room"];
const EXPERTISE_HEADER: [&str; 4] = ["TeacherID", "TeacherName", "Department", "SubjectArea"];

#[derive(Debug, Clone)]
pub struct ExpertiseRow {
    pub teacher_id: String,
    pub teacher_name: String,
    pub department: String,
    pub subject_area: String,
}

pub trait ScheduleEmitter {
    fn write_master(&self, entries: &[ScheduleEntry]) -> CoreResult<()>;
    fn write_teacher_slice(&self, teacher_id: &str, entries: &[ScheduleEntry]) -> CoreResult<()>;
    fn write_department_slice(&self, department: &str, entries: &[ScheduleEntry]) -> CoreResult<()>;
}

pub struct CsvEmitter {
    out_dir: PathBuf,
}

impl CsvEmitter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        CsvEmitter { out_dir: out_dir.into() }
    }

    fn ensure_out_dir(&self) -> CoreResult<()> {
        fs::create_dir_all(&self.out_dir)
            .map_err(|e| CoreError::EmitterFailure(format!("{}: {e}", self.out_dir.display())))
    }

    fn write_rows(&self, path: &Path, entries: &[ScheduleEntry]) -> CoreResult<()> {
        self.ensure_out_dir()?;
        let mut wtr = csv::Writer::from_path(path)
            .map_err(|e| CoreError::EmitterFailure(format!("{}: {e}", path.display())))?;
        wtr.write_record(MASTER_HEADER).map_err(emitter_err)?;
        for entry in entries {
            wtr.write_record([
                entry.day.as_str(),
                &entry.slot.to_string(),
                entry.time.as_str(),
                entry.course.as_str(),
                entry.teacher.as_str(),
                entry.department.as_str(),
                entry.room.as_str(),
            ])
            .map_err(emitter_err)?;
        }
        wtr.flush().map_err(|e| CoreError::EmitterFailure(e.to_string()))
    }

    /// `teacher_expertise_data.csv` — not part of `ScheduleEmitter`, since it is driven by the
    /// expertise map rather than a schedule entry slice (spec §6).
    pub fn write_expertise(&self, rows: &[ExpertiseRow]) -> CoreResult<()> {
        self.ensure_out_dir()?;
        let path = self.out_dir.join("teacher_expertise_data.csv");
        let mut wtr = csv::Writer::from_path(&path)
            .map_err(|e| CoreError::EmitterFailure(format!("{}: {e}", path.display())))?;
        wtr.write_record(EXPERTISE_HEADER).map_err(emitter_err)?;
        for row in rows {
            wtr.write_record([
                row.teacher_id.as_str(),
                row.teacher_name.as_str(),
                row.department.as_str(),
                row.subject_area.as_str(),
            ])
            .map_err(emitter_err)?;
        }
        wtr.flush().map_err(|e| CoreError::EmitterFailure(e.to_string()))
    }
}

impl ScheduleEmitter for CsvEmitter {
    fn write_master(&self, entries: &[ScheduleEntry]) -> CoreResult<()> {
        self.write_rows(&self.out_dir.join("master_timetable.csv"), entries)
    }

    fn write_teacher_slice(&self, teacher_id: &str, entries: &[ScheduleEntry]) -> CoreResult<()> {
        let filtered: Vec<ScheduleEntry> =
            entries.iter().filter(|e| e.teacher == teacher_id).cloned().collect();
        let path = self.out_dir.join(format!("timetable_teacher_{}.csv", local_part(teacher_id)));
        self.write_rows(&path, &filtered)
    }

    fn write_department_slice(&self, department: &str, entries: &[ScheduleEntry]) -> CoreResult<()> {
        let filtered: Vec<ScheduleEntry> =
            entries.iter().filter(|e| e.department == department).cloned().collect();
        let path = self.out_dir.join(format!("timetable_dept_{}.csv", sanitize(department)));
        self.write_rows(&path, &filtered)
    }
}

fn emitter_err(e: csv::Error) -> CoreError {
    CoreError::EmitterFailure(e.to_string())
}

fn local_part(teacher_id: &str) -> &str {
    teacher_id.split('@').next().unwrap_or(teacher_id)
}

fn sanitize(name: &str) -> String {
    name.chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: &str, teacher: &str, dept: &str) -> ScheduleEntry {
        ScheduleEntry {
            day: day.into(),
            slot: 1,
            time: "08:00 - 09:00".into(),
            course: "CS101".into(),
            teacher: teacher.into(),
            department: dept.into(),
            room: "R1".into(),
        }
    }

    #[test]
    fn master_and_slices_write_expected_files() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = CsvEmitter::new(dir.path());
        let entries = vec![entry("Monday", "a@x.edu", "CS")];

        emitter.write_master(&entries).unwrap();
        emitter.write_teacher_slice("a@x.edu", &entries).unwrap();
        emitter.write_department_slice("CS", &entries).unwrap();

        assert!(dir.path().join("master_timetable.csv").exists());
        assert!(dir.path().join("timetable_teacher_a.csv").exists());
        assert!(dir.path().join("timetable_dept_CS.csv").exists());
    }

    #[test]
    fn department_name_is_sanitized_in_filename() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = CsvEmitter::new(dir.path());
        emitter.write_department_slice("Comp Sci & Eng", &[]).unwrap();
        assert!(dir.path().join("timetable_dept_Comp_Sci___Eng.csv").exists());
    }
}
