//! Expertise Inducer: infers teacher subject-area competences and fills missing teacher<->course
//! assignments. Two modes per spec §4.2 — inference (a prior-assignments table is present) and
//! synthesis (load-balanced matching) — composed so every course with at least one eligible teacher
//! ends up with at least one assigned teacher regardless of which mode placed it.

use std::collections::HashMap;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::catalog::{Catalog, CourseId, TeacherId};

/// Mutates `catalog.assignments` and `catalog.expertise` in place. Deterministic given `seed`
/// (spec §9 "Randomness", property P8).
pub fn induce(catalog: &mut Catalog, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);

    let active_teachers: Vec<TeacherId> =
        catalog.teachers.iter().map(|t| t.teacher_id.clone()).collect();
    let teacher_dept: HashMap<TeacherId, String> = catalog
        .teachers
        .iter()
        .map(|t| (t.teacher_id.clone(), t.dept_id.clone()))
        .collect();

    let mut subject_count: HashMap<(TeacherId, String), u32> = HashMap::new();
    let mut load_count: HashMap<TeacherId, u32> = HashMap::new();

    if !catalog.prior_assignment_depts.is_empty() {
        info!(
            "expertise inducer: inference mode over {} prior assignments",
            catalog.prior_assignment_depts.len()
        );
        let course_ids: Vec<CourseId> = catalog
            .prior_assignment_depts
            .keys()
            .cloned()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        for course_id in course_ids {
            let faculty = catalog.prior_assignment_depts.get(&course_id).cloned().unwrap();
            let Some(dept_id) = catalog.dept_by_name.get(&faculty).cloned() else {
                debug!("inference: faculty '{faculty}' for course {course_id} does not resolve");
                continue;
            };
            let pool: Vec<TeacherId> = active_teachers
                .iter()
                .filter(|t| teacher_dept.get(*t).map(String::as_str) == Some(dept_id.as_str()))
                .cloned()
                .collect();
            if pool.is_empty() {
                continue;
            }
            let take = if pool.len() >= 2 { 2 } else { 1 };
            let chosen: Vec<TeacherId> =
                pool.choose_multiple(&mut rng, take).cloned().collect();
            assign(catalog, &mut subject_count, &mut load_count, &course_id, &chosen);
        }
    } else {
        info!("expertise inducer: no prior assignments; synthesis mode only");
    }

    // Synthesis fallback: any course without at least one assigned teacher (whether inference
    // never saw it, failed to resolve, or its department had no active teachers) is matched here.
    let unassigned: Vec<CourseId> = catalog
        .courses
        .iter()
        .map(|c| c.course_id.clone())
        .filter(|id| catalog.assignments.get(id).map(|v| v.is_empty()).unwrap_or(true))
        .collect();

    if unassigned.is_empty() {
        return;
    }

    // group remaining courses by (dept_name, subject_area), preserving catalog order for determinism.
    let mut groups: Vec<(String, String, Vec<CourseId>)> = Vec::new();
    for course in &catalog.courses {
        if !unassigned.contains(&course.course_id) {
            continue;
        }
        let key = (course.dept_name.clone(), course.subject_area());
        if let Some(entry) = groups.iter_mut().find(|(d, s, _)| *d == key.0 && *s == key.1) {
            entry.2.push(course.course_id.clone());
        } else {
            groups.push((key.0, key.1, vec![course.course_id.clone()]));
        }
    }

    for (dept_name, subject_area, course_ids) in groups {
        let dept_id = catalog.dept_by_name.get(&dept_name).cloned();
        let mut pool: Vec<TeacherId> = match &dept_id {
            Some(id) => active_teachers
                .iter()
                .filter(|t| teacher_dept.get(*t).map(String::as_str) == Some(id.as_str()))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        if pool.is_empty() && !active_teachers.is_empty() {
            let take = active_teachers.len().min(3);
            pool = active_teachers.choose_multiple(&mut rng, take).cloned().collect();
        }
        if pool.is_empty() {
            continue;
        }

        for course_id in course_ids {
            let mut ranked = pool.clone();
            ranked.sort_by_key(|t| {
                let sc = subject_count.get(&(t.clone(), subject_area.clone())).copied().unwrap_or(0);
                let load = load_count.get(t).copied().unwrap_or(0);
                (sc, load, t.clone())
            });
            let take = if ranked.len() >= 2 { 2 } else { 1 };
            let chosen: Vec<TeacherId> = ranked.into_iter().take(take).collect();
            assign(catalog, &mut subject_count, &mut load_count, &course_id, &chosen);
        }
    }
}

fn assign(
    catalog: &mut Catalog,
    subject_count: &mut HashMap<(TeacherId, String), u32>,
    load_count: &mut HashMap<TeacherId, u32>,
    course_id: &str,
    teachers: &[TeacherId],
) {
    let Some(course) = catalog.courses.iter().find(|c| c.course_id == course_id) else { return };
    let subject_area = course.subject_area();
    let entry = catalog.assignments.entry(course_id.to_string()).or_default();
    for teacher_id in teachers {
        if entry.contains(teacher_id) {
            continue;
        }
        entry.push(teacher_id.clone());
        *load_count.entry(teacher_id.clone()).or_insert(0) += 1;
        *subject_count.entry((teacher_id.clone(), subject_area.clone())).or_insert(0) += 1;

        let expertise = catalog.expertise.entry(teacher_id.clone()).or_default();
        if !expertise.contains(&subject_area) {
            expertise.push(subject_area.clone());
        }
    }
}
