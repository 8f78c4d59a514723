//! Layered run configuration: compile-time defaults -> optional TOML file -> environment ->
//! explicit CLI flags, each layer strictly dominating the one before it.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Strictness profile lattice, loosest first. Adaptive relaxation walks this lattice downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Relaxed,
    Balanced,
    Hybrid,
    Real,
}

impl Profile {
    /// Next looser profile in the adaptive-relaxation walk, or `None` at the bottom.
    pub fn relax(self) -> Option<Profile> {
        match self {
            Profile::Real => Some(Profile::Hybrid),
            Profile::Hybrid => Some(Profile::Balanced),
            Profile::Balanced => Some(Profile::Relaxed),
            Profile::Relaxed => None,
        }
    }

    pub fn min_course_instances(self) -> u32 {
        if self >= Profile::Hybrid { 2 } else { 1 }
    }

    pub fn lunch_enabled(self, overrides: &ConstraintOverrides) -> bool {
        overrides.lunch.unwrap_or(self >= Profile::Balanced)
    }

    pub fn lab_consecutive_enabled(self, overrides: &ConstraintOverrides) -> bool {
        overrides.lab_consecutive.unwrap_or(self >= Profile::Balanced)
    }

    pub fn cohort_conflict_enabled(self, overrides: &ConstraintOverrides) -> bool {
        overrides.cohort_conflict.unwrap_or(self >= Profile::Hybrid)
    }
}

impl std::str::FromStr for Profile {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relaxed" => Ok(Profile::Relaxed),
            "balanced" => Ok(Profile::Balanced),
            "hybrid" => Ok(Profile::Hybrid),
            "real" => Ok(Profile::Real),
            other => Err(CoreError::Config(format!("unknown profile '{other}'"))),
        }
    }
}

/// Fine-grained overrides layered on top of the profile's defaults. `None` means "use the profile's
/// own default for this gate"; `Some(_)` forces it on or off regardless of profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstraintOverrides {
    pub lunch: Option<bool>,
    pub lab_consecutive: Option<bool>,
    pub cohort_conflict: Option<bool>,
    pub stagger: bool,
}

/// Fully resolved configuration for a single end-to-end run. Immutable once built; every component
/// reads this instead of touching the environment or argv directly.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub profile: Profile,
    pub mock: bool,
    pub reduced: bool,
    pub timeout_secs: u64,
    pub adaptive: bool,
    pub max_attempts: u32,
    pub staggered: bool,
    pub expertise_enabled: bool,
    pub seed: u64,
    pub overrides: ConstraintOverrides,

    pub departments_path: Option<PathBuf>,
    pub rooms_path: Option<PathBuf>,
    pub teachers_path: Option<PathBuf>,
    pub courses_path: Option<PathBuf>,
    pub assignments_path: Option<PathBuf>,
    pub students_path: Option<PathBuf>,
    pub out_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            profile: Profile::Balanced,
            mock: false,
            reduced: false,
            timeout_secs: 600,
            adaptive: false,
            max_attempts: 3,
            staggered: false,
            expertise_enabled: true,
            seed: 1234,
            overrides: ConstraintOverrides::default(),
            departments_path: None,
            rooms_path: None,
            teachers_path: None,
            courses_path: None,
            assignments_path: None,
            students_path: None,
            out_dir: PathBuf::from("."),
        }
    }
}

/// Mirrors `RunConfig` but every field is optional, for the TOML file layer.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub profile: Option<Profile>,
    pub reduced: Option<bool>,
    pub timeout_secs: Option<u64>,
    pub adaptive: Option<bool>,
    pub max_attempts: Option<u32>,
    pub staggered: Option<bool>,
    pub expertise_enabled: Option<bool>,
    pub seed: Option<u64>,
    pub departments_path: Option<PathBuf>,
    pub rooms_path: Option<PathBuf>,
    pub teachers_path: Option<PathBuf>,
    pub courses_path: Option<PathBuf>,
    pub assignments_path: Option<PathBuf>,
    pub students_path: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(
    name = "timetable_solver",
    about = "Constraint-based weekly academic timetable synthesizer",
    version = env!("CARGO_PKG_VERSION")
)]
#[command(group(
    ArgGroup::new("profile_flags").args(["relaxed", "balanced", "hybrid", "real"])
))]
pub struct Cli {
    /// Load a small built-in mock catalog instead of reading CSV files.
    #[arg(long)]
    pub mock: bool,

    #[arg(long, group = "profile_flags")]
    pub relaxed: bool,
    #[arg(long, group = "profile_flags")]
    pub balanced: bool,
    #[arg(long, group = "profile_flags")]
    pub hybrid: bool,
    #[arg(long, group = "profile_flags")]
    pub real: bool,

    /// Cap catalog size for a tractable problem (see domain reducer caps).
    #[arg(long)]
    pub reduced: bool,

    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// On infeasible/timeout, retry with progressively looser profiles.
    #[arg(long)]
    pub adaptive: bool,

    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Partition rooms into waves with staggered preferred start slots.
    #[arg(long)]
    pub staggered: bool,

    /// Clear induced expertise before building the model.
    #[arg(long = "no-expertise")]
    pub no_expertise: bool,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,

    #[arg(long = "departments", value_name = "PATH")]
    pub departments: Option<PathBuf>,
    #[arg(long = "rooms", value_name = "PATH")]
    pub rooms: Option<PathBuf>,
    #[arg(long = "teachers", value_name = "PATH")]
    pub teachers: Option<PathBuf>,
    #[arg(long = "courses", value_name = "PATH")]
    pub courses: Option<PathBuf>,
    #[arg(long = "assignments", value_name = "PATH")]
    pub assignments: Option<PathBuf>,
    #[arg(long = "students", value_name = "PATH")]
    pub students: Option<PathBuf>,

    #[arg(long = "out-dir", value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,
}

impl Cli {
    fn profile_flag(&self) -> Option<Profile> {
        if self.relaxed {
            Some(Profile::Relaxed)
        } else if self.balanced {
            Some(Profile::Balanced)
        } else if self.hybrid {
            Some(Profile::Hybrid)
        } else if self.real {
            Some(Profile::Real)
        } else {
            None
        }
    }
}

/// Resolves a `RunConfig` by composing defaults, an optional TOML file, environment variables, and
/// CLI flags, in strictly increasing priority.
pub fn resolve(cli: &Cli) -> CoreResult<RunConfig> {
    let mut cfg = RunConfig::default();

    let config_path = cli.config_path.clone().or_else(|| {
        std::env::var_os("TIMETABLE_CONFIG").map(PathBuf::from)
    });
    if let Some(path) = config_path {
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| CoreError::Config(format!("reading {}: {e}", path.display())))?;
            let file_cfg: FileConfig = toml::from_str(&contents)
                .map_err(|e| CoreError::Config(format!("parsing {}: {e}", path.display())))?;
            apply_file(&mut cfg, file_cfg);
        }
    }

    apply_env(&mut cfg)?;
    apply_cli(&mut cfg, cli)?;

    Ok(cfg)
}

fn apply_file(cfg: &mut RunConfig, file: FileConfig) {
    if let Some(v) = file.profile { cfg.profile = v; }
    if let Some(v) = file.reduced { cfg.reduced = v; }
    if let Some(v) = file.timeout_secs { cfg.timeout_secs = v; }
    if let Some(v) = file.adaptive { cfg.adaptive = v; }
    if let Some(v) = file.max_attempts { cfg.max_attempts = v; }
    if let Some(v) = file.staggered { cfg.staggered = v; }
    if let Some(v) = file.expertise_enabled { cfg.expertise_enabled = v; }
    if let Some(v) = file.seed { cfg.seed = v; }
    if file.departments_path.is_some() { cfg.departments_path = file.departments_path; }
    if file.rooms_path.is_some() { cfg.rooms_path = file.rooms_path; }
    if file.teachers_path.is_some() { cfg.teachers_path = file.teachers_path; }
    if file.courses_path.is_some() { cfg.courses_path = file.courses_path; }
    if file.assignments_path.is_some() { cfg.assignments_path = file.assignments_path; }
    if file.students_path.is_some() { cfg.students_path = file.students_path; }
    if let Some(v) = file.out_dir { cfg.out_dir = v; }
}

fn apply_env(cfg: &mut RunConfig) -> CoreResult<()> {
    if let Ok(v) = std::env::var("TIMETABLE_PROFILE") {
        cfg.profile = v.parse()?;
    }
    if let Ok(v) = std::env::var("TIMETABLE_TIMEOUT") {
        cfg.timeout_secs = v
            .parse()
            .map_err(|e| CoreError::Config(format!("TIMETABLE_TIMEOUT: {e}")))?;
    }
    if let Ok(v) = std::env::var("TIMETABLE_SEED") {
        cfg.seed = v
            .parse()
            .map_err(|e| CoreError::Config(format!("TIMETABLE_SEED: {e}")))?;
    }
    if let Ok(v) = std::env::var("TIMETABLE_ADAPTIVE") {
        cfg.adaptive = is_truthy(&v);
    }
    Ok(())
}

fn apply_cli(cfg: &mut RunConfig, cli: &Cli) -> CoreResult<()> {
    cfg.mock = cfg.mock || cli.mock;
    if let Some(p) = cli.profile_flag() {
        cfg.profile = p;
    }
    cfg.reduced = cfg.reduced || cli.reduced;
    if let Some(t) = cli.timeout {
        cfg.timeout_secs = t;
    }
    cfg.adaptive = cfg.adaptive || cli.adaptive;
    if let Some(n) = cli.max_attempts {
        cfg.max_attempts = n;
    }
    cfg.staggered = cfg.staggered || cli.staggered;
    cfg.overrides.stagger = cfg.staggered;
    if cli.no_expertise {
        cfg.expertise_enabled = false;
    }
    if let Some(seed) = cli.seed {
        cfg.seed = seed;
    }
    if cli.departments.is_some() { cfg.departments_path = cli.departments.clone(); }
    if cli.rooms.is_some() { cfg.rooms_path = cli.rooms.clone(); }
    if cli.teachers.is_some() { cfg.teachers_path = cli.teachers.clone(); }
    if cli.courses.is_some() { cfg.courses_path = cli.courses.clone(); }
    if cli.assignments.is_some() { cfg.assignments_path = cli.assignments.clone(); }
    if cli.students.is_some() { cfg.students_path = cli.students.clone(); }
    cfg.out_dir = cli.out_dir.clone();
    Ok(())
}

fn is_truthy(s: &str) -> bool {
    matches!(s.to_lowercase().as_str(), "true" | "1" | "yes")
}
