use thiserror::Error;

/// Every typed failure that can cross a component boundary in this crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("required input file missing: {0}")]
    InputMissing(String),

    #[error("malformed row in {file} at line {line}: {reason}")]
    InputMalformed {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("referential gap: {0}")]
    ReferentialGap(String),

    #[error("no decision variables after domain reduction; nothing to solve")]
    ModelEmpty,

    #[error("no feasible timetable under profile {profile:?} (try relaxing constraints or raising --timeout)")]
    Infeasible { profile: crate::config::Profile },

    #[error("solver exhausted its time budget under profile {profile:?}")]
    Timeout { profile: crate::config::Profile },

    #[error("failed to write schedule output: {0}")]
    EmitterFailure(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
