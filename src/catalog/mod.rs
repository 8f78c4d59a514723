pub mod loader;
pub mod types;

pub use loader::{load_catalog, CatalogPaths};
pub use types::{
    Catalog, Course, CourseId, CourseKind, DeptId, Department, Room, RoomId, RoomKind, Teacher,
    TeacherId,
};
