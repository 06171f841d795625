// Núcleo del planificador: reglas de validez de la selección.
// Declarar submódulos (archivos en la carpeta `src/algorithm`)
pub mod alternativas;
pub mod filters;
pub mod selection;
pub mod trail;

// Reexportar la API pública del núcleo
pub use alternativas::{AlternativeGroups, DEFAULT_ALTERNATIVE_GROUPS};
pub use filters::{visible_courses, CourseQuery};
pub use selection::{
    Availability, Limits, SelectionChange, SelectionEngine, SelectionSnapshot, SelectionStats, DEFAULT_MAX_COURSES,
    DEFAULT_MAX_CREDITS,
};
pub use trail::{
    TrailLock, TrailProgress, FIRST_TRAIL_REQUIRED_COURSES, FIRST_TRAIL_REQUIRED_CREDITS, THIRD_SLOT_REQUIRED_COURSES,
    THIRD_SLOT_REQUIRED_CREDITS,
};
