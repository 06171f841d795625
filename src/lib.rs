// Biblioteca raíz del crate `quickplan`.
// Reexporta los módulos principales: el núcleo de selección (`algorithm`),
// el proveedor de catálogo (`excel`) y la capa HTTP (`server`).
pub mod algorithm;
pub mod api_json;
pub mod config;
pub mod error;
pub mod excel;
pub mod logging;
pub mod models;
pub mod server;
pub mod server_handlers;

pub use algorithm::{AlternativeGroups, Availability, CourseQuery, Limits, SelectionEngine};
pub use error::{PlannerError, Result};
pub use excel::Catalog;
pub use models::{Course, CourseType};

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
