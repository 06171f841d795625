//! Módulo `excel`: proveedor del catálogo de cursos.
//!
//! Submódulos:
//! - `io`: helpers para lectura/parseo de celdas y hojas (calamine)
//! - `catalogo`: el `Catalog` inmutable e indexado
//! - `cache`: caché en memoria de catálogos ya cargados
//!
//! El catálogo puede venir de un JSON (`{"courses": [...]}` o un arreglo) o
//! de un libro Excel/ODS cuya primera hoja tenga una fila de encabezados.

/// Helpers de IO y utilidades para parsing de Excel
mod io;

/// Catálogo inmutable: `Catalog`
pub mod catalogo;

/// Caché de catálogos: `get_catalog_cached`
mod cache;

pub use cache::{clear_catalog_cache, get_catalog_cached};
pub use catalogo::Catalog;
pub use io::{normalize_header, split_code_list};

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{PlannerError, Result};
use crate::models::{Course, CourseType};

/// Directorio por defecto con los archivos de datos (relativo al repo)
pub const DATAFILES_DIR: &str = "src/datafiles";

/// Variable de entorno que fuerza el directorio de datos
pub const DATAFILES_ENV: &str = "QUICKPLAN_DATAFILES_DIR";

/// Resuelve el directorio de datafiles: primero la variable de entorno,
/// luego candidatos relativos al CWD.
pub fn get_datafiles_dir() -> PathBuf {
    if let Ok(path) = std::env::var(DATAFILES_ENV) {
        let p = PathBuf::from(path);
        if p.exists() {
            debug!(dir = ?p, "using datafiles dir from env");
            return p;
        }
        warn!(dir = ?p, "{} points to a missing directory", DATAFILES_ENV);
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    for candidate in [cwd.join(DATAFILES_DIR), cwd.join("datafiles")] {
        if candidate.exists() {
            return candidate;
        }
    }
    PathBuf::from(DATAFILES_DIR)
}

/// Resuelve `name` contra el directorio de datos si no es una ruta existente.
pub fn resolve_catalog_path(name: &str) -> PathBuf {
    let direct = PathBuf::from(name);
    if direct.is_absolute() || direct.exists() {
        return direct;
    }
    get_datafiles_dir().join(name)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { courses: Vec<Course> },
    Bare(Vec<Course>),
}

/// Lee un catálogo en formato JSON.
pub fn leer_catalogo_json<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_catalogo_json(&text)
}

pub fn parse_catalogo_json(text: &str) -> Result<Catalog> {
    let courses = match serde_json::from_str::<CatalogFile>(text)? {
        CatalogFile::Wrapped { courses } => courses,
        CatalogFile::Bare(courses) => courses,
    };
    Catalog::new(courses)
}

/// Lee un catálogo desde la primera hoja de un libro Excel/ODS.
pub fn leer_catalogo_excel<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let rows = io::read_first_sheet(path)?;
    Catalog::new(rows_to_courses(&rows)?)
}

/// Índices de columna detectados en la fila de encabezados
struct Columnas {
    code: usize,
    name: usize,
    credits: usize,
    course_type: usize,
    category: usize,
    prerequisites: Option<usize>,
    corequisites: Option<usize>,
}

fn detectar_columnas(header: &[String]) -> Result<Columnas> {
    let find = |aliases: &[&str]| -> Option<usize> {
        header.iter().position(|h| {
            let n = normalize_header(h);
            aliases.iter().any(|a| *a == n)
        })
    };
    let required = |aliases: &[&str]| -> Result<usize> {
        find(aliases).ok_or_else(|| PlannerError::InvalidCatalog(format!("missing column '{}'", aliases[0])))
    };

    Ok(Columnas {
        code: required(&["code", "codigo", "asignatura"])?,
        name: required(&["name", "nombre"])?,
        credits: required(&["credits", "creditos", "sct"])?,
        course_type: required(&["type", "tipo", "coursetype"])?,
        category: required(&["category", "categoria"])?,
        prerequisites: find(&["prerequisites", "prerequisitos", "prereqs"]),
        corequisites: find(&["corequisites", "corequisitos", "coreqs"]),
    })
}

/// Convierte filas crudas (encabezado + datos) en cursos. Las filas sin
/// código se ignoran; créditos o tipo inválidos son un error.
pub fn rows_to_courses(rows: &[Vec<String>]) -> Result<Vec<Course>> {
    let Some((header, data)) = rows.split_first() else {
        return Err(PlannerError::EmptyCatalog);
    };
    let cols = detectar_columnas(header)?;
    let cell = |row: &Vec<String>, idx: usize| -> String { row.get(idx).map(|s| s.trim().to_string()).unwrap_or_default() };

    let mut courses = Vec::new();
    for (row_idx, row) in data.iter().enumerate() {
        let code = cell(row, cols.code);
        if code.is_empty() {
            continue;
        }
        let credits_raw = cell(row, cols.credits);
        let credits = credits_raw.parse::<u32>().map_err(|_| {
            PlannerError::InvalidCatalog(format!("row {}: invalid credits '{}' for {}", row_idx + 2, credits_raw, code))
        })?;
        let course_type = cell(row, cols.course_type)
            .parse::<CourseType>()
            .map_err(|e| PlannerError::InvalidCatalog(format!("row {}: {}", row_idx + 2, e)))?;

        let mut course = Course::new(&code, &cell(row, cols.name), credits, course_type, &cell(row, cols.category));
        if let Some(i) = cols.prerequisites {
            course.prerequisites = split_code_list(&cell(row, i));
        }
        if let Some(i) = cols.corequisites {
            course.corequisites = split_code_list(&cell(row, i));
        }
        courses.push(course);
    }
    Ok(courses)
}

/// Carga el catálogo eligiendo el lector según la extensión del archivo.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let catalog = match ext.as_str() {
        "json" => leer_catalogo_json(path)?,
        "xlsx" | "xlsm" | "xls" | "ods" => leer_catalogo_excel(path)?,
        other => return Err(PlannerError::UnsupportedCatalogFormat(other.to_string())),
    };
    info!(path = %path.display(), courses = catalog.len(), "catalog loaded");
    Ok(catalog)
}
