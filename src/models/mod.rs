// Estructuras de datos principales

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marcador que identifica una categoría de electivo especializado ("trail").
/// Sólo se consulta al construir el `Course`; el resto del crate usa `Course::trail`.
pub const TRAIL_MARKER: &str = "Trail";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum CourseType {
    Lecture,
    Lab,
}

impl CourseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseType::Lecture => "lecture",
            CourseType::Lab => "lab",
        }
    }
}

impl fmt::Display for CourseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CourseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lecture" | "theory" | "teoria" | "teoría" => Ok(CourseType::Lecture),
            "lab" | "laboratory" | "laboratorio" => Ok(CourseType::Lab),
            other => Err(format!("unknown course type '{}'", other)),
        }
    }
}

impl TryFrom<String> for CourseType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Curso del catálogo. Inmutable una vez cargado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub credits: u32,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub category: String,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub corequisites: Vec<String>,
    /// Nombre del trail si la categoría es de electivo especializado.
    /// Se calcula al cargar el catálogo, nunca se lee del archivo.
    #[serde(default, skip_deserializing)]
    pub trail: Option<String>,
}

impl Course {
    pub fn new(code: &str, name: &str, credits: u32, course_type: CourseType, category: &str) -> Self {
        let mut course = Course {
            code: code.to_string(),
            name: name.to_string(),
            credits,
            course_type,
            category: category.to_string(),
            prerequisites: Vec::new(),
            corequisites: Vec::new(),
            trail: None,
        };
        course.tag_trail();
        course
    }

    pub fn with_prerequisites(mut self, codes: &[&str]) -> Self {
        self.prerequisites = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_corequisites(mut self, codes: &[&str]) -> Self {
        self.corequisites = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Recalcula `trail` a partir de la categoría.
    pub fn tag_trail(&mut self) {
        self.trail = if self.category.contains(TRAIL_MARKER) {
            Some(self.category.clone())
        } else {
            None
        };
    }

    pub fn is_trail(&self) -> bool {
        self.trail.is_some()
    }
}
