use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::algorithm::{Availability, CourseQuery, Limits, SelectionChange, SelectionEngine, SelectionSnapshot};
use crate::config::CostFormula;
use crate::error::Result;
use crate::models::{Course, CourseType};

/// Cuerpo opcional de `POST /sessions`.
///
/// ```json
/// { "max_credits": 14, "max_courses": 8 }
/// ```
/// Los campos ausentes toman los topes por defecto de la configuración.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateSessionRequest {
	#[serde(default)]
	pub max_credits: Option<u32>,
	#[serde(default)]
	pub max_courses: Option<usize>,
}

impl CreateSessionRequest {
	pub fn limits(&self, defaults: Limits) -> Result<Limits> {
		Limits::new(
			self.max_credits.unwrap_or(defaults.max_credits),
			self.max_courses.unwrap_or(defaults.max_courses),
		)
	}
}

/// Cuerpo de `PUT /sessions/{id}/query`.
///
/// ```json
/// { "search": "data", "category": "Core", "type": "lab" }
/// ```
/// Un string vacío equivale a no filtrar por ese campo.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QueryRequest {
	#[serde(default)]
	pub search: Option<String>,
	#[serde(default)]
	pub category: Option<String>,
	#[serde(default, rename = "type")]
	pub course_type: Option<String>,
}

impl QueryRequest {
	pub fn to_query(&self) -> std::result::Result<CourseQuery, String> {
		let non_empty = |s: &Option<String>| s.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
		let course_type = match non_empty(&self.course_type) {
			Some(t) => Some(t.parse::<CourseType>()?),
			None => None,
		};
		Ok(CourseQuery {
			search: self.search.clone().unwrap_or_default(),
			category: non_empty(&self.category),
			course_type,
		})
	}
}

/// Curso tal como lo ve una sesión: disponibilidad y prerequisitos faltantes.
#[derive(Debug, Serialize)]
pub struct CourseView {
	#[serde(flatten)]
	pub course: Course,
	pub selected: bool,
	pub available: bool,
	pub availability: Availability,
	pub missing_prerequisites: Vec<String>,
}

impl CourseView {
	pub fn build(engine: &SelectionEngine, course: &Course) -> Self {
		let availability = engine.selectability(&course.code);
		CourseView {
			course: course.clone(),
			selected: engine.is_selected(&course.code),
			available: availability.is_available(),
			availability,
			missing_prerequisites: engine.missing_prerequisites(&course.code),
		}
	}
}

/// Estado completo de una sesión para la capa de presentación.
#[derive(Debug, Serialize)]
pub struct SessionView {
	pub id: u64,
	pub created_at: DateTime<Utc>,
	#[serde(flatten)]
	pub snapshot: SelectionSnapshot,
	pub estimated_cost: f64,
}

impl SessionView {
	pub fn build(id: u64, created_at: DateTime<Utc>, engine: &SelectionEngine, cost: &CostFormula) -> Self {
		let snapshot = engine.snapshot();
		let estimated_cost = cost.estimate(snapshot.stats.selected_credits);
		SessionView { id, created_at, snapshot, estimated_cost }
	}
}

/// Respuesta de agregar/quitar: qué cambió y el estado resultante.
#[derive(Debug, Serialize)]
pub struct MutationView {
	pub change: SelectionChange,
	pub session: SessionView,
}
