//! Motor de selección: dueño de la selección de una sesión.
//!
//! Aplica los topes de créditos y cursos, la exclusividad de alternativas,
//! el manejo automático de corequisitos y las reglas de trails. Todas las
//! operaciones son síncronas y no fallan: un código desconocido es un no-op.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::algorithm::alternativas::AlternativeGroups;
use crate::algorithm::filters::{passes_trail_gate, visible_courses, CourseQuery};
use crate::algorithm::trail::{TrailLock, TrailProgress};
use crate::error::{PlannerError, Result};
use crate::excel::Catalog;
use crate::models::Course;

pub const DEFAULT_MAX_CREDITS: u32 = 14;
pub const DEFAULT_MAX_COURSES: usize = 8;

/// Topes configurables por el usuario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub max_credits: u32,
    pub max_courses: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { max_credits: DEFAULT_MAX_CREDITS, max_courses: DEFAULT_MAX_COURSES }
    }
}

impl Limits {
    pub fn new(max_credits: u32, max_courses: usize) -> Result<Self> {
        let limits = Limits { max_credits, max_courses };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_credits == 0 {
            return Err(PlannerError::InvalidLimits("max_credits must be > 0".to_string()));
        }
        if self.max_courses == 0 {
            return Err(PlannerError::InvalidLimits("max_courses must be > 0".to_string()));
        }
        Ok(())
    }
}

/// Veredicto de disponibilidad de un curso, con el motivo del rechazo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unknown,
    AlreadySelected,
    CreditCapExceeded { selected_credits: u32, course_credits: u32, max_credits: u32 },
    CourseCapExceeded { max_courses: usize },
    AlternativeConflict { with: String },
    /// Sólo lo produce `selectability`: otro trail ocupa el par inicial.
    TrailLocked { first_trail: String },
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Cambios que produjo una operación de agregar o quitar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionChange {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SelectionChange {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionStats {
    pub selected_credits: u32,
    pub selected_count: usize,
    /// Con signo: si se baja un tope por debajo de lo seleccionado queda negativo
    pub remaining_credits: i64,
    pub remaining_courses: i64,
}

/// Vista que consume la capa de presentación tras cada mutación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSnapshot {
    pub selected: Vec<String>,
    pub stats: SelectionStats,
    pub limits: Limits,
    pub trail: TrailProgress,
    pub query: CourseQuery,
}

/// Cursos seleccionados que pertenecen al trail `trail`.
fn trail_courses<'a>(catalog: &'a Catalog, selected: &'a BTreeSet<String>, trail: &'a str) -> impl Iterator<Item = &'a Course> {
    selected
        .iter()
        .filter_map(|code| catalog.get(code))
        .filter(move |c| c.trail.as_deref() == Some(trail))
}

fn count_trail(catalog: &Catalog, selected: &BTreeSet<String>, trail: &str) -> usize {
    trail_courses(catalog, selected, trail).count()
}

#[derive(Debug, Clone)]
pub struct SelectionEngine {
    catalog: Arc<Catalog>,
    groups: Arc<AlternativeGroups>,
    selected: BTreeSet<String>,
    limits: Limits,
    trail_lock: TrailLock,
    query: CourseQuery,
}

impl SelectionEngine {
    pub fn new(catalog: Arc<Catalog>, groups: Arc<AlternativeGroups>) -> Self {
        SelectionEngine {
            catalog,
            groups,
            selected: BTreeSet::new(),
            limits: Limits::default(),
            trail_lock: TrailLock::default(),
            query: CourseQuery::default(),
        }
    }

    pub fn with_limits(catalog: Arc<Catalog>, groups: Arc<AlternativeGroups>, limits: Limits) -> Result<Self> {
        limits.validate()?;
        let mut engine = Self::new(catalog, groups);
        engine.limits = limits;
        Ok(engine)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn alternative_groups(&self) -> &AlternativeGroups {
        &self.groups
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.selected.contains(code)
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Cambia los topes. No expulsa cursos ya seleccionados: sólo bloquea
    /// adiciones futuras.
    pub fn set_limits(&mut self, limits: Limits) -> Result<()> {
        limits.validate()?;
        debug!(max_credits = limits.max_credits, max_courses = limits.max_courses, "limits changed");
        self.limits = limits;
        Ok(())
    }

    pub fn trail_lock(&self) -> &TrailLock {
        &self.trail_lock
    }

    pub fn query(&self) -> &CourseQuery {
        &self.query
    }

    pub fn set_query(&mut self, query: CourseQuery) {
        self.query = query;
    }

    pub fn selected_credits(&self) -> u32 {
        self.selected
            .iter()
            .filter_map(|c| self.catalog.get(c))
            .fold(0u32, |acc, c| acc.saturating_add(c.credits))
    }

    pub fn trail_count(&self, trail: &str) -> usize {
        count_trail(&self.catalog, &self.selected, trail)
    }

    pub fn trail_credits(&self, trail: &str) -> u32 {
        trail_courses(&self.catalog, &self.selected, trail).fold(0u32, |acc, c| acc.saturating_add(c.credits))
    }

    pub fn first_trail_count(&self) -> usize {
        self.trail_lock.first_trail.as_deref().map(|t| self.trail_count(t)).unwrap_or(0)
    }

    pub fn total_trail_courses(&self) -> usize {
        self.selected.iter().filter_map(|c| self.catalog.get(c)).filter(|c| c.is_trail()).count()
    }

    /// Evalúa desde cero (sin caché) si `code` puede agregarse: no
    /// seleccionado, dentro de ambos topes y sin conflicto de alternativas.
    pub fn availability(&self, code: &str) -> Availability {
        let Some(course) = self.catalog.get(code) else {
            return Availability::Unknown;
        };
        if self.selected.contains(code) {
            return Availability::AlreadySelected;
        }
        let selected_credits = self.selected_credits();
        // Un desborde nunca cabe bajo el tope
        if selected_credits.checked_add(course.credits).is_none_or(|total| total > self.limits.max_credits) {
            return Availability::CreditCapExceeded {
                selected_credits,
                course_credits: course.credits,
                max_credits: self.limits.max_credits,
            };
        }
        if self.selected.len() + 1 > self.limits.max_courses {
            return Availability::CourseCapExceeded { max_courses: self.limits.max_courses };
        }
        if let Some(other) = self.groups.conflicting_member(code, &self.selected) {
            return Availability::AlternativeConflict { with: other.to_string() };
        }
        Availability::Available
    }

    pub fn is_available(&self, code: &str) -> bool {
        self.availability(code).is_available()
    }

    /// `availability` más la regla del par de trails. Es el chequeo que debe
    /// usar la presentación antes de una adición iniciada por el usuario.
    pub fn selectability(&self, code: &str) -> Availability {
        let verdict = self.availability(code);
        if !verdict.is_available() {
            return verdict;
        }
        match (self.catalog.get(code), &self.trail_lock.first_trail) {
            (Some(course), Some(first)) if !passes_trail_gate(course, &self.trail_lock, self.first_trail_count()) => {
                Availability::TrailLocked { first_trail: first.clone() }
            }
            _ => Availability::Available,
        }
    }

    pub fn can_select(&self, code: &str) -> bool {
        self.selectability(code).is_available()
    }

    /// Agrega `code` y sus corequisitos. No vuelve a verificar
    /// disponibilidad: los corequisitos entran siempre junto al curso padre.
    /// Códigos desconocidos o ya seleccionados no cambian nada.
    pub fn add_course(&mut self, code: &str) -> SelectionChange {
        let catalog = Arc::clone(&self.catalog);
        let Some(course) = catalog.get(code) else {
            debug!(code, "add ignored: unknown course");
            return SelectionChange::default();
        };
        if self.selected.contains(code) {
            debug!(code, "add ignored: already selected");
            return SelectionChange::default();
        }

        // Transición del trail con los conteos previos a la adición
        if let Some(trail) = &course.trail {
            let selected = &self.selected;
            self.trail_lock.on_selected(trail, |t| count_trail(&catalog, selected, t));
        }

        let mut change = SelectionChange::default();
        for coreq in course.corequisites.iter() {
            if self.selected.insert(coreq.clone()) {
                change.added.push(coreq.clone());
            }
        }
        self.selected.insert(course.code.clone());
        change.added.push(course.code.clone());

        self.query.clear_search();
        debug!(code, added = ?change.added, lock = ?self.trail_lock, "course added");
        change
    }

    /// Quita `code` y los corequisitos que ningún otro curso seleccionado
    /// siga exigiendo. Libera el lock de trail que quede sin cursos.
    pub fn remove_course(&mut self, code: &str) -> SelectionChange {
        let catalog = Arc::clone(&self.catalog);
        let Some(course) = catalog.get(code) else {
            debug!(code, "remove ignored: unknown course");
            return SelectionChange::default();
        };
        if !self.selected.remove(code) {
            debug!(code, "remove ignored: not selected");
            return SelectionChange::default();
        }

        let mut change = SelectionChange { added: Vec::new(), removed: vec![course.code.clone()] };
        for coreq in course.corequisites.iter() {
            if !self.selected.contains(coreq) {
                continue;
            }
            let still_required = catalog
                .required_by(coreq)
                .any(|parent| parent != code && self.selected.contains(parent));
            if !still_required {
                self.selected.remove(coreq);
                change.removed.push(coreq.clone());
            }
        }

        let selected = &self.selected;
        self.trail_lock.release_empty(|t| count_trail(&catalog, selected, t));

        self.query.clear_search();
        debug!(code, removed = ?change.removed, lock = ?self.trail_lock, "course removed");
        change
    }

    /// Vacía la selección y reinicia el lock de trails.
    pub fn clear_all(&mut self) {
        self.selected.clear();
        self.trail_lock.clear();
        debug!("selection cleared");
    }

    pub fn stats(&self) -> SelectionStats {
        let selected_credits = self.selected_credits();
        let selected_count = self.selected.len();
        SelectionStats {
            selected_credits,
            selected_count,
            remaining_credits: i64::from(self.limits.max_credits) - i64::from(selected_credits),
            remaining_courses: self.limits.max_courses as i64 - selected_count as i64,
        }
    }

    pub fn trail_progress(&self) -> TrailProgress {
        self.trail_lock
            .progress(|t| self.trail_count(t), |t| self.trail_credits(t), self.total_trail_courses())
    }

    /// Códigos seleccionados en el orden del catálogo
    pub fn selected_in_catalog_order(&self) -> Vec<String> {
        let mut codes: Vec<&String> = self.selected.iter().collect();
        codes.sort_by_key(|c| self.catalog.position(c));
        codes.into_iter().cloned().collect()
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            selected: self.selected_in_catalog_order(),
            stats: self.stats(),
            limits: self.limits,
            trail: self.trail_progress(),
            query: self.query.clone(),
        }
    }

    /// Cursos no seleccionados visibles con la consulta activa.
    pub fn visible_available(&self) -> Vec<&Course> {
        let pool = self.catalog.courses().iter().filter(|c| !self.selected.contains(&c.code));
        visible_courses(pool, &self.query, &self.trail_lock, self.first_trail_count())
    }

    /// Cursos seleccionados visibles con la consulta activa.
    pub fn visible_selected(&self) -> Vec<&Course> {
        let pool = self.catalog.courses().iter().filter(|c| self.selected.contains(&c.code));
        visible_courses(pool, &self.query, &self.trail_lock, self.first_trail_count())
    }

    /// Prerequisitos de `code` que no están seleccionados. Informativo: no
    /// bloquea la selección.
    pub fn missing_prerequisites(&self, code: &str) -> Vec<String> {
        match self.catalog.get(code) {
            Some(course) => course
                .prerequisites
                .iter()
                .filter(|p| !self.selected.contains(p.as_str()))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }
}
