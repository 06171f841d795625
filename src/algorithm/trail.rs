//! Seguimiento de electivos especializados ("trails").
//!
//! Regla "2 + 1": los dos primeros cursos de trail seleccionados deben ser
//! del mismo trail; el tercero puede venir de cualquier trail. El tracker no
//! guarda contadores: el motor le entrega una función que cuenta sobre la
//! selección actual, de modo que el lock nunca se desincroniza.
use serde::Serialize;

/// Cursos que completan el primer trail
pub const FIRST_TRAIL_REQUIRED_COURSES: usize = 2;
pub const FIRST_TRAIL_REQUIRED_CREDITS: u32 = 6;
/// Cursos que completan el tercer cupo
pub const THIRD_SLOT_REQUIRED_COURSES: usize = 1;
pub const THIRD_SLOT_REQUIRED_CREDITS: u32 = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrailLock {
    pub first_trail: Option<String>,
    pub third_trail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrailProgress {
    pub first_trail: Option<String>,
    pub first_count: usize,
    pub first_credits: u32,
    pub first_complete: bool,
    pub third_trail: Option<String>,
    pub third_count: usize,
    pub third_credits: u32,
    pub third_complete: bool,
    pub total_trail_courses: usize,
}

impl TrailLock {
    /// Transición al seleccionar un curso del trail `trail`.
    /// `count` devuelve cuántos cursos de un trail hay seleccionados ANTES
    /// de agregar el curso.
    pub fn on_selected<F>(&mut self, trail: &str, count: F)
    where
        F: Fn(&str) -> usize,
    {
        match &self.first_trail {
            None => {
                self.first_trail = Some(trail.to_string());
            }
            Some(first) => {
                if count(first.as_str()) == FIRST_TRAIL_REQUIRED_COURSES && self.third_trail.is_none() {
                    self.third_trail = Some(trail.to_string());
                }
            }
        }
    }

    /// Transición al quitar cursos: libera cualquier lock cuyo trail haya
    /// quedado sin cursos seleccionados. `count` cuenta DESPUÉS de quitar.
    /// Si el tercer cupo lo ocupaba el mismo primer trail, se libera apenas
    /// ese trail vuelve a tener sólo el par.
    pub fn release_empty<F>(&mut self, count: F)
    where
        F: Fn(&str) -> usize,
    {
        let first_count = self.first_trail.as_deref().map(&count);
        if self.third_trail.is_some()
            && self.third_trail == self.first_trail
            && first_count.is_some_and(|n| n <= FIRST_TRAIL_REQUIRED_COURSES)
        {
            self.third_trail = None;
        }
        if self.first_trail.as_deref().is_some_and(|t| count(t) == 0) {
            self.first_trail = None;
        }
        if self.third_trail.as_deref().is_some_and(|t| count(t) == 0) {
            self.third_trail = None;
        }
    }

    pub fn clear(&mut self) {
        self.first_trail = None;
        self.third_trail = None;
    }

    /// Progreso de los cupos. `count` y `credits` cuentan cursos y créditos
    /// seleccionados de un trail; `total_trail_courses` lo entrega el motor.
    pub fn progress<F, C>(&self, count: F, credits: C, total_trail_courses: usize) -> TrailProgress
    where
        F: Fn(&str) -> usize,
        C: Fn(&str) -> u32,
    {
        let first_count = self.first_trail.as_deref().map(&count).unwrap_or(0);
        let first_credits = self.first_trail.as_deref().map(&credits).unwrap_or(0);
        let (third_count, third_credits) = match (&self.third_trail, &self.first_trail) {
            // Mismo trail en ambos cupos: lo que exceda el par cuenta para el tercero
            (Some(third), Some(first)) if third == first => (
                first_count.saturating_sub(FIRST_TRAIL_REQUIRED_COURSES),
                first_credits.saturating_sub(FIRST_TRAIL_REQUIRED_CREDITS),
            ),
            (Some(third), _) => (count(third.as_str()), credits(third.as_str())),
            (None, _) => (0, 0),
        };
        TrailProgress {
            first_trail: self.first_trail.clone(),
            first_count,
            first_credits,
            first_complete: first_count >= FIRST_TRAIL_REQUIRED_COURSES && first_credits >= FIRST_TRAIL_REQUIRED_CREDITS,
            third_trail: self.third_trail.clone(),
            third_count,
            third_credits,
            third_complete: third_count >= THIRD_SLOT_REQUIRED_COURSES && third_credits >= THIRD_SLOT_REQUIRED_CREDITS,
            total_trail_courses,
        }
    }
}
