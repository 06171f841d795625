//! Módulo de filtros sobre el catálogo.
//!
//! Deriva la lista visible a partir del término de búsqueda, la categoría,
//! el tipo y el estado del lock de trails. Es una función pura: se vuelve a
//! evaluar completa en cada cambio de selección o de filtros.

use serde::{Deserialize, Serialize};

use crate::algorithm::trail::{TrailLock, FIRST_TRAIL_REQUIRED_COURSES};
use crate::models::{Course, CourseType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub course_type: Option<CourseType>,
}

impl CourseQuery {
    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.category.as_deref().is_none_or(str::is_empty) && self.course_type.is_none()
    }
}

/// Devuelve la subsecuencia (en el mismo orden) de `courses` que pasa todos
/// los filtros. `first_trail_count` es la cantidad de cursos seleccionados
/// del primer trail fijado.
pub fn visible_courses<'a, I>(courses: I, query: &CourseQuery, lock: &TrailLock, first_trail_count: usize) -> Vec<&'a Course>
where
    I: IntoIterator<Item = &'a Course>,
{
    let needle = query.search.trim().to_lowercase();
    courses
        .into_iter()
        .filter(|c| matches_search(c, &needle))
        .filter(|c| matches_category(c, query.category.as_deref()))
        .filter(|c| query.course_type.is_none_or(|t| c.course_type == t))
        .filter(|c| passes_trail_gate(c, lock, first_trail_count))
        .collect()
}

/// Búsqueda por subcadena sin distinguir mayúsculas en código, nombre o
/// categoría. `needle` ya viene en minúsculas.
fn matches_search(course: &Course, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    course.code.to_lowercase().contains(needle)
        || course.name.to_lowercase().contains(needle)
        || course.category.to_lowercase().contains(needle)
}

fn matches_category(course: &Course, category: Option<&str>) -> bool {
    match category {
        Some(cat) if !cat.is_empty() => course.category == cat,
        _ => true,
    }
}

/// Oculta los trails que compiten con el primer trail mientras el par no
/// esté completo. Con el par completo el tercer cupo admite cualquier trail.
pub fn passes_trail_gate(course: &Course, lock: &TrailLock, first_trail_count: usize) -> bool {
    match (&course.trail, &lock.first_trail) {
        (Some(trail), Some(first)) => first_trail_count >= FIRST_TRAIL_REQUIRED_COURSES || trail == first,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Course> {
        vec![
            Course::new("CSE220", "Data Structures", 3, CourseType::Lecture, "Core"),
            Course::new("CSE220L", "Data Structures Lab", 1, CourseType::Lab, "Core"),
            Course::new("CSE440", "Artificial Intelligence", 3, CourseType::Lecture, "AI Trail"),
            Course::new("CSE421", "Computer Networks", 3, CourseType::Lecture, "Networks Trail"),
            Course::new("POL101", "Bangladesh Studies", 3, CourseType::Lecture, "GED"),
        ]
    }

    fn codes(v: &[&Course]) -> Vec<String> {
        v.iter().map(|c| c.code.clone()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_over_code_name_category() {
        let all = catalog();
        let lock = TrailLock::default();
        let q = CourseQuery { search: "  data ".into(), ..Default::default() };
        assert_eq!(codes(&visible_courses(&all, &q, &lock, 0)), vec!["CSE220", "CSE220L"]);

        let q = CourseQuery { search: "trail".into(), ..Default::default() };
        assert_eq!(codes(&visible_courses(&all, &q, &lock, 0)), vec!["CSE440", "CSE421"]);

        let q = CourseQuery { search: "pol1".into(), ..Default::default() };
        assert_eq!(codes(&visible_courses(&all, &q, &lock, 0)), vec!["POL101"]);
    }

    #[test]
    fn test_category_and_type_are_exact() {
        let all = catalog();
        let lock = TrailLock::default();
        let q = CourseQuery { category: Some("Core".into()), course_type: Some(CourseType::Lab), ..Default::default() };
        assert_eq!(codes(&visible_courses(&all, &q, &lock, 0)), vec!["CSE220L"]);

        let q = CourseQuery { category: Some("core".into()), ..Default::default() };
        assert!(visible_courses(&all, &q, &lock, 0).is_empty());

        let q = CourseQuery { category: Some(String::new()), ..Default::default() };
        assert_eq!(visible_courses(&all, &q, &lock, 0).len(), all.len());
    }

    #[test]
    fn test_trail_gate_hides_competing_trails_until_pair_complete() {
        let all = catalog();
        let lock = TrailLock { first_trail: Some("AI Trail".into()), third_trail: None };
        let q = CourseQuery::default();

        let visible = codes(&visible_courses(&all, &q, &lock, 1));
        assert!(visible.contains(&"CSE440".to_string()));
        assert!(!visible.contains(&"CSE421".to_string()));
        assert!(visible.contains(&"CSE220".to_string()));

        let visible = codes(&visible_courses(&all, &q, &lock, 2));
        assert!(visible.contains(&"CSE421".to_string()));
    }

    #[test]
    fn test_query_is_empty() {
        assert!(CourseQuery::default().is_empty());
        assert!(CourseQuery { search: "   ".into(), category: Some(String::new()), course_type: None }.is_empty());
        assert!(!CourseQuery { course_type: Some(CourseType::Lab), ..Default::default() }.is_empty());
    }
}
