//! Catálogo inmutable de cursos.
//!
//! Conserva el orden de carga (los filtros devuelven subsecuencias en ese
//! orden), un índice `código -> posición` y el índice inverso de
//! corequisitos `corequisito -> cursos que lo exigen`.

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeSet, HashMap, HashSet};
use strsim::jaro_winkler;
use tracing::warn;

use crate::error::{PlannerError, Result};
use crate::models::Course;

/// Umbral mínimo de similitud para sugerencias "¿quisiste decir?"
const SUGGEST_THRESHOLD: f64 = 0.80;

#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
    index: HashMap<String, usize>,
    required_by: HashMap<String, BTreeSet<String>>,
}

impl Catalog {
    /// Construye y valida el catálogo. Rechaza listas vacías, códigos
    /// duplicados, créditos en cero y corequisitos que no existen.
    pub fn new(courses: Vec<Course>) -> Result<Self> {
        if courses.is_empty() {
            return Err(PlannerError::EmptyCatalog);
        }

        let mut courses = courses;
        let mut index: HashMap<String, usize> = HashMap::with_capacity(courses.len());
        for (i, course) in courses.iter_mut().enumerate() {
            course.code = course.code.trim().to_string();
            if course.code.is_empty() {
                return Err(PlannerError::InvalidCatalog(format!("course at position {} has an empty code", i)));
            }
            if course.credits == 0 {
                return Err(PlannerError::InvalidCatalog(format!("course {} has zero credits", course.code)));
            }
            for list in [&mut course.prerequisites, &mut course.corequisites] {
                *list = list.iter().map(|c| c.trim().to_string()).filter(|c| !c.is_empty()).collect();
            }
            course.tag_trail();
            if index.insert(course.code.clone(), i).is_some() {
                return Err(PlannerError::InvalidCatalog(format!("duplicate course code {}", course.code)));
            }
        }

        let mut required_by: HashMap<String, BTreeSet<String>> = HashMap::new();
        for course in courses.iter() {
            for coreq in course.corequisites.iter() {
                if !index.contains_key(coreq) {
                    return Err(PlannerError::InvalidCatalog(format!(
                        "course {} lists unknown corequisite {}",
                        course.code, coreq
                    )));
                }
                if coreq == &course.code {
                    return Err(PlannerError::InvalidCatalog(format!("course {} lists itself as corequisite", course.code)));
                }
                required_by.entry(coreq.clone()).or_default().insert(course.code.clone());
            }
            for pre in course.prerequisites.iter() {
                if !index.contains_key(pre) {
                    warn!(course = %course.code, prerequisite = %pre, "prerequisite not present in catalog");
                }
            }
        }

        let catalog = Catalog { courses, index, required_by };
        if catalog.has_prerequisite_cycle() {
            warn!("catalog prerequisites contain a cycle");
        }
        Ok(catalog)
    }

    pub fn get(&self, code: &str) -> Option<&Course> {
        self.index.get(code).map(|&i| &self.courses[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Cursos en orden de carga
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Posición de carga de un código; sirve para ordenar listados.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.index.get(code).copied()
    }

    /// Códigos de los cursos que listan `code` como corequisito.
    pub fn required_by(&self, code: &str) -> impl Iterator<Item = &str> {
        self.required_by.get(code).into_iter().flat_map(|s| s.iter().map(String::as_str))
    }

    /// Categorías distintas en orden de aparición
    pub fn categories(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();
        for c in self.courses.iter() {
            if seen.insert(c.category.as_str()) {
                out.push(c.category.clone());
            }
        }
        out
    }

    /// Grafo de prerequisitos (arista prerequisito -> curso). Los
    /// prerequisitos fuera del catálogo se omiten.
    pub fn prerequisite_graph(&self) -> (DiGraph<String, ()>, HashMap<String, NodeIndex>) {
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();
        for c in self.courses.iter() {
            let idx = graph.add_node(c.code.clone());
            node_map.insert(c.code.clone(), idx);
        }
        for c in self.courses.iter() {
            for pre in c.prerequisites.iter() {
                if let (Some(&from), Some(&to)) = (node_map.get(pre), node_map.get(&c.code)) {
                    if graph.find_edge(from, to).is_none() {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }
        (graph, node_map)
    }

    pub fn has_prerequisite_cycle(&self) -> bool {
        let (graph, _) = self.prerequisite_graph();
        is_cyclic_directed(&graph)
    }

    /// Sugiere códigos parecidos a `term` comparando contra código y nombre.
    /// Devuelve como máximo `limit` códigos, del más al menos parecido.
    pub fn suggest(&self, term: &str, limit: usize) -> Vec<String> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut scored: Vec<(f64, usize)> = self
            .courses
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let by_code = jaro_winkler(&needle, &c.code.to_lowercase());
                let by_name = jaro_winkler(&needle, &c.name.to_lowercase());
                (by_code.max(by_name), i)
            })
            .filter(|(score, _)| *score >= SUGGEST_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(&b.1)));
        scored.into_iter().take(limit).map(|(_, i)| self.courses[i].code.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CourseType;

    fn sample() -> Vec<Course> {
        vec![
            Course::new("CSE470", "Software Engineering", 3, CourseType::Lecture, "Core").with_corequisites(&["CSE470L"]),
            Course::new("CSE470L", "Software Engineering Lab", 1, CourseType::Lab, "Core"),
            Course::new("CSE440", "Artificial Intelligence", 3, CourseType::Lecture, "AI Trail").with_prerequisites(&["CSE220"]),
        ]
    }

    #[test]
    fn test_catalog_indexes_and_tags() {
        let cat = Catalog::new(sample()).expect("valid catalog");
        assert_eq!(cat.len(), 3);
        assert_eq!(cat.get("CSE440").and_then(|c| c.trail.as_deref()), Some("AI Trail"));
        assert_eq!(cat.required_by("CSE470L").collect::<Vec<_>>(), vec!["CSE470"]);
        assert_eq!(cat.required_by("CSE440").count(), 0);
        assert_eq!(cat.categories(), vec!["Core".to_string(), "AI Trail".to_string()]);
    }

    #[test]
    fn test_catalog_rejects_bad_input() {
        assert!(matches!(Catalog::new(Vec::new()), Err(PlannerError::EmptyCatalog)));

        let mut dup = sample();
        dup.push(Course::new("CSE470", "Dup", 3, CourseType::Lecture, "Core"));
        assert!(matches!(Catalog::new(dup), Err(PlannerError::InvalidCatalog(_))));

        let zero = vec![Course::new("Z1", "Zero", 0, CourseType::Lecture, "Core")];
        assert!(matches!(Catalog::new(zero), Err(PlannerError::InvalidCatalog(_))));

        let dangling = vec![Course::new("A1", "A", 3, CourseType::Lecture, "Core").with_corequisites(&["NOPE"])];
        assert!(matches!(Catalog::new(dangling), Err(PlannerError::InvalidCatalog(_))));
    }

    #[test]
    fn test_requisite_codes_are_trimmed() {
        let courses = vec![
            Course::new(" CSE470 ", "Software Engineering", 3, CourseType::Lecture, "Core")
                .with_corequisites(&[" CSE470L", ""])
                .with_prerequisites(&["CSE370 "]),
            Course::new("CSE470L", "Software Engineering Lab", 1, CourseType::Lab, "Core"),
        ];
        let cat = Catalog::new(courses).expect("padded codes are accepted");
        assert_eq!(cat.get("CSE470").map(|c| c.corequisites.clone()), Some(vec!["CSE470L".to_string()]));
        assert_eq!(cat.get("CSE470").map(|c| c.prerequisites.clone()), Some(vec!["CSE370".to_string()]));
        assert_eq!(cat.required_by("CSE470L").collect::<Vec<_>>(), vec!["CSE470"]);
    }

    #[test]
    fn test_prerequisite_cycle_detection() {
        let courses = vec![
            Course::new("A1", "A", 3, CourseType::Lecture, "Core").with_prerequisites(&["B1"]),
            Course::new("B1", "B", 3, CourseType::Lecture, "Core").with_prerequisites(&["A1"]),
        ];
        let cat = Catalog::new(courses).expect("cycles are tolerated");
        assert!(cat.has_prerequisite_cycle());
        assert!(!Catalog::new(sample()).unwrap().has_prerequisite_cycle());
    }

    #[test]
    fn test_suggest_close_codes() {
        let cat = Catalog::new(sample()).unwrap();
        let s = cat.suggest("cse47", 2);
        assert!(!s.is_empty());
        assert!(s[0].starts_with("CSE47"));
        assert!(cat.suggest("   ", 3).is_empty());
    }
}
