// Grupos de alternativas: cursos mutuamente excluyentes. Tabla estática,
// no se deriva de los campos del catálogo.
use std::collections::{BTreeSet, HashMap};

use crate::error::{PlannerError, Result};

/// Tabla por defecto. Cada grupo tiene 2+ códigos y los grupos son disjuntos.
pub const DEFAULT_ALTERNATIVE_GROUPS: &[&[&str]] = &[
    &["POL101", "POL104"],
    &["HIS101", "HIS102", "HIS103"],
    &["ENG102", "ENG105"],
    &["PHI101", "PHI104"],
    &["BEN205", "EMB101"],
];

#[derive(Debug, Clone, Default)]
pub struct AlternativeGroups {
    groups: Vec<Vec<String>>,
    /// código -> índice del grupo en `groups`
    index: HashMap<String, usize>,
}

impl AlternativeGroups {
    /// Construye el índice validando que cada grupo tenga al menos dos
    /// miembros distintos y que ningún código aparezca en dos grupos.
    pub fn new<G, S>(groups: G) -> Result<Self>
    where
        G: IntoIterator,
        G::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = AlternativeGroups::default();
        for group in groups {
            let members: BTreeSet<String> = group.into_iter().map(|c| c.as_ref().trim().to_string()).collect();
            if members.len() < 2 {
                return Err(PlannerError::InvalidAlternativeGroups(format!(
                    "group {:?} needs at least two distinct codes",
                    members
                )));
            }
            let gi = out.groups.len();
            for code in members.iter() {
                if out.index.insert(code.clone(), gi).is_some() {
                    return Err(PlannerError::InvalidAlternativeGroups(format!(
                        "code {} belongs to more than one group",
                        code
                    )));
                }
            }
            out.groups.push(members.into_iter().collect());
        }
        Ok(out)
    }

    /// Índice con la tabla `DEFAULT_ALTERNATIVE_GROUPS`.
    pub fn default_groups() -> Self {
        // La tabla estática es disjunta; un error aquí es un bug de la tabla.
        Self::new(DEFAULT_ALTERNATIVE_GROUPS.iter().map(|g| g.iter().copied()))
            .unwrap_or_else(|e| panic!("DEFAULT_ALTERNATIVE_GROUPS is malformed: {}", e))
    }

    /// Grupo completo al que pertenece `code` (incluye `code`), o vacío.
    pub fn group_of(&self, code: &str) -> &[String] {
        match self.index.get(code) {
            Some(&gi) => &self.groups[gi],
            None => &[],
        }
    }

    /// Primer otro miembro del grupo de `code` que ya esté seleccionado.
    pub fn conflicting_member<'a>(&'a self, code: &str, selected: &BTreeSet<String>) -> Option<&'a str> {
        self.group_of(code)
            .iter()
            .find(|m| m.as_str() != code && selected.contains(m.as_str()))
            .map(String::as_str)
    }

    /// true si otro miembro del grupo de `code` ya está en `selected`.
    pub fn conflicts_with(&self, code: &str, selected: &BTreeSet<String>) -> bool {
        self.conflicting_member(code, selected).is_some()
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }
}
