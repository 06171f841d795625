use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use crate::error::Result;

/// Texto de una celda tal como lo consume el catálogo. Créditos y códigos
/// numéricos llegan como `Float` y se escriben sin decimales si son enteros
/// representables; errores de fórmula cuentan como celda vacía.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => integral_text(*f).unwrap_or_else(|| f.to_string()),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(d) => d.to_string(),
    }
}

fn integral_text(f: f64) -> Option<String> {
    // 2^63 ya no cabe en i64
    if !f.is_finite() || f.fract() != 0.0 || f.abs() >= i64::MAX as f64 {
        return None;
    }
    Some((f as i64).to_string())
}

/// Normaliza encabezados eliminando espacios, guiones bajos y acentos
/// comunes, y pasando a minúsculas.
pub fn normalize_header(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .collect()
}

/// Separa una celda con lista de códigos ("CSE110, CSE111;CSE112").
pub fn split_code_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|p| p.trim())
        .filter(|p| !p.is_empty() && *p != "-")
        .map(|p| p.to_string())
        .collect()
}

/// Lee la primera hoja del libro y la devuelve como Vec<Vec<String>>.
pub fn read_first_sheet<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path)?;

    let names = workbook.sheet_names().to_owned();
    let Some(first) = names.first() else {
        return Ok(Vec::new());
    };

    let range = workbook.worksheet_range(first)?;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for r in range.rows() {
        rows.push(r.iter().map(cell_text).collect());
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" Pre Requisitos "), "prerequisitos");
        assert_eq!(normalize_header("Créditos"), "creditos");
        assert_eq!(normalize_header("course_type"), "coursetype");
    }

    #[test]
    fn test_split_code_list() {
        assert_eq!(split_code_list("CSE110, CSE111;CSE112"), vec!["CSE110", "CSE111", "CSE112"]);
        assert!(split_code_list("-").is_empty());
        assert!(split_code_list("").is_empty());
    }

    #[test]
    fn test_cell_text_numbers_and_strings() {
        assert_eq!(cell_text(&Data::Float(3.0)), "3");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Float(-0.0)), "0");
        assert_eq!(cell_text(&Data::String("  AI Trail ".to_string())), "AI Trail");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn test_cell_text_out_of_range_float_is_not_truncated() {
        let huge = 1e20_f64;
        assert_eq!(cell_text(&Data::Float(huge)), huge.to_string());
        assert_eq!(cell_text(&Data::Float(f64::NAN)), "NaN");
    }
}
