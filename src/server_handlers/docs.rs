use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::api_json::{CreateSessionRequest, QueryRequest};
use crate::server::AppState;

/// GET /catalog
/// Lista todos los cursos en orden de carga y las categorías disponibles.
pub async fn catalog_handler(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "courses": state.catalog.courses(),
        "categories": state.catalog.categories(),
        "alternative_groups": state.groups.groups(),
    }))
}

pub async fn help_handler(state: web::Data<AppState>) -> impl Responder {
    let limits = state.config.default_limits;
    let create_example = CreateSessionRequest {
        max_credits: Some(limits.max_credits),
        max_courses: Some(limits.max_courses),
    };
    let query_example = QueryRequest {
        search: Some("data".to_string()),
        category: Some("Core".to_string()),
        course_type: Some("lab".to_string()),
    };

    let help = json!({
        "description": "Planificador de semestre: crea una sesión, agrega o quita cursos respetando topes, alternativas, corequisitos y trails.",
        "endpoints": [
            "GET /catalog",
            "POST /sessions",
            "GET /sessions/{id}",
            "DELETE /sessions/{id}",
            "PUT /sessions/{id}/limits",
            "PUT /sessions/{id}/query",
            "GET /sessions/{id}/courses?view=available|selected",
            "POST /sessions/{id}/courses/{code}",
            "DELETE /sessions/{id}/courses/{code}",
            "DELETE /sessions/{id}/courses"
        ],
        "create_session_example": create_example,
        "query_example": query_example,
        "note": "POST /sessions/{id}/courses/{code} responde 409 con el motivo si el curso no se puede seleccionar y 404 con sugerencias si el código no existe."
    });

    HttpResponse::Ok().json(help)
}
