use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::algorithm::{Availability, Limits};
use crate::api_json::{CourseView, CreateSessionRequest, MutationView, QueryRequest, SessionView};
use crate::server::{AppState, Session};

/// Cantidad de sugerencias para un código desconocido
const SUGGESTIONS: usize = 3;

fn session_not_found(id: u64) -> HttpResponse {
    HttpResponse::NotFound().json(json!({"error": format!("session {} not found", id)}))
}

fn session_view(state: &AppState, id: u64, session: &Session) -> SessionView {
    SessionView::build(id, session.created_at, &session.engine, &state.config.cost)
}

/// POST /sessions
/// Cuerpo opcional `{max_credits, max_courses}`; sin cuerpo usa los topes
/// por defecto de la configuración.
pub async fn create_session_handler(
    state: web::Data<AppState>,
    body: Option<web::Json<CreateSessionRequest>>,
) -> impl Responder {
    let req = body.map(|b| b.into_inner()).unwrap_or_default();
    let limits = match req.limits(state.config.default_limits) {
        Ok(l) => l,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
    };
    let id = match state.create_session(limits) {
        Ok(id) => id,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
    };
    match state.with_session(id, |s| session_view(&state, id, s)) {
        Some(view) => HttpResponse::Created().json(view),
        None => session_not_found(id),
    }
}

/// GET /sessions/{id}
pub async fn get_session_handler(state: web::Data<AppState>, path: web::Path<u64>) -> impl Responder {
    let id = path.into_inner();
    match state.with_session(id, |s| session_view(&state, id, s)) {
        Some(view) => HttpResponse::Ok().json(view),
        None => session_not_found(id),
    }
}

/// DELETE /sessions/{id}
pub async fn delete_session_handler(state: web::Data<AppState>, path: web::Path<u64>) -> impl Responder {
    let id = path.into_inner();
    if state.remove_session(id) {
        HttpResponse::Ok().json(json!({"status": "ok"}))
    } else {
        session_not_found(id)
    }
}

/// PUT /sessions/{id}/limits
/// No expulsa cursos ya seleccionados: sólo bloquea adiciones futuras.
pub async fn set_limits_handler(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<Limits>,
) -> impl Responder {
    let id = path.into_inner();
    let limits = body.into_inner();
    let result = state.with_session(id, |s| {
        s.engine.set_limits(limits).map(|_| session_view(&state, id, s))
    });
    match result {
        Some(Ok(view)) => HttpResponse::Ok().json(view),
        Some(Err(e)) => HttpResponse::BadRequest().json(json!({"error": e.to_string()})),
        None => session_not_found(id),
    }
}

/// PUT /sessions/{id}/query
pub async fn set_query_handler(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    body: web::Json<QueryRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let query = match body.to_query() {
        Ok(q) => q,
        Err(e) => return HttpResponse::BadRequest().json(json!({"error": e})),
    };
    match state.with_session(id, |s| {
        s.engine.set_query(query);
        session_view(&state, id, s)
    }) {
        Some(view) => HttpResponse::Ok().json(view),
        None => session_not_found(id),
    }
}

#[derive(Debug, Deserialize)]
pub struct CoursesListQuery {
    #[serde(default)]
    pub view: Option<String>,
}

/// GET /sessions/{id}/courses?view=available|selected
/// Lista visible según la consulta activa de la sesión. Por defecto `available`.
pub async fn list_courses_handler(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    query: web::Query<CoursesListQuery>,
) -> impl Responder {
    let id = path.into_inner();
    let view = query.view.as_deref().unwrap_or("available").to_lowercase();
    if view != "available" && view != "selected" {
        return HttpResponse::BadRequest().json(json!({"error": format!("unknown view '{}'", view)}));
    }

    let result = state.with_session(id, |s| {
        let courses = if view == "selected" {
            s.engine.visible_selected()
        } else {
            s.engine.visible_available()
        };
        courses
            .into_iter()
            .map(|c| CourseView::build(&s.engine, c))
            .collect::<Vec<_>>()
    });
    match result {
        Some(courses) => HttpResponse::Ok().json(json!({"view": view, "courses": courses})),
        None => session_not_found(id),
    }
}

/// POST /sessions/{id}/courses/{code}
/// Agrega el curso si pasa la disponibilidad y la regla de trails. 409 con
/// el motivo si no; 404 con sugerencias si el código no existe.
pub async fn add_course_handler(state: web::Data<AppState>, path: web::Path<(u64, String)>) -> impl Responder {
    let (id, code) = path.into_inner();
    let result = state.with_session(id, |s| match s.engine.selectability(&code) {
        Availability::Available => {
            let change = s.engine.add_course(&code);
            Ok(MutationView { change, session: session_view(&state, id, s) })
        }
        other => Err(other),
    });

    match result {
        Some(Ok(view)) => HttpResponse::Ok().json(view),
        Some(Err(Availability::Unknown)) => HttpResponse::NotFound().json(json!({
            "error": format!("unknown course {}", code),
            "suggestions": state.catalog.suggest(&code, SUGGESTIONS),
        })),
        Some(Err(reason)) => {
            debug!(session = id, code = %code, reason = ?reason, "add rejected");
            HttpResponse::Conflict().json(json!({"error": "course cannot be selected", "availability": reason}))
        }
        None => session_not_found(id),
    }
}

/// DELETE /sessions/{id}/courses/{code}
pub async fn remove_course_handler(state: web::Data<AppState>, path: web::Path<(u64, String)>) -> impl Responder {
    let (id, code) = path.into_inner();
    if !state.catalog.contains(&code) {
        return HttpResponse::NotFound().json(json!({
            "error": format!("unknown course {}", code),
            "suggestions": state.catalog.suggest(&code, SUGGESTIONS),
        }));
    }
    match state.with_session(id, |s| {
        let change = s.engine.remove_course(&code);
        MutationView { change, session: session_view(&state, id, s) }
    }) {
        Some(view) => HttpResponse::Ok().json(view),
        None => session_not_found(id),
    }
}

/// DELETE /sessions/{id}/courses
pub async fn clear_courses_handler(state: web::Data<AppState>, path: web::Path<u64>) -> impl Responder {
    let id = path.into_inner();
    match state.with_session(id, |s| {
        s.engine.clear_all();
        session_view(&state, id, s)
    }) {
        Some(view) => HttpResponse::Ok().json(view),
        None => session_not_found(id),
    }
}
