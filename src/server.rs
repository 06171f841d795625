use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

use crate::algorithm::{AlternativeGroups, Limits, SelectionEngine};
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::excel::Catalog;
use crate::server_handlers;

/// Una sesión de usuario: su motor de selección y cuándo se creó.
#[derive(Debug)]
pub struct Session {
    pub engine: SelectionEngine,
    pub created_at: DateTime<Utc>,
}

/// Estado compartido del servidor. Cada sesión se muta sólo bajo el lock,
/// así las operaciones de una sesión se ejecutan una a la vez.
#[derive(Debug)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub groups: Arc<AlternativeGroups>,
    pub config: PlannerConfig,
    sessions: Mutex<HashMap<u64, Session>>,
    next_id: AtomicU64,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, groups: Arc<AlternativeGroups>, config: PlannerConfig) -> Self {
        AppState {
            catalog,
            groups,
            config,
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<u64, Session>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Crea una sesión vacía con los topes dados y devuelve su id.
    pub fn create_session(&self, limits: Limits) -> Result<u64> {
        let engine = SelectionEngine::with_limits(Arc::clone(&self.catalog), Arc::clone(&self.groups), limits)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.sessions().insert(id, Session { engine, created_at: Utc::now() });
        info!(session = id, max_credits = limits.max_credits, max_courses = limits.max_courses, "session created");
        Ok(id)
    }

    /// Ejecuta `f` sobre la sesión `id` con el lock tomado. `None` si no existe.
    pub fn with_session<R>(&self, id: u64, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let mut guard = self.sessions();
        guard.get_mut(&id).map(f)
    }

    pub fn remove_session(&self, id: u64) -> bool {
        self.sessions().remove(&id).is_some()
    }

    pub fn session_count(&self) -> usize {
        self.sessions().len()
    }
}

/// Registra todas las rutas; también lo usan los tests con `actix_web::test`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/catalog", web::get().to(server_handlers::catalog_handler))
        .route("/help", web::get().to(server_handlers::help_handler))
        .route("/sessions", web::post().to(server_handlers::create_session_handler))
        .route("/sessions/{id}", web::get().to(server_handlers::get_session_handler))
        .route("/sessions/{id}", web::delete().to(server_handlers::delete_session_handler))
        .route("/sessions/{id}/limits", web::put().to(server_handlers::set_limits_handler))
        .route("/sessions/{id}/query", web::put().to(server_handlers::set_query_handler))
        .route("/sessions/{id}/courses", web::get().to(server_handlers::list_courses_handler))
        .route("/sessions/{id}/courses", web::delete().to(server_handlers::clear_courses_handler))
        .route("/sessions/{id}/courses/{code}", web::post().to(server_handlers::add_course_handler))
        .route("/sessions/{id}/courses/{code}", web::delete().to(server_handlers::remove_course_handler));
}

pub async fn run_server(config: PlannerConfig, catalog: Arc<Catalog>) -> std::io::Result<()> {
    let bind = config.bind.clone();
    let workers = config.workers;
    let state = web::Data::new(AppState::new(catalog, Arc::new(AlternativeGroups::default_groups()), config));

    info!(bind = %bind, workers, "starting HTTP server");
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(routes)
    })
    .workers(workers)
    .bind(bind)?
    .run()
    .await
}
