//! Caché simple en memoria de catálogos ya cargados.
//!
//! La clave es la ruta resuelta; el resultado se comparte como `Arc` para que
//! cada sesión del planificador apunte al mismo catálogo inmutable.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tracing::debug;

use crate::error::Result;
use crate::excel::{load_catalog, resolve_catalog_path, Catalog};

static CATALOG_CACHE: OnceLock<Mutex<HashMap<String, Arc<Catalog>>>> = OnceLock::new();

fn cache() -> MutexGuard<'static, HashMap<String, Arc<Catalog>>> {
    let m = CATALOG_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Devuelve el catálogo de `name`, leyéndolo de disco sólo la primera vez.
pub fn get_catalog_cached(name: &str) -> Result<Arc<Catalog>> {
    let path = resolve_catalog_path(name);
    let key = path.to_string_lossy().to_string();

    if let Some(existing) = cache().get(&key) {
        debug!(catalog = %key, "catalog cache hit");
        return Ok(Arc::clone(existing));
    }

    // Leer fuera del lock
    let loaded = Arc::new(load_catalog(&path)?);
    let stored = Arc::clone(cache().entry(key).or_insert(loaded));
    Ok(stored)
}

pub fn clear_catalog_cache() {
    cache().clear();
}
