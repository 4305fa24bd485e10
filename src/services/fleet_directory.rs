//! Directorio de flota en memoria
//!
//! Vista viva del conjunto de activos, alimentada por las suscripciones
//! push del almacén. La reconciliación de cada snapshot es un reemplazo
//! completo sin diff, particionado por tipo de activo: un snapshot de
//! `vehicles` nunca pisa los equipos y viceversa, evitando pérdida de
//! datos entre las dos suscripciones independientes.
//!
//! Sobre la vista se resuelven la búsqueda, el filtro por estado, los
//! filtros en cascada marca → modelo → año y los conteos del dashboard
//! (agregación pura de lectura, sin almacenamiento propio).

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::models::fleet_item::{FleetItem, FleetStatus, FleetType};
use crate::storage::{CollectionQuery, DocumentStore};
use crate::utils::errors::AppResult;

/// Selección de filtros en cascada. Cambiar un nivel superior resetea los
/// niveles inferiores a "todos".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeSelection {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
}

impl CascadeSelection {
    pub fn select_make(&mut self, make: Option<String>) {
        self.make = make;
        self.model = None;
        self.year = None;
    }

    pub fn select_model(&mut self, model: Option<String>) {
        self.model = model;
        self.year = None;
    }

    pub fn select_year(&mut self, year: Option<i32>) {
        self.year = year;
    }
}

/// Criterios de listado del directorio
#[derive(Debug, Clone, Default)]
pub struct FleetFilter {
    pub item_type: Option<FleetType>,
    /// Subcadena sobre marca/modelo/placa-serie, sin distinguir mayúsculas
    pub search: Option<String>,
    pub status: Option<FleetStatus>,
    pub cascade: CascadeSelection,
}

impl FleetFilter {
    fn matches(&self, item: &FleetItem) -> bool {
        if let Some(item_type) = self.item_type {
            if item.item_type != item_type {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let matches_search = item.make.to_lowercase().contains(&needle)
                || item.model.to_lowercase().contains(&needle)
                || item.plate_or_serial.to_lowercase().contains(&needle);
            if !matches_search {
                return false;
            }
        }
        if let Some(status) = self.status {
            if item.status != status {
                return false;
            }
        }
        if let Some(make) = &self.cascade.make {
            if &item.make != make {
                return false;
            }
        }
        if let Some(model) = &self.cascade.model {
            if &item.model != model {
                return false;
            }
        }
        if let Some(year) = self.cascade.year {
            if item.year != year {
                return false;
            }
        }
        true
    }
}

/// Opciones de los dropdowns en cascada, acotadas por las selecciones
/// aguas arriba
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CascadeOptions {
    pub makes: Vec<String>,
    pub models: Vec<String>,
    pub years: Vec<i32>,
}

/// Conteos agregados para el dashboard
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_vehicles: usize,
    pub total_equipment: usize,
    pub active: usize,
    pub in_workshop: usize,
    pub standby: usize,
    pub out_of_service: usize,
}

pub struct FleetDirectory {
    items: RwLock<HashMap<String, FleetItem>>,
}

impl FleetDirectory {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Reemplazo completo de la partición de un tipo de activo con el
    /// snapshot recibido
    pub async fn replace_kind(&self, item_type: FleetType, incoming: Vec<FleetItem>) {
        let mut items = self.items.write().await;
        items.retain(|_, item| item.item_type != item_type);
        for item in incoming {
            if item.item_type == item_type {
                items.insert(item.id.clone(), item);
            }
        }
    }

    pub async fn get(&self, id: &str) -> Option<FleetItem> {
        self.items.read().await.get(id).cloned()
    }

    pub async fn all(&self) -> Vec<FleetItem> {
        let items = self.items.read().await;
        let mut all: Vec<FleetItem> = items.values().cloned().collect();
        all.sort_by(|a, b| {
            (a.make.as_str(), a.model.as_str(), a.year, a.id.as_str()).cmp(&(
                b.make.as_str(),
                b.model.as_str(),
                b.year,
                b.id.as_str(),
            ))
        });
        all
    }

    pub async fn list(&self, filter: &FleetFilter) -> Vec<FleetItem> {
        self.all()
            .await
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect()
    }

    /// Opciones disponibles para los filtros en cascada: la marca acota los
    /// modelos y marca+modelo acotan los años
    pub async fn cascade_options(
        &self,
        item_type: Option<FleetType>,
        selection: &CascadeSelection,
    ) -> CascadeOptions {
        let base: Vec<FleetItem> = self
            .all()
            .await
            .into_iter()
            .filter(|item| item_type.map_or(true, |t| item.item_type == t))
            .collect();

        let mut makes: Vec<String> = base.iter().map(|i| i.make.clone()).collect();
        makes.sort();
        makes.dedup();

        let model_items: Vec<&FleetItem> = base
            .iter()
            .filter(|i| selection.make.as_ref().map_or(true, |m| &i.make == m))
            .collect();
        let mut models: Vec<String> = model_items.iter().map(|i| i.model.clone()).collect();
        models.sort();
        models.dedup();

        let mut years: Vec<i32> = model_items
            .iter()
            .filter(|i| selection.model.as_ref().map_or(true, |m| &i.model == m))
            .map(|i| i.year)
            .collect();
        years.sort_by(|a, b| b.cmp(a));
        years.dedup();

        CascadeOptions {
            makes,
            models,
            years,
        }
    }

    /// Conteos del dashboard, recalculados en cada lectura
    pub async fn dashboard_stats(&self) -> DashboardStats {
        let items = self.items.read().await;
        let mut stats = DashboardStats {
            total_vehicles: 0,
            total_equipment: 0,
            active: 0,
            in_workshop: 0,
            standby: 0,
            out_of_service: 0,
        };
        for item in items.values() {
            match item.item_type {
                FleetType::Vehicle => stats.total_vehicles += 1,
                FleetType::Equipment => stats.total_equipment += 1,
            }
            match item.status {
                FleetStatus::Active => stats.active += 1,
                FleetStatus::Workshop => stats.in_workshop += 1,
                FleetStatus::Standby => stats.standby += 1,
                FleetStatus::OutOfService => stats.out_of_service += 1,
            }
        }
        stats
    }

    /// Carga inicial desde el almacén y arranque de las dos suscripciones
    /// (una por tipo de activo)
    pub async fn start_sync(self: Arc<Self>, store: Arc<dyn DocumentStore>) -> AppResult<()> {
        for item_type in [FleetType::Vehicle, FleetType::Equipment] {
            let documents = store
                .query_collection(item_type.collection_name(), CollectionQuery::all())
                .await?;
            let items = parse_items(item_type, documents.iter());
            self.replace_kind(item_type, items).await;

            let mut receiver = store.subscribe_collection(item_type.collection_name()).await;
            let directory = Arc::clone(&self);
            tokio::spawn(async move {
                loop {
                    match receiver.recv().await {
                        Ok(snapshot) => {
                            let items = parse_items(item_type, snapshot.documents.iter());
                            directory.replace_kind(item_type, items).await;
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(
                                "⚠️ Suscripción de '{}' atrasada, {} snapshots perdidos",
                                item_type.collection_name(),
                                skipped
                            );
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                            info!(
                                "Suscripción de '{}' cerrada",
                                item_type.collection_name()
                            );
                            break;
                        }
                    }
                }
            });
        }
        Ok(())
    }
}

impl Default for FleetDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_items<'a>(
    item_type: FleetType,
    documents: impl Iterator<Item = &'a crate::storage::Document>,
) -> Vec<FleetItem> {
    documents
        .filter_map(|doc| match doc.to_model::<FleetItem>() {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(
                    "⚠️ Documento inválido en '{}': {}",
                    item_type.collection_name(),
                    e
                );
                None
            }
        })
        .collect()
}
