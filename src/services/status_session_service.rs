//! Motor de transición de estados
//!
//! Mantiene el invariante de intervalos de tiempo en cada cambio de estado
//! de un activo: cierra la sesión abierta calculando su duración, abre una
//! sesión nueva y actualiza el puntero denormalizado del activo.
//!
//! La secuencia cerrar-abrir-actualizar son tres escrituras separadas
//! contra el almacén, en orden fijo y sin transacción ni lock de proceso.
//! Una falla a mitad de la secuencia deja una ventana de inconsistencia
//! conocida que las rutas de lectura deben tolerar; la falla se reporta
//! como PartialWrite y no hay rollback de los pasos ya aplicados.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::warn;

use crate::models::fleet_item::{FleetItem, FleetStatus, FleetType};
use crate::models::status_history::{hours_between, round_duration, StatusHistoryRecord};
use crate::repositories::fleet_repository::FleetRepository;
use crate::repositories::status_history_repository::StatusHistoryRepository;
use crate::storage::DocumentStore;
use crate::utils::errors::{AppError, AppResult};

pub struct StatusSessionService {
    history: StatusHistoryRepository,
    fleet: FleetRepository,
}

impl StatusSessionService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            history: StatusHistoryRepository::new(Arc::clone(&store)),
            fleet: FleetRepository::new(store),
        }
    }

    /// Cambia el estado de un activo manteniendo el libro de sesiones.
    ///
    /// Devuelve el id de la sesión recién abierta, o `None` cuando el
    /// estado solicitado es el actual (no-op: una edición que preserva el
    /// estado no debe abrir una sesión espuria).
    pub async fn transition_status(
        &self,
        item: &FleetItem,
        new_status: FleetStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Option<String>> {
        if new_status == item.status {
            return Ok(None);
        }

        // 1. Cerrar la sesión abierta, si el puntero existe. Un puntero
        // colgante (sesión inexistente) no bloquea la transición: se
        // registra y se continúa.
        let mut closed_previous = false;
        if let Some(session_id) = &item.current_status_session_id {
            match self.history.find_by_id(session_id).await? {
                Some(open_session) => {
                    let duration = round_duration(hours_between(open_session.start_time, now));
                    match self.history.close(session_id, now, duration).await {
                        Ok(()) => closed_previous = true,
                        Err(AppError::NotFound(_)) => {
                            warn!(
                                "⚠️ Sesión '{}' desapareció antes del cierre; se continúa",
                                session_id
                            );
                        }
                        Err(e) => return Err(e),
                    }
                }
                None => {
                    warn!(
                        "⚠️ Puntero de sesión '{}' sin registro en el historial de '{}'; se continúa",
                        session_id, item.id
                    );
                }
            }
        }

        // 2. Abrir la nueva sesión
        let record = StatusHistoryRecord {
            id: String::new(),
            fleet_item_id: item.id.clone(),
            status: new_status,
            start_time: now,
            end_time: None,
            duration_hours: None,
            notes: None,
        };
        let new_session_id = match self.history.append(&record).await {
            Ok(id) => id,
            Err(e) if closed_previous => {
                return Err(AppError::PartialWrite(format!(
                    "Previous session closed but new session was not opened: {}",
                    e
                )))
            }
            Err(e) => return Err(e),
        };

        // 3. Actualizar el activo: estado y puntero a la sesión abierta
        self.fleet
            .update_fields(
                item.item_type,
                &item.id,
                json!({
                    "status": new_status,
                    "currentStatusSessionId": new_session_id,
                }),
            )
            .await
            .map_err(|e| {
                AppError::PartialWrite(format!(
                    "Session '{}' opened but fleet item '{}' was not updated: {}",
                    new_session_id, item.id, e
                ))
            })?;

        Ok(Some(new_session_id))
    }

    /// Caso degenerado del motor para el alta de un activo: solo abre la
    /// sesión inicial y enlaza el puntero (no hay sesión previa que cerrar)
    pub async fn open_initial_session(
        &self,
        item_type: FleetType,
        item_id: &str,
        status: FleetStatus,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let record = StatusHistoryRecord {
            id: String::new(),
            fleet_item_id: item_id.to_string(),
            status,
            start_time: now,
            end_time: None,
            duration_hours: None,
            notes: None,
        };
        let session_id = self.history.append(&record).await?;

        self.fleet
            .update_fields(
                item_type,
                item_id,
                json!({ "currentStatusSessionId": session_id }),
            )
            .await
            .map_err(|e| {
                AppError::PartialWrite(format!(
                    "Initial session '{}' opened but fleet item '{}' was not linked: {}",
                    session_id, item_id, e
                ))
            })?;

        Ok(session_id)
    }

    /// Sesión abierta actual de un activo según su puntero. El puntero es
    /// una referencia débil: puede no existir o apuntar a un registro
    /// ausente, y ambos casos degradan a `None`.
    pub async fn current_session(
        &self,
        item: &FleetItem,
    ) -> AppResult<Option<StatusHistoryRecord>> {
        match &item.current_status_session_id {
            None => Ok(None),
            Some(session_id) => self.history.find_by_id(session_id).await,
        }
    }

    /// Historial de sesiones de un activo, la más reciente primero
    pub async fn history_for_item(
        &self,
        fleet_item_id: &str,
    ) -> AppResult<Vec<StatusHistoryRecord>> {
        self.history.list_by_item(fleet_item_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::LocalStore;

    fn test_item(id: &str, status: FleetStatus, session_id: Option<String>) -> FleetItem {
        FleetItem {
            id: id.to_string(),
            item_type: FleetType::Vehicle,
            make: "Toyota".into(),
            model: "Hilux".into(),
            year: 2022,
            plate_or_serial: "DXB-10293".into(),
            current_meter: 45000.0,
            status,
            category: "Pickup Truck".into(),
            location: "Main HQ".into(),
            assigned_to: None,
            technical_details: None,
            last_service_date: None,
            next_service_date: None,
            next_service_meter: None,
            current_status_session_id: session_id,
        }
    }

    async fn setup() -> (Arc<LocalStore>, StatusSessionService, FleetRepository) {
        let store = Arc::new(LocalStore::new());
        let service = StatusSessionService::new(store.clone() as Arc<dyn DocumentStore>);
        let fleet = FleetRepository::new(store.clone() as Arc<dyn DocumentStore>);
        (store, service, fleet)
    }

    #[tokio::test]
    async fn test_transition_closes_old_and_opens_new() {
        let (_store, service, fleet) = setup().await;
        let mut item = test_item("", FleetStatus::Active, None);
        item.id = fleet.create(&item).await.unwrap();

        let t0 = Utc::now();
        let first = service
            .open_initial_session(item.item_type, &item.id, item.status, t0)
            .await
            .unwrap();
        item.current_status_session_id = Some(first.clone());

        let t1 = t0 + chrono::Duration::hours(5);
        let second = service
            .transition_status(&item, FleetStatus::Workshop, t1)
            .await
            .unwrap()
            .expect("transition opens a session");

        let history = service.history_for_item(&item.id).await.unwrap();
        assert_eq!(history.len(), 2);

        let open: Vec<_> = history.iter().filter(|r| r.is_open()).collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, second);
        assert_eq!(open[0].status, FleetStatus::Workshop);

        let closed = history.iter().find(|r| r.id == first).unwrap();
        assert_eq!(closed.end_time, Some(t1));
        assert_eq!(closed.duration_hours, Some(5.0));

        let stored = fleet.get(item.item_type, &item.id).await.unwrap();
        assert_eq!(stored.status, FleetStatus::Workshop);
        assert_eq!(stored.current_status_session_id, Some(second));
    }

    #[tokio::test]
    async fn test_same_status_is_a_noop() {
        let (_store, service, fleet) = setup().await;
        let mut item = test_item("", FleetStatus::Active, None);
        item.id = fleet.create(&item).await.unwrap();
        let session_id = service
            .open_initial_session(item.item_type, &item.id, item.status, Utc::now())
            .await
            .unwrap();
        item.current_status_session_id = Some(session_id.clone());

        let result = service
            .transition_status(&item, FleetStatus::Active, Utc::now())
            .await
            .unwrap();
        assert!(result.is_none());

        let history = service.history_for_item(&item.id).await.unwrap();
        assert_eq!(history.len(), 1);
        let stored = fleet.get(item.item_type, &item.id).await.unwrap();
        assert_eq!(stored.current_status_session_id, Some(session_id));
    }

    #[tokio::test]
    async fn test_dangling_session_pointer_fails_open() {
        let (_store, service, fleet) = setup().await;
        let mut item = test_item("", FleetStatus::Active, None);
        item.id = fleet.create(&item).await.unwrap();
        // Puntero a una sesión que no existe en el historial
        item.current_status_session_id = Some("missing-session".to_string());

        let new_session = service
            .transition_status(&item, FleetStatus::Standby, Utc::now())
            .await
            .unwrap();
        assert!(new_session.is_some());

        let history = service.history_for_item(&item.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].is_open());
        assert_eq!(history[0].status, FleetStatus::Standby);
    }

    #[tokio::test]
    async fn test_rapid_double_toggle_records_zero_duration() {
        let (_store, service, fleet) = setup().await;
        let mut item = test_item("", FleetStatus::Active, None);
        item.id = fleet.create(&item).await.unwrap();
        let t0 = Utc::now();
        let first = service
            .open_initial_session(item.item_type, &item.id, item.status, t0)
            .await
            .unwrap();
        item.current_status_session_id = Some(first.clone());

        // Doble cambio inmediato: duración cero permitida, no rechazada
        service
            .transition_status(&item, FleetStatus::Workshop, t0)
            .await
            .unwrap();

        let history = service.history_for_item(&item.id).await.unwrap();
        let closed = history.iter().find(|r| r.id == first).unwrap();
        assert_eq!(closed.duration_hours, Some(0.0));
    }

    #[tokio::test]
    async fn test_sequence_of_transitions_keeps_single_open_session() {
        let (_store, service, fleet) = setup().await;
        let mut item = test_item("", FleetStatus::Active, None);
        item.id = fleet.create(&item).await.unwrap();
        let mut now = Utc::now();
        let session = service
            .open_initial_session(item.item_type, &item.id, item.status, now)
            .await
            .unwrap();
        item.current_status_session_id = Some(session);

        for status in [
            FleetStatus::Workshop,
            FleetStatus::Standby,
            FleetStatus::OutOfService,
            FleetStatus::Active,
        ] {
            now += chrono::Duration::minutes(30);
            if let Some(new_id) = service.transition_status(&item, status, now).await.unwrap() {
                item.status = status;
                item.current_status_session_id = Some(new_id);
            }
        }

        let history = service.history_for_item(&item.id).await.unwrap();
        assert_eq!(history.len(), 5);
        let open: Vec<_> = history.iter().filter(|r| r.is_open()).collect();
        assert_eq!(open.len(), 1);
        assert_eq!(Some(open[0].id.clone()), item.current_status_session_id);

        let stored = fleet.get(item.item_type, &item.id).await.unwrap();
        assert_eq!(
            stored.current_status_session_id,
            item.current_status_session_id
        );
        for record in history.iter().filter(|r| !r.is_open()) {
            assert!(record.duration_hours.unwrap() >= 0.0);
            assert!(record.end_time.unwrap() >= record.start_time);
        }
    }
}
