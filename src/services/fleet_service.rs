//! Servicio de flota
//!
//! Orquesta las operaciones de alta, edición, baja e importación de
//! activos. Todo cambio de estado pasa por el motor de transición; las
//! operaciones destructivas pasan por el guard de autorización.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::fleet_item::{FleetItem, FleetType};
use crate::models::user::UserProfile;
use crate::repositories::fleet_repository::FleetRepository;
use crate::services::authorization_service::{AuthorizationService, ManagedOperation};
use crate::services::status_session_service::StatusSessionService;
use crate::storage::DocumentStore;
use crate::utils::errors::{not_found_error, AppResult};

pub struct FleetService {
    fleet: FleetRepository,
    sessions: StatusSessionService,
}

impl FleetService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            fleet: FleetRepository::new(Arc::clone(&store)),
            sessions: StatusSessionService::new(store),
        }
    }

    /// Alta de un activo: crea el documento y abre su sesión inicial de
    /// estado (caso degenerado del motor de transición, sin sesión previa)
    pub async fn add_item(
        &self,
        mut item: FleetItem,
        now: DateTime<Utc>,
    ) -> AppResult<FleetItem> {
        item.current_status_session_id = None;
        let id = self.fleet.create(&item).await?;
        item.id = id;

        let session_id = self
            .sessions
            .open_initial_session(item.item_type, &item.id, item.status, now)
            .await?;
        item.current_status_session_id = Some(session_id);
        Ok(item)
    }

    /// Edición de un activo. Los campos descriptivos se guardan siempre; el
    /// cambio de estado (si lo hay) corre por el motor de transición, que
    /// mantiene el libro de sesiones y el puntero. Una edición que preserva
    /// el estado no toca el historial.
    pub async fn update_item(
        &self,
        item: FleetItem,
        now: DateTime<Utc>,
    ) -> AppResult<FleetItem> {
        let existing = self.fleet.get(item.item_type, &item.id).await?;

        let mut merged = item.clone();
        merged.status = existing.status;
        merged.current_status_session_id = existing.current_status_session_id.clone();
        self.fleet.save(&merged).await?;

        if let Some(new_session) = self
            .sessions
            .transition_status(&merged, item.status, now)
            .await?
        {
            merged.status = item.status;
            merged.current_status_session_id = Some(new_session);
        }
        Ok(merged)
    }

    pub async fn get_item(&self, item_type: FleetType, id: &str) -> AppResult<FleetItem> {
        self.fleet.get(item_type, id).await
    }

    /// Baja de un activo (solo manager). El historial de sesiones y los
    /// registros de mantenimiento quedan como historia huérfana: el borrado
    /// no es en cascada.
    pub async fn delete_item(
        &self,
        acting: &UserProfile,
        item_type: FleetType,
        id: &str,
    ) -> AppResult<()> {
        AuthorizationService::require_manager(acting, ManagedOperation::DeleteAsset)?;
        if self.fleet.find_by_id(item_type, id).await?.is_none() {
            return Err(not_found_error("Fleet item", id));
        }
        self.fleet.delete(item_type, id).await
    }

    /// Importación masiva (CSV). Los activos importados no abren sesión
    /// inicial: su puntero queda vacío hasta el primer cambio de estado y
    /// las lecturas lo toleran.
    pub async fn import_items(&self, items: &[FleetItem]) -> AppResult<usize> {
        self.fleet.import_batch(items).await?;
        Ok(items.len())
    }

    /// Reset de la aplicación: borra todos los activos de ambos tipos
    /// (solo manager)
    pub async fn clear_fleet(&self, acting: &UserProfile) -> AppResult<usize> {
        AuthorizationService::require_manager(acting, ManagedOperation::ResetAllData)?;
        let mut items = self.fleet.list(FleetType::Vehicle).await?;
        items.extend(self.fleet.list(FleetType::Equipment).await?);
        self.fleet.delete_batch(&items).await?;
        Ok(items.len())
    }

    pub async fn list_items(&self, item_type: FleetType) -> AppResult<Vec<FleetItem>> {
        self.fleet.list(item_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fleet_item::FleetStatus;
    use crate::models::user::UserRole;
    use crate::storage::LocalStore;
    use crate::utils::errors::AppError;

    fn draft_item(item_type: FleetType, status: FleetStatus) -> FleetItem {
        FleetItem {
            id: String::new(),
            item_type,
            make: "Toyota".into(),
            model: "Hilux".into(),
            year: 2022,
            plate_or_serial: "DXB-10293".into(),
            current_meter: 45_000.0,
            status,
            category: "Pickup Truck".into(),
            location: "Main HQ".into(),
            assigned_to: None,
            technical_details: None,
            last_service_date: None,
            next_service_date: None,
            next_service_meter: None,
            current_status_session_id: None,
        }
    }

    fn profile(role: UserRole) -> UserProfile {
        UserProfile {
            id: "u1".into(),
            name: "Ana".into(),
            role,
            email: "ana@example.com".into(),
        }
    }

    fn service() -> (FleetService, StatusSessionService) {
        let store = Arc::new(LocalStore::new()) as Arc<dyn DocumentStore>;
        (
            FleetService::new(Arc::clone(&store)),
            StatusSessionService::new(store),
        )
    }

    #[tokio::test]
    async fn test_add_item_opens_initial_session() {
        let (fleet_service, sessions) = service();
        let created = fleet_service
            .add_item(draft_item(FleetType::Vehicle, FleetStatus::Active), Utc::now())
            .await
            .unwrap();

        let session = sessions.current_session(&created).await.unwrap().unwrap();
        assert!(session.is_open());
        assert_eq!(session.status, FleetStatus::Active);
        assert_eq!(session.fleet_item_id, created.id);
    }

    #[tokio::test]
    async fn test_update_with_status_change_runs_transition() {
        let (fleet_service, sessions) = service();
        let created = fleet_service
            .add_item(draft_item(FleetType::Vehicle, FleetStatus::Active), Utc::now())
            .await
            .unwrap();

        let mut edited = created.clone();
        edited.status = FleetStatus::Workshop;
        edited.location = "North Site".into();
        let updated = fleet_service.update_item(edited, Utc::now()).await.unwrap();

        assert_eq!(updated.status, FleetStatus::Workshop);
        assert_eq!(updated.location, "North Site");
        assert_ne!(
            updated.current_status_session_id,
            created.current_status_session_id
        );

        let history = sessions.history_for_item(&created.id).await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_update_preserving_status_keeps_session() {
        let (fleet_service, sessions) = service();
        let created = fleet_service
            .add_item(draft_item(FleetType::Vehicle, FleetStatus::Active), Utc::now())
            .await
            .unwrap();

        let mut edited = created.clone();
        edited.assigned_to = Some("Jane Smith".into());
        let updated = fleet_service.update_item(edited, Utc::now()).await.unwrap();

        assert_eq!(
            updated.current_status_session_id,
            created.current_status_session_id
        );
        let history = sessions.history_for_item(&created.id).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_staff_cannot_delete_item() {
        let (fleet_service, _) = service();
        let created = fleet_service
            .add_item(draft_item(FleetType::Vehicle, FleetStatus::Active), Utc::now())
            .await
            .unwrap();

        let result = fleet_service
            .delete_item(&profile(UserRole::Staff), created.item_type, &created.id)
            .await;
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));

        // El activo sigue presente
        assert!(fleet_service
            .get_item(created.item_type, &created.id)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_manager_delete_leaves_history_orphaned() {
        let (fleet_service, sessions) = service();
        let created = fleet_service
            .add_item(draft_item(FleetType::Vehicle, FleetStatus::Active), Utc::now())
            .await
            .unwrap();

        fleet_service
            .delete_item(&profile(UserRole::Manager), created.item_type, &created.id)
            .await
            .unwrap();

        assert!(matches!(
            fleet_service.get_item(created.item_type, &created.id).await,
            Err(AppError::NotFound(_))
        ));
        // El historial no se borra en cascada
        let history = sessions.history_for_item(&created.id).await.unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_fleet_requires_manager() {
        let (fleet_service, _) = service();
        fleet_service
            .add_item(draft_item(FleetType::Vehicle, FleetStatus::Active), Utc::now())
            .await
            .unwrap();
        fleet_service
            .add_item(draft_item(FleetType::Equipment, FleetStatus::Standby), Utc::now())
            .await
            .unwrap();

        let refused = fleet_service.clear_fleet(&profile(UserRole::Staff)).await;
        assert!(matches!(refused, Err(AppError::PermissionDenied(_))));

        let removed = fleet_service
            .clear_fleet(&profile(UserRole::Manager))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(fleet_service
            .list_items(FleetType::Vehicle)
            .await
            .unwrap()
            .is_empty());
    }
}
