//! Servicio de autorización
//!
//! Modelo de dos roles: manager (acceso total, incluidas las operaciones
//! destructivas y administrativas) y staff (lectura/escritura de activos y
//! registros de mantenimiento, sin operaciones destructivas). El rol se
//! verifica por llamada, inmediatamente antes de actuar, y nunca se cachea
//! más allá de la identidad actual.

use crate::models::user::{UserProfile, UserRole};
use crate::utils::errors::{permission_denied_error, AppResult};

/// Operaciones reservadas al rol manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagedOperation {
    DeleteAsset,
    DeleteUser,
    CreateUser,
    ResetAllData,
}

impl ManagedOperation {
    fn describe(&self) -> &'static str {
        match self {
            ManagedOperation::DeleteAsset => "delete assets",
            ManagedOperation::DeleteUser => "delete users",
            ManagedOperation::CreateUser => "create users",
            ManagedOperation::ResetAllData => "reset the database",
        }
    }
}

pub struct AuthorizationService;

impl AuthorizationService {
    /// Verifica si el usuario tiene un rol específico
    pub fn has_role(profile: &UserProfile, required_role: UserRole) -> bool {
        profile.role == required_role
    }

    pub fn is_manager(profile: &UserProfile) -> bool {
        matches!(profile.role, UserRole::Manager)
    }

    /// Verifica si el usuario puede listar y administrar usuarios
    pub fn can_manage_users(profile: &UserProfile) -> bool {
        Self::is_manager(profile)
    }

    /// Guard para operaciones destructivas/administrativas: re-evalúa el
    /// rol en cada llamada y rechaza con PermissionDenied sin efecto
    /// parcial alguno.
    pub fn require_manager(profile: &UserProfile, operation: ManagedOperation) -> AppResult<()> {
        if Self::is_manager(profile) {
            Ok(())
        } else {
            Err(permission_denied_error(operation.describe()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;

    fn profile(role: UserRole) -> UserProfile {
        UserProfile {
            id: "u1".into(),
            name: "Ana".into(),
            role,
            email: "ana@example.com".into(),
        }
    }

    #[test]
    fn test_manager_passes_all_guards() {
        let manager = profile(UserRole::Manager);
        for op in [
            ManagedOperation::DeleteAsset,
            ManagedOperation::DeleteUser,
            ManagedOperation::CreateUser,
            ManagedOperation::ResetAllData,
        ] {
            assert!(AuthorizationService::require_manager(&manager, op).is_ok());
        }
    }

    #[test]
    fn test_staff_is_refused_destructive_operations() {
        let staff = profile(UserRole::Staff);
        for op in [
            ManagedOperation::DeleteAsset,
            ManagedOperation::DeleteUser,
            ManagedOperation::CreateUser,
            ManagedOperation::ResetAllData,
        ] {
            let result = AuthorizationService::require_manager(&staff, op);
            assert!(matches!(result, Err(AppError::PermissionDenied(_))));
        }
    }

    #[test]
    fn test_role_checks() {
        let staff = profile(UserRole::Staff);
        assert!(AuthorizationService::has_role(&staff, UserRole::Staff));
        assert!(!AuthorizationService::has_role(&staff, UserRole::Manager));
        assert!(!AuthorizationService::can_manage_users(&staff));
    }
}
