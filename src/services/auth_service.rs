//! Servicio de autenticación e identidad
//!
//! Login con email y contraseña (bcrypt), emisión de tokens de acceso y
//! resolución de la identidad actuante. El rol del usuario se relee del
//! almacén en cada resolución: la verificación de permisos nunca queda
//! cacheada más allá de la identidad vigente.
//!
//! La creación de usuarios por un manager no perturba la sesión del propio
//! manager: los tokens son independientes de las altas.

use std::collections::HashSet;
use std::sync::Arc;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::user::{UserDocument, UserProfile, UserResponse, UserRole};
use crate::repositories::user_repository::UserRepository;
use crate::services::authorization_service::{AuthorizationService, ManagedOperation};
use crate::services::jwt_service::JwtService;
use crate::storage::DocumentStore;
use crate::utils::errors::{AppError, AppResult};

pub struct AuthService {
    users: UserRepository,
    jwt: JwtService,
    /// Tokens cerrados con sign_out; se rechazan aunque no hayan expirado
    revoked_tokens: RwLock<HashSet<String>>,
}

impl AuthService {
    pub fn new(store: Arc<dyn DocumentStore>, jwt_secret: &str) -> Self {
        Self {
            users: UserRepository::new(store),
            jwt: JwtService::new(jwt_secret),
            revoked_tokens: RwLock::new(HashSet::new()),
        }
    }

    /// Login: verifica credenciales y emite un token de acceso
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<(String, UserResponse)> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("Account has no credentials".to_string()))?;
        let valid = verify(password, password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !valid {
            return Err(AppError::Unauthorized("Invalid email or password".to_string()));
        }

        let profile = UserProfile::from(&user);
        let token = self.jwt.generate_access_token(&profile)?;
        info!("🔑 Login de '{}' ({})", user.name, user.role.as_str());
        Ok((token, user.into()))
    }

    /// Cierra la sesión del token dado
    pub async fn sign_out(&self, token: &str) {
        self.revoked_tokens.write().await.insert(token.to_string());
    }

    /// Resuelve la identidad actuante de un token. El documento de usuario
    /// se relee del almacén para que el rol vigente sea el que gobierna.
    pub async fn current_identity(&self, token: &str) -> AppResult<UserProfile> {
        if self.revoked_tokens.read().await.contains(token) {
            return Err(AppError::Unauthorized("Session closed".to_string()));
        }
        let claims = self.jwt.verify_token(token)?;
        let user = self
            .users
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;
        Ok(UserProfile::from(&user))
    }

    /// ¿Existe algún usuario? Gobierna la pantalla de bootstrap inicial
    pub async fn system_has_users(&self) -> AppResult<bool> {
        self.users.any_exists().await
    }

    /// Bootstrap de primer arranque: crea el administrador inicial. Solo es
    /// válido mientras el sistema no tiene usuarios.
    pub async fn create_first_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> AppResult<UserResponse> {
        if self.users.any_exists().await? {
            return Err(AppError::Conflict(
                "System already has users; bootstrap is closed".to_string(),
            ));
        }
        self.insert_user(name, email, password, UserRole::Manager).await
    }

    /// Alta de usuario iniciada por un manager. La sesión del manager no se
    /// ve afectada.
    pub async fn create_user(
        &self,
        acting: &UserProfile,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> AppResult<UserResponse> {
        AuthorizationService::require_manager(acting, ManagedOperation::CreateUser)?;
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "User with email '{}' already exists",
                email
            )));
        }
        self.insert_user(name, email, password, role).await
    }

    /// Baja de usuario (solo manager). Quita el documento y con él el
    /// acceso; las sesiones emitidas dejan de resolver identidad.
    pub async fn delete_user(&self, acting: &UserProfile, user_id: &str) -> AppResult<()> {
        AuthorizationService::require_manager(acting, ManagedOperation::DeleteUser)?;
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "User with id '{}' not found",
                user_id
            )));
        }
        self.users.delete(user_id).await
    }

    /// Listado de usuarios (solo manager)
    pub async fn list_users(&self, acting: &UserProfile) -> AppResult<Vec<UserResponse>> {
        if !AuthorizationService::can_manage_users(acting) {
            return Err(AppError::PermissionDenied(
                "Only managers can list users".to_string(),
            ));
        }
        let users = self.users.list().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn insert_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> AppResult<UserResponse> {
        let password_hash =
            hash(password, DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))?;
        let mut user = UserDocument {
            id: String::new(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            created_at: Utc::now(),
            password_hash: Some(password_hash),
        };
        user.id = self.users.create(&user).await?;
        info!("👤 Usuario '{}' creado con rol {}", user.name, role.as_str());
        Ok(user.into())
    }
}
