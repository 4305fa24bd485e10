//! Controller de autenticación y usuarios

use validator::Validate;

use crate::dto::common_dto::ApiResponse;
use crate::dto::user_dto::{BootstrapRequest, CreateUserRequest, LoginRequest, LoginResponse};
use crate::models::user::{UserProfile, UserResponse};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct UserController {
    state: AppState,
}

impl UserController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;
        let (token, user) = self
            .state
            .auth
            .sign_in(&request.email, &request.password)
            .await?;
        Ok(LoginResponse { token, user })
    }

    pub async fn logout(&self, token: &str) {
        self.state.auth.sign_out(token).await;
    }

    /// Bootstrap del primer administrador; solo válido sin usuarios
    pub async fn bootstrap(
        &self,
        request: BootstrapRequest,
    ) -> AppResult<ApiResponse<UserResponse>> {
        request.validate()?;
        let admin = self
            .state
            .auth
            .create_first_admin(&request.name, &request.email, &request.password)
            .await?;
        Ok(ApiResponse::success_with_message(
            admin,
            "First administrator created".to_string(),
        ))
    }

    pub async fn create_user(
        &self,
        acting: &UserProfile,
        request: CreateUserRequest,
    ) -> AppResult<ApiResponse<UserResponse>> {
        request.validate()?;
        let user = self
            .state
            .auth
            .create_user(
                acting,
                &request.name,
                &request.email,
                &request.password,
                request.role,
            )
            .await?;
        Ok(ApiResponse::success_with_message(
            user,
            "User created".to_string(),
        ))
    }

    pub async fn delete_user(&self, acting: &UserProfile, user_id: &str) -> AppResult<()> {
        self.state.auth.delete_user(acting, user_id).await
    }

    pub async fn list_users(&self, acting: &UserProfile) -> AppResult<Vec<UserResponse>> {
        self.state.auth.list_users(acting).await
    }
}
