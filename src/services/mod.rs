pub mod auth_service;
pub mod authorization_service;
pub mod fleet_directory;
pub mod fleet_service;
pub mod jwt_service;
pub mod maintenance_service;
pub mod status_session_service;
