pub mod dashboard_routes;
pub mod fleet_routes;
pub mod maintenance_routes;
pub mod user_routes;
