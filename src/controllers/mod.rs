pub mod fleet_controller;
pub mod maintenance_controller;
pub mod user_controller;
