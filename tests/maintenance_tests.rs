//! Tests de integración del libro de mantenimiento

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use fleet_manager::models::fleet_item::{FleetItem, FleetStatus, FleetType};
use fleet_manager::models::maintenance::{MaintenanceRecord, MaintenanceType};
use fleet_manager::services::fleet_service::FleetService;
use fleet_manager::services::maintenance_service::MaintenanceService;
use fleet_manager::storage::{DocumentStore, LocalStore};

fn draft_item(item_type: FleetType) -> FleetItem {
    FleetItem {
        id: String::new(),
        item_type,
        make: "Toyota".into(),
        model: "Hilux".into(),
        year: 2022,
        plate_or_serial: "DXB-10293".into(),
        current_meter: 45_000.0,
        status: FleetStatus::Active,
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

fn draft_record(item_id: &str, record_type: MaintenanceType) -> MaintenanceRecord {
    MaintenanceRecord {
        id: String::new(),
        fleet_item_id: item_id.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        meter_reading: 50_000.0,
        record_type,
        description: "Regular 50k service".into(),
        complaint: None,
        parts: "Oil filter, air filter, 5W-30 oil".into(),
        maintenance_items: vec!["Engine Oil".into(), "Engine Oil Filter".into()],
        labor_cost: 150.0,
        parts_cost: 200.0,
        total_cost: 0.0,
        next_due_meter: None,
        next_due_date: None,
        technician: Some("Mike".into()),
        created_by: None,
        attachments: vec![],
    }
}

fn services() -> (FleetService, MaintenanceService) {
    let store = Arc::new(LocalStore::new()) as Arc<dyn DocumentStore>;
    (
        FleetService::new(Arc::clone(&store)),
        MaintenanceService::new(store),
    )
}

#[tokio::test]
async fn test_vehicle_service_updates_asset_projection() {
    let (fleet, maintenance) = services();
    let item = fleet
        .add_item(draft_item(FleetType::Vehicle), Utc::now())
        .await
        .unwrap();

    // SERVICE con lectura 50000 el 2024-01-10
    let saved = maintenance
        .add_record(
            draft_record(&item.id, MaintenanceType::Service),
            item.item_type,
            "Ana",
        )
        .await
        .unwrap();

    assert_eq!(saved.total_cost, 350.0);
    assert_eq!(saved.next_due_meter, Some(60_000.0));
    assert_eq!(
        saved.next_due_date,
        Some(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
    );

    let stored = fleet.get_item(item.item_type, &item.id).await.unwrap();
    assert_eq!(stored.current_meter, 50_000.0);
    assert_eq!(
        stored.last_service_date,
        Some(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
    );
    assert_eq!(stored.next_service_meter, Some(60_000.0));
    assert_eq!(
        stored.next_service_date,
        Some(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
    );
}

#[tokio::test]
async fn test_repair_never_carries_due_projections() {
    let (fleet, maintenance) = services();
    let item = fleet
        .add_item(draft_item(FleetType::Vehicle), Utc::now())
        .await
        .unwrap();

    let mut draft = draft_record(&item.id, MaintenanceType::Repair);
    draft.complaint = Some("Hydraulic leak".into());
    // Aunque el llamador mande vencimientos, una reparación no los lleva
    draft.next_due_meter = Some(99_000.0);
    draft.next_due_date = NaiveDate::from_ymd_opt(2030, 1, 1);

    let saved = maintenance
        .add_record(draft, item.item_type, "Ana")
        .await
        .unwrap();
    assert_eq!(saved.next_due_meter, None);
    assert_eq!(saved.next_due_date, None);
    assert_eq!(saved.complaint, Some("Hydraulic leak".into()));

    let stored = fleet.get_item(item.item_type, &item.id).await.unwrap();
    assert_eq!(stored.current_meter, 50_000.0);
    assert_eq!(stored.last_service_date, None);
}

#[tokio::test]
async fn test_inspection_counts_as_service_for_due_math() {
    let (fleet, maintenance) = services();
    let item = fleet
        .add_item(draft_item(FleetType::Equipment), Utc::now())
        .await
        .unwrap();

    let mut draft = draft_record(&item.id, MaintenanceType::Inspection);
    draft.meter_reading = 3_200.0;
    let saved = maintenance
        .add_record(draft, item.item_type, "Ana")
        .await
        .unwrap();

    // Equipos: +500 horas
    assert_eq!(saved.next_due_meter, Some(3_700.0));
    assert_eq!(saved.complaint, None);
}

#[tokio::test]
async fn test_total_cost_ignores_client_value() {
    let (fleet, maintenance) = services();
    let item = fleet
        .add_item(draft_item(FleetType::Vehicle), Utc::now())
        .await
        .unwrap();

    let mut draft = draft_record(&item.id, MaintenanceType::Service);
    draft.total_cost = 1.0;
    draft.labor_cost = 400.0;
    draft.parts_cost = 150.0;
    let saved = maintenance
        .add_record(draft, item.item_type, "Ana")
        .await
        .unwrap();
    assert_eq!(saved.total_cost, 550.0);
}

#[tokio::test]
async fn test_records_accumulate_across_both_ledgers() {
    let (fleet, maintenance) = services();
    let item = fleet
        .add_item(draft_item(FleetType::Vehicle), Utc::now())
        .await
        .unwrap();

    let mut repair = draft_record(&item.id, MaintenanceType::Repair);
    repair.date = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
    repair.description = "Brake pads replacement".into();
    maintenance
        .add_record(repair, item.item_type, "Ana")
        .await
        .unwrap();
    maintenance
        .add_record(
            draft_record(&item.id, MaintenanceType::Service),
            item.item_type,
            "John",
        )
        .await
        .unwrap();

    let records = maintenance.list_for_item(&item.id).await.unwrap();
    assert_eq!(records.len(), 2);
    // Más reciente primero
    assert_eq!(records[0].record_type, MaintenanceType::Repair);
    assert_eq!(records[0].created_by, Some("Ana".into()));
    assert_eq!(records[1].created_by, Some("John".into()));
}
