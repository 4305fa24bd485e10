//! Importación y exportación CSV de la flota
//!
//! Contrato de columnas, en orden: Type, Make, Model, Year, Plate/Serial,
//! CurrentMeter, Status, Category, Location, AssignedTo. La importación es
//! tolerante: el tipo y el estado se reconocen por subcadena, las filas con
//! menos de 5 columnas se saltan en silencio y los números que no parsean
//! caen a valores por defecto (año actual, contador 0).

use chrono::Datelike;

use crate::models::fleet_item::{FleetItem, FleetStatus, FleetType};
use crate::models::maintenance::MaintenanceRecord;

pub const CSV_HEADERS: [&str; 10] = [
    "Type (VEHICLE/EQUIPMENT)",
    "Make",
    "Model",
    "Year",
    "Plate/Serial",
    "Current Meter (km/hr)",
    "Status (ACTIVE/WORKSHOP)",
    "Category",
    "Location",
    "Assigned To",
];

/// Exporta la flota al formato CSV del contrato
pub fn export_fleet(items: &[FleetItem]) -> String {
    let mut lines = vec![CSV_HEADERS.join(",")];
    for item in items {
        lines.push(
            [
                item.item_type.as_str().to_string(),
                quote(&item.make),
                quote(&item.model),
                item.year.to_string(),
                quote(&item.plate_or_serial),
                format_meter(item.current_meter),
                item.status.as_str().to_string(),
                quote(&item.category),
                quote(&item.location),
                quote(item.assigned_to.as_deref().unwrap_or("")),
            ]
            .join(","),
        );
    }
    lines.join("\n")
}

/// Fila de plantilla para descargar junto al encabezado
pub fn template() -> String {
    format!(
        "{}\nVEHICLE,Toyota,Hilux,2023,DXB-99999,5000,ACTIVE,Pickup,Main HQ,Driver A",
        CSV_HEADERS.join(",")
    )
}

/// Parsea un CSV de flota. Las filas inválidas se descartan sin error.
pub fn parse_fleet(csv_text: &str) -> Vec<FleetItem> {
    let current_year = chrono::Utc::now().year();
    let mut items = Vec::new();

    // La primera línea es el encabezado
    for line in csv_text.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cols = split_csv_line(line);
        if cols.len() < 5 {
            continue;
        }

        let type_raw = cols[0].to_uppercase();
        let item_type = if type_raw.contains("EQUIP") {
            FleetType::Equipment
        } else {
            FleetType::Vehicle
        };

        let status_raw = cols.get(6).map(|s| s.to_uppercase()).unwrap_or_default();
        let status = if status_raw.contains("WORK") {
            FleetStatus::Workshop
        } else if status_raw.contains("OUT") {
            FleetStatus::OutOfService
        } else {
            FleetStatus::Active
        };

        items.push(FleetItem {
            id: String::new(),
            item_type,
            make: non_empty_or(&cols, 1, "Unknown"),
            model: non_empty_or(&cols, 2, "Unknown"),
            year: cols
                .get(3)
                .and_then(|c| c.trim().parse::<i32>().ok())
                .unwrap_or(current_year),
            plate_or_serial: non_empty_or(&cols, 4, "UNKNOWN-ID"),
            current_meter: cols
                .get(5)
                .and_then(|c| c.trim().parse::<f64>().ok())
                .unwrap_or(0.0),
            status,
            category: non_empty_or(&cols, 7, "General"),
            location: non_empty_or(&cols, 8, "Main HQ"),
            assigned_to: cols
                .get(9)
                .filter(|c| !c.is_empty())
                .map(|c| c.to_string()),
            technical_details: None,
            last_service_date: None,
            next_service_date: None,
            next_service_meter: None,
            current_status_session_id: None,
        });
    }

    items
}

/// Reporte de historial de un activo: bloque de detalle más la tabla de
/// registros de mantenimiento
pub fn export_item_history(
    item: &FleetItem,
    records: &[MaintenanceRecord],
    report_label: &str,
) -> String {
    let mut lines = vec![
        format!("ASSET HISTORY REPORT,{}", report_label),
        String::new(),
        "ASSET DETAILS".to_string(),
        format!("Make/Model,{}", quote(&format!("{} {}", item.make, item.model))),
        format!("Plate/Serial,{}", quote(&item.plate_or_serial)),
        format!("Type,{}", item.item_type.as_str()),
        format!("Year,{}", item.year),
        format!("Current Meter,{}", format_meter(item.current_meter)),
        format!("Status,{}", item.status.as_str()),
        format!("Location,{}", quote(&item.location)),
        format!(
            "Assigned To,{}",
            quote(item.assigned_to.as_deref().unwrap_or("N/A"))
        ),
        String::new(),
        "Date,Type,Meter Reading,Description,Maintenance Items,Parts Used,Technician,Labor Cost,Parts Cost,Total Cost".to_string(),
    ];

    for record in records {
        lines.push(
            [
                record.date.to_string(),
                record.record_type.as_str().to_string(),
                format_meter(record.meter_reading),
                quote(&record.description),
                quote(&record.maintenance_items.join("; ")),
                quote(&record.parts),
                quote(record.technician.as_deref().unwrap_or("")),
                format!("{}", record.labor_cost),
                format!("{}", record.parts_cost),
                format!("{}", record.total_cost),
            ]
            .join(","),
        );
    }

    lines.join("\n")
}

/// Divide una línea por comas respetando campos entre comillas
fn split_csv_line(line: &str) -> Vec<String> {
    let mut cols = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Comilla escapada dentro de un campo
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cols.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(c),
        }
    }
    cols.push(current.trim().to_string());
    cols
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn format_meter(meter: f64) -> String {
    if meter.fract() == 0.0 {
        format!("{}", meter as i64)
    } else {
        format!("{}", meter)
    }
}

fn non_empty_or(cols: &[String], index: usize, fallback: &str) -> String {
    cols.get(index)
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(make: &str, model: &str) -> FleetItem {
        FleetItem {
            id: "v1".into(),
            item_type: FleetType::Vehicle,
            make: make.into(),
            model: model.into(),
            year: 2022,
            plate_or_serial: "DXB-10293".into(),
            current_meter: 45_000.0,
            status: FleetStatus::Active,
            category: "Pickup Truck".into(),
            location: "Main HQ".into(),
            assigned_to: Some("John Doe".into()),
            technical_details: None,
            last_service_date: None,
            next_service_date: None,
            next_service_meter: None,
            current_status_session_id: None,
        }
    }

    #[test]
    fn test_roundtrip_preserves_fields() {
        let mut workshop = item("CAT", "320 GC");
        workshop.item_type = FleetType::Equipment;
        workshop.status = FleetStatus::Workshop;
        workshop.current_meter = 3200.0;
        let fleet = vec![item("Toyota", "Hilux"), workshop];

        let exported = export_fleet(&fleet);
        let imported = parse_fleet(&exported);

        assert_eq!(imported.len(), 2);
        for (original, parsed) in fleet.iter().zip(&imported) {
            assert_eq!(parsed.item_type, original.item_type);
            assert_eq!(parsed.make, original.make);
            assert_eq!(parsed.model, original.model);
            assert_eq!(parsed.year, original.year);
            assert_eq!(parsed.plate_or_serial, original.plate_or_serial);
            assert_eq!(parsed.current_meter, original.current_meter);
            assert_eq!(parsed.status, original.status);
            assert_eq!(parsed.category, original.category);
            assert_eq!(parsed.location, original.location);
            assert_eq!(parsed.assigned_to, original.assigned_to);
        }
    }

    #[test]
    fn test_fields_with_commas_survive_quoting() {
        let mut fancy = item("Mercedes", "Actros, 6x4");
        fancy.location = "Depot \"B\", South".into();
        let imported = parse_fleet(&export_fleet(&[fancy.clone()]));
        assert_eq!(imported[0].model, fancy.model);
        assert_eq!(imported[0].location, fancy.location);
    }

    #[test]
    fn test_type_and_status_match_by_substring() {
        let csv = "header\n\
                   Heavy Equipment,CAT,320,2020,CAT-99,3200,In Workshop,Excavator,North,\n\
                   vehicle,Ford,F-150,2023,ABD-1,100,out of service,Pickup,HQ,\n\
                   VEHICLE,Nissan,Patrol,2021,P-1,50,parked,SUV,HQ,";
        let items = parse_fleet(csv);
        assert_eq!(items[0].item_type, FleetType::Equipment);
        assert_eq!(items[0].status, FleetStatus::Workshop);
        assert_eq!(items[1].status, FleetStatus::OutOfService);
        // Un estado no reconocido cae a ACTIVE
        assert_eq!(items[2].status, FleetStatus::Active);
    }

    #[test]
    fn test_short_rows_are_skipped_silently() {
        let csv = "header\nVEHICLE,Toyota\n\nVEHICLE,Toyota,Hilux,2022,DXB-1";
        let items = parse_fleet(csv);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].plate_or_serial, "DXB-1");
    }

    #[test]
    fn test_item_history_report_layout() {
        let asset = item("Toyota", "Hilux");
        let record = MaintenanceRecord {
            id: "r1".into(),
            fleet_item_id: "v1".into(),
            date: chrono::NaiveDate::from_ymd_opt(2023, 10, 15).unwrap(),
            meter_reading: 40_000.0,
            record_type: crate::models::maintenance::MaintenanceType::Service,
            description: "Regular 40k Service".into(),
            complaint: None,
            parts: "Oil Filter, Air Filter".into(),
            maintenance_items: vec!["Engine Oil".into(), "Air Filter (Primary)".into()],
            labor_cost: 150.0,
            parts_cost: 200.0,
            total_cost: 350.0,
            next_due_meter: Some(50_000.0),
            next_due_date: None,
            technician: Some("Mike".into()),
            created_by: Some("Ana".into()),
            attachments: vec![],
        };

        let report = export_item_history(&asset, &[record], "Full History");
        assert!(report.starts_with("ASSET HISTORY REPORT,Full History"));
        assert!(report.contains("Plate/Serial,\"DXB-10293\""));
        assert!(report.contains("2023-10-15,SERVICE,40000"));
        assert!(report.contains("\"Engine Oil; Air Filter (Primary)\""));
        assert!(report.contains(",150,200,350"));
    }

    #[test]
    fn test_numeric_fallbacks() {
        let csv = "header\nVEHICLE,Toyota,Hilux,not-a-year,DXB-1,not-a-meter,ACTIVE,,,";
        let items = parse_fleet(csv);
        assert_eq!(items[0].year, chrono::Utc::now().year());
        assert_eq!(items[0].current_meter, 0.0);
        assert_eq!(items[0].category, "General");
        assert_eq!(items[0].location, "Main HQ");
        assert_eq!(items[0].assigned_to, None);
    }
}
