//! Utilidades de validación
//!
//! Funciones helper para validación de datos de formularios antes de
//! intentar cualquier escritura.

use chrono::NaiveDate;
use validator::ValidationError;

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un contador sea no negativo
pub fn validate_meter(value: f64) -> Result<(), ValidationError> {
    if value < 0.0 || !value.is_finite() {
        let mut error = ValidationError::new("meter");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un costo sea no negativo
pub fn validate_cost(value: f64) -> Result<(), ValidationError> {
    if value < 0.0 || !value.is_finite() {
        let mut error = ValidationError::new("cost");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-10").is_ok());
        assert!(validate_date("10/01/2024").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Toyota").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_meter_and_cost() {
        assert!(validate_meter(0.0).is_ok());
        assert!(validate_meter(-1.0).is_err());
        assert!(validate_cost(150.0).is_ok());
        assert!(validate_cost(f64::NAN).is_err());
    }
}
