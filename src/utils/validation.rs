use crate::domain::model::Point;
use crate::utils::error::{AdminError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AdminError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AdminError::validation(
            field_name,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// WGS-84 bounds; NaN and infinities are rejected as well
pub fn validate_coordinate(lng: f64, lat: f64) -> Result<()> {
    if !lng.is_finite() || !lat.is_finite() {
        return Err(AdminError::InvalidCoordinate {
            lng,
            lat,
            reason: "coordinate must be a finite number".to_string(),
        });
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(AdminError::InvalidCoordinate {
            lng,
            lat,
            reason: "longitude out of range".to_string(),
        });
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(AdminError::InvalidCoordinate {
            lng,
            lat,
            reason: "latitude out of range".to_string(),
        });
    }
    Ok(())
}

pub fn validate_point(point: &Point) -> Result<()> {
    validate_coordinate(point.lng, point.lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("items_per_page", 15, 1).is_ok());
        assert!(validate_positive_number("items_per_page", 0, 1).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("customer_name", "Sara").is_ok());
        assert!(validate_non_empty_string("customer_name", "   ").is_err());
    }

    #[test]
    fn test_validate_coordinate() {
        assert!(validate_coordinate(46.68, 24.79).is_ok());
        assert!(validate_coordinate(181.0, 24.79).is_err());
        assert!(validate_coordinate(46.68, -91.0).is_err());
        assert!(validate_coordinate(f64::NAN, 24.79).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("map.default_zoom", 11u8, 1, 20).is_ok());
        assert!(validate_range("map.default_zoom", 25u8, 1, 20).is_err());
    }
}
