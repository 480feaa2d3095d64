use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;

use crate::clients::maps::{LatLng, MapsClient};
use crate::entities::fare_rates;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize)]
pub struct EstimateLeg {
    pub text: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FareEstimate {
    pub recommended_value: f64,
    pub origin_address: Option<String>,
    pub destination_address: Option<String>,
    /// Distance in km
    pub distance: EstimateLeg,
    /// Duration in minutes
    pub duration: EstimateLeg,
    pub km_rate: f64,
    pub min_rate: f64,
}

/// `distance_m` in meters, `duration_s` in seconds; rates are per km and
/// per minute.
pub fn recommended_fare(km_rate: f64, min_rate: f64, distance_m: f64, duration_s: f64) -> f64 {
    km_rate * (distance_m / 1000.0) + min_rate * (duration_s / 60.0)
}

/// Suggest a price for the origin/destination pair. Rates are re-read
/// from the store on every call so admin changes apply immediately.
pub async fn estimate(
    db: &DatabaseConnection,
    maps: &MapsClient,
    origin: LatLng,
    destination: LatLng,
    is_car: bool,
) -> AppResult<FareEstimate> {
    let rates = fare_rates::Entity::find_by_id(1)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal("Fare rates are not configured".to_string()))?;

    let (km_rate, min_rate) = if is_car {
        (rates.km_rate_car, rates.min_rate_car)
    } else {
        (rates.km_rate_motorcycle, rates.min_rate_motorcycle)
    };

    let matrix = maps
        .distance_matrix(origin, &[destination])
        .await
        .map_err(|e| {
            tracing::warn!("fare estimation routing call failed: {}", e);
            AppError::ServiceUnavailable("Fare estimation is unavailable".to_string())
        })?;

    let element = matrix
        .rows
        .first()
        .and_then(|row| row.elements.first())
        .filter(|element| element.is_ok())
        .ok_or_else(|| {
            AppError::ServiceUnavailable("Fare estimation is unavailable".to_string())
        })?;

    let (Some(distance), Some(duration)) = (&element.distance, &element.duration) else {
        return Err(AppError::ServiceUnavailable(
            "Fare estimation is unavailable".to_string(),
        ));
    };

    Ok(FareEstimate {
        recommended_value: recommended_fare(km_rate, min_rate, distance.value, duration.value),
        origin_address: matrix.origin_addresses.first().cloned(),
        destination_address: matrix.destination_addresses.first().cloned(),
        distance: EstimateLeg {
            text: distance.text.clone(),
            value: distance.value / 1000.0,
        },
        duration: EstimateLeg {
            text: duration.text.clone(),
            value: duration.value / 60.0,
        },
        km_rate,
        min_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fare_combines_km_and_minute_rates() {
        // 10 km at 2.00/km plus 20 min at 0.50/min
        let fare = recommended_fare(2.00, 0.50, 10_000.0, 1_200.0);
        assert!((fare - 30.00).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_route_is_free() {
        assert_eq!(recommended_fare(2.00, 0.50, 0.0, 0.0), 0.0);
    }
}
