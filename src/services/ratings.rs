use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entities::{trip_request, user};
use crate::error::{AppError, AppResult};

pub fn is_valid_rating(rating: f64) -> bool {
    rating.is_finite() && (1.0..=5.0).contains(&rating)
}

/// Mean of the given ratings rounded to 2 decimals; 0 when there are none.
/// The full recompute keeps the denormalized aggregate exact even after
/// rating edits.
pub fn aggregate_rating(ratings: &[f64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    (mean * 100.0).round() / 100.0
}

async fn load_request_for_rating(
    db: &DatabaseConnection,
    id: i64,
) -> AppResult<trip_request::Model> {
    let request = trip_request::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip request not found".to_string()))?;

    if !request.status.is_terminal() {
        return Err(AppError::Conflict(
            "Ratings can only be set on closed trips".to_string(),
        ));
    }
    Ok(request)
}

/// Client rates the driver; recomputes the driver's aggregate.
pub async fn rate_driver(db: &DatabaseConnection, id: i64, rating: f64) -> AppResult<()> {
    if !is_valid_rating(rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    let request = load_request_for_rating(db, id).await?;
    let driver_id = request
        .driver_id
        .ok_or_else(|| AppError::Conflict("No driver was assigned to this trip".to_string()))?;

    let mut active: trip_request::ActiveModel = request.into();
    active.driver_rating = Set(Some(rating));
    active.updated_at = Set(Utc::now().into());
    active.update(db).await?;

    recompute_driver_aggregate(db, driver_id).await
}

/// Driver rates the client; recomputes the client's aggregate.
pub async fn rate_client(db: &DatabaseConnection, id: i64, rating: f64) -> AppResult<()> {
    if !is_valid_rating(rating) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5".to_string(),
        ));
    }

    let request = load_request_for_rating(db, id).await?;
    let client_id = request.client_id;

    let mut active: trip_request::ActiveModel = request.into();
    active.client_rating = Set(Some(rating));
    active.updated_at = Set(Utc::now().into());
    active.update(db).await?;

    recompute_client_aggregate(db, client_id).await
}

async fn recompute_driver_aggregate(db: &DatabaseConnection, driver_id: Uuid) -> AppResult<()> {
    let rated = trip_request::Entity::find()
        .filter(trip_request::Column::DriverId.eq(driver_id))
        .filter(trip_request::Column::DriverRating.is_not_null())
        .all(db)
        .await?;
    let ratings: Vec<f64> = rated.iter().filter_map(|r| r.driver_rating).collect();
    let aggregate = aggregate_rating(&ratings);

    user::Entity::update_many()
        .set(user::ActiveModel {
            general_driver_rating: Set(aggregate),
            ..Default::default()
        })
        .filter(user::Column::Id.eq(driver_id))
        .exec(db)
        .await?;

    tracing::debug!(%driver_id, aggregate, "driver rating aggregate recomputed");
    Ok(())
}

async fn recompute_client_aggregate(db: &DatabaseConnection, client_id: Uuid) -> AppResult<()> {
    let rated = trip_request::Entity::find()
        .filter(trip_request::Column::ClientId.eq(client_id))
        .filter(trip_request::Column::ClientRating.is_not_null())
        .all(db)
        .await?;
    let ratings: Vec<f64> = rated.iter().filter_map(|r| r.client_rating).collect();
    let aggregate = aggregate_rating(&ratings);

    user::Entity::update_many()
        .set(user::ActiveModel {
            general_client_rating: Set(aggregate),
            ..Default::default()
        })
        .filter(user::Column::Id.eq(client_id))
        .exec(db)
        .await?;

    tracing::debug!(%client_id, aggregate, "client rating aggregate recomputed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(is_valid_rating(1.0));
        assert!(is_valid_rating(3.5));
        assert!(is_valid_rating(5.0));
        assert!(!is_valid_rating(0.99));
        assert!(!is_valid_rating(5.01));
        assert!(!is_valid_rating(f64::NAN));
    }

    #[test]
    fn aggregate_is_the_rounded_mean() {
        assert_eq!(aggregate_rating(&[5.0, 4.0]), 4.5);
        assert_eq!(aggregate_rating(&[5.0, 4.0, 4.0]), 4.33);
        assert_eq!(aggregate_rating(&[3.0]), 3.0);
    }

    #[test]
    fn no_ratings_resets_to_zero() {
        assert_eq!(aggregate_rating(&[]), 0.0);
    }
}
