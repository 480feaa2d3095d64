use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    fn to_param(self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    /// Meters for distances, seconds for durations
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixElement {
    pub status: String,
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
}

impl MatrixElement {
    pub fn is_ok(&self) -> bool {
        self.status == "OK" && self.distance.is_some() && self.duration.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatrixRow {
    pub elements: Vec<MatrixElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DistanceMatrixResponse {
    pub status: String,
    #[serde(default)]
    pub origin_addresses: Vec<String>,
    #[serde(default)]
    pub destination_addresses: Vec<String>,
    pub rows: Vec<MatrixRow>,
}

/// Thin client for the routing provider's distance-matrix endpoint.
/// One origin, many destinations, driving mode.
#[derive(Clone)]
pub struct MapsClient {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl MapsClient {
    pub fn new(base: &str, api_key: &str) -> AppResult<Self> {
        let base = base
            .parse()
            .map_err(|e| AppError::Internal(format!("{} is not a valid url: {}", base, e)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            api_key: api_key.to_string(),
        })
    }

    pub async fn distance_matrix(
        &self,
        origin: LatLng,
        destinations: &[LatLng],
    ) -> AppResult<DistanceMatrixResponse> {
        let url = self
            .base
            .join("/maps/api/distancematrix/json")
            .map_err(|e| AppError::Internal(format!("error joining url: {}", e)))?;

        let destinations = destinations
            .iter()
            .map(|d| d.to_param())
            .collect::<Vec<_>>()
            .join("|");

        let response = self
            .http
            .get(url)
            .query(&[
                ("origins", origin.to_param()),
                ("destinations", destinations),
                ("mode", "driving".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::ServiceUnavailable(format!("Routing provider unreachable: {}", e))
            })?;

        let matrix: DistanceMatrixResponse = response.json().await.map_err(|e| {
            AppError::ServiceUnavailable(format!("Invalid routing provider response: {}", e))
        })?;

        if matrix.status != "OK" {
            return Err(AppError::ServiceUnavailable(format!(
                "Routing provider rejected the request: {}",
                matrix.status
            )));
        }

        Ok(matrix)
    }
}
