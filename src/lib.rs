pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod realtime;
pub mod routes;
pub mod services;
pub mod utils;

use sea_orm::DatabaseConnection;

use crate::clients::maps::MapsClient;
use crate::clients::push::PushClient;
use crate::realtime::EventBroadcaster;

pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub maps: MapsClient,
    pub push: PushClient,
    pub events: EventBroadcaster,
}
