use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
    pub maps_api_url: String,
    pub maps_api_key: String,
    pub push_api_url: String,
    pub push_api_key: String,
    pub nearby_radius_km: f64,
    pub match_stale_minutes: i64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set"),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("JWT_EXPIRATION_HOURS must be a number"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            maps_api_url: env::var("MAPS_API_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com".to_string()),
            maps_api_key: env::var("MAPS_API_KEY")
                .expect("MAPS_API_KEY must be set"),
            push_api_url: env::var("PUSH_API_URL")
                .expect("PUSH_API_URL must be set"),
            push_api_key: env::var("PUSH_API_KEY")
                .expect("PUSH_API_KEY must be set"),
            nearby_radius_km: env::var("NEARBY_RADIUS_KM")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("NEARBY_RADIUS_KM must be a number"),
            // Requests untouched for longer than this stop showing up in
            // matching; deliberately generous so slow markets still match
            match_stale_minutes: env::var("MATCH_STALE_MINUTES")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .expect("MATCH_STALE_MINUTES must be a number"),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
