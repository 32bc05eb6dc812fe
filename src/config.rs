use std::env;

/// Which document store backs the booking collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
    Firestore,
}

impl StoreBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(StoreBackend::Sqlite),
            "memory" => Some(StoreBackend::Memory),
            "firestore" => Some(StoreBackend::Firestore),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Memory => "memory",
            StoreBackend::Firestore => "firestore",
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: String,
    pub firebase_api_key: String,
    pub firebase_project_id: String,
    pub firestore_id_token: String,
    pub bookings_collection: String,
    pub login_email: String,
    pub login_password: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let store_backend = match lookup("STORE_BACKEND") {
            Some(raw) => StoreBackend::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unknown STORE_BACKEND, falling back to sqlite");
                StoreBackend::Sqlite
            }),
            None => StoreBackend::Sqlite,
        };

        Self {
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            store_backend,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "bookdesk.db".to_string()),
            firebase_api_key: lookup("FIREBASE_API_KEY").unwrap_or_default(),
            firebase_project_id: lookup("FIREBASE_PROJECT_ID").unwrap_or_default(),
            firestore_id_token: lookup("FIRESTORE_ID_TOKEN").unwrap_or_default(),
            bookings_collection: lookup("BOOKINGS_COLLECTION")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "bookings".to_string()),
            login_email: lookup("LOGIN_EMAIL").unwrap_or_else(|| "admin@example.com".to_string()),
            login_password: lookup("LOGIN_PASSWORD").unwrap_or_else(|| "changeme".to_string()),
        }
    }

    /// Firebase Auth is used whenever an API key is configured.
    pub fn uses_firebase_identity(&self) -> bool {
        !self.firebase_api_key.is_empty()
    }
}
