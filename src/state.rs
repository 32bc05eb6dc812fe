use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::identity::IdentityService;
use crate::services::repository::BookingRepository;
use crate::services::sessions::SessionRegistry;

pub struct AppState {
    pub config: AppConfig,
    pub repository: BookingRepository,
    pub identity: Arc<dyn IdentityService>,
    pub sessions: SessionRegistry,
}
