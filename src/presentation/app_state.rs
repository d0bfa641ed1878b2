// Application state for command handlers
use crate::application::session_filter::SessionFilterService;

#[derive(Clone)]
pub struct AppState {
    pub session_service: SessionFilterService,
}
