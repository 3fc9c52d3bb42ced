pub mod confirm_prompt;
pub mod conflict_service;
pub mod suggestion_service;
pub mod tracker_service;
