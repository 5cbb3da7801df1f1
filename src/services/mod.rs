pub mod candidate_service;
pub mod course_service;
pub mod notification_service;
pub mod property_service;
pub mod trigger_service;
pub mod vacancy_service;
