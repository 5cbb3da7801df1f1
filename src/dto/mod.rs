pub mod automation_dto;
pub mod course_dto;
pub mod notification_dto;
pub mod property_dto;
