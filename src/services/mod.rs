pub mod appointment_service;
pub mod disease_service;
pub mod leave_service;
pub mod notification_service;
pub mod product_service;
pub mod sale_service;
pub mod session_service;
pub mod staff_service;
pub mod stock_service;
