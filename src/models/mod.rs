pub mod appointment;
pub mod branch;
pub mod disease;
pub mod doctor;
pub mod doctor_disease;
pub mod doctor_session;
pub mod leave;
pub mod main_question;
pub mod notification;
pub mod overtime_record;
pub mod patient;
pub mod product;
pub mod product_stock;
pub mod salary;
pub mod sale;
pub mod sale_item;
pub mod session_answer;
pub mod staff;
pub mod stock_event;
pub mod sub_question;
pub mod supplier;

pub use branch::BranchInput;
pub use doctor::DoctorInput;
pub use patient::PatientInput;
pub use product::ProductInput;
pub use staff::StaffInput;
pub use supplier::SupplierInput;
