//! Repository implementations using SeaORM

pub mod branch_repository;
pub mod doctor_repository;
pub mod patient_repository;
pub mod supplier_repository;

pub use branch_repository::SeaOrmBranchRepository;
pub use doctor_repository::SeaOrmDoctorRepository;
pub use patient_repository::SeaOrmPatientRepository;
pub use supplier_repository::SeaOrmSupplierRepository;
