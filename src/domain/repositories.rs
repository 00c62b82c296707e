//! Repository trait definitions
//!
//! These traits define the contract for data access to the plain CRUD
//! records. Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::{
    BranchInput, DoctorInput, PatientInput, SupplierInput, branch, doctor, patient, supplier,
};

/// Filter criteria for doctor queries
#[derive(Debug, Default, Clone)]
pub struct DoctorFilter {
    pub branch_id: Option<i32>,
    pub specialization: Option<String>,
    pub include_inactive: bool,
}

/// Repository trait for Branch entity
#[async_trait]
pub trait BranchRepository: Send + Sync {
    async fn find_all(&self, active_only: bool) -> Result<Vec<branch::Model>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<branch::Model>, DomainError>;

    /// Create a branch, rejecting duplicate names
    async fn create(&self, input: BranchInput) -> Result<branch::Model, DomainError>;

    async fn update(&self, id: i32, input: BranchInput) -> Result<branch::Model, DomainError>;

    /// Soft delete
    async fn deactivate(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for Doctor entity
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn find_all(&self, filter: DoctorFilter) -> Result<Vec<doctor::Model>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<doctor::Model>, DomainError>;

    /// Create a doctor under an existing branch
    async fn create(&self, input: DoctorInput) -> Result<doctor::Model, DomainError>;

    async fn update(&self, id: i32, input: DoctorInput) -> Result<doctor::Model, DomainError>;

    /// Soft delete
    async fn deactivate(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for Patient entity
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// List patients, optionally matching a name or phone fragment
    async fn find_all(&self, search: Option<String>) -> Result<Vec<patient::Model>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<patient::Model>, DomainError>;

    async fn create(&self, input: PatientInput) -> Result<patient::Model, DomainError>;

    async fn update(&self, id: i32, input: PatientInput) -> Result<patient::Model, DomainError>;

    /// Hard delete, refused while the patient still has appointments
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for Supplier entity
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn find_all(&self, active_only: bool) -> Result<Vec<supplier::Model>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<supplier::Model>, DomainError>;

    async fn create(&self, input: SupplierInput) -> Result<supplier::Model, DomainError>;

    async fn update(&self, id: i32, input: SupplierInput)
    -> Result<supplier::Model, DomainError>;

    /// Soft delete
    async fn deactivate(&self, id: i32) -> Result<(), DomainError>;
}
