//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{BranchRepository, DoctorRepository, PatientRepository, SupplierRepository};
use crate::infrastructure::{
    SeaOrmBranchRepository, SeaOrmDoctorRepository, SeaOrmPatientRepository,
    SeaOrmSupplierRepository,
};

const DEFAULT_WORKING_DAYS: u32 = 30;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub branch_repo: Arc<dyn BranchRepository>,
    pub doctor_repo: Arc<dyn DoctorRepository>,
    pub patient_repo: Arc<dyn PatientRepository>,
    pub supplier_repo: Arc<dyn SupplierRepository>,
    /// Used by salary generation for the no-pay daily rate
    pub working_days_per_month: u32,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let branch_repo = Arc::new(SeaOrmBranchRepository::new(db.clone()));
        let doctor_repo = Arc::new(SeaOrmDoctorRepository::new(db.clone()));
        let patient_repo = Arc::new(SeaOrmPatientRepository::new(db.clone()));
        let supplier_repo = Arc::new(SeaOrmSupplierRepository::new(db.clone()));

        Self {
            db,
            branch_repo,
            doctor_repo,
            patient_repo,
            supplier_repo,
            working_days_per_month: DEFAULT_WORKING_DAYS,
        }
    }

    pub fn with_working_days(mut self, days: u32) -> Self {
        self.working_days_per_month = days;
        self
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
