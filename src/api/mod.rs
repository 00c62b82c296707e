pub mod appointment;
pub mod branch;
pub mod doctor;
pub mod health;
pub mod leave;
pub mod notification;
pub mod patient;
pub mod product;
pub mod response;
pub mod sales;
pub mod session;
pub mod staff;
pub mod stock;
pub mod supplier;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Branches
        .route(
            "/branches",
            get(branch::list_branches).post(branch::create_branch),
        )
        .route(
            "/branches/:id",
            get(branch::get_branch)
                .put(branch::update_branch)
                .delete(branch::delete_branch),
        )
        // Doctors and diseases
        .route(
            "/doctors",
            get(doctor::list_doctors).post(doctor::create_doctor),
        )
        .route(
            "/doctors/:id",
            get(doctor::get_doctor)
                .put(doctor::update_doctor)
                .delete(doctor::delete_doctor),
        )
        .route(
            "/doctors/:id/diseases/:disease_id",
            post(doctor::assign_disease).delete(doctor::unassign_disease),
        )
        .route(
            "/diseases",
            get(doctor::list_diseases).post(doctor::create_disease),
        )
        .route("/doctor-diseases", get(doctor::get_all_doctor_diseases))
        // Patients
        .route(
            "/patients",
            get(patient::list_patients).post(patient::create_patient),
        )
        .route(
            "/patients/:id",
            get(patient::get_patient)
                .put(patient::update_patient)
                .delete(patient::delete_patient),
        )
        // Appointments
        .route(
            "/appointments",
            get(appointment::list_appointments).post(appointment::book_appointment),
        )
        .route("/appointments/:id", get(appointment::get_appointment))
        .route(
            "/appointments/:id/status",
            put(appointment::update_appointment_status),
        )
        // Questionnaires and sessions
        .route(
            "/diseases/:id/questions",
            get(session::get_all_main_questions),
        )
        .route("/questions", post(session::create_main_question))
        .route(
            "/questions/:id/sub-questions",
            post(session::create_sub_question),
        )
        .route("/sessions", post(session::start_session))
        .route("/sessions/:id", get(session::get_session))
        .route("/sessions/:id/answers", post(session::submit_answers))
        .route("/sessions/:id/close", put(session::close_session))
        // Suppliers
        .route(
            "/suppliers",
            get(supplier::list_suppliers).post(supplier::create_supplier),
        )
        .route(
            "/suppliers/:id",
            get(supplier::get_supplier)
                .put(supplier::update_supplier)
                .delete(supplier::delete_supplier),
        )
        // Products and stock
        .route(
            "/products",
            get(product::list_products).post(product::create_product),
        )
        .route("/products/low-stock", get(product::low_stock))
        .route(
            "/products/:id",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
        .route("/products/:id/stock-events", get(stock::list_stock_events))
        .route("/stock", get(stock::list_stock))
        .route("/stock/in", post(stock::stock_in))
        .route("/stock/out", post(stock::stock_out))
        // Sales
        .route("/sales", get(sales::list_sales).post(sales::create_sale))
        .route("/sales/summary", get(sales::sales_summary))
        .route("/sales/:id", get(sales::get_sale))
        .route("/sales/:id/void", put(sales::void_sale))
        // Staff, overtime, salaries
        .route("/staff", get(staff::list_staff).post(staff::create_staff))
        .route(
            "/staff/:id",
            get(staff::get_staff)
                .put(staff::update_staff)
                .delete(staff::delete_staff),
        )
        .route(
            "/overtime",
            get(staff::list_overtime).post(staff::record_overtime),
        )
        .route("/overtime/:id/decision", put(staff::decide_overtime))
        .route(
            "/salaries",
            get(staff::list_salaries).post(staff::generate_salary),
        )
        .route("/salaries/:id/pay", put(staff::pay_salary))
        // Leaves
        .route("/leaves", get(leave::list_leaves).post(leave::apply_leave))
        .route("/leaves/:id", get(leave::get_leave))
        .route("/leaves/:id/manage", put(leave::manage_leave))
        .route("/leaves/:id/admin-manage", put(leave::admin_manage_leave))
        .route("/leaves/:id/cancel", put(leave::cancel_leave))
        // Notifications
        .route("/notifications", get(notification::list_notifications))
        .route(
            "/notifications/unread-count",
            get(notification::unread_count),
        )
        .route("/notifications/read-all", put(notification::mark_all_read))
        .route("/notifications/:id/read", put(notification::mark_read))
        .with_state(state)
}
