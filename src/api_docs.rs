use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::branch::list_branches,
        api::branch::create_branch,
        api::doctor::list_doctors,
        api::doctor::get_all_doctor_diseases,
        api::patient::list_patients,
        api::appointment::book_appointment,
        api::appointment::update_appointment_status,
        api::session::get_all_main_questions,
        api::product::low_stock,
        api::stock::stock_in,
        api::stock::stock_out,
        api::sales::create_sale,
        api::sales::void_sale,
        api::staff::generate_salary,
        api::leave::apply_leave,
        api::leave::manage_leave,
        api::leave::admin_manage_leave,
        api::notification::list_notifications,
    ),
    tags(
        (name = "medidesk", description = "MediDesk hospital and pharmacy API")
    )
)]
pub struct ApiDoc;
