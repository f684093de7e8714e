use actix_web::{HttpResponse, web};

use crate::{
    auth::auth::AuthStaff, error::AppError, model::staff::StaffProfile, store::AttendanceStore,
};

/// Profile of the logged-in staff member
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Current staff profile", body = StaffProfile),
        (status = 401, description = "Missing token"),
        (status = 403, description = "Invalid token"),
        (status = 404, description = "Staff member not found", body = Object, example = json!({
            "message": "Staff member not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn get_profile(
    auth: AuthStaff,
    store: web::Data<dyn AttendanceStore>,
) -> Result<HttpResponse, AppError> {
    let staff = store
        .find_staff(&auth.staff_id)
        .ok_or_else(|| AppError::NotFound("Staff member not found".to_string()))?;

    Ok(HttpResponse::Ok().json(StaffProfile::from(&staff)))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web::Data};
    use serde_json::Value;

    use crate::{
        auth::jwt::generate_token,
        config::Config,
        routes,
        store::AttendanceStore,
        test_support::{shared_store, staff_at},
    };

    #[actix_web::test]
    async fn returns_profile_of_token_subject() {
        let config = Config::for_tests();
        let store: Data<dyn AttendanceStore> = Data::from(shared_store());
        let app = test::init_service(
            App::new()
                .app_data(Data::new(config.clone()))
                .app_data(store)
                .configure(|cfg| routes::configure(cfg, config.clone())),
        )
        .await;

        let me = staff_at("STAFF001", 0.0, 0.0, 75.0);
        let token = generate_token(&me, &config.jwt_secret, 60).unwrap();
        let req = test::TestRequest::get()
            .uri("/api/profile")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["staffId"], "STAFF001");
        assert_eq!(body["assignedClinic"]["radius"], 75.0);

        let ghost = staff_at("GHOST", 0.0, 0.0, 75.0);
        let token = generate_token(&ghost, &config.jwt_secret, 60).unwrap();
        let req = test::TestRequest::get()
            .uri("/api/profile")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
