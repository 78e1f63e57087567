use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

use shared::types::StaffRecord;
use staff_service::{
    api::{router::staff_routes, state::StaffAppState},
    config::ReportSettings,
    domain::{service::StaffDirectoryService, staff::MockStaffRepository},
    error::StaffServiceError,
    infrastructure::report::{ExcelReportRenderer, PdfReportRenderer},
};

fn build_test_app(mock_staff: MockStaffRepository) -> Router {
    let settings = ReportSettings::default();
    let staff_service = Arc::new(StaffDirectoryService::new(
        Arc::new(mock_staff),
        Arc::new(ExcelReportRenderer::new(&settings)),
        Arc::new(PdfReportRenderer::new(&settings)),
    ));

    staff_routes(Arc::new(StaffAppState { staff_service }))
}

fn make_staff(staff_id: &str) -> StaffRecord {
    StaffRecord {
        staff_id: staff_id.to_string(),
        full_name: "Alice".to_string(),
        birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        gender: 2,
    }
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(res: axum::response::Response) -> serde_json::Value {
    let body = res.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn create_staff_returns_created() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff
        .expect_insert()
        .withf(|staff| staff.staff_id == "S01" && staff.gender == 2)
        .returning(Ok);

    let app = build_test_app(mock_staff);

    let body = json!({
        "staffId": "S01",
        "fullName": "Alice",
        "birthday": "1990-01-01",
        "gender": 2
    });

    let res = app
        .oneshot(json_request("POST", "/api/staff", body))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.headers()[header::LOCATION], "/api/staff/S01");

    let json = body_json(res).await;
    assert_eq!(json["staffId"], "S01");
    assert_eq!(json["fullName"], "Alice");
    assert_eq!(json["birthday"], "1990-01-01");
}

#[tokio::test]
async fn create_duplicate_staff_returns_400() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff
        .expect_insert()
        .returning(|_| Err(StaffServiceError::Conflict("Staff ID already exists.".into())));

    let app = build_test_app(mock_staff);

    let body = json!({
        "staffId": "S01",
        "fullName": "Alice",
        "birthday": "1990-01-01",
        "gender": 2
    });

    let res = app
        .oneshot(json_request("POST", "/api/staff", body))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let json = body_json(res).await;
    assert!(!json["success"].as_bool().unwrap());
    assert!(json["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn create_staff_with_oversized_id_is_rejected_before_store() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff.expect_insert().never();

    let app = build_test_app(mock_staff);

    let body = json!({
        "staffId": "TOO-LONG-ID",
        "fullName": "Alice",
        "birthday": "1990-01-01",
        "gender": 1
    });

    let res = app
        .oneshot(json_request("POST", "/api/staff", body))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_staff_with_malformed_birthday_returns_400() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff.expect_insert().never();

    let app = build_test_app(mock_staff);

    let body = json!({
        "staffId": "S1",
        "fullName": "Alice",
        "birthday": "01/02/1990",
        "gender": 1
    });

    let res = app
        .oneshot(json_request("POST", "/api/staff", body))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = body_json(res).await;
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());
    assert!(!json["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn create_staff_missing_full_name_returns_400() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff.expect_insert().never();

    let app = build_test_app(mock_staff);

    let body = json!({
        "staffId": "S1",
        "birthday": "1990-01-01",
        "gender": 1
    });

    let res = app
        .oneshot(json_request("POST", "/api/staff", body))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = body_json(res).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("fullName"));
}

#[tokio::test]
async fn create_staff_with_five_digit_year_returns_400() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff.expect_insert().never();

    let app = build_test_app(mock_staff);

    let body = json!({
        "staffId": "S1",
        "fullName": "Alice",
        "birthday": "+10000-01-01",
        "gender": 1
    });

    let res = app
        .oneshot(json_request("POST", "/api/staff", body))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["success"], false);
}

#[tokio::test]
async fn update_staff_with_non_json_body_returns_400() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff.expect_update().never();

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/staff/S1")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["success"], false);
}

#[tokio::test]
async fn export_with_malformed_criteria_returns_400() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff.expect_search().never();
    mock_staff.expect_find_all().never();

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(json_request(
            "POST",
            "/api/staff/export/pdf",
            json!({ "gender": "unknown" }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["success"], false);
}

#[tokio::test]
async fn find_all_staff_returns_list() {
    let mut mock_staff = MockStaffRepository::new();
    let staff = vec![make_staff("1"), make_staff("2")];

    mock_staff
        .expect_find_all()
        .returning(move || Ok(staff.clone()));

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/staff")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);

    let json = body_json(res).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn find_staff_returns_record() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff
        .expect_find_by_id()
        .withf(|id| id == "S01")
        .returning(|id| Ok(Some(make_staff(id))));

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/staff/S01")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["staffId"], "S01");
}

#[tokio::test]
async fn find_staff_not_found_returns_404() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff.expect_find_by_id().returning(|_| Ok(None));

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/staff/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// -- Staff update / delete tests --

#[tokio::test]
async fn update_staff_returns_updated() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff
        .expect_update()
        .withf(|id, staff| id == "S01" && staff.full_name == "Alice Updated")
        .returning(|_, staff| Ok(staff));

    let app = build_test_app(mock_staff);

    let body = json!({
        "staffId": "S01",
        "fullName": "Alice Updated",
        "birthday": "1990-01-01",
        "gender": 2
    });
    let res = app
        .oneshot(json_request("PUT", "/api/staff/S01", body))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["fullName"], "Alice Updated");
}

#[tokio::test]
async fn update_staff_with_mismatched_id_returns_400() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff.expect_update().never();

    let app = build_test_app(mock_staff);

    let body = json!({
        "staffId": "S02",
        "fullName": "Alice",
        "birthday": "1990-01-01",
        "gender": 2
    });
    let res = app
        .oneshot(json_request("PUT", "/api/staff/S01", body))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_staff_not_found_returns_404() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff
        .expect_update()
        .returning(|_, _| Err(StaffServiceError::NotFound("Staff not found".into())));

    let app = build_test_app(mock_staff);

    let body = json!({
        "staffId": "ghost",
        "fullName": "Ghost",
        "birthday": "1990-01-01",
        "gender": 1
    });
    let res = app
        .oneshot(json_request("PUT", "/api/staff/ghost", body))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_staff_returns_no_content() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff.expect_delete().returning(|_| Ok(true));

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/staff/S01")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn delete_staff_not_found_returns_404() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff.expect_delete().returning(|_| Ok(false));

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/staff/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// -- Search / export tests --

#[tokio::test]
async fn search_parses_query_string() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff
        .expect_search()
        .withf(|criteria| {
            criteria.gender == Some(1)
                && criteria.name.as_deref() == Some("Jo")
                && criteria.staff_id.is_none()
                && criteria.from_date == NaiveDate::from_ymd_opt(1989, 1, 1)
                && criteria.to_date.is_none()
        })
        .returning(|_| Ok(vec![make_staff("1")]));

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/staff/search?staffId=&name=Jo&gender=1&fromDate=1989-01-01&toDate=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn search_without_filters_lists_everything() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff
        .expect_find_all()
        .returning(|| Ok(vec![make_staff("1"), make_staff("2")]));
    mock_staff.expect_search().never();

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/staff/search")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn search_with_bad_date_returns_400() {
    let app = build_test_app(MockStaffRepository::new());

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/staff/search?fromDate=yesterday")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = body_json(res).await;
    assert_eq!(json["success"], false);
    assert!(json["data"].is_null());
    assert!(json["error"].as_str().unwrap().contains("yesterday"));
}

#[tokio::test]
async fn search_with_out_of_range_year_returns_400() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff.expect_search().never();

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/staff/search?fromDate=%2B10000-01-01")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["success"], false);
}

#[tokio::test]
async fn export_excel_returns_attachment() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff
        .expect_search()
        .returning(|_| Ok(vec![make_staff("1")]));

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(json_request(
            "POST",
            "/api/staff/export/excel",
            json!({ "gender": 2 }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        res.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"staff-report.xlsx\""
    );

    let body = res.into_body().collect().await.unwrap().to_bytes();
    // xlsx files are zip archives
    assert!(body.starts_with(b"PK"));
}

#[tokio::test]
async fn export_pdf_of_empty_result_is_still_a_document() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff.expect_find_all().returning(|| Ok(Vec::new()));

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(json_request("POST", "/api/staff/export/pdf", json!({})))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/pdf");

    let body = res.into_body().collect().await.unwrap().to_bytes();
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn database_failure_returns_500_without_details() {
    let mut mock_staff = MockStaffRepository::new();
    mock_staff
        .expect_find_all()
        .returning(|| Err(StaffServiceError::Database(sqlx::Error::PoolTimedOut)));

    let app = build_test_app(mock_staff);

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/staff")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(res).await;
    assert!(!json["error"].as_str().unwrap().contains("PoolTimedOut"));
}

#[tokio::test]
async fn headpat_reports_healthy() {
    let app = build_test_app(MockStaffRepository::new());

    let res = app
        .oneshot(
            Request::builder()
                .uri("/headpat")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}
