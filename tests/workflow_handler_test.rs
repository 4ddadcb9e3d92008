mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::*;
use nas_backend::model::application_form::ApplicationStatus;
use nas_backend::model::notification::NotificationKind;
use nas_backend::model::principal::Principal;
use nas_backend::model::user::UserRole;
use serde_json::{json, Value};

/// Applicant with a submitted application, returning its principal and the application id.
async fn applicant_with_application(ctx: &TestContext, name: &str) -> (Principal, String) {
    let applicant = ctx.principal(UserRole::Applicant, name).await;
    let form = ctx.services.application.submit(&applicant, sample_application()).await.unwrap();
    (applicant, form.id.unwrap().to_hex())
}

fn document_body(content_type: &str) -> Value {
    json!({
        "document_type": "report_card",
        "file_name": "grades.pdf",
        "file_path": "uploads/grades.pdf",
        "content_type": content_type,
        "size": 2048,
    })
}

fn evaluation_body(scholar_id: &str) -> Value {
    json!({
        "scholar_id": scholar_id,
        "semester": "First",
        "academic_year": "2025-2026",
        "ratings": {
            "attendance": 5.0,
            "punctuality": 4.0,
            "quality_of_work": 4.5,
            "attitude": 4.0,
            "initiative": 3.5,
            "cooperation": 4.0,
        },
        "remarks": "Dependable at the registrar counter",
        "recommendation": "retain",
    })
}

#[tokio::test]
async fn test_role_routes() {
    let ctx = setup().await;
    let app = ctx.services.router();
    ctx.create_user(UserRole::OasStaff, "oas").await;
    ctx.create_user(UserRole::Panelist, "panel").await;
    let staff_token = login(&app, "oas@university.edu").await;
    let panel_token = login(&app, "panel@university.edu").await;

    let (status, roles) = send(&app, "GET", "/roles", Some(&staff_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roles.as_array().unwrap().len(), UserRole::ALL.len());
    let (status, permissions) = send(&app, "GET", "/permissions", Some(&staff_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(permissions.as_array().unwrap().iter().any(|p| p["code"] == "role:manage"));

    let (status, body) = send(&app, "GET", "/roles", Some(&panel_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let grants = json!({ "permissions": ["interview:recommend", "evaluation:view"] });
    let (status, role) = send(&app, "PUT", "/roles/panelist/permissions", Some(&staff_token), Some(grants)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(role["permissions"], json!(["interview:recommend", "evaluation:view"]));

    let unknown = json!({ "permissions": ["interview:delete"] });
    let (status, body) = send(&app, "PUT", "/roles/panelist/permissions", Some(&staff_token), Some(unknown)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");

    let nameless = json!({ "name": "", "description": "Nobody", "permissions": [] });
    let (status, body) = send(&app, "POST", "/roles", Some(&staff_token), Some(nameless)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");

    let existing = json!({ "name": "panelist", "description": "Interview panel", "permissions": [] });
    let (status, _) = send(&app, "POST", "/roles", Some(&staff_token), Some(existing)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_document_routes() {
    let ctx = setup().await;
    let app = ctx.services.router();
    let (_, application_id) = applicant_with_application(&ctx, "maria").await;
    ctx.create_user(UserRole::OasStaff, "oas").await;
    let applicant_token = login(&app, "maria@university.edu").await;
    let staff_token = login(&app, "oas@university.edu").await;
    let uri = format!("/applications/{}/documents", application_id);

    let (status, document) = send(&app, "POST", &uri, Some(&applicant_token), Some(document_body("application/pdf"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(document["status"], "pending");
    assert_eq!(document["document_type"], "report_card");

    let (status, body) = send(&app, "POST", &uri, Some(&applicant_token), Some(document_body("text/plain"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");

    let mut passport = document_body("application/pdf");
    passport["document_type"] = json!("passport");
    let (status, _) = send(&app, "POST", &uri, Some(&applicant_token), Some(passport)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let mut unnamed = document_body("application/pdf");
    unnamed["file_name"] = json!("");
    let (status, body) = send(&app, "POST", &uri, Some(&applicant_token), Some(unnamed)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");

    let (status, listed) = send(&app, "GET", &uri, Some(&staff_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let review_uri = format!("/documents/{}/review", oid(&document));
    let verdict = json!({ "status": "verified", "remarks": "Legible copy" });
    let (status, _) = send(&app, "PUT", &review_uri, Some(&applicant_token), Some(verdict.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, reviewed) = send(&app, "PUT", &review_uri, Some(&staff_token), Some(verdict)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reviewed["status"], "verified");
}

#[tokio::test]
async fn test_personality_test_routes() {
    let ctx = setup().await;
    let app = ctx.services.router();
    ctx.create_user(UserRole::OasStaff, "oas").await;
    ctx.create_user(UserRole::Applicant, "maria").await;
    let staff_token = login(&app, "oas@university.edu").await;
    let applicant_token = login(&app, "maria@university.edu").await;

    let template = json!({
        "title": "Work Attitude Inventory",
        "questions": [
            { "number": 1, "text": "I finish tasks ahead of deadlines", "options": ["Agree", "Disagree"] },
        ],
    });
    let (status, created) = send(&app, "POST", "/personality-tests/templates", Some(&staff_token), Some(template)).await;
    assert_eq!(status, StatusCode::CREATED);
    let template_id = oid(&created);

    let empty = json!({ "title": "Empty", "questions": [] });
    let (status, body) = send(&app, "POST", "/personality-tests/templates", Some(&staff_token), Some(empty)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");

    let (status, templates) = send(&app, "GET", "/personality-tests/templates", Some(&applicant_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(templates.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "POST", "/personality-tests", Some(&applicant_token), Some(json!({ "template_id": "short" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");

    let (status, test) = send(&app, "POST", "/personality-tests", Some(&applicant_token), Some(json!({ "template_id": template_id }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(test["status"], "in_progress");
    let test_uri = format!("/personality-tests/{}", oid(&test));
    let answers_uri = format!("{}/answers", test_uri);

    let (status, body) = send(&app, "POST", &answers_uri, Some(&applicant_token), Some(json!({ "answers": [] }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");

    let blank = json!({ "answers": [{ "question_number": 1, "answer": "" }] });
    let (status, _) = send(&app, "POST", &answers_uri, Some(&applicant_token), Some(blank)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let answers = json!({ "answers": [{ "question_number": 1, "answer": "Agree" }] });
    let (status, result) = send(&app, "POST", &answers_uri, Some(&applicant_token), Some(answers)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["test"]["status"], "completed");
    assert_eq!(result["answered"], 1);

    let (status, fetched) = send(&app, "GET", &test_uri, Some(&staff_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["total_questions"], 1);
}

#[tokio::test]
async fn test_interview_routes() {
    let ctx = setup().await;
    let app = ctx.services.router();
    let (_, application_id) = applicant_with_application(&ctx, "maria").await;
    ctx.create_user(UserRole::OasStaff, "oas").await;
    let panelist = ctx.create_user(UserRole::Panelist, "panel").await;
    let staff_token = login(&app, "oas@university.edu").await;
    let panel_token = login(&app, "panel@university.edu").await;

    let request = json!({
        "application_id": application_id,
        "panelist_id": panelist.id.unwrap().to_hex(),
        "scheduled_at": (Utc::now() + Duration::days(3)).to_rfc3339(),
        "location": "OAS Conference Room",
    });

    let mut bad_panelist = request.clone();
    bad_panelist["panelist_id"] = json!("abc");
    let (status, body) = send(&app, "POST", "/interviews", Some(&staff_token), Some(bad_panelist)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");

    let mut bad_time = request.clone();
    bad_time["scheduled_at"] = json!("next tuesday");
    let (status, _) = send(&app, "POST", "/interviews", Some(&staff_token), Some(bad_time)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, interview) = send(&app, "POST", "/interviews", Some(&staff_token), Some(request)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(interview["status"], "scheduled");

    let (status, mine) = send(&app, "GET", "/interviews", Some(&panel_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let uri = format!("/interviews/{}/recommendation", oid(&interview));
    let (status, _) = send(&app, "PUT", &uri, Some(&panel_token), Some(json!({ "recommendation": "maybe" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let verdict = json!({ "recommendation": "recommended", "remarks": "Clear goals" });
    let (status, done) = send(&app, "PUT", &uri, Some(&panel_token), Some(verdict)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");
    assert_eq!(done["recommendation"], "recommended");

    let cancel_uri = format!("/interviews/{}/cancel", oid(&interview));
    let (status, _) = send(&app, "PUT", &cancel_uri, Some(&staff_token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_evaluation_routes() {
    let ctx = setup().await;
    let app = ctx.services.router();
    let (scholar, application_id) = applicant_with_application(&ctx, "maria").await;
    let staff = ctx.principal(UserRole::OasStaff, "oas").await;
    ctx.services
        .application
        .update_status(&staff, application_id.parse().unwrap(), ApplicationStatus::Approved, None)
        .await
        .unwrap();
    ctx.create_user(UserRole::NasSupervisor, "super").await;
    let supervisor_token = login(&app, "super@university.edu").await;
    let scholar_token = login(&app, "maria@university.edu").await;
    let scholar_id = scholar.user_id.to_hex();

    let mut short_year = evaluation_body(&scholar_id);
    short_year["academic_year"] = json!("2025");
    let (status, body) = send(&app, "POST", "/evaluations", Some(&supervisor_token), Some(short_year)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation");

    let mut off_scale = evaluation_body(&scholar_id);
    off_scale["ratings"]["attendance"] = json!(7.0);
    let (status, _) = send(&app, "POST", "/evaluations", Some(&supervisor_token), Some(off_scale)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut expel = evaluation_body(&scholar_id);
    expel["recommendation"] = json!("expel");
    let (status, _) = send(&app, "POST", "/evaluations", Some(&supervisor_token), Some(expel)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, evaluation) = send(&app, "POST", "/evaluations", Some(&supervisor_token), Some(evaluation_body(&scholar_id))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(evaluation["recommendation"], "retain");

    let (status, body) = send(&app, "GET", "/evaluations?scholar_id=bad", Some(&supervisor_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");

    let uri = format!("/evaluations?scholar_id={}", scholar_id);
    let (status, listed) = send(&app, "GET", &uri, Some(&supervisor_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let uri = format!("/evaluations/{}", oid(&evaluation));
    let (status, fetched) = send(&app, "GET", &uri, Some(&supervisor_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["semester"], "First");

    let (status, _) = send(&app, "GET", "/evaluations", Some(&scholar_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_notification_routes() {
    let ctx = setup().await;
    let app = ctx.services.router();
    let owner = ctx.create_user(UserRole::Applicant, "maria").await;
    ctx.create_user(UserRole::Applicant, "juan").await;
    let owner_token = login(&app, "maria@university.edu").await;
    let other_token = login(&app, "juan@university.edu").await;
    let notification = ctx
        .services
        .notification
        .notify(owner.id.unwrap(), NotificationKind::Account, "Welcome", "Account created")
        .await
        .unwrap();
    let uri = format!("/notifications/{}/read", notification.id.unwrap().to_hex());

    let (status, _) = send(&app, "GET", "/notifications?unread_only=maybe", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "PUT", "/notifications/not-an-id/read", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadRequest");

    let (status, _) = send(&app, "PUT", &uri, Some(&other_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, read) = send(&app, "PUT", &uri, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["read"], true);

    let (status, all) = send(&app, "GET", "/notifications", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);
    let (status, unread) = send(&app, "GET", "/notifications?unread_only=true", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(unread.as_array().unwrap().is_empty());
}
