mod common;

use common::*;
use bson::oid::ObjectId;
use nas_backend::dto::personality_test_dto::{AnswerInput, CreateTemplateRequest};
use nas_backend::model::personality_test::{Question, TestStatus};
use nas_backend::model::principal::Principal;
use nas_backend::model::user::UserRole;
use nas_backend::util::error::ServiceError;

fn likert(number: u32, text: &str) -> Question {
    Question {
        number,
        text: text.to_string(),
        options: vec!["Agree".to_string(), "Neutral".to_string(), "Disagree".to_string()],
    }
}

fn answer(question_number: u32, answer: &str) -> AnswerInput {
    AnswerInput { question_number, answer: answer.to_string() }
}

async fn create_template(ctx: &TestContext, staff: &Principal) -> ObjectId {
    let request = CreateTemplateRequest {
        title: "Work Attitude Inventory".to_string(),
        description: Some("Short self-assessment".to_string()),
        questions: vec![
            Question { number: 3, text: "Describe a time you helped a classmate".to_string(), options: vec![] },
            likert(1, "I finish tasks ahead of deadlines"),
            likert(2, "I prefer working in a team"),
        ],
    };
    ctx.services.personality_test.create_template(staff, request).await.unwrap().id.unwrap()
}

#[tokio::test]
async fn test_create_template_sorts_questions() {
    let ctx = setup().await;
    let staff = ctx.principal(UserRole::OasStaff, "oas").await;
    create_template(&ctx, &staff).await;

    let templates = ctx.services.personality_test.list_templates().await.unwrap();
    assert_eq!(templates.len(), 1);
    let numbers: Vec<u32> = templates[0].questions.iter().map(|q| q.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(templates[0].active);
}

#[tokio::test]
async fn test_create_template_rules() {
    let ctx = setup().await;
    let staff = ctx.principal(UserRole::OasStaff, "oas").await;
    let applicant = ctx.principal(UserRole::Applicant, "maria").await;

    let duplicate = CreateTemplateRequest {
        title: "Broken".to_string(),
        description: None,
        questions: vec![likert(1, "First"), likert(1, "Again")],
    };
    let res = ctx.services.personality_test.create_template(&staff, duplicate.clone()).await;
    assert!(matches!(res, Err(ServiceError::InvalidInput(_))));

    let res = ctx.services.personality_test.create_template(&applicant, duplicate).await;
    assert!(matches!(res, Err(ServiceError::Forbidden(_))));
}

#[tokio::test]
async fn test_start_resumes_unfinished_test() {
    let ctx = setup().await;
    let staff = ctx.principal(UserRole::OasStaff, "oas").await;
    let applicant = ctx.principal(UserRole::Applicant, "maria").await;
    let template_id = create_template(&ctx, &staff).await;

    let first = ctx.services.personality_test.start(&applicant, template_id).await.unwrap();
    assert_eq!(first.status, TestStatus::InProgress);
    let second = ctx.services.personality_test.start(&applicant, template_id).await.unwrap();
    assert_eq!(first.id, second.id);

    let res = ctx.services.personality_test.start(&staff, template_id).await;
    assert!(matches!(res, Err(ServiceError::Forbidden(_))));
}

#[tokio::test]
async fn test_inactive_template_cannot_be_started() {
    let ctx = setup().await;
    let staff = ctx.principal(UserRole::OasStaff, "oas").await;
    let applicant = ctx.principal(UserRole::Applicant, "maria").await;
    let template_id = create_template(&ctx, &staff).await;

    let mut template = ctx.repos.test_templates.get_by_id(&template_id).await.unwrap();
    template.active = false;
    ctx.repos.test_templates.replace(template).await.unwrap();

    assert!(ctx.services.personality_test.list_templates().await.unwrap().is_empty());
    let res = ctx.services.personality_test.start(&applicant, template_id).await;
    assert!(matches!(res, Err(ServiceError::InvalidInput(_))));
}

#[tokio::test]
async fn test_answers_accumulate_until_complete() {
    let ctx = setup().await;
    let staff = ctx.principal(UserRole::OasStaff, "oas").await;
    let applicant = ctx.principal(UserRole::Applicant, "maria").await;
    let template_id = create_template(&ctx, &staff).await;
    let test_id = ctx.services.personality_test.start(&applicant, template_id).await.unwrap().id.unwrap();

    let partial = ctx
        .services
        .personality_test
        .submit_answers(&applicant, test_id, vec![answer(2, "Agree"), answer(1, "Neutral")])
        .await
        .unwrap();
    assert_eq!(partial.test.status, TestStatus::InProgress);
    assert_eq!(partial.answered, 2);
    assert_eq!(partial.total_questions, 3);

    // Re-answering a question overwrites it
    let revised = ctx
        .services
        .personality_test
        .submit_answers(&applicant, test_id, vec![answer(1, "Agree")])
        .await
        .unwrap();
    assert_eq!(revised.answered, 2);
    assert_eq!(revised.answers[0].question_number, 1);
    assert_eq!(revised.answers[0].answer, "Agree");
    assert!(!ctx.services.personality_test.has_completed(applicant.user_id).await.unwrap());

    let done = ctx
        .services
        .personality_test
        .submit_answers(&applicant, test_id, vec![answer(3, "I tutored a friend in calculus")])
        .await
        .unwrap();
    assert_eq!(done.test.status, TestStatus::Completed);
    assert!(done.test.completed_at.is_some());
    assert!(ctx.services.personality_test.has_completed(applicant.user_id).await.unwrap());

    let closed = ctx
        .services
        .personality_test
        .submit_answers(&applicant, test_id, vec![answer(1, "Disagree")])
        .await;
    assert!(matches!(closed, Err(ServiceError::Conflict(_))));
    let restart = ctx.services.personality_test.start(&applicant, template_id).await;
    assert!(matches!(restart, Err(ServiceError::Conflict(_))));
}

#[tokio::test]
async fn test_invalid_answers_reject_the_whole_batch() {
    let ctx = setup().await;
    let staff = ctx.principal(UserRole::OasStaff, "oas").await;
    let applicant = ctx.principal(UserRole::Applicant, "maria").await;
    let template_id = create_template(&ctx, &staff).await;
    let test_id = ctx.services.personality_test.start(&applicant, template_id).await.unwrap().id.unwrap();

    let off_list = ctx
        .services
        .personality_test
        .submit_answers(&applicant, test_id, vec![answer(1, "Agree"), answer(2, "Sometimes")])
        .await;
    assert!(matches!(off_list, Err(ServiceError::InvalidInput(_))));

    let unknown = ctx
        .services
        .personality_test
        .submit_answers(&applicant, test_id, vec![answer(9, "Agree")])
        .await;
    assert!(matches!(unknown, Err(ServiceError::InvalidInput(_))));

    let result = ctx.services.personality_test.get_result(&applicant, test_id).await.unwrap();
    assert_eq!(result.answered, 0);
}

#[tokio::test]
async fn test_results_visible_to_owner_and_staff_only() {
    let ctx = setup().await;
    let staff = ctx.principal(UserRole::OasStaff, "oas").await;
    let applicant = ctx.principal(UserRole::Applicant, "maria").await;
    let other = ctx.principal(UserRole::Applicant, "juan").await;
    let template_id = create_template(&ctx, &staff).await;
    let test_id = ctx.services.personality_test.start(&applicant, template_id).await.unwrap().id.unwrap();

    assert!(ctx.services.personality_test.get_result(&staff, test_id).await.is_ok());
    let res = ctx.services.personality_test.get_result(&other, test_id).await;
    assert!(matches!(res, Err(ServiceError::Forbidden(_))));
    let res = ctx
        .services
        .personality_test
        .submit_answers(&other, test_id, vec![answer(1, "Agree")])
        .await;
    assert!(matches!(res, Err(ServiceError::Forbidden(_))));
}
