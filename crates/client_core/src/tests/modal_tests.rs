use super::*;
use crate::{
    draft::DraftField,
    test_support::{project, wait_until, Call, FakeProjectsService, Op},
};
use shared::ProjectStatus;
use tokio::sync::Notify;

async fn setup(
    projects: Vec<Project>,
) -> (
    Arc<FakeProjectsService>,
    Arc<ProjectListController>,
    Arc<ModalController>,
) {
    let service = FakeProjectsService::with_projects(projects);
    let list = ProjectListController::new(service.clone());
    list.load().await;
    let modal = ModalController::new(service.clone(), list.clone());
    (service, list, modal)
}

async fn fill_required(modal: &ModalController) {
    for field in [
        DraftField::Title("Alochi".into()),
        DraftField::Description("Baholar tizimi".into()),
        DraftField::Technology("Vue".into()),
        DraftField::Deadline("2025-12-31".into()),
    ] {
        assert!(modal.update_field(field).await);
    }
}

#[tokio::test]
async fn open_create_starts_from_empty_draft() {
    let (_, _, modal) = setup(vec![]).await;
    modal.open_create().await;

    let state = modal.snapshot().await;
    assert_eq!(
        state,
        ModalState::CreateDraft {
            draft: empty_draft(),
            submit: SubmitState::Idle,
        }
    );
    assert_eq!(state.title_label(), Some("Yangi loyiha"));
    assert_eq!(state.submit_label(), Some("Qo'shish"));
    assert!(!state.can_submit());
}

#[tokio::test]
async fn opening_again_replaces_the_prior_draft() {
    let source = project("p1", "Prox");
    let (_, _, modal) = setup(vec![source.clone()]).await;

    modal.open_create().await;
    modal
        .update_field(DraftField::Title("half typed".into()))
        .await;
    modal.open_edit(&source).await;

    let state = modal.snapshot().await;
    assert_eq!(state.editing_id(), Some(&source.id));
    assert_eq!(state.draft().map(|d| d.title.as_str()), Some("Prox"));
    assert_eq!(state.title_label(), Some("Loyihani tahrirlash"));

    modal.open_create().await;
    assert_eq!(modal.snapshot().await.draft(), Some(&empty_draft()));
}

#[tokio::test]
async fn update_field_is_ignored_while_closed() {
    let (_, _, modal) = setup(vec![]).await;
    assert!(!modal.update_field(DraftField::Title("x".into())).await);
    assert_eq!(modal.snapshot().await, ModalState::Closed);
}

#[tokio::test]
async fn invalid_draft_is_rejected_without_service_call() {
    let (service, _, modal) = setup(vec![]).await;
    modal.open_create().await;
    modal
        .update_field(DraftField::Title("Only title".into()))
        .await;

    let outcome = modal.save().await;

    assert_eq!(
        outcome,
        SaveOutcome::Invalid(vec![
            RequiredField::Description,
            RequiredField::Technology,
            RequiredField::Deadline,
        ])
    );
    assert!(service.write_calls().is_empty());
    assert!(modal.snapshot().await.is_open());
}

#[tokio::test]
async fn save_when_closed_is_a_no_op() {
    let (service, _, modal) = setup(vec![]).await;
    assert_eq!(modal.save().await, SaveOutcome::NotOpen);
    assert!(service.write_calls().is_empty());
}

#[tokio::test]
async fn create_closes_modal_and_reloads_list() {
    let (service, list, modal) = setup(vec![]).await;
    modal.open_create().await;
    fill_required(&modal).await;
    modal
        .update_field(DraftField::Technologies("Vue, Pinia,".into()))
        .await;

    let outcome = modal.save().await;

    let created = match outcome {
        SaveOutcome::Created(Some(created)) => created,
        other => panic!("expected create, got {other:?}"),
    };
    assert_eq!(modal.snapshot().await, ModalState::Closed);
    assert!(list.contains(&created.id).await);
    assert_eq!(service.list_calls(), 2);

    let Some(Call::Create(payload)) = service.write_calls().into_iter().next() else {
        panic!("expected a create call");
    };
    assert_eq!(payload.technologies, vec!["Vue", "Pinia"]);
    assert_eq!(payload.students_count, 1);
    assert_eq!(payload.status, ProjectStatus::Planning);
    assert_eq!(payload.url, None);
    assert_eq!(payload.logo, None);
}

#[tokio::test]
async fn edit_issues_update_for_the_source_id() {
    let source = project("p1", "Prox");
    let (service, list, modal) = setup(vec![source.clone()]).await;
    modal.open_edit(&source).await;
    modal
        .update_field(DraftField::Status(ProjectStatus::Completed))
        .await;

    let outcome = modal.save().await;

    assert!(matches!(outcome, SaveOutcome::Updated(Some(ref p)) if p.id == source.id));
    let calls = service.write_calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(&calls[0], Call::Update(id, payload)
        if *id == source.id && payload.status == ProjectStatus::Completed));
    let reloaded = list.find(&source.id).await.expect("still listed");
    assert_eq!(reloaded.status, ProjectStatus::Completed);
}

#[tokio::test]
async fn failed_save_keeps_modal_and_draft_for_retry() {
    let (service, list, modal) = setup(vec![project("p1", "Prox")]).await;
    service.fail(Op::Create, None);
    modal.open_create().await;
    fill_required(&modal).await;
    let draft_before = modal.snapshot().await.draft().cloned();
    let list_before = list.snapshot().await;

    let outcome = modal.save().await;

    assert_eq!(outcome, SaveOutcome::Failed(SAVE_FALLBACK_MESSAGE.to_string()));
    let state = modal.snapshot().await;
    assert!(matches!(state, ModalState::CreateDraft { .. }));
    assert_eq!(state.error(), Some(SAVE_FALLBACK_MESSAGE));
    assert_eq!(state.draft().cloned(), draft_before);
    assert_eq!(list.snapshot().await, list_before);
    assert_eq!(service.list_calls(), 1);

    service.recover(Op::Create);
    assert!(matches!(modal.save().await, SaveOutcome::Created(_)));
    assert_eq!(modal.snapshot().await, ModalState::Closed);
}

#[tokio::test]
async fn server_message_is_surfaced_on_save_failure() {
    let (service, _, modal) = setup(vec![]).await;
    service.fail(Op::Create, Some("Deadline noto'g'ri"));
    modal.open_create().await;
    fill_required(&modal).await;

    modal.save().await;

    assert_eq!(modal.snapshot().await.error(), Some("Deadline noto'g'ri"));
}

#[tokio::test]
async fn second_save_while_in_flight_is_a_no_op() {
    let (service, _, modal) = setup(vec![]).await;
    let gate = Arc::new(Notify::new());
    service.hold_writes(gate.clone());
    modal.open_create().await;
    fill_required(&modal).await;

    let first = tokio::spawn({
        let modal = modal.clone();
        async move { modal.save().await }
    });
    wait_until(|| {
        let modal = modal.clone();
        async move { modal.snapshot().await.is_saving() }
    })
    .await;

    let state = modal.snapshot().await;
    assert_eq!(state.submit_label(), Some("Saqlanmoqda..."));
    assert!(!state.can_submit());
    assert_eq!(modal.save().await, SaveOutcome::AlreadySaving);

    gate.notify_one();
    assert!(matches!(first.await.expect("join"), SaveOutcome::Created(_)));
    assert_eq!(service.write_calls().len(), 1);
}

#[tokio::test]
async fn cancel_after_edit_touches_nothing() {
    let source = project("p1", "Prox");
    let (service, list, modal) = setup(vec![source.clone()]).await;
    let calls_before = service.calls();
    let list_before = list.snapshot().await;

    modal.open_edit(&source).await;
    modal.cancel().await;

    assert_eq!(modal.snapshot().await, ModalState::Closed);
    assert_eq!(service.calls(), calls_before);
    assert_eq!(list.snapshot().await, list_before);
}

#[tokio::test]
async fn reopening_mid_save_keeps_the_single_save_slot() {
    let (service, _, modal) = setup(vec![]).await;
    let gate = Arc::new(Notify::new());
    service.hold_writes(gate.clone());
    modal.open_create().await;
    fill_required(&modal).await;

    let first = tokio::spawn({
        let modal = modal.clone();
        async move { modal.save().await }
    });
    wait_until(|| {
        let modal = modal.clone();
        async move { modal.snapshot().await.is_saving() }
    })
    .await;

    modal.open_create().await;
    fill_required(&modal).await;
    modal
        .update_field(DraftField::Title("Second".into()))
        .await;
    let reopened = modal.snapshot().await;
    assert!(!reopened.can_submit());
    assert_eq!(modal.save().await, SaveOutcome::AlreadySaving);

    gate.notify_one();
    assert!(matches!(first.await.expect("join"), SaveOutcome::Created(_)));

    let state = modal.snapshot().await;
    assert!(state.is_open());
    assert_eq!(state.submit(), Some(&SubmitState::Idle));
    assert_eq!(state.draft().map(|d| d.title.as_str()), Some("Second"));
    assert_eq!(service.write_calls().len(), 1);
}

#[tokio::test]
async fn failure_of_an_earlier_save_is_not_pinned_on_a_reopened_draft() {
    let source = project("p1", "Prox");
    let (service, _, modal) = setup(vec![source.clone()]).await;
    let gate = Arc::new(Notify::new());
    service.hold_writes(gate.clone());
    service.fail(Op::Create, Some("Takroriy nom"));
    modal.open_create().await;
    fill_required(&modal).await;

    let first = tokio::spawn({
        let modal = modal.clone();
        async move { modal.save().await }
    });
    wait_until(|| {
        let modal = modal.clone();
        async move { modal.snapshot().await.is_saving() }
    })
    .await;

    modal.open_edit(&source).await;
    gate.notify_one();
    assert_eq!(
        first.await.expect("join"),
        SaveOutcome::Failed("Takroriy nom".into())
    );

    let state = modal.snapshot().await;
    assert_eq!(state.editing_id(), Some(&source.id));
    assert_eq!(state.error(), None);
    assert!(state.can_submit());
}
