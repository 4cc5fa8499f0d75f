//! In-memory projects backend shared by the controller tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use shared::{Project, ProjectId, ProjectPayload, ProjectStatus};
use tokio::sync::Notify;

use crate::{
    error::{ServiceError, ServiceResult},
    service::ProjectsService,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    List,
    Create(ProjectPayload),
    Update(ProjectId, ProjectPayload),
    Delete(ProjectId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
struct FakeState {
    projects: Vec<Project>,
    calls: Vec<Call>,
    failures: HashMap<Op, Option<String>>,
    next_id: u32,
    list_hold: Option<Arc<Notify>>,
    write_hold: Option<Arc<Notify>>,
}

#[derive(Default)]
pub(crate) struct FakeProjectsService {
    state: Mutex<FakeState>,
}

impl FakeProjectsService {
    pub(crate) fn with_projects(projects: Vec<Project>) -> Arc<Self> {
        let service = Self::default();
        service.lock().projects = projects;
        Arc::new(service)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub(crate) fn write_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| *call != Call::List)
            .collect()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.calls().iter().filter(|call| **call == Call::List).count()
    }

    pub(crate) fn set_projects(&self, projects: Vec<Project>) {
        self.lock().projects = projects;
    }

    /// Every following `op` fails with a rejection carrying `message`.
    pub(crate) fn fail(&self, op: Op, message: Option<&str>) {
        self.lock()
            .failures
            .insert(op, message.map(str::to_string));
    }

    pub(crate) fn recover(&self, op: Op) {
        self.lock().failures.remove(&op);
    }

    /// The next `list` snapshots the data, then waits for `gate`.
    pub(crate) fn hold_next_list(&self, gate: Arc<Notify>) {
        self.lock().list_hold = Some(gate);
    }

    /// Every create/update/delete waits for `gate` before answering.
    pub(crate) fn hold_writes(&self, gate: Arc<Notify>) {
        self.lock().write_hold = Some(gate);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake state")
    }

    fn record(&self, call: Call, op: Op) -> ServiceResult<()> {
        let mut guard = self.lock();
        guard.calls.push(call);
        match guard.failures.get(&op) {
            Some(message) => Err(ServiceError::rejected(500, message.clone())),
            None => Ok(()),
        }
    }

    async fn wait_write(&self) {
        let gate = self.lock().write_hold.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl ProjectsService for FakeProjectsService {
    async fn list(&self) -> ServiceResult<Vec<Project>> {
        self.record(Call::List, Op::List)?;
        let (snapshot, hold) = {
            let mut guard = self.lock();
            (guard.projects.clone(), guard.list_hold.take())
        };
        if let Some(gate) = hold {
            gate.notified().await;
        }
        Ok(snapshot)
    }

    async fn create(&self, payload: &ProjectPayload) -> ServiceResult<Option<Project>> {
        self.wait_write().await;
        self.record(Call::Create(payload.clone()), Op::Create)?;
        let mut guard = self.lock();
        guard.next_id += 1;
        let id = ProjectId::new(format!("new-{}", guard.next_id));
        let project = project_from_payload(id, payload);
        guard.projects.push(project.clone());
        Ok(Some(project))
    }

    async fn update(
        &self,
        id: &ProjectId,
        payload: &ProjectPayload,
    ) -> ServiceResult<Option<Project>> {
        self.wait_write().await;
        self.record(Call::Update(id.clone(), payload.clone()), Op::Update)?;
        let mut guard = self.lock();
        let project = project_from_payload(id.clone(), payload);
        match guard.projects.iter_mut().find(|existing| &existing.id == id) {
            Some(existing) => *existing = project.clone(),
            None => return Err(ServiceError::rejected(404, Some("Loyiha topilmadi".into()))),
        }
        Ok(Some(project))
    }

    async fn delete(&self, id: &ProjectId) -> ServiceResult<()> {
        self.wait_write().await;
        self.record(Call::Delete(id.clone()), Op::Delete)?;
        self.lock().projects.retain(|project| &project.id != id);
        Ok(())
    }
}

fn project_from_payload(id: ProjectId, payload: &ProjectPayload) -> Project {
    Project {
        id,
        title: payload.title.clone(),
        description: payload.description.clone(),
        technology: payload.technology.clone(),
        technologies: payload.technologies.clone(),
        students_count: Some(payload.students_count),
        status: payload.status.clone(),
        progress_percent: Some(payload.progress_percent),
        deadline: Some(payload.deadline.clone()),
        url: payload.url.clone(),
        logo: payload.logo.clone(),
    }
}

pub(crate) fn project(id: &str, title: &str) -> Project {
    Project {
        id: ProjectId::new(id),
        title: title.to_string(),
        description: format!("{title} description"),
        technology: "React".to_string(),
        technologies: vec!["React".to_string(), "TypeScript".to_string()],
        students_count: Some(4),
        status: ProjectStatus::Active,
        progress_percent: Some(60),
        deadline: Some("2025-05-20T00:00:00.000Z".to_string()),
        url: None,
        logo: None,
    }
}

/// Polls `condition` until it holds, yielding to spawned tasks in between.
pub(crate) async fn wait_until<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if condition().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}
