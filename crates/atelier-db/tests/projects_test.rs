//! Project CRUD, filtering, and stats tests.

mod helpers;

use atelier_core::{
    CreateProjectRequest, CreateTaskRequest, ListProjectsFilter, Priority, ProjectPatch,
    ProjectRepository, ProjectStatus, TaskRepository, TaskStatus,
};
use chrono::NaiveDate;
use helpers::test_db;

fn project(name: &str, status: ProjectStatus, priority: Priority) -> CreateProjectRequest {
    CreateProjectRequest {
        name: name.to_string(),
        description: String::new(),
        status,
        priority,
        start_date: None,
        end_date: None,
        progress: 0,
    }
}

#[tokio::test]
async fn test_create_project_defaults() {
    let db = test_db().await;
    let created = db
        .projects
        .insert(project("site", ProjectStatus::Planning, Priority::Medium))
        .await
        .unwrap();

    assert_eq!(created.progress, 0);
    assert_eq!(created.task_count, 0);
    assert_eq!(created.completed_tasks, 0);
    assert_eq!(created.start_date, None);
}

#[tokio::test]
async fn test_list_filters_by_status_and_priority() {
    let db = test_db().await;
    db.projects
        .insert(project("a", ProjectStatus::Active, Priority::High))
        .await
        .unwrap();
    db.projects
        .insert(project("b", ProjectStatus::Active, Priority::Low))
        .await
        .unwrap();
    db.projects
        .insert(project("c", ProjectStatus::Completed, Priority::High))
        .await
        .unwrap();

    let active = db
        .projects
        .list(ListProjectsFilter {
            status: Some(ProjectStatus::Active),
            priority: None,
        })
        .await
        .unwrap();
    assert_eq!(active.len(), 2);

    let active_high = db
        .projects
        .list(ListProjectsFilter {
            status: Some(ProjectStatus::Active),
            priority: Some(Priority::High),
        })
        .await
        .unwrap();
    assert_eq!(active_high.len(), 1);
    assert_eq!(active_high[0].name, "a");
}

#[tokio::test]
async fn test_update_patch_keeps_unspecified_fields() {
    let db = test_db().await;
    let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let created = db
        .projects
        .insert(CreateProjectRequest {
            name: "roadmap".to_string(),
            description: "q1".to_string(),
            status: ProjectStatus::Planning,
            priority: Priority::Medium,
            start_date: Some(start),
            end_date: None,
            progress: 0,
        })
        .await
        .unwrap();

    let updated = db
        .projects
        .update(
            created.id,
            ProjectPatch {
                status: Some(ProjectStatus::Active),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, ProjectStatus::Active);
    assert_eq!(updated.name, "roadmap");
    assert_eq!(updated.description, "q1");
    assert_eq!(updated.start_date, Some(start));
    assert!(updated.updated_at > created.updated_at);
}

#[tokio::test]
async fn test_update_does_not_touch_progress_unless_given() {
    let db = test_db().await;
    let created = db
        .projects
        .insert(project("p", ProjectStatus::Active, Priority::Medium))
        .await
        .unwrap();

    db.tasks
        .insert(
            created.id,
            CreateTaskRequest {
                title: "done one".to_string(),
                description: String::new(),
                status: TaskStatus::Done,
                priority: Default::default(),
                assignee: None,
                start_date: None,
                due_date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(db.projects.fetch(created.id).await.unwrap().progress, 100);

    // A name-only patch leaves the derived progress alone.
    let renamed = db
        .projects
        .update(
            created.id,
            ProjectPatch {
                name: Some("renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.progress, 100);

    // An explicit progress override is honored.
    let overridden = db
        .projects
        .update(
            created.id,
            ProjectPatch {
                progress: Some(25),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(overridden.progress, 25);
}

#[tokio::test]
async fn test_stats_aggregates() {
    let db = test_db().await;
    for i in 0..7 {
        let status = match i % 3 {
            0 => ProjectStatus::Active,
            1 => ProjectStatus::Completed,
            _ => ProjectStatus::Planning,
        };
        db.projects
            .insert(project(&format!("p{}", i), status, Priority::Medium))
            .await
            .unwrap();
    }

    let first = db
        .projects
        .list(ListProjectsFilter::default())
        .await
        .unwrap()
        .pop()
        .unwrap();
    db.tasks
        .insert(
            first.id,
            CreateTaskRequest {
                title: "a".to_string(),
                description: String::new(),
                status: TaskStatus::Done,
                priority: Default::default(),
                assignee: None,
                start_date: None,
                due_date: None,
            },
        )
        .await
        .unwrap();
    db.tasks
        .insert(
            first.id,
            CreateTaskRequest {
                title: "b".to_string(),
                description: String::new(),
                status: TaskStatus::Todo,
                priority: Default::default(),
                assignee: None,
                start_date: None,
                due_date: None,
            },
        )
        .await
        .unwrap();

    let stats = db.projects.stats().await.unwrap();
    assert_eq!(stats.total_projects, 7);
    assert_eq!(stats.active_projects, 3);
    assert_eq!(stats.completed_projects, 2);
    assert_eq!(stats.total_tasks, 2);
    assert_eq!(stats.completed_tasks, 1);

    // Five most recently updated; the project with fresh task activity leads.
    assert_eq!(stats.recent_projects.len(), 5);
    assert_eq!(stats.recent_projects[0].id, first.id);
}

#[tokio::test]
async fn test_delete_missing_project() {
    let db = test_db().await;
    assert!(matches!(
        db.projects.delete(404).await,
        Err(atelier_core::Error::NotFound(_))
    ));
}
