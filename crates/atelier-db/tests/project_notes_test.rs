//! Project-note link tests: uniqueness, cascades, and ordering.

mod helpers;

use atelier_core::{
    CreateNoteRequest, CreateProjectRequest, CreateTaskRequest, Error, ListNotesFilter,
    NoteRepository, ProjectNoteRepository, ProjectRepository, TaskRepository, TaskStatus,
    DEFAULT_NOTE_TAG,
};
use helpers::test_db;

async fn create_project(db: &atelier_db::Database) -> i64 {
    db.projects
        .insert(CreateProjectRequest {
            name: "p".to_string(),
            description: String::new(),
            status: Default::default(),
            priority: Default::default(),
            start_date: None,
            end_date: None,
            progress: 0,
        })
        .await
        .unwrap()
        .id
}

async fn create_note(db: &atelier_db::Database, title: &str) -> i64 {
    db.notes
        .insert(CreateNoteRequest {
            title: title.to_string(),
            content: String::new(),
            tag: DEFAULT_NOTE_TAG.to_string(),
            folder_id: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_duplicate_link_is_conflict() {
    let db = test_db().await;
    let project_id = create_project(&db).await;
    let note_id = create_note(&db, "n").await;

    db.project_notes.link(project_id, note_id).await.unwrap();
    let second = db.project_notes.link(project_id, note_id).await;
    assert!(matches!(second, Err(Error::Conflict(_))));
}

#[tokio::test]
async fn test_link_missing_project_or_note() {
    let db = test_db().await;
    let project_id = create_project(&db).await;
    let note_id = create_note(&db, "n").await;

    assert!(matches!(
        db.project_notes.link(999, note_id).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        db.project_notes.link(project_id, 999).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn test_unlink_missing_pair_is_not_found() {
    let db = test_db().await;
    let project_id = create_project(&db).await;
    let note_id = create_note(&db, "n").await;

    let err = db.project_notes.unlink(project_id, note_id).await;
    assert!(matches!(err, Err(Error::NotFound(_))));

    db.project_notes.link(project_id, note_id).await.unwrap();
    db.project_notes.unlink(project_id, note_id).await.unwrap();

    // Gone now; a second unlink fails again.
    let err = db.project_notes.unlink(project_id, note_id).await;
    assert!(matches!(err, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_project_delete_cascades_but_leaves_notes() {
    let db = test_db().await;
    let project_id = create_project(&db).await;

    let note_a = create_note(&db, "a").await;
    let note_b = create_note(&db, "b").await;
    db.project_notes.link(project_id, note_a).await.unwrap();
    db.project_notes.link(project_id, note_b).await.unwrap();

    for title in ["t1", "t2", "t3"] {
        db.tasks
            .insert(
                project_id,
                CreateTaskRequest {
                    title: title.to_string(),
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
    }

    db.projects.delete(project_id).await.unwrap();

    let (task_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project_task")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(task_rows, 0);

    let (link_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project_note")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(link_rows, 0);

    // The linked notes survive.
    let notes = db.notes.list(ListNotesFilter::default()).await.unwrap();
    assert_eq!(notes.len(), 2);
}

#[tokio::test]
async fn test_note_delete_removes_its_links() {
    let db = test_db().await;
    let project_id = create_project(&db).await;
    let note_id = create_note(&db, "n").await;
    db.project_notes.link(project_id, note_id).await.unwrap();

    db.notes.delete(note_id).await.unwrap();

    let (link_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project_note")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(link_rows, 0);
}

#[tokio::test]
async fn test_list_notes_for_project_newest_first() {
    let db = test_db().await;
    let project_id = create_project(&db).await;

    let older = create_note(&db, "older").await;
    let newer = create_note(&db, "newer").await;
    db.project_notes.link(project_id, older).await.unwrap();
    db.project_notes.link(project_id, newer).await.unwrap();

    // Touch the older note so it becomes the most recently updated.
    db.notes
        .update(
            older,
            atelier_core::NotePatch {
                content: Some("revised".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let notes = db.project_notes.list_notes(project_id).await.unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].id, older);

    // Unlinked projects are a NotFound, not an empty list.
    assert!(matches!(
        db.project_notes.list_notes(999).await,
        Err(Error::NotFound(_))
    ));
}
