//! Drives the session controller over real HTTP against the in-memory API.

use research_assistant::http::HttpApi;
use research_assistant::models::{CompareRequest, GroupCreate, Mode, Role};
use research_assistant::session::{Focus, APOLOGY};
use research_assistant::upload::UploadStatus;
use research_assistant::{
    ClientConfig, LocalStore, PaperUpload, ResearchApi, Session, StateStore,
};

const PDF: &[u8] = b"%PDF-1.4\n1 0 obj << /Type /Pages /Count 3 >>\n\
    2 0 obj << /Type /Page >>\n3 0 obj << /Type /Page >>\n4 0 obj << /Type /Page >>\n%%EOF";

async fn spawn_api() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, research_assistant::server::in_memory())
            .await
            .unwrap();
    });
    format!("http://{addr}/api")
}

async fn session() -> Session<HttpApi, LocalStore> {
    let base = spawn_api().await;
    Session::new(HttpApi::new(ClientConfig::new(base)), LocalStore::default())
}

async fn upload(session: &Session<HttpApi, LocalStore>, name: &str) -> String {
    session
        .upload_paper(&PaperUpload::pdf(name, PDF.to_vec()))
        .await
        .unwrap()
        .paper_id
}

#[tokio::test]
async fn upload_lists_the_paper() {
    let session = session().await;

    let paper_id = upload(&session, "trial.pdf").await;

    let state = session.snapshot();
    assert_eq!(state.papers.len(), 1);
    assert_eq!(state.papers[0].id, paper_id);
    assert_eq!(state.papers[0].total_pages, 3);
    assert_eq!(state.papers[0].display_name(), "trial");
    assert_eq!(
        state.upload,
        UploadStatus::Succeeded {
            filename: "trial.pdf".into()
        }
    );
}

#[tokio::test]
async fn server_rejection_is_shown_until_next_attempt() {
    let session = session().await;
    let bogus = PaperUpload::pdf("empty.pdf", b"not a pdf".to_vec());

    let err = session.upload_paper(&bogus).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Could not extract text from PDF");
    let state = session.snapshot();
    assert_eq!(
        state.upload,
        UploadStatus::Failed("Could not extract text from PDF".into())
    );
    assert!(state.papers.is_empty());
}

#[tokio::test]
async fn created_group_comes_back_once_with_its_papers() {
    let session = session().await;
    let a = upload(&session, "a.pdf").await;
    let b = upload(&session, "b.pdf").await;
    session.fetch_groups().await;
    let before = session.snapshot().groups.len();

    let created = session
        .create_group(&GroupCreate {
            name: "Pair".into(),
            description: Some("Two trials".into()),
            paper_ids: vec![a.clone(), b.clone()],
        })
        .await
        .unwrap();

    let groups = session.snapshot().groups;
    assert_eq!(groups.len(), before + 1);
    let group = groups.iter().find(|g| g.id == created.id).unwrap();
    assert_eq!(group.name, "Pair");
    assert_eq!(group.paper_ids, vec![a, b]);
}

#[tokio::test]
async fn group_question_is_scoped_to_the_group() {
    let session = session().await;
    let a = upload(&session, "a.pdf").await;
    let _b = upload(&session, "b.pdf").await;
    let c = upload(&session, "c.pdf").await;
    let group = session
        .create_group(&GroupCreate {
            name: "A and C".into(),
            description: None,
            paper_ids: vec![a.clone(), c.clone()],
        })
        .await
        .unwrap();
    session.store().write(|s| s.focus_group(&group.id));

    session.ask_question("What is the sample size?").await.unwrap();

    let state = session.snapshot();
    let messages = state.transcript.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[1].role, Role::Assistant);
    let cited: Vec<String> = messages[1]
        .citations
        .as_ref()
        .unwrap()
        .iter()
        .map(|c| c.paper_id.clone())
        .collect();
    assert_eq!(cited.len(), 2);
    assert!(cited.contains(&a) && cited.contains(&c));
    assert_eq!(messages[1].mode, Some(Mode::Academic));
}

#[tokio::test]
async fn unknown_focus_yields_apology() {
    let session = session().await;
    session.store().write(|s| s.focus_paper("missing"));

    session.ask_question("Does this exist?").await.unwrap();

    let state = session.snapshot();
    assert_eq!(state.transcript.len(), 2);
    assert_eq!(state.transcript.messages()[1].content, APOLOGY);
    assert!(!state.loading);
}

#[tokio::test]
async fn editing_a_group_applies_the_diff() {
    let session = session().await;
    let a = upload(&session, "a.pdf").await;
    let b = upload(&session, "b.pdf").await;
    let group = session
        .create_group(&GroupCreate {
            name: "Draft".into(),
            description: None,
            paper_ids: vec![a.clone()],
        })
        .await
        .unwrap();

    session.store().write(|s| {
        s.open_group_editor(&group.id);
        let form = s.group_editor.as_mut().unwrap();
        form.name = "Final".into();
        form.toggle(&a);
        form.toggle(&b);
    });
    let updated = session.submit_group_editor().await.unwrap();

    assert_eq!(updated.name, "Final");
    assert_eq!(updated.paper_ids, vec![b]);
    assert!(session.snapshot().group_editor.is_none());
}

#[tokio::test]
async fn deleting_focused_entities_clears_focus() {
    let session = session().await;
    let paper = upload(&session, "gone.pdf").await;
    session.store().write(|s| s.focus_paper(&paper));
    session.delete_paper(&paper).await;
    let state = session.snapshot();
    assert_eq!(state.focus, Focus::All);
    assert!(state.papers.is_empty());

    let group = session
        .create_group(&GroupCreate {
            name: "Doomed".into(),
            description: None,
            paper_ids: Vec::new(),
        })
        .await
        .unwrap();
    session.store().write(|s| s.focus_group(&group.id));
    session.delete_group(&group.id).await;
    let state = session.snapshot();
    assert_eq!(state.focus, Focus::All);
    assert!(state.groups.is_empty());
}

#[tokio::test]
async fn failed_delete_keeps_focus() {
    let session = session().await;
    session.store().write(|s| s.focus_group("nope"));
    session.delete_group("nope").await;
    assert_eq!(session.snapshot().focus, Focus::Group("nope".into()));
}

#[tokio::test]
async fn server_validation_detail_reaches_the_caller() {
    let session = session().await;
    let err = session
        .create_group(&GroupCreate {
            name: "x".repeat(150),
            description: None,
            paper_ids: Vec::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert_eq!(
        err.to_string(),
        "Field 'name' exceeds max length of 100 (actual: 150)"
    );
}

#[tokio::test]
async fn comparison_cites_every_compared_paper() {
    let session = session().await;
    let a = upload(&session, "a.pdf").await;
    let _b = upload(&session, "b.pdf").await;
    let c = upload(&session, "c.pdf").await;
    session.store().write(|s| s.set_mode(Mode::Eli5));

    session
        .compare_papers("How do the sample sizes differ?", &[a.clone(), c.clone()])
        .await
        .unwrap();

    let state = session.snapshot();
    let messages = state.transcript.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "How do the sample sizes differ?");
    let cited: Vec<String> = messages[1]
        .citations
        .as_ref()
        .unwrap()
        .iter()
        .map(|c| c.paper_id.clone())
        .collect();
    assert_eq!(cited, vec![a, c]);
    assert_eq!(messages[1].mode, Some(Mode::Eli5));
}

#[tokio::test]
async fn comparing_a_single_paper_is_refused() {
    let session = session().await;
    let a = upload(&session, "a.pdf").await;

    let err = session
        .api()
        .compare_papers(&CompareRequest {
            question: "Compare with nothing".into(),
            paper_ids: vec![a.clone()],
            mode: Mode::Academic,
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.to_string(),
        "At least 2 paper IDs are required for comparison"
    );

    assert!(session.compare_papers("Compare", &[a]).await.unwrap_err().is_validation());
    assert!(session.snapshot().transcript.is_empty());
}

#[tokio::test]
async fn comparing_an_unknown_paper_yields_apology() {
    let session = session().await;
    let a = upload(&session, "a.pdf").await;

    session
        .compare_papers("Compare these", &[a, "missing".to_string()])
        .await
        .unwrap();

    let state = session.snapshot();
    assert_eq!(state.transcript.len(), 2);
    assert_eq!(state.transcript.messages()[1].content, APOLOGY);
}

#[tokio::test]
async fn health_reports_online() {
    let session = session().await;
    let health = session.api().health().await.unwrap();
    assert!(health.is_healthy());
    assert!(session.check_health().await.is_ok());
}

#[tokio::test]
async fn unreachable_api_degrades_quietly() {
    let session = Session::new(
        HttpApi::new(ClientConfig::new("http://127.0.0.1:9/api")),
        LocalStore::default(),
    );

    session.refresh().await;
    session.ask_question("Is anyone there?").await.unwrap();

    let state = session.snapshot();
    assert!(state.papers.is_empty());
    assert_eq!(state.transcript.len(), 2);
    assert_eq!(state.transcript.messages()[1].content, APOLOGY);
    assert!(session.check_health().await.is_err());
}
