use tasklist::gateway::TaskGateway;
use tasklist::session::TaskSession;
use tasklist::store::InMemoryStore;

/// Build a session over a store seeded with `(title, completed)` rows,
/// loaded so the history starts empty.
pub async fn seeded_session(rows: &[(&str, bool)]) -> TaskSession<InMemoryStore> {
    let store = InMemoryStore::new();
    for (title, completed) in rows {
        store
            .create(title, *completed)
            .await
            .expect("seeding the in-memory store cannot fail");
    }

    let mut session = TaskSession::new(store);
    session.load().await.expect("initial load");
    session
}

/// Titles of the session's visible tasks, in order.
pub fn titles<G>(session: &TaskSession<G>) -> Vec<String>
where
    G: TaskGateway,
{
    session
        .tasks()
        .iter()
        .map(|task| task.title.clone())
        .collect()
}
