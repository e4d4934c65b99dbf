use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use phonebook_core::{PhoneStore, normalize_tel};

use crate::path::PathArgs;

const GREETING: &str = "Thanks for visiting!";

/// What a handler needs to know about the inbound request.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub path: String,
    pub host: String,
}

impl RequestInfo {
    pub fn new(path: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            host: host.into(),
        }
    }
}

/// Status code plus plain-text body produced by every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    /// A reply whose body is `line` terminated with a newline.
    pub fn line(status: StatusCode, line: impl AsRef<str>) -> Self {
        Self {
            status,
            body: format!("{}\n", line.as_ref()),
        }
    }

    pub(crate) fn raw(status: StatusCode, body: String) -> Self {
        Self { status, body }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, self.body).into_response()
    }
}

/// Route a request to its handler by the operation segment of the path.
/// Unknown operations fall through to the default greeting.
pub async fn dispatch(store: &dyn PhoneStore, req: &RequestInfo) -> Reply {
    let args = PathArgs::parse(&req.path);
    let reply = match args.operation() {
        "delete" => delete(store, req, &args).await,
        "list" => list(store).await,
        "status" => status(store).await,
        "insert" => insert(store, req, &args).await,
        "search" => search(store, req, &args).await,
        _ => default_reply(),
    };
    info!(
        path = %req.path,
        host = %req.host,
        status = reply.status.as_u16(),
        "Serving"
    );
    reply
}

pub(crate) fn default_reply() -> Reply {
    Reply::line(StatusCode::OK, GREETING)
}

pub(crate) async fn delete(
    store: &dyn PhoneStore,
    req: &RequestInfo,
    args: &PathArgs<'_>,
) -> Reply {
    let Some(&[tel]) = args.operands(1) else {
        return Reply::line(StatusCode::NOT_FOUND, format!("Not found: {}", req.path));
    };
    match store.delete_entry(tel).await {
        Ok(()) => Reply::line(StatusCode::OK, format!("{tel} deleted!")),
        Err(e) => Reply::line(StatusCode::NOT_FOUND, e.to_string()),
    }
}

/// Listing never fails; an empty store is a 200 with an empty body.
pub(crate) async fn list(store: &dyn PhoneStore) -> Reply {
    Reply::raw(StatusCode::OK, store.list().await)
}

pub(crate) async fn status(store: &dyn PhoneStore) -> Reply {
    Reply::line(
        StatusCode::OK,
        format!("total entries: {}", store.status().await),
    )
}

/// Hyphens are stripped from the telephone before it is used as the key.
/// Storage failures are reported as 304 with a generic message.
pub(crate) async fn insert(
    store: &dyn PhoneStore,
    req: &RequestInfo,
    args: &PathArgs<'_>,
) -> Reply {
    let Some(&[name, surname, raw_tel]) = args.operands(3) else {
        return Reply::line(
            StatusCode::NOT_FOUND,
            format!("Not enough arguments: {}", req.path),
        );
    };
    let tel = normalize_tel(raw_tel);
    match store.insert(name, surname, &tel).await {
        Ok(()) => Reply::line(StatusCode::OK, "New record added successfully"),
        Err(e) => {
            warn!(path = %req.path, tel = %tel, error = %e, "insert rejected by store");
            Reply::line(StatusCode::NOT_MODIFIED, "Failed to add record")
        }
    }
}

pub(crate) async fn search(
    store: &dyn PhoneStore,
    req: &RequestInfo,
    args: &PathArgs<'_>,
) -> Reply {
    let Some(&[tel]) = args.operands(1) else {
        return Reply::line(StatusCode::NOT_FOUND, format!("Not found: {}", req.path));
    };
    match store.search(tel).await {
        Some(entry) => Reply::line(StatusCode::OK, entry.to_string()),
        None => Reply::line(StatusCode::NOT_FOUND, format!("Could not be found: {tel}")),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use phonebook_core::store::memory::MemoryStore;
    use phonebook_core::{Entry, StoreError};
    use tracing_test::traced_test;

    use super::*;

    /// Counts every call and refuses all mutations.
    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn touch(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl PhoneStore for CountingStore {
        async fn delete_entry(&self, key: &str) -> Result<(), StoreError> {
            self.touch();
            Err(StoreError::NotFound(key.to_string()))
        }

        async fn list(&self) -> String {
            self.touch();
            String::new()
        }

        async fn insert(&self, _name: &str, _surname: &str, tel: &str) -> Result<(), StoreError> {
            self.touch();
            Err(StoreError::AlreadyExists(tel.to_string()))
        }

        async fn status(&self) -> usize {
            self.touch();
            0
        }

        async fn search(&self, _key: &str) -> Option<Entry> {
            self.touch();
            None
        }
    }

    async fn get(store: &dyn PhoneStore, path: &str) -> Reply {
        dispatch(store, &RequestInfo::new(path, "localhost:1234")).await
    }

    #[tokio::test]
    async fn short_paths_never_reach_the_store() {
        let store = CountingStore::default();

        let reply = get(&store, "/delete").await;
        assert_eq!(reply, Reply::line(StatusCode::NOT_FOUND, "Not found: /delete"));

        let reply = get(&store, "/search").await;
        assert_eq!(reply, Reply::line(StatusCode::NOT_FOUND, "Not found: /search"));

        let reply = get(&store, "/insert/Ann/Lee").await;
        assert_eq!(
            reply,
            Reply::line(StatusCode::NOT_FOUND, "Not enough arguments: /insert/Ann/Lee")
        );

        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn default_handler_greets_without_storage() {
        let store = CountingStore::default();
        for path in ["/", "/unknown", "/lists", ""] {
            let reply = get(&store, path).await;
            assert_eq!(reply.status, StatusCode::OK);
            assert_eq!(reply.body, "Thanks for visiting!\n");
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn insert_failure_maps_to_not_modified() {
        let store = CountingStore::default();
        let reply = get(&store, "/insert/Ann/Lee/555-1212").await;
        assert_eq!(reply.status, StatusCode::NOT_MODIFIED);
        assert_eq!(reply.body, "Failed to add record\n");
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn empty_tel_is_never_stored() {
        let store = MemoryStore::new();
        for path in ["/insert/Ann/Lee/", "/insert/A/B/---"] {
            let reply = get(&store, path).await;
            assert_eq!(
                reply,
                Reply::line(StatusCode::NOT_MODIFIED, "Failed to add record")
            );
        }
        assert_eq!(store.status().await, 0);

        let reply = get(&store, "/search/").await;
        assert_eq!(
            reply,
            Reply::line(StatusCode::NOT_FOUND, "Could not be found: ")
        );
    }

    #[tokio::test]
    async fn insert_normalizes_then_search_finds() {
        let store = MemoryStore::new();

        let reply = get(&store, "/insert/Ann/Lee/555-1212").await;
        assert_eq!(
            reply,
            Reply::line(StatusCode::OK, "New record added successfully")
        );
        assert_eq!(
            store.search("5551212").await,
            Some(Entry::new("Ann", "Lee", "5551212"))
        );

        let reply = get(&store, "/search/5551212").await;
        assert_eq!(reply, Reply::line(StatusCode::OK, "Ann Lee 5551212"));
    }

    #[tokio::test]
    async fn hyphenated_and_plain_tel_are_the_same_key() {
        let store = MemoryStore::new();
        assert_eq!(get(&store, "/insert/Ann/Lee/5551212").await.status, StatusCode::OK);
        let reply = get(&store, "/insert/Bob/Ray/555-1212").await;
        assert_eq!(reply.status, StatusCode::NOT_MODIFIED);
        assert_eq!(store.status().await, 1);
    }

    #[tokio::test]
    async fn search_and_delete_use_key_verbatim() {
        let store = MemoryStore::new();
        get(&store, "/insert/Ann/Lee/555-1212").await;

        let reply = get(&store, "/search/555-1212").await;
        assert_eq!(
            reply,
            Reply::line(StatusCode::NOT_FOUND, "Could not be found: 555-1212")
        );

        let reply = get(&store, "/delete/555-1212").await;
        assert_eq!(
            reply,
            Reply::line(StatusCode::NOT_FOUND, "555-1212 cannot be found!")
        );
        assert_eq!(store.status().await, 1);
    }

    #[tokio::test]
    async fn delete_is_immediately_visible() {
        let store = MemoryStore::new();
        get(&store, "/insert/John/Smith/555-0100").await;

        let reply = get(&store, "/delete/5550100").await;
        assert_eq!(reply, Reply::line(StatusCode::OK, "5550100 deleted!"));

        let reply = get(&store, "/search/5550100").await;
        assert_eq!(
            reply,
            Reply::line(StatusCode::NOT_FOUND, "Could not be found: 5550100")
        );
    }

    #[tokio::test]
    async fn status_counts_inserts_minus_deletes() {
        let store = MemoryStore::new();
        for tel in ["100", "200", "300", "400", "500"] {
            get(&store, &format!("/insert/N/S/{tel}")).await;
        }
        get(&store, "/delete/200").await;
        get(&store, "/delete/400").await;

        let reply = get(&store, "/status").await;
        assert_eq!(reply, Reply::line(StatusCode::OK, "total entries: 3"));
    }

    #[tokio::test]
    async fn list_is_ok_even_when_empty() {
        let store = MemoryStore::new();
        let reply = get(&store, "/list").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body, "");

        get(&store, "/insert/Ann/Lee/555-1212").await;
        get(&store, "/insert/John/Smith/555-0100").await;
        let reply = get(&store, "/list").await;
        assert_eq!(reply.body, "John\tSmith\t5550100\nAnn\tLee\t5551212\n");
    }

    #[tokio::test]
    #[traced_test]
    async fn every_dispatch_is_logged() {
        let store = MemoryStore::new();
        get(&store, "/status").await;
        get(&store, "/insert/Ann/Lee/555-1212").await;
        get(&store, "/insert/Ann/Lee/555-1212").await;

        assert!(logs_contain("Serving"));
        assert!(logs_contain("host=localhost:1234"));
        assert!(logs_contain("insert rejected by store"));
    }
}
