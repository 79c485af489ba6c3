//! File-backed `SessionStore` implementation.

use crate::dto::{SessionSummary, StoredSession};
use crate::paths::ChatfillPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use chatfill_core::error::{ChatfillError, Result};
use chatfill_core::session::{AppendOptions, ChatMessage, EntityRef, SessionHandle, SessionStore};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct StoreState {
    entity: Option<EntityRef>,
    active: Option<StoredSession>,
}

/// A session store keeping one TOML file per session.
///
/// ```text
/// sessions_dir/
/// ├── character-42/
/// │   ├── 5f1c….toml
/// │   └── 9a07….toml
/// └── group-party/
///     └── 0c3e….toml
/// ```
///
/// The store tracks the selected entity and the active session in memory.
/// Appends only change the in-memory session; nothing reaches disk until
/// [`persist_current_session`](SessionStore::persist_current_session).
///
/// A successful `create_session` marks the store busy until the new session
/// is persisted or [`finish_operation`](SessionStore::finish_operation) is
/// called. While busy, `is_saving` reports true and another `create_session`
/// is refused, so two duplications sharing one store cannot interleave.
pub struct FileSessionStore {
    sessions_dir: PathBuf,
    state: RwLock<StoreState>,
    generating: AtomicBool,
    saving: AtomicBool,
    filling: AtomicBool,
}

impl FileSessionStore {
    /// Creates a store rooted at `sessions_dir`, creating the directory if needed.
    pub fn new(sessions_dir: impl AsRef<Path>) -> Result<Self> {
        let sessions_dir = sessions_dir.as_ref().to_path_buf();
        fs::create_dir_all(&sessions_dir)?;

        Ok(Self {
            sessions_dir,
            state: RwLock::new(StoreState::default()),
            generating: AtomicBool::new(false),
            saving: AtomicBool::new(false),
            filling: AtomicBool::new(false),
        })
    }

    /// Creates a store at the platform default sessions directory.
    pub fn default_location() -> Result<Self> {
        let dir =
            ChatfillPaths::sessions_dir().map_err(|e| ChatfillError::config(e.to_string()))?;
        Self::new(dir)
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    fn entity_dir(&self, entity: &EntityRef) -> Result<PathBuf> {
        check_file_name("entity", entity.id())?;
        Ok(self.sessions_dir.join(entity.storage_key()))
    }

    fn session_file(
        &self,
        entity: &EntityRef,
        session_id: &str,
    ) -> Result<AtomicTomlFile<StoredSession>> {
        check_file_name("session", session_id)?;
        let dir = self.entity_dir(entity)?;
        Ok(AtomicTomlFile::new(dir.join(format!("{}.toml", session_id))))
    }

    /// Selects the character or group to work with. Clears the active session.
    pub async fn select_entity(&self, entity: EntityRef) -> Result<()> {
        check_file_name("entity", entity.id())?;
        let mut state = self.state.write().await;
        tracing::debug!("[FileSessionStore] Selected {}", entity);
        state.entity = Some(entity);
        state.active = None;
        Ok(())
    }

    /// Loads a stored session of the selected entity and makes it active.
    pub async fn open_session(&self, session_id: &str) -> Result<SessionHandle> {
        let mut state = self.state.write().await;
        let entity = state
            .entity
            .clone()
            .ok_or_else(|| ChatfillError::store("No character or group selected"))?;

        let session = self.load_session(&entity, session_id)?;
        let handle = session.handle();
        tracing::debug!(
            "[FileSessionStore] Opened session {} ({} messages)",
            session.id,
            session.messages.len()
        );
        state.active = Some(session);
        Ok(handle)
    }

    /// Reads a stored session from disk.
    pub fn load_session(&self, entity: &EntityRef, session_id: &str) -> Result<StoredSession> {
        self.session_file(entity, session_id)?
            .load()?
            .ok_or_else(|| ChatfillError::not_found("Session", session_id))
    }

    /// Lists the stored sessions of `entity`, most recently updated first.
    pub fn list_sessions(&self, entity: &EntityRef) -> Result<Vec<SessionSummary>> {
        let dir = self.entity_dir(entity)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
                continue;
            }
            match AtomicTomlFile::<StoredSession>::new(path.clone()).load() {
                Ok(Some(session)) => summaries.push(SessionSummary::from(&session)),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        "[FileSessionStore] Skipping unreadable session file {}: {}",
                        path.display(),
                        e
                    );
                }
            }
        }

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    /// Marks the active session as receiving a generated reply.
    pub fn set_generating(&self, generating: bool) {
        self.generating.store(generating, Ordering::SeqCst);
    }

    async fn replace_active_session(&self, delete_current: bool) -> Result<SessionHandle> {
        let mut state = self.state.write().await;
        let entity = state
            .entity
            .clone()
            .ok_or_else(|| ChatfillError::store("No character or group selected"))?;

        if delete_current {
            if let Some(previous) = state.active.as_ref() {
                self.session_file(&previous.entity, &previous.id)?.remove()?;
                tracing::info!("[FileSessionStore] Deleted session {}", previous.id);
            }
        }

        let session = StoredSession::new(entity);
        let handle = session.handle();
        tracing::info!(
            "[FileSessionStore] Created session {} for {}",
            session.id,
            session.entity
        );
        state.active = Some(session);
        Ok(handle)
    }

    async fn save_active(&self) -> Result<()> {
        let _saving = SavingFlag::raise(&self.saving);

        let session = self
            .state
            .read()
            .await
            .active
            .clone()
            .ok_or_else(|| ChatfillError::store("No active session"))?;

        self.session_file(&session.entity, &session.id)?.save(&session)?;
        tracing::debug!(
            "[FileSessionStore] Saved session {} ({} messages)",
            session.id,
            session.messages.len()
        );
        Ok(())
    }
}

/// Rejects ids that would escape their directory once joined into a path.
fn check_file_name(kind: &str, id: &str) -> Result<()> {
    let traverses = id == "." || id.contains("..");
    if id.is_empty() || traverses || id.contains(['/', '\\', '\0']) {
        return Err(ChatfillError::store(format!("Invalid {} id: {:?}", kind, id)));
    }
    Ok(())
}

/// Clears the saving flag when a persist finishes, whatever the outcome.
struct SavingFlag<'a>(&'a AtomicBool);

impl<'a> SavingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for SavingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn active_entity(&self) -> Option<EntityRef> {
        self.state.read().await.entity.clone()
    }

    async fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    async fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst) || self.filling.load(Ordering::SeqCst)
    }

    async fn current_session_id(&self) -> Option<String> {
        self.state
            .read()
            .await
            .active
            .as_ref()
            .map(|session| session.id.clone())
    }

    async fn current_messages(&self) -> Vec<ChatMessage> {
        self.state
            .read()
            .await
            .active
            .as_ref()
            .map(|session| session.messages.clone())
            .unwrap_or_default()
    }

    async fn create_session(&self, delete_current: bool) -> Result<SessionHandle> {
        if self
            .filling
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("[FileSessionStore] Still filling a session, refusing another");
            return Err(ChatfillError::store("Another session is still being filled"));
        }

        let created = self.replace_active_session(delete_current).await;
        if created.is_err() {
            self.filling.store(false, Ordering::SeqCst);
        }
        created
    }

    async fn append_message(&self, message: ChatMessage, options: AppendOptions) -> Result<()> {
        let mut state = self.state.write().await;
        let session = state
            .active
            .as_mut()
            .ok_or_else(|| ChatfillError::store("No active session"))?;

        tracing::trace!(
            "[FileSessionStore] Appending to {} (scroll: {})",
            session.id,
            options.scroll
        );
        session.messages.push(message);
        session.touch();
        Ok(())
    }

    async fn persist_current_session(&self) -> Result<()> {
        let saved = self.save_active().await;
        self.filling.store(false, Ordering::SeqCst);
        saved
    }

    async fn finish_operation(&self) {
        self.filling.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn character() -> EntityRef {
        EntityRef::Character("42".to_string())
    }

    async fn store_with_entity(dir: &TempDir) -> FileSessionStore {
        let store = FileSessionStore::new(dir.path().join("sessions")).unwrap();
        store.select_entity(character()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_create_append_persist_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with_entity(&temp_dir).await;

        let handle = store.create_session(false).await.unwrap();
        store
            .append_message(ChatMessage::from_user("User", "hi"), AppendOptions::default())
            .await
            .unwrap();
        store
            .append_message(
                ChatMessage::from_character("Aqua", "hello"),
                AppendOptions::default(),
            )
            .await
            .unwrap();
        store.persist_current_session().await.unwrap();
        assert!(!store.is_saving().await);

        let loaded = store.load_session(&character(), &handle.id).unwrap();
        let bodies: Vec<_> = loaded.messages.iter().map(|m| m.mes.as_str()).collect();
        assert_eq!(bodies, vec!["hi", "hello"]);
        assert_eq!(loaded.entity, character());

        let file = temp_dir
            .path()
            .join("sessions/character-42")
            .join(format!("{}.toml", handle.id));
        assert!(file.exists());
    }

    #[tokio::test]
    async fn test_create_switches_active_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with_entity(&temp_dir).await;

        let first = store.create_session(false).await.unwrap();
        store
            .append_message(ChatMessage::from_user("User", "one"), AppendOptions::default())
            .await
            .unwrap();
        store.persist_current_session().await.unwrap();

        let second = store.create_session(false).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.current_session_id().await, Some(second.id));
        assert!(store.current_messages().await.is_empty());

        // The previous session is kept on disk
        assert_eq!(
            store.load_session(&character(), &first.id).unwrap().messages.len(),
            1
        );
    }

    #[tokio::test]
    async fn test_create_with_delete_removes_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with_entity(&temp_dir).await;

        let first = store.create_session(false).await.unwrap();
        store.persist_current_session().await.unwrap();
        store.create_session(true).await.unwrap();

        let err = store.load_session(&character(), &first.id).unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_operations_require_entity_and_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path()).unwrap();

        assert!(store.active_entity().await.is_none());
        assert!(store.create_session(false).await.is_err());
        assert!(store.open_session("missing").await.is_err());
        assert!(
            store
                .append_message(ChatMessage::from_user("User", "x"), AppendOptions::default())
                .await
                .is_err()
        );
        assert!(store.persist_current_session().await.is_err());
        assert!(!store.is_saving().await);
    }

    #[tokio::test]
    async fn test_open_and_list_sessions() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with_entity(&temp_dir).await;

        let handle = store.create_session(false).await.unwrap();
        store
            .append_message(ChatMessage::from_user("User", "kept"), AppendOptions::default())
            .await
            .unwrap();
        store.persist_current_session().await.unwrap();
        store.create_session(false).await.unwrap();
        store.persist_current_session().await.unwrap();

        let listed = store.list_sessions(&character()).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|s| s.id == handle.id && s.message_count == 1));
        assert!(
            store
                .list_sessions(&EntityRef::Group("none".to_string()))
                .unwrap()
                .is_empty()
        );

        store.open_session(&handle.id).await.unwrap();
        assert_eq!(store.current_session_id().await, Some(handle.id));
        assert_eq!(store.current_messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_busy_from_create_until_persist() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with_entity(&temp_dir).await;

        let first = store.create_session(false).await.unwrap();
        assert!(store.is_saving().await);

        let err = store.create_session(false).await.unwrap_err();
        assert!(err.to_string().contains("still being filled"));
        assert_eq!(store.current_session_id().await, Some(first.id.clone()));

        store.persist_current_session().await.unwrap();
        assert!(!store.is_saving().await);

        // A run that ends without persisting releases the store explicitly
        store.create_session(false).await.unwrap();
        assert!(store.is_saving().await);
        store.finish_operation().await;
        assert!(!store.is_saving().await);
        store.create_session(false).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_create_does_not_leave_store_busy() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path()).unwrap();

        assert!(store.create_session(false).await.is_err());
        assert!(!store.is_saving().await);
    }

    #[tokio::test]
    async fn test_rejects_ids_that_escape_sessions_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with_entity(&temp_dir).await;

        for id in ["", ".", "..", "x/../../..", "a/b", "a\\b", "..hidden"] {
            assert!(
                store
                    .select_entity(EntityRef::Group(id.to_string()))
                    .await
                    .is_err(),
                "entity id {id:?} accepted"
            );
            assert!(store.open_session(id).await.is_err());
            assert!(store.load_session(&character(), id).is_err());
            assert!(store.list_sessions(&EntityRef::Character(id.to_string())).is_err());
        }

        // The rejected selection did not replace the valid one
        assert_eq!(store.active_entity().await, Some(character()));
        let handle = store.create_session(false).await.unwrap();
        store.persist_current_session().await.unwrap();
        assert!(store.open_session(&handle.id).await.is_ok());
        assert_eq!(
            fs::read_dir(temp_dir.path()).unwrap().count(),
            1,
            "nothing written outside the sessions directory"
        );
    }

    #[tokio::test]
    async fn test_generating_flag() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_with_entity(&temp_dir).await;

        store.set_generating(true);
        assert!(store.is_generating().await);
        store.set_generating(false);
        assert!(!store.is_generating().await);
    }
}
