use std::sync::Arc;

use crate::config::AlbumConfig;
use crate::domain::{Role, Session, User, UserSummary};
use crate::error::AuthError;
use crate::hasher::{compare_password, hash_password};
use crate::store::{forget, keys, load, load_or_warn, persist, KeyValueStore};

/// Registered accounts, keyed by unique username.
pub struct UserDirectory {
    store: Arc<dyn KeyValueStore>,
    users: Vec<User>,
    master_key: String,
}

impl UserDirectory {
    /// Load the directory and make sure the configured default admin exists.
    pub fn load(store: Arc<dyn KeyValueStore>, config: &AlbumConfig) -> Self {
        let admin = &config.default_admin;
        let seed = || User {
            username: admin.username.clone(),
            password_hash: hash_password(&admin.password),
            role: Role::Admin,
        };

        // An unreadable directory is never overwritten: sign-in falls back to
        // the default admin for this run only.
        let users = match load::<Vec<User>>(store.as_ref(), keys::USERS) {
            Ok(stored) => {
                let mut users = stored.unwrap_or_default();
                if !users.iter().any(|u| u.username == admin.username) {
                    users.push(seed());
                    persist(store.as_ref(), keys::USERS, &users);
                    tracing::info!(username = %admin.username, "seeded default admin account");
                }
                users
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load users, keeping stored accounts untouched");
                vec![seed()]
            }
        };

        Self {
            store,
            users,
            master_key: config.master_key.clone(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn find(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Usernames and roles, without credentials.
    pub fn registered_users(&self) -> Vec<UserSummary> {
        self.users
            .iter()
            .map(|u| UserSummary {
                username: u.username.clone(),
                role: u.role,
            })
            .collect()
    }

    /// Create a regular account.
    pub fn register(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        self.insert_user(username, password)?;
        tracing::debug!(username, "registered user");
        Ok(())
    }

    /// Check credentials and, on success, persist the signed-in state.
    ///
    /// An empty username with the master key as password is accepted without
    /// any lookup; that session has no current user.
    pub fn login(&self, username: &str, password: &str) -> Option<Session> {
        if username.is_empty() && password == self.master_key {
            persist(self.store.as_ref(), keys::AUTH_FLAG, &true);
            forget(self.store.as_ref(), keys::CURRENT_USER);
            tracing::debug!("signed in with master key");
            return Some(Session {
                authenticated: true,
                current_user: None,
            });
        }

        let user = self.find(username)?;
        if !compare_password(password, &user.password_hash) {
            tracing::debug!(username, "login rejected");
            return None;
        }

        persist(self.store.as_ref(), keys::AUTH_FLAG, &true);
        persist(self.store.as_ref(), keys::CURRENT_USER, user);
        tracing::debug!(username, "signed in");
        Some(Session {
            authenticated: true,
            current_user: Some(user.clone()),
        })
    }

    /// Clear the persisted sign-in state.
    pub fn logout(&self) -> Session {
        forget(self.store.as_ref(), keys::AUTH_FLAG);
        forget(self.store.as_ref(), keys::CURRENT_USER);
        Session::anonymous()
    }

    /// Rebuild the session persisted by the last `login`.
    pub fn restore_session(&self) -> Session {
        let authenticated: bool =
            load_or_warn(self.store.as_ref(), keys::AUTH_FLAG).unwrap_or(false);
        let current_user: Option<User> = load_or_warn(self.store.as_ref(), keys::CURRENT_USER);
        Session {
            authenticated,
            current_user,
        }
    }

    /// Public "forgot password" flow: gated by the master key alone.
    pub fn reset_password(
        &mut self,
        username: &str,
        new_password: &str,
        master_key: &str,
    ) -> Result<(), AuthError> {
        self.check_master_key(master_key)?;
        let user = self
            .users
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or(AuthError::UserNotFound)?;
        user.password_hash = hash_password(new_password);
        persist(self.store.as_ref(), keys::USERS, &self.users);
        tracing::debug!(username, "password reset");
        Ok(())
    }

    /// Reset another user's password. Needs an admin session and the master key.
    pub fn admin_reset_password(
        &mut self,
        session: &Session,
        username: &str,
        new_password: &str,
        master_key: &str,
    ) -> Result<(), AuthError> {
        Self::check_admin(session)?;
        self.check_master_key(master_key)?;
        self.reset_password(username, new_password, master_key)
    }

    /// Create a regular account on someone's behalf. Needs an admin session
    /// and the master key.
    pub fn admin_create_user(
        &mut self,
        session: &Session,
        username: &str,
        password: &str,
        master_key: &str,
    ) -> Result<(), AuthError> {
        Self::check_admin(session)?;
        self.check_master_key(master_key)?;
        self.insert_user(username, password)?;
        tracing::debug!(username, by = session.username(), "admin created user");
        Ok(())
    }

    fn insert_user(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.find(username).is_some() {
            return Err(AuthError::DuplicateUsername);
        }
        self.users.push(User {
            username: username.to_string(),
            password_hash: hash_password(password),
            role: Role::User,
        });
        persist(self.store.as_ref(), keys::USERS, &self.users);
        Ok(())
    }

    fn check_admin(session: &Session) -> Result<(), AuthError> {
        if session.is_admin() {
            Ok(())
        } else {
            Err(AuthError::AdminRequired)
        }
    }

    fn check_master_key(&self, master_key: &str) -> Result<(), AuthError> {
        if master_key == self.master_key {
            Ok(())
        } else {
            Err(AuthError::InvalidMasterKey)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::FailingStore;
    use crate::store::MemoryStore;

    const KEY: &str = "family-master-key";

    fn make_directory() -> (UserDirectory, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let dir = UserDirectory::load(store.clone(), &AlbumConfig::default());
        (dir, store)
    }

    fn admin_session(dir: &UserDirectory) -> Session {
        dir.login("admin", "admin1234").unwrap()
    }

    fn stored_users(store: &MemoryStore) -> Vec<User> {
        load(store, keys::USERS).unwrap().unwrap()
    }

    // ── Bootstrap ───────────────────────────────────────────────

    #[test]
    fn test_default_admin_seeded_and_persisted() {
        let (dir, store) = make_directory();
        let summaries = dir.registered_users();
        assert_eq!(
            summaries,
            vec![UserSummary {
                username: "admin".into(),
                role: Role::Admin
            }]
        );
        assert_eq!(stored_users(&store).len(), 1);
    }

    #[test]
    fn test_default_admin_appended_to_existing_users() {
        let store = Arc::new(MemoryStore::new());
        crate::store::save(
            store.as_ref(),
            keys::USERS,
            &vec![User {
                username: "grandma".into(),
                password_hash: hash_password("cookies"),
                role: Role::User,
            }],
        )
        .unwrap();

        let dir = UserDirectory::load(store.clone(), &AlbumConfig::default());
        let names: Vec<&str> = dir.users().iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["grandma", "admin"]);
        assert_eq!(stored_users(&store).len(), 2);
    }

    #[test]
    fn test_unreadable_users_are_not_overwritten() {
        let (mut dir, store) = make_directory();
        dir.register("alice", "pw1").unwrap();
        dir.register("bob", "pw2").unwrap();

        let raw = store.get(keys::USERS).unwrap().unwrap();
        let broken = raw.replacen("\"role\":\"user\"", "\"role\":\"viewer\"", 1);
        store.set(keys::USERS, &broken).unwrap();

        let dir = UserDirectory::load(store.clone(), &AlbumConfig::default());
        assert_eq!(store.get(keys::USERS).unwrap(), Some(broken));
        let names: Vec<&str> = dir.users().iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["admin"]);
        assert!(dir.login("admin", "admin1234").is_some());
    }

    #[test]
    fn test_default_admin_not_duplicated_on_reload() {
        let store = Arc::new(MemoryStore::new());
        let _ = UserDirectory::load(store.clone(), &AlbumConfig::default());
        let dir = UserDirectory::load(store.clone(), &AlbumConfig::default());
        assert_eq!(dir.users().len(), 1);
    }

    // ── Register / login ────────────────────────────────────────

    #[test]
    fn test_register_then_login() {
        let (mut dir, store) = make_directory();
        dir.register("alice", "pw1").unwrap();

        let session = dir.login("alice", "pw1").unwrap();
        assert!(session.authenticated);
        assert_eq!(session.username(), Some("alice"));
        assert!(!session.is_admin());
        assert!(dir.login("alice", "wrong").is_none());

        let alice = stored_users(&store)
            .into_iter()
            .find(|u| u.username == "alice")
            .unwrap();
        assert_ne!(alice.password_hash, "pw1");
        assert_eq!(alice.role, Role::User);
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let (mut dir, _store) = make_directory();
        dir.register("alice", "pw1").unwrap();
        let err = dir.register("alice", "other").unwrap_err();
        assert_eq!(err, AuthError::DuplicateUsername);
        assert_eq!(err.to_string(), "Username already exists");
        // Original password still works
        assert!(dir.login("alice", "pw1").is_some());
    }

    #[test]
    fn test_login_unknown_user() {
        let (dir, store) = make_directory();
        assert!(dir.login("nobody", "pw").is_none());
        assert!(store.get(keys::AUTH_FLAG).unwrap().is_none());
    }

    #[test]
    fn test_login_persists_session() {
        let (mut dir, store) = make_directory();
        dir.register("alice", "pw1").unwrap();
        dir.login("alice", "pw1").unwrap();

        assert_eq!(store.get(keys::AUTH_FLAG).unwrap(), Some("true".to_string()));
        let restored = dir.restore_session();
        assert!(restored.authenticated);
        assert_eq!(restored.username(), Some("alice"));
    }

    #[test]
    fn test_master_key_login_bypasses_lookup() {
        let (dir, store) = make_directory();
        let session = dir.login("", KEY).unwrap();
        assert!(session.authenticated);
        assert!(session.current_user.is_none());
        assert!(store.get(keys::CURRENT_USER).unwrap().is_none());
    }

    #[test]
    fn test_master_key_login_replaces_named_session() {
        let (dir, _store) = make_directory();
        admin_session(&dir);
        dir.login("", KEY).unwrap();

        let restored = dir.restore_session();
        assert!(restored.authenticated);
        assert!(restored.current_user.is_none());
    }

    #[test]
    fn test_master_key_with_username_is_normal_login() {
        let (dir, _store) = make_directory();
        assert!(dir.login("admin", KEY).is_none());
        assert!(dir.login("", "not-the-key").is_none());
    }

    #[test]
    fn test_logout_clears_persisted_session() {
        let (dir, store) = make_directory();
        dir.login("admin", "admin1234").unwrap();

        let session = dir.logout();
        assert!(!session.authenticated);
        assert!(store.get(keys::AUTH_FLAG).unwrap().is_none());
        assert!(store.get(keys::CURRENT_USER).unwrap().is_none());
        assert_eq!(dir.restore_session(), Session::anonymous());
    }

    // ── Password resets ─────────────────────────────────────────

    #[test]
    fn test_reset_password_with_master_key() {
        let (mut dir, _store) = make_directory();
        dir.register("alice", "pw1").unwrap();
        dir.reset_password("alice", "pw2", KEY).unwrap();
        assert!(dir.login("alice", "pw1").is_none());
        assert!(dir.login("alice", "pw2").is_some());
    }

    #[test]
    fn test_reset_password_wrong_key_leaves_hash() {
        let (mut dir, store) = make_directory();
        dir.register("alice", "pw1").unwrap();
        let before = dir.find("alice").unwrap().password_hash.clone();

        let err = dir.reset_password("alice", "pw2", "guess").unwrap_err();
        assert_eq!(err, AuthError::InvalidMasterKey);
        assert_eq!(dir.find("alice").unwrap().password_hash, before);
        let persisted = stored_users(&store);
        assert_eq!(
            persisted.iter().find(|u| u.username == "alice").unwrap().password_hash,
            before
        );
    }

    #[test]
    fn test_reset_password_unknown_user() {
        let (mut dir, _store) = make_directory();
        let err = dir.reset_password("ghost", "pw", KEY).unwrap_err();
        assert_eq!(err, AuthError::UserNotFound);
        assert_eq!(err.to_string(), "User not found");
    }

    #[test]
    fn test_admin_reset_requires_admin_session() {
        let (mut dir, _store) = make_directory();
        dir.register("alice", "pw1").unwrap();
        let alice = dir.login("alice", "pw1").unwrap();

        let err = dir
            .admin_reset_password(&alice, "admin", "hijack", KEY)
            .unwrap_err();
        assert_eq!(err, AuthError::AdminRequired);
        assert!(dir.login("admin", "admin1234").is_some());
    }

    #[test]
    fn test_admin_reset_checks_master_key() {
        let (mut dir, _store) = make_directory();
        dir.register("alice", "pw1").unwrap();
        let admin = admin_session(&dir);

        let err = dir
            .admin_reset_password(&admin, "alice", "pw2", "wrong")
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidMasterKey);

        dir.admin_reset_password(&admin, "alice", "pw2", KEY).unwrap();
        assert!(dir.login("alice", "pw2").is_some());
    }

    // ── Admin create ────────────────────────────────────────────

    #[test]
    fn test_admin_create_without_admin_session() {
        let (mut dir, _store) = make_directory();
        let master = dir.login("", KEY).unwrap();
        for session in [Session::anonymous(), master] {
            for key in [KEY, "wrong"] {
                let err = dir
                    .admin_create_user(&session, "bob", "pw", key)
                    .unwrap_err();
                assert_eq!(err, AuthError::AdminRequired);
            }
        }
        assert!(dir.find("bob").is_none());
    }

    #[test]
    fn test_admin_create_user() {
        let (mut dir, store) = make_directory();
        let admin = admin_session(&dir);

        assert_eq!(
            dir.admin_create_user(&admin, "bob", "pw", "wrong"),
            Err(AuthError::InvalidMasterKey)
        );
        dir.admin_create_user(&admin, "bob", "pw", KEY).unwrap();
        assert_eq!(
            dir.admin_create_user(&admin, "bob", "pw", KEY),
            Err(AuthError::DuplicateUsername)
        );

        let bob = dir.find("bob").unwrap();
        assert_eq!(bob.role, Role::User);
        assert!(dir.login("bob", "pw").is_some());
        assert_eq!(stored_users(&store).len(), 2);
    }

    // ── Storage failures ────────────────────────────────────────

    #[test]
    fn test_failing_store_does_not_change_results() {
        let mut dir = UserDirectory::load(Arc::new(FailingStore), &AlbumConfig::default());
        assert_eq!(dir.users().len(), 1);

        dir.register("alice", "pw1").unwrap();
        assert!(dir.login("alice", "pw1").is_some());
        dir.reset_password("alice", "pw2", KEY).unwrap();
        assert!(dir.login("alice", "pw2").is_some());
        assert_eq!(dir.restore_session(), Session::anonymous());
    }
}
