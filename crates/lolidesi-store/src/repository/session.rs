//! # Session Repository
//!
//! The logged-in employee, stored under the same three keys the mobile app
//! has always used.

use lolidesi_core::CurrentUser;
use tracing::info;

use crate::error::StoreResult;
use crate::repository::kv::KeyValueStore;

pub const LOGGED_IN_KEY: &str = "isLoggedIn";
pub const EMP_ID_KEY: &str = "empID";
pub const EMP_NAME_KEY: &str = "empName";

const LOGGED_IN_VALUE: &str = "true";

#[derive(Debug, Clone)]
pub struct SessionStore {
    kv: KeyValueStore,
}

impl SessionStore {
    pub fn new(kv: KeyValueStore) -> Self {
        SessionStore { kv }
    }

    /// Stores the three session keys in one transaction.
    pub async fn save_login(&self, user: &CurrentUser) -> StoreResult<()> {
        self.kv
            .set_many(&[
                (LOGGED_IN_KEY, LOGGED_IN_VALUE),
                (EMP_ID_KEY, user.emp_id.as_str()),
                (EMP_NAME_KEY, user.emp_name.as_str()),
            ])
            .await?;

        info!(emp_id = %user.emp_id, "Session saved");
        Ok(())
    }

    /// Removes all session keys.
    pub async fn clear(&self) -> StoreResult<()> {
        self.kv
            .remove_many(&[LOGGED_IN_KEY, EMP_ID_KEY, EMP_NAME_KEY])
            .await?;

        info!("Session cleared");
        Ok(())
    }

    pub async fn is_logged_in(&self) -> StoreResult<bool> {
        Ok(self.kv.get(LOGGED_IN_KEY).await?.as_deref() == Some(LOGGED_IN_VALUE))
    }

    /// The stored user, if logged in with an employee id.
    ///
    /// A missing name reads back as empty.
    pub async fn current_user(&self) -> StoreResult<Option<CurrentUser>> {
        if !self.is_logged_in().await? {
            return Ok(None);
        }

        let Some(emp_id) = self.kv.get(EMP_ID_KEY).await? else {
            return Ok(None);
        };
        let emp_name = self.kv.get(EMP_NAME_KEY).await?.unwrap_or_default();

        Ok(Some(CurrentUser { emp_id, emp_name }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn user() -> CurrentUser {
        CurrentUser {
            emp_id: "EMP07".into(),
            emp_name: "Rina".into(),
        }
    }

    #[tokio::test]
    async fn test_login_logout_cycle() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let session = db.session();

        assert!(!session.is_logged_in().await.unwrap());
        assert_eq!(session.current_user().await.unwrap(), None);

        session.save_login(&user()).await.unwrap();
        assert!(session.is_logged_in().await.unwrap());
        assert_eq!(session.current_user().await.unwrap(), Some(user()));
        assert_eq!(db.kv().get(LOGGED_IN_KEY).await.unwrap().as_deref(), Some("true"));

        session.clear().await.unwrap();
        assert!(!session.is_logged_in().await.unwrap());
        assert_eq!(db.kv().get(EMP_ID_KEY).await.unwrap(), None);
        assert_eq!(db.kv().get(EMP_NAME_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_flag_must_be_exactly_true() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.kv().set(LOGGED_IN_KEY, "yes").await.unwrap();
        db.kv().set(EMP_ID_KEY, "EMP07").await.unwrap();

        assert!(!db.session().is_logged_in().await.unwrap());
        assert_eq!(db.session().current_user().await.unwrap(), None);
    }
}
