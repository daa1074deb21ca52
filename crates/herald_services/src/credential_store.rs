use std::sync::Arc;

use chrono::Utc;
use herald_domain::{Authorizer, Credential, CredentialRepository, CredentialStatus};

/// Owns the persisted mail credential for one run: returns it when usable,
/// refreshes it when expired, and falls back to interactive authorization.
/// Every credential it issues or refreshes is written back before returning.
pub struct CredentialStore<R, A> {
    repository: Arc<R>,
    authorizer: Arc<A>,
    scopes: Vec<String>,
}

impl<R: CredentialRepository, A: Authorizer> CredentialStore<R, A> {
    pub fn new(repository: Arc<R>, authorizer: Arc<A>, scopes: Vec<String>) -> Self {
        Self { repository, authorizer, scopes }
    }

    pub async fn acquire(&self) -> anyhow::Result<Credential> {
        let Some(credential) = self.repository.read().await? else {
            tracing::info!("No stored credential, starting authorization");
            return self.authorize().await;
        };

        match credential.status(&self.scopes, Utc::now()) {
            CredentialStatus::Valid => {
                tracing::debug!("Stored credential is valid");
                return Ok(credential);
            }
            CredentialStatus::Expired if credential.can_refresh() => {
                tracing::info!("Refreshing expired credential");
                match self.authorizer.refresh(&credential).await {
                    Ok(refreshed) => {
                        self.repository.write(&refreshed).await?;
                        tracing::info!("Refreshed credential saved");
                        return Ok(refreshed);
                    }
                    Err(error) => {
                        tracing::warn!(error = ?error, "Credential refresh failed, re-authorizing");
                    }
                }
            }
            status => {
                tracing::info!(status = %status, "Stored credential is unusable, re-authorizing");
            }
        }

        self.authorize().await
    }

    /// Runs the interactive flow unconditionally and persists the result.
    pub async fn authorize(&self) -> anyhow::Result<Credential> {
        let credential = self.authorizer.authorize(&self.scopes).await?;
        self.repository.write(&credential).await?;
        tracing::info!("Authorized credential saved");
        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use super::*;

    const SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";

    #[derive(Default)]
    struct MemoryRepository {
        stored: Mutex<Option<Credential>>,
        writes: Mutex<Vec<Credential>>,
    }

    impl MemoryRepository {
        fn with(credential: Credential) -> Self {
            Self { stored: Mutex::new(Some(credential)), writes: Mutex::default() }
        }

        fn writes(&self) -> Vec<Credential> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl CredentialRepository for MemoryRepository {
        async fn read(&self) -> anyhow::Result<Option<Credential>> {
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn write(&self, credential: &Credential) -> anyhow::Result<()> {
            *self.stored.lock().unwrap() = Some(credential.clone());
            self.writes.lock().unwrap().push(credential.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeAuthorizer {
        refresh_fails: bool,
        refreshes: Mutex<usize>,
        authorizations: Mutex<usize>,
    }

    #[async_trait::async_trait]
    impl Authorizer for FakeAuthorizer {
        async fn refresh(&self, credential: &Credential) -> anyhow::Result<Credential> {
            *self.refreshes.lock().unwrap() += 1;
            if self.refresh_fails {
                anyhow::bail!("invalid_grant");
            }
            Ok(credential.clone().refreshed(
                "refreshed-access".to_string(),
                None,
                Some(3600),
                Utc::now(),
            ))
        }

        async fn authorize(&self, scopes: &[String]) -> anyhow::Result<Credential> {
            *self.authorizations.lock().unwrap() += 1;
            Ok(fixture_credential()
                .access_token("authorized-access".to_string())
                .scopes(scopes.to_vec()))
        }
    }

    fn fixture_credential() -> Credential {
        Credential::new(
            "access".to_string(),
            "https://oauth2.googleapis.com/token".to_string(),
            "client".to_string(),
            "secret".to_string(),
        )
        .refresh_token("refresh".to_string())
        .scopes(vec![SCOPE.to_string()])
    }

    fn fixture_store(
        repository: MemoryRepository,
        authorizer: FakeAuthorizer,
    ) -> CredentialStore<MemoryRepository, FakeAuthorizer> {
        CredentialStore::new(
            Arc::new(repository),
            Arc::new(authorizer),
            vec![SCOPE.to_string()],
        )
    }

    #[tokio::test]
    async fn test_valid_credential_is_returned_without_writes() {
        let stored = fixture_credential().expiry(Utc::now() + Duration::hours(1));
        let fixture = fixture_store(MemoryRepository::with(stored.clone()), FakeAuthorizer::default());

        let first = fixture.acquire().await.unwrap();
        let second = fixture.acquire().await.unwrap();

        assert_eq!(first, stored);
        assert_eq!(second, stored);
        assert!(fixture.repository.writes().is_empty());
        assert_eq!(*fixture.authorizer.authorizations.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_expired_credential_is_refreshed_and_persisted() {
        let stored = fixture_credential().expiry(Utc::now() - Duration::minutes(5));
        let fixture = fixture_store(MemoryRepository::with(stored.clone()), FakeAuthorizer::default());

        let actual = fixture.acquire().await.unwrap();

        assert_ne!(actual, stored);
        assert!(actual.expiry.unwrap() > Utc::now());
        assert_eq!(actual.refresh_token, stored.refresh_token);
        assert_eq!(fixture.repository.writes(), vec![actual]);
    }

    #[tokio::test]
    async fn test_failed_refresh_falls_back_to_authorization() {
        let stored = fixture_credential().expiry(Utc::now() - Duration::minutes(5));
        let authorizer = FakeAuthorizer { refresh_fails: true, ..Default::default() };
        let fixture = fixture_store(MemoryRepository::with(stored), authorizer);

        let actual = fixture.acquire().await.unwrap();

        assert_eq!(actual.access_token.as_str(), "authorized-access");
        assert_eq!(*fixture.authorizer.refreshes.lock().unwrap(), 1);
        assert_eq!(fixture.repository.writes(), vec![actual]);
    }

    #[tokio::test]
    async fn test_expired_without_refresh_token_is_reauthorized() {
        let mut stored = fixture_credential().expiry(Utc::now() - Duration::minutes(5));
        stored.refresh_token = None;
        let fixture = fixture_store(MemoryRepository::with(stored), FakeAuthorizer::default());

        let actual = fixture.acquire().await.unwrap();

        assert_eq!(actual.access_token.as_str(), "authorized-access");
        assert_eq!(*fixture.authorizer.refreshes.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_scope_is_reauthorized() {
        let stored = fixture_credential()
            .scopes(vec!["https://www.googleapis.com/auth/gmail.readonly".to_string()]);
        let fixture = fixture_store(MemoryRepository::with(stored), FakeAuthorizer::default());

        let actual = fixture.acquire().await.unwrap();

        assert_eq!(actual.scopes, vec![SCOPE.to_string()]);
        assert_eq!(*fixture.authorizer.authorizations.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_credential_is_authorized_and_persisted() {
        let fixture = fixture_store(MemoryRepository::default(), FakeAuthorizer::default());

        let actual = fixture.acquire().await.unwrap();

        assert_eq!(fixture.repository.writes(), vec![actual]);
    }
}
