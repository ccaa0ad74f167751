//! # Repository Collaborator
//!
//! This module defines the narrow interface through which the engine talks
//! to external repository storage, following a trait-based design so the
//! concrete transport can be swapped out: the production binding wraps a
//! hosted Git API, the CLI binds to a local directory tree, and tests use
//! scripted mocks.
//!
//! Concurrent-modification failures (the HTTP 409 class) are a first-class
//! concern: [`RepositoryClient`] implementations must surface them as
//! [`Error::Conflict`], which [`write_with_retry`] retries with exponential
//! backoff — three attempts, base two seconds (2s/4s/8s) — before giving up.
//! Every other failure propagates immediately.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

/// A fetched file with its content hash for optimistic concurrency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub content: String,
    pub sha: String,
    pub encoding: String,
}

/// The result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCommit {
    pub sha: String,
}

/// Trait for repository file access - allows mocking in tests.
pub trait RepositoryClient {
    /// Fetch one file from a repository at a branch.
    fn get_file_content(
        &self,
        repo_full_name: &str,
        path: &str,
        branch: &str,
    ) -> Result<FileContent>;

    /// Create or replace one file, committing with the given message.
    ///
    /// Implementations must report concurrent modification as
    /// [`Error::Conflict`] so the retry layer can distinguish it from
    /// permanent failures.
    fn create_or_update_file(
        &mut self,
        repo_full_name: &str,
        path: &str,
        content: &str,
        branch: &str,
        commit_message: &str,
    ) -> Result<FileCommit>;
}

/// Retry schedule for conflicted writes.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Zero-delay policy for tests.
    pub fn immediate() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::ZERO,
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        // 2s/4s/8s with the default base.
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Write a file, retrying conflicts per the policy.
///
/// Non-conflict errors are surfaced on first occurrence; after the final
/// conflicted attempt the conflict itself is returned and the caller's
/// local state is left untouched.
pub fn write_with_retry(
    client: &mut dyn RepositoryClient,
    repo_full_name: &str,
    path: &str,
    content: &str,
    branch: &str,
    commit_message: &str,
    policy: RetryPolicy,
) -> Result<FileCommit> {
    let mut attempt = 0;
    loop {
        match client.create_or_update_file(repo_full_name, path, content, branch, commit_message)
        {
            Ok(commit) => return Ok(commit),
            Err(err) if err.is_retryable() && attempt + 1 < policy.attempts => {
                let delay = policy.delay_for(attempt);
                log::warn!(
                    "write conflict on {}/{} (attempt {}), retrying in {:?}",
                    repo_full_name,
                    path,
                    attempt + 1,
                    delay
                );
                thread::sleep(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Binds the repository interface to a local directory tree.
///
/// `repo_full_name` maps to a subdirectory under the root; branches are not
/// modeled (a working tree has exactly one). Used by the CLI's `switch`
/// command and by tests.
pub struct LocalDirectoryClient {
    root: PathBuf,
}

impl LocalDirectoryClient {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, repo_full_name: &str, path: &str) -> PathBuf {
        let mut full = self.root.clone();
        for part in repo_full_name.split('/') {
            full.push(part);
        }
        for part in path.split('/') {
            full.push(part);
        }
        full
    }
}

fn content_sha(content: &str) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

impl RepositoryClient for LocalDirectoryClient {
    fn get_file_content(
        &self,
        repo_full_name: &str,
        path: &str,
        _branch: &str,
    ) -> Result<FileContent> {
        let full = self.resolve(repo_full_name, path);
        if !full.exists() {
            return Err(Error::not_found(
                "file",
                format!("{}/{}", repo_full_name, path),
            ));
        }
        let content = std::fs::read_to_string(&full)?;
        let sha = content_sha(&content);
        Ok(FileContent {
            content,
            sha,
            encoding: "utf-8".to_string(),
        })
    }

    fn create_or_update_file(
        &mut self,
        repo_full_name: &str,
        path: &str,
        content: &str,
        _branch: &str,
        commit_message: &str,
    ) -> Result<FileCommit> {
        let full = self.resolve(repo_full_name, path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, content)?;
        log::info!("wrote {}/{}: {}", repo_full_name, path, commit_message);
        Ok(FileCommit {
            sha: content_sha(content),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted client: fails with a conflict a fixed number of times, then
    /// succeeds.
    struct ConflictingClient {
        conflicts_remaining: u32,
        writes: u32,
    }

    impl RepositoryClient for ConflictingClient {
        fn get_file_content(&self, _: &str, path: &str, _: &str) -> Result<FileContent> {
            Err(Error::not_found("file", path))
        }

        fn create_or_update_file(
            &mut self,
            _: &str,
            path: &str,
            content: &str,
            _: &str,
            _: &str,
        ) -> Result<FileCommit> {
            self.writes += 1;
            if self.conflicts_remaining > 0 {
                self.conflicts_remaining -= 1;
                return Err(Error::Conflict {
                    path: path.to_string(),
                    message: "sha mismatch".to_string(),
                });
            }
            Ok(FileCommit {
                sha: content_sha(content),
            })
        }
    }

    #[test]
    fn test_retry_succeeds_on_third_attempt() {
        let mut client = ConflictingClient {
            conflicts_remaining: 2,
            writes: 0,
        };
        let result = write_with_retry(
            &mut client,
            "acme/design",
            "tokens.json",
            "{}",
            "main",
            "update tokens",
            RetryPolicy::immediate(),
        );
        assert!(result.is_ok());
        assert_eq!(client.writes, 3);
    }

    #[test]
    fn test_retry_gives_up_after_three_attempts() {
        let mut client = ConflictingClient {
            conflicts_remaining: 5,
            writes: 0,
        };
        let result = write_with_retry(
            &mut client,
            "acme/design",
            "tokens.json",
            "{}",
            "main",
            "update tokens",
            RetryPolicy::immediate(),
        );
        assert!(matches!(result, Err(Error::Conflict { .. })));
        assert_eq!(client.writes, 3);
    }

    #[test]
    fn test_non_conflict_error_is_not_retried() {
        struct FailingClient {
            writes: u32,
        }
        impl RepositoryClient for FailingClient {
            fn get_file_content(&self, _: &str, path: &str, _: &str) -> Result<FileContent> {
                Err(Error::not_found("file", path))
            }
            fn create_or_update_file(
                &mut self,
                _: &str,
                path: &str,
                _: &str,
                _: &str,
                _: &str,
            ) -> Result<FileCommit> {
                self.writes += 1;
                Err(Error::not_found("repository", path))
            }
        }

        let mut client = FailingClient { writes: 0 };
        let result = write_with_retry(
            &mut client,
            "acme/design",
            "tokens.json",
            "{}",
            "main",
            "update",
            RetryPolicy::immediate(),
        );
        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert_eq!(client.writes, 1);
    }

    #[test]
    fn test_retry_delay_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(2));
        assert_eq!(policy.delay_for(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for(2), Duration::from_secs(8));
    }

    #[test]
    fn test_local_directory_client_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = LocalDirectoryClient::new(dir.path());

        let commit = client
            .create_or_update_file("acme/design", "tokens/core.json", "{}", "main", "init")
            .unwrap();
        assert!(!commit.sha.is_empty());

        let fetched = client
            .get_file_content("acme/design", "tokens/core.json", "main")
            .unwrap();
        assert_eq!(fetched.content, "{}");
        assert_eq!(fetched.sha, commit.sha);
        assert_eq!(fetched.encoding, "utf-8");
    }

    #[test]
    fn test_local_directory_client_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let client = LocalDirectoryClient::new(dir.path());
        let err = client
            .get_file_content("acme/design", "absent.json", "main")
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
