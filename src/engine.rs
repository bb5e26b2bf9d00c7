//! Sequential migration of repositories from a source to a destination
use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};

use log::{debug, error, info, warn};
use rand::{distributions::Alphanumeric, Rng};

use crate::{
    errors::{GitMoverError, GitMoverErrorKind},
    git::{git_args, GitOutput, GitRunner, SystemGit},
    platform::{DestinationPlatform, SourcePlatform},
    repo::Repo,
};

/// Length of the random suffix of scratch directories
const SCRATCH_SUFFIX_LEN: usize = 10;

/// Name of the remote pointing to the destination
const DESTINATION_REMOTE: &str = "destination";

/// Progress of one repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    /// Nothing done yet
    Pending,
    /// The destination repository exists
    DestinationCreated,
    /// The mirror clone is on disk
    Cloned,
    /// The destination remote is configured
    RemoteAdded,
    /// Branches (and possibly tags) are pushed
    Pushed,
    /// A step failed
    Failed,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MigrationState::Pending => "pending",
            MigrationState::DestinationCreated => "destination created",
            MigrationState::Cloned => "cloned",
            MigrationState::RemoteAdded => "remote added",
            MigrationState::Pushed => "pushed",
            MigrationState::Failed => "failed",
        };
        write!(f, "{text}")
    }
}

/// Result of one repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    /// Display key of the repository
    pub key: String,

    /// Whether the branches reached the destination
    pub success: bool,

    /// Last state reached before finishing or failing
    pub reached: MigrationState,
}

impl MigrationOutcome {
    /// Final state, [`MigrationState::Failed`] for failures
    pub fn state(&self) -> MigrationState {
        if self.success {
            self.reached
        } else {
            MigrationState::Failed
        }
    }
}

/// Outcomes of a batch, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// One entry per repository
    outcomes: Vec<MigrationOutcome>,
}

impl MigrationReport {
    /// Every outcome, in processing order
    pub fn outcomes(&self) -> &[MigrationOutcome] {
        &self.outcomes
    }

    /// Outcome of a display key
    pub fn get(&self, key: &str) -> Option<&MigrationOutcome> {
        self.outcomes.iter().find(|outcome| outcome.key == key)
    }

    /// Number of successful repositories
    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.success).count()
    }

    /// Number of failed repositories
    pub fn failures(&self) -> usize {
        self.outcomes.len() - self.successes()
    }

    /// Number of repositories
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// True if nothing was migrated
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Migration summary:")?;
        for outcome in &self.outcomes {
            if outcome.success {
                writeln!(f, "  SUCCESS {}", outcome.key)?;
            } else {
                writeln!(f, "  FAILED  {} (after: {})", outcome.key, outcome.reached)?;
            }
        }
        write!(
            f,
            "Total: {}, succeeded: {}, failed: {}",
            self.len(),
            self.successes(),
            self.failures()
        )
    }
}

/// Scratch directory removed on drop
#[derive(Debug)]
struct ScratchDir {
    /// Created directory
    path: PathBuf,
}

impl ScratchDir {
    /// Create `<root>/migration-<name>-<random>`
    fn new(root: &Path, name: &str) -> Result<Self, GitMoverError> {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SCRATCH_SUFFIX_LEN)
            .map(char::from)
            .collect();
        let path = root.join(format!("migration-{name}-{suffix}"));
        fs::create_dir_all(&path)
            .map_err(|e| GitMoverError::new_with_source("Unable to create scratch directory", e))?;
        debug!("Scratch directory {}", path.display());
        Ok(Self { path })
    }

    /// Path of the directory
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            warn!(
                "Unable to remove scratch directory {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// Restores the process working directory on drop
#[derive(Debug)]
struct WorkdirGuard {
    /// Directory at creation
    original: Option<PathBuf>,
}

impl WorkdirGuard {
    /// Remember the current directory
    fn capture() -> Self {
        let original = match env::current_dir() {
            Ok(dir) => Some(dir),
            Err(e) => {
                warn!("Unable to read the working directory: {e}");
                None
            }
        };
        Self { original }
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        let Some(original) = &self.original else {
            return;
        };
        if env::current_dir().ok().as_ref() == Some(original) {
            return;
        }
        if let Err(e) = env::set_current_dir(original) {
            warn!(
                "Unable to restore working directory {}: {}",
                original.display(),
                e
            );
        }
    }
}

/// Error for a failed git step, credentials removed from stderr
fn transfer_error(step: &str, output: &GitOutput, secret_url: &str) -> GitMoverError {
    let stderr = if secret_url.is_empty() {
        output.stderr.clone()
    } else {
        output.stderr.replace(secret_url, "<authenticated url>")
    };
    GitMoverError::new(GitMoverErrorKind::Transfer).with_text(&format!("{step} failed: {stderr}"))
}

/// Moves repositories from a source to a destination
pub struct MigrationEngine<'a> {
    /// Platform repositories are read from
    source: &'a dyn SourcePlatform,

    /// Platform repositories are pushed to
    destination: &'a dyn DestinationPlatform,

    /// Git runner
    git: &'a dyn GitRunner,

    /// Parent of scratch directories
    scratch_root: PathBuf,
}

impl<'a> MigrationEngine<'a> {
    /// Engine using the system git and the system temporary directory
    pub fn new(source: &'a dyn SourcePlatform, destination: &'a dyn DestinationPlatform) -> Self {
        Self {
            source,
            destination,
            git: &SystemGit,
            scratch_root: env::temp_dir(),
        }
    }

    /// Use another git runner
    pub fn with_git_runner(mut self, git: &'a dyn GitRunner) -> Self {
        self.git = git;
        self
    }

    /// Create scratch directories under `root`
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = root.into();
        self
    }

    /// Migrate every repository in order, a failure never stops the batch
    pub async fn migrate_repositories(&self, repos: &[Repo]) -> MigrationReport {
        let mut report = MigrationReport::default();
        let total = repos.len();
        for (index, repo) in repos.iter().enumerate() {
            let key = repo.display_key();
            info!("[{}/{}] Migrating {}", index + 1, total, key);
            let mut reached = MigrationState::Pending;
            let result = {
                let _workdir = WorkdirGuard::capture();
                self.migrate_repository(repo, &mut reached).await
            };
            let success = match result {
                Ok(()) => {
                    info!("Migrated {}", key);
                    true
                }
                Err(e) => {
                    error!("Failed to migrate {} (after: {}): {}", key, reached, e);
                    false
                }
            };
            report.outcomes.push(MigrationOutcome {
                key,
                success,
                reached,
            });
        }
        report
    }

    /// Move `state` forward
    fn advance(repo: &Repo, state: &mut MigrationState, next: MigrationState) {
        debug!("{}: {} -> {}", repo.display_key(), state, next);
        *state = next;
    }

    /// Run one `git` step, `Err` on non-zero exit
    async fn git_step(
        &self,
        step: &str,
        args: &[String],
        cwd: &Path,
        secret_url: &str,
    ) -> Result<(), GitMoverError> {
        let output = self.git.run(args, cwd).await?;
        if !output.success {
            return Err(transfer_error(step, &output, secret_url));
        }
        Ok(())
    }

    /// Drive one repository through the states
    async fn migrate_repository(
        &self,
        repo: &Repo,
        state: &mut MigrationState,
    ) -> Result<(), GitMoverError> {
        let target = repo.target_name();

        let created = self.destination.create_repository(repo, target).await?;
        if !created {
            return Err(GitMoverError::new(GitMoverErrorKind::Provider).with_text(&format!(
                "Repository {} could not be created on {}",
                target,
                self.destination.get_remote_url()
            )));
        }
        Self::advance(repo, state, MigrationState::DestinationCreated);

        let scratch = ScratchDir::new(&self.scratch_root, &repo.name)?;
        let mirror = scratch.path().join(format!("{}.git", repo.name));
        let clone_url = self.source.build_authenticated_clone_url(repo)?;
        let clone = git_args(&["clone", "--mirror", &clone_url, &mirror.to_string_lossy()]);
        info!("Cloning {} from {}", repo.full_name(), self.source.get_remote_url());
        self.git_step("clone", &clone, scratch.path(), &clone_url).await?;
        if !mirror.is_dir() {
            return Err(GitMoverError::new(GitMoverErrorKind::Transfer).with_text(&format!(
                "Mirror of {} missing after clone",
                repo.full_name()
            )));
        }
        Self::advance(repo, state, MigrationState::Cloned);

        let push_url = self.destination.build_authenticated_push_url(target)?;
        let remote = git_args(&["remote", "add", DESTINATION_REMOTE, &push_url]);
        self.git_step("remote add", &remote, &mirror, &push_url).await?;
        Self::advance(repo, state, MigrationState::RemoteAdded);

        info!("Pushing to {} on {}", target, self.destination.get_remote_url());
        let branches = git_args(&["push", "--all", DESTINATION_REMOTE]);
        self.git_step("push --all", &branches, &mirror, &push_url).await?;
        let tags = git_args(&["push", "--tags", DESTINATION_REMOTE]);
        if let Err(e) = self.git_step("push --tags", &tags, &mirror, &push_url).await {
            warn!("Tags of {} not pushed: {}", repo.display_key(), e);
        }
        Self::advance(repo, state, MigrationState::Pushed);
        Ok(())
    }
}
