use anyhow::{Context, Result};
use std::thread;
use tracing::{error, info, warn};

use crate::aggregate::{merge_contributors, AggregatedContributor};
use crate::cache::ContributorCache;
use crate::config::{Config, GitHubConfig};
use crate::error::FetchError;
use crate::github::{GitHubClient, RemoteContributor, Source};
use crate::retry::RetryPolicy;
use crate::time::{Clock, Sleeper, SystemClock, ThreadSleeper};

/// Fetches, merges, ranks and caches contributors of both repositories
pub struct ContributorAggregator {
    client: GitHubClient,
    framework_repo: String,
    skeleton_repo: String,
    cache: ContributorCache,
    retry: RetryPolicy,
    clock: Box<dyn Clock>,
    sleeper: Box<dyn Sleeper>,
}

impl ContributorAggregator {
    pub fn new(
        client: GitHubClient,
        github: &GitHubConfig,
        cache: ContributorCache,
        retry: RetryPolicy,
    ) -> Self {
        ContributorAggregator {
            client,
            framework_repo: github.repo_for(Source::Framework).to_string(),
            skeleton_repo: github.repo_for(Source::Skeleton).to_string(),
            cache,
            retry,
            clock: Box::new(SystemClock),
            sleeper: Box::new(ThreadSleeper),
        }
    }

    /// Build an aggregator with the real GitHub client and configured cache
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = GitHubClient::new(&config.github).context("Failed to create GitHub client")?;
        let cache = ContributorCache::from_config(&config.cache)?;

        Ok(ContributorAggregator::new(
            client,
            &config.github,
            cache,
            config.retry.policy(),
        ))
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Box<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn cache(&self) -> &ContributorCache {
        &self.cache
    }

    /// Ranked contributors: fresh cache, else a fresh fetch, else stale cache.
    ///
    /// Never fails; an empty result means the data is unknown.
    pub fn fetch_contributors(&self) -> Vec<AggregatedContributor> {
        if self.cache.is_available() {
            if let Some(cached) = self.cache.read(self.clock.now(), false) {
                info!("Serving {} contributors from cache", cached.len());
                return cached;
            }
        }

        self.refresh()
    }

    /// Skip the fresh-cache check and fetch from GitHub, keeping the stale
    /// fallback.
    pub fn refresh(&self) -> Vec<AggregatedContributor> {
        match self.fetch_fresh() {
            Ok(contributors) => {
                if self.cache.is_available() {
                    if let Err(e) = self.cache.write(self.clock.now(), &contributors) {
                        warn!("Error saving to cache: {}", e);
                    }
                }
                contributors
            }
            Err(e) => {
                error!("Error fetching contributors: {}", e);
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> Vec<AggregatedContributor> {
        if self.cache.is_available() {
            if let Some(cached) = self.cache.read(self.clock.now(), true) {
                info!("Returning {} cached contributors as fallback", cached.len());
                return cached;
            }
        }

        warn!("No contributor data available");
        Vec::new()
    }

    /// Fetch both sources concurrently and merge them
    fn fetch_fresh(&self) -> Result<Vec<AggregatedContributor>, FetchError> {
        let framework_repo = &self.framework_repo;
        let skeleton_repo = &self.skeleton_repo;

        let (framework, skeleton) = thread::scope(|scope| {
            let framework = scope.spawn(|| self.fetch_source(framework_repo));
            let skeleton = scope.spawn(|| self.fetch_source(skeleton_repo));

            (
                joined(framework_repo, framework.join()),
                joined(skeleton_repo, skeleton.join()),
            )
        });

        let framework = framework?;
        let skeleton = skeleton?;

        info!(
            "Fetched {} framework and {} skeleton contributors",
            framework.len(),
            skeleton.len()
        );

        Ok(merge_contributors(&framework, &skeleton))
    }

    /// Retrieve one repository's contributors under the retry policy
    fn fetch_source(&self, repo: &str) -> Result<Vec<RemoteContributor>, FetchError> {
        self.retry
            .run(self.sleeper.as_ref(), repo, |_| self.client.fetch_contributors(repo))
            .map_err(|last| FetchError::SourceExhausted {
                repo: repo.to_string(),
                attempts: self.retry.max_attempts(),
                last: Box::new(last),
            })
    }
}

/// A panicked retrieval counts as a failed fetch of that repository
fn joined<T>(
    repo: &str,
    result: thread::Result<Result<T, FetchError>>,
) -> Result<T, FetchError> {
    result.unwrap_or_else(|_| {
        error!("Retrieval of {} panicked", repo);
        Err(FetchError::Transport {
            url: repo.to_string(),
            message: "retrieval thread panicked".to_string(),
        })
    })
}
