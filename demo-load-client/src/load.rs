use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use user_token::{LoginRequest, hash_password};

use crate::client::ApiClient;
use crate::report::{LoadReport, Sample};

/// What a load run sends
#[derive(Debug, Clone)]
pub(crate) struct LoadPlan {
    pub(crate) requests: usize,
    pub(crate) concurrency: usize,
    /// Logins cycle through `user1..=user{users}`
    pub(crate) users: usize,
    /// Send every login as this username instead, for servers with a load test bypass
    pub(crate) load_test_user: Option<String>,
}

impl LoadPlan {
    pub(crate) fn request_for(&self, index: usize) -> LoginRequest {
        match &self.load_test_user {
            Some(username) => LoginRequest {
                user_name: username.clone(),
                hashed_password: username.clone(),
            },
            None => {
                let i = index % self.users.max(1) + 1;
                LoginRequest {
                    user_name: format!("user{i}@example.com"),
                    hashed_password: hash_password(&format!("password{i}")),
                }
            }
        }
    }
}

/// Fire `plan.requests` logins with at most `plan.concurrency` in flight
pub(crate) async fn run(client: &ApiClient, plan: &LoadPlan) -> LoadReport {
    let permits = Arc::new(Semaphore::new(plan.concurrency.max(1)));
    let mut tasks = JoinSet::new();
    let started = Instant::now();

    for index in 0..plan.requests {
        // The semaphore is never closed
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let client = client.clone();
        let request = plan.request_for(index);

        tasks.spawn(async move {
            let _permit = permit;
            let sent = Instant::now();
            let success = match client.login(&request).await {
                Ok(response) => response.success && response.user_id.is_some(),
                Err(e) => {
                    tracing::debug!(index, error = %e, "Login request failed");
                    false
                }
            };
            Sample {
                success,
                latency: sent.elapsed(),
            }
        });
    }

    let mut samples = Vec::with_capacity(plan.requests);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(sample) => samples.push(sample),
            Err(e) => tracing::warn!(error = %e, "Load task did not finish"),
        }
    }

    LoadReport::from_samples(plan.requests, started.elapsed(), &samples)
}
