use axum::extract::FromRef;

use crate::job_store::JobStore;
use crate::user::UserManager;
use std::sync::{Arc, Mutex};

use super::ServerConfig;

pub type GuardedJobStore = Arc<dyn JobStore>;
pub type GuardedUserManager = Arc<Mutex<UserManager>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub job_store: GuardedJobStore,
    pub user_manager: GuardedUserManager,
}

impl FromRef<ServerState> for GuardedJobStore {
    fn from_ref(input: &ServerState) -> Self {
        input.job_store.clone()
    }
}

impl FromRef<ServerState> for GuardedUserManager {
    fn from_ref(input: &ServerState) -> Self {
        input.user_manager.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
