use std::sync::Arc;

use server_api::SessionController;
use tokio::sync::Mutex;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) session: SessionController,
    /// Serializes submissions within this process so git commands never
    /// interleave in one checkout. Other processes are not covered.
    pub(crate) submit_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub(crate) fn new(session: SessionController) -> Self {
        Self {
            session,
            submit_lock: Arc::new(Mutex::new(())),
        }
    }
}
