use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::api::FixtureApi;
use crate::state::{Delta, LoadRequest, Payload, ProviderCommand};

/// Runs load requests off the UI thread. Each request is handed to a small
/// pool so that independent sections load in parallel; results come back as
/// `Delta::Loaded` in completion order, which may differ from issue order.
///
/// The thread exits once every command sender has been dropped.
pub fn spawn_provider(
    api: Arc<dyn FixtureApi>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
    parallelism: usize,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let pool = build_fetch_pool(parallelism);
        for cmd in cmd_rx {
            match cmd {
                ProviderCommand::Load(ticket) => {
                    let api = api.clone();
                    let tx = tx.clone();
                    let job = move || {
                        let result = execute(api.as_ref(), &ticket.request);
                        let _ = tx.send(Delta::Loaded { ticket, result });
                    };
                    if let Some(pool) = pool.as_ref() {
                        pool.spawn(job);
                    } else {
                        thread::spawn(job);
                    }
                }
            }
        }
        debug!("provider command channel closed");
    })
}

/// Performs one request. Errors are flattened to text; the views only need
/// to know that the load failed.
pub fn execute(api: &dyn FixtureApi, request: &LoadRequest) -> Result<Payload, String> {
    let result = match request {
        LoadRequest::Live => api.live().map(|r| Payload::Fixtures(r.fixtures)),
        LoadRequest::Today => api.fixtures_today().map(|r| Payload::Fixtures(r.fixtures)),
        LoadRequest::Tomorrow => api.fixtures_tomorrow().map(|r| Payload::Fixtures(r.fixtures)),
        LoadRequest::Date(date) => api.fixtures_on(*date).map(|r| Payload::Fixtures(r.fixtures)),
        LoadRequest::Upcoming { days } => api.upcoming(*days).map(|r| Payload::Schedule(r.schedule)),
        LoadRequest::MatchDetail(id) => api.match_detail(*id).map(Payload::Detail),
    };
    result.map_err(|err| {
        warn!("{request:?} failed: {err}");
        err.to_string()
    })
}

fn build_fetch_pool(parallelism: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism.clamp(1, 16))
        .thread_name(|idx| format!("goals-fetch-{idx}"))
        .build()
        .ok()
}
