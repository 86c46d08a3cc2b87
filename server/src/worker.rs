use anyhow::{anyhow, Result};
use linuxmap_core::protocol::{Request, Response};
use linuxmap_core::SearchEngine;
use tokio::sync::{mpsc, oneshot};

const QUEUE_DEPTH: usize = 64;

struct Job {
    request: Request,
    reply: oneshot::Sender<Response>,
}

/// Handle to the search worker: one OS thread that owns the engine and
/// answers requests strictly in arrival order. An INIT queued ahead of a
/// SEARCH is therefore fully applied before the search runs.
#[derive(Clone)]
pub struct WorkerHandle {
    tx: mpsc::Sender<Job>,
}

impl WorkerHandle {
    pub fn spawn(engine: SearchEngine) -> Result<Self> {
        let (tx, mut rx) = mpsc::channel::<Job>(QUEUE_DEPTH);
        std::thread::Builder::new()
            .name("search-worker".into())
            .spawn(move || {
                let mut engine = engine;
                while let Some(job) = rx.blocking_recv() {
                    let kind = job.request.kind();
                    let response = engine.handle(job.request);
                    if job.reply.send(response).is_err() {
                        tracing::debug!(kind, "requester went away before the reply");
                    }
                }
                tracing::info!("search worker stopped");
            })?;
        Ok(Self { tx })
    }

    pub async fn call(&self, request: Request) -> Result<Response> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Job { request, reply })
            .await
            .map_err(|_| anyhow!("search worker is not running"))?;
        rx.await.map_err(|_| anyhow!("search worker dropped the request"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linuxmap_core::protocol::{InitData, SearchData};
    use linuxmap_core::EngineConfig;

    #[tokio::test]
    async fn queued_init_is_visible_to_the_next_search() {
        let worker = WorkerHandle::spawn(SearchEngine::new(EngineConfig::default())).unwrap();
        let nodes = serde_json::from_value(serde_json::json!([{"name": "Kernel"}])).unwrap();

        let w = worker.clone();
        let init = tokio::spawn(async move { w.call(Request::Init(InitData { nodes })).await });
        init.await.unwrap().unwrap();

        let res = worker
            .call(Request::Search(SearchData { query: "kern".into(), seq: Some(1) }))
            .await
            .unwrap();
        match res {
            Response::SearchResults(r) => {
                assert_eq!(r.seq, Some(1));
                assert_eq!(r.results[0].node.name, "Kernel");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
