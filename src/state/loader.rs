use crate::state::messages::{LoadRequest, LoadResponse};
use crate::state::snapshot::Snapshot;
use anyhow::Context;
use log::{debug, error, info};
use std::path::PathBuf;
use std::time::SystemTime;
use tokio::sync::mpsc;

pub const IDLE_CHAR: char = ' ';
pub const LOADING_CHAR: char = '⠿';
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: IDLE_CHAR }
    }
}

/// Reads the snapshot file on request and hands back a freshly built tree.
pub struct SnapshotWorker {
    path: PathBuf,
    requests: mpsc::Receiver<LoadRequest>,
    responses: mpsc::Sender<LoadResponse>,
    last_modified: Option<SystemTime>,
}

impl SnapshotWorker {
    pub fn new(
        path: PathBuf,
        requests: mpsc::Receiver<LoadRequest>,
        responses: mpsc::Sender<LoadResponse>,
    ) -> Self {
        Self { path, requests, responses, last_modified: None }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let LoadRequest::Reload { force } = request;

            let modified = tokio::fs::metadata(&self.path)
                .await
                .and_then(|m| m.modified())
                .ok();
            if !force && modified.is_some() && modified == self.last_modified {
                debug!("snapshot unchanged, skipping reload");
                continue;
            }

            self.set_loading(LoadingState { is_loading: true, spinner_char: LOADING_CHAR })
                .await;
            let result = self.handle_reload().await;
            let spinner_char = if result.is_ok() { IDLE_CHAR } else { ERROR_CHAR };
            self.set_loading(LoadingState { is_loading: false, spinner_char }).await;

            let response = match result {
                Ok(response) => {
                    self.last_modified = modified;
                    response
                }
                Err(err) => {
                    error!("snapshot load failed: {err:#}");
                    LoadResponse::Error { message: format!("{err:#}") }
                }
            };

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send load response: {e}");
                break;
            }
        }
    }

    async fn handle_reload(&self) -> anyhow::Result<LoadResponse> {
        debug!("loading bracket snapshot from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("could not read {}", self.path.display()))?;
        let snapshot = Snapshot::from_json(&content)?;
        let tree = snapshot.to_tree()?;
        info!(
            "loaded {} fixtures into a {}-slot bracket",
            snapshot.matches.len(),
            tree.first_round_len()
        );
        Ok(LoadResponse::SnapshotLoaded { snapshot, tree })
    }

    async fn set_loading(&self, loading_state: LoadingState) {
        let _ = self
            .responses
            .send(LoadResponse::LoadingStateChanged { loading_state })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_snapshot(tag: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("copatui-{tag}-{}.json", std::process::id()));
        std::fs::write(&path, content).expect("write snapshot");
        path
    }

    async fn next_payload(rx: &mut mpsc::Receiver<LoadResponse>) -> LoadResponse {
        loop {
            match rx.recv().await.expect("response") {
                LoadResponse::LoadingStateChanged { .. } => continue,
                other => return other,
            }
        }
    }

    #[tokio::test]
    async fn test_loads_and_skips_unchanged_file() {
        let path = temp_snapshot("ok", r#"{"name": "Copa", "bracket_size": 4}"#);
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(8);
        let worker = tokio::spawn(SnapshotWorker::new(path.clone(), req_rx, resp_tx).run());

        req_tx.send(LoadRequest::Reload { force: true }).await.expect("send");
        match next_payload(&mut resp_rx).await {
            LoadResponse::SnapshotLoaded { snapshot, tree } => {
                assert_eq!(snapshot.name, "Copa");
                assert_eq!(tree.slot_count(), 7);
            }
            other => panic!("unexpected response: {other:?}"),
        }

        // Unchanged file: the unforced reload is dropped, the forced one answers.
        req_tx.send(LoadRequest::Reload { force: false }).await.expect("send");
        req_tx.send(LoadRequest::Reload { force: true }).await.expect("send");
        assert!(matches!(
            resp_rx.recv().await,
            Some(LoadResponse::LoadingStateChanged { loading_state }) if loading_state.is_loading
        ));

        drop(req_tx);
        worker.await.expect("worker");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_reports_bad_snapshot() {
        let path = temp_snapshot("bad", r#"{"bracket_size": 6}"#);
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(8);
        let worker = tokio::spawn(SnapshotWorker::new(path.clone(), req_rx, resp_tx).run());

        req_tx.send(LoadRequest::Reload { force: true }).await.expect("send");
        match next_payload(&mut resp_rx).await {
            LoadResponse::Error { message } => assert!(message.contains("power of two"), "{message}"),
            other => panic!("unexpected response: {other:?}"),
        }

        drop(req_tx);
        worker.await.expect("worker");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_reports_missing_file() {
        let (req_tx, req_rx) = mpsc::channel(8);
        let (resp_tx, mut resp_rx) = mpsc::channel(8);
        let missing = std::env::temp_dir().join("copatui-definitely-missing.json");
        let worker = tokio::spawn(SnapshotWorker::new(missing, req_rx, resp_tx).run());

        req_tx.send(LoadRequest::Reload { force: false }).await.expect("send");
        assert!(matches!(next_payload(&mut resp_rx).await, LoadResponse::Error { .. }));

        drop(req_tx);
        worker.await.expect("worker");
    }
}
