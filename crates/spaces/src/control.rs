//! Inbound control requests from external tools.

use serde::Deserialize;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{Error, Result, SpaceManager, model::Slot};

/// Requested action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Restore,
    Clear,
}

/// `{"action": "restore" | "clear", "spaceNumber": N}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequest {
    pub action: ControlAction,
    pub space_number: Slot,
}

impl ControlRequest {
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ControlParse(e.to_string()))
    }
}

/// Route requests from `rx` into `manager` until the channel closes or
/// `cancel` fires. Restores run under a child of `cancel`, so cancelling stops
/// a restore before its next window.
pub fn spawn_control_loop(
    manager: SpaceManager,
    mut rx: mpsc::Receiver<ControlRequest>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let req = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("control: cancelled");
                    break;
                }
                req = rx.recv() => match req {
                    Some(req) => req,
                    None => break,
                },
            };
            info!("control: {:?} slot={}", req.action, req.space_number);
            let result = match req.action {
                ControlAction::Restore => manager
                    .restore(req.space_number, cancel.child_token())
                    .await
                    .map(|_| ()),
                ControlAction::Clear => manager.clear(req.space_number).await.map(|_| ()),
            };
            if let Err(err) = result {
                warn!("control: {:?} slot={} failed: {}", req.action, req.space_number, err);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_restore_and_clamps_slot() {
        let req = ControlRequest::parse(r#"{"action":"restore","spaceNumber":12}"#).unwrap();
        assert_eq!(req.action, ControlAction::Restore);
        assert_eq!(req.space_number, Slot::new(9));
    }

    #[test]
    fn rejects_unknown_action() {
        assert!(matches!(
            ControlRequest::parse(r#"{"action":"explode","spaceNumber":1}"#),
            Err(Error::ControlParse(_))
        ));
    }
}
