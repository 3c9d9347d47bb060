//! `vpnctl serve`: JSON-lines transport adapter.
//!
//! One request object per stdin line:
//! `{"id": any?, "channel": str, "method": str, "args": any?}`.
//! Each request gets exactly one response line, `{"id", "result"}` or
//! `{"id", "error": {"code", "message"}}`. The pseudo-methods `listen`
//! and `cancel` on an event channel attach and detach the observer;
//! its events are written as `{"event": channel, "value": any}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use vpnctl_core::{Controller, CoreConfig, CoreError, EventSubscription, channel};
use vpnctl_config as config;

use super::config_cmd::resolve_path;
use crate::cli::{GlobalOpts, ServeArgs};
use crate::error::CliError;

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    channel: String,
    method: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Outgoing {
    Result {
        id: Value,
        result: Value,
    },
    Error {
        id: Value,
        error: ErrorBody,
    },
    Event {
        event: &'static str,
        value: Value,
    },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl Outgoing {
    fn error(id: Value, code: &'static str, message: impl Into<String>) -> Self {
        Self::Error {
            id,
            error: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    fn from_core(id: Value, err: &CoreError) -> Self {
        Self::error(id, err.code(), err.to_string())
    }
}

// ── Config ──────────────────────────────────────────────────────────

fn core_config(args: &ServeArgs, global: &GlobalOpts) -> Result<CoreConfig, CliError> {
    let path = resolve_path(global);
    let mut cfg = config::load_config(Some(&path)).map_err(|e| CliError::config(&path, e))?;
    if let Some(delay) = args.connect_delay_ms {
        cfg.core.connect_delay_ms = delay;
    }
    if args.no_seed {
        cfg.core.seed_mock_data = false;
    }
    cfg.to_core_config().map_err(|e| CliError::config(&path, e))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: &ServeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let controller = Controller::new(core_config(args, global)?)?;
    info!("serving on stdin/stdout");

    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_lines(rx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = dispatch(&controller, &line, &tx);
        if tx.send(response).is_err() {
            break;
        }
    }

    // Detaching both observers ends the forwarding tasks, which drops
    // their senders and lets the writer drain and exit.
    controller.unsubscribe_state();
    controller.unsubscribe_query_log();
    controller.connection().shutdown();
    drop(tx);

    match writer.await {
        Ok(result) => result?,
        Err(e) => warn!(error = %e, "writer task failed"),
    }
    info!("input closed, shutting down");
    Ok(())
}

fn dispatch(controller: &Controller, line: &str, tx: &mpsc::UnboundedSender<Outgoing>) -> Outgoing {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "unparseable request line");
            return Outgoing::error(Value::Null, "bad-request", e.to_string());
        }
    };
    let Request {
        id,
        channel,
        method,
        args,
    } = request;

    match method.as_str() {
        "listen" if is_event_channel(&channel) => match controller.listen(&channel) {
            Ok(subscription) => {
                tokio::spawn(forward_events(subscription, tx.clone()));
                Outgoing::Result {
                    id,
                    result: Value::Null,
                }
            }
            Err(e) => Outgoing::from_core(id, &e),
        },
        "cancel" if is_event_channel(&channel) => match controller.cancel(&channel) {
            Ok(_) => Outgoing::Result {
                id,
                result: Value::Null,
            },
            Err(e) => Outgoing::from_core(id, &e),
        },
        _ => match controller.call(&channel, &method, args) {
            Ok(result) => Outgoing::Result { id, result },
            Err(e) => {
                debug!(channel = %channel, method = %method, error = %e, "call failed");
                Outgoing::from_core(id, &e)
            }
        },
    }
}

fn is_event_channel(name: &str) -> bool {
    matches!(name, channel::STATE_EVENTS | channel::QUERY_LOG_EVENTS)
}

async fn forward_events(mut subscription: EventSubscription, tx: mpsc::UnboundedSender<Outgoing>) {
    let event = subscription.channel();
    debug!(channel = event, "forwarding events");
    while let Some(value) = subscription.next_value().await {
        if tx.send(Outgoing::Event { event, value }).is_err() {
            break;
        }
    }
    debug!(channel = event, "event forwarding ended");
}

/// Single writer so response and event lines never interleave.
async fn write_lines(mut rx: mpsc::UnboundedReceiver<Outgoing>) -> Result<(), CliError> {
    let mut stdout = tokio::io::stdout();
    while let Some(message) = rx.recv().await {
        let mut line = serde_json::to_vec(&message)?;
        line.push(b'\n');
        stdout.write_all(&line).await?;
        stdout.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn line(message: &Outgoing) -> String {
        serde_json::to_string(message).unwrap()
    }

    #[test]
    fn outgoing_shapes() {
        assert_eq!(
            line(&Outgoing::Result {
                id: json!(7),
                result: json!(0)
            }),
            r#"{"id":7,"result":0}"#
        );
        assert_eq!(
            line(&Outgoing::error(json!("a"), "bad-args", "id required")),
            r#"{"id":"a","error":{"code":"bad-args","message":"id required"}}"#
        );
        assert_eq!(
            line(&Outgoing::Event {
                event: channel::STATE_EVENTS,
                value: json!(2)
            }),
            r#"{"event":"vpn_plugin_event_channel","value":2}"#
        );
    }

    #[tokio::test]
    async fn dispatch_routes_calls_and_reports_errors() {
        let controller = Controller::new(CoreConfig::empty()).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();

        let ok = dispatch(
            &controller,
            r#"{"id":1,"channel":"ivpn_manager","method":"getCurrentState"}"#,
            &tx,
        );
        assert_eq!(line(&ok), r#"{"id":1,"result":0}"#);

        let bad = dispatch(&controller, "not json", &tx);
        assert!(line(&bad).contains(r#""code":"bad-request""#));

        let missing = dispatch(
            &controller,
            r#"{"id":2,"channel":"servers_manager","method":"removeServer"}"#,
            &tx,
        );
        assert!(line(&missing).contains(r#""code":"bad-args""#));
    }

    #[tokio::test]
    async fn listen_forwards_replayed_state() {
        let controller = Controller::new(CoreConfig::empty()).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let ack = dispatch(
            &controller,
            r#"{"id":1,"channel":"vpn_plugin_event_channel","method":"listen"}"#,
            &tx,
        );
        assert_eq!(line(&ack), r#"{"id":1,"result":null}"#);

        let event = rx.recv().await.unwrap();
        assert_eq!(line(&event), r#"{"event":"vpn_plugin_event_channel","value":0}"#);
    }
}
