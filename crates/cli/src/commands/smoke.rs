// Smoke-test sequences against a live host

use anyhow::{bail, Result};
use clap::ValueEnum;
use ghbridge_core::api::components::created_id;
use ghbridge_core::api::{AddComponent, ConnectRequest};
use ghbridge_core::{BridgeResult, ComponentId, GrasshopperClient};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SmokeSuite {
    /// Commands every host supports
    Basic,
    /// Advanced creation, inspection and slider control
    Enhanced,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Passed(String),
    Failed(String),
    Skipped(String),
}

#[derive(Debug, Clone)]
pub struct Step {
    pub name: &'static str,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct SmokeReport {
    pub steps: Vec<Step>,
}

impl SmokeReport {
    fn record<T>(
        &mut self,
        name: &'static str,
        outcome: BridgeResult<T>,
        detail: impl FnOnce(&T) -> String,
    ) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.push(name, Outcome::Passed(detail(&value)));
                Some(value)
            }
            Err(e) => {
                self.push(name, Outcome::Failed(e.to_string()));
                None
            }
        }
    }

    fn skip(&mut self, name: &'static str, reason: &str) {
        self.push(name, Outcome::Skipped(reason.to_string()));
    }

    fn push(&mut self, name: &'static str, outcome: Outcome) {
        let step = Step { name, outcome };
        println!("{}", step);
        self.steps.push(step);
    }

    pub fn failed(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, Outcome::Failed(_)))
            .count()
    }

    pub fn passed(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, Outcome::Passed(_)))
            .count()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Passed(detail) => write!(f, "[pass] {}: {}", self.name, detail),
            Outcome::Failed(error) => write!(f, "[FAIL] {}: {}", self.name, error),
            Outcome::Skipped(reason) => write!(f, "[skip] {}: {}", self.name, reason),
        }
    }
}

pub async fn run(client: &GrasshopperClient, suite: SmokeSuite) -> Result<()> {
    println!("Running {:?} smoke test against {}", suite, client.endpoint());
    let report = match suite {
        SmokeSuite::Basic => basic(client).await,
        SmokeSuite::Enhanced => enhanced(client).await,
    };

    println!(
        "\n{} passed, {} failed, {} skipped",
        report.passed(),
        report.failed(),
        report.steps.len() - report.passed() - report.failed()
    );
    if report.failed() > 0 {
        bail!("{} smoke step(s) failed", report.failed());
    }
    Ok(())
}

pub async fn basic(client: &GrasshopperClient) -> SmokeReport {
    let mut report = SmokeReport::default();

    let info = client.document().info().await;
    report.record("document info", info, |info| {
        format!("{} ({} components)", info.name, info.component_count)
    });
    client.pause().await;

    let slider = add_basic(client, &mut report, "add slider", "slider", 100.0).await;
    client.pause().await;

    let panel = add_basic(client, &mut report, "add panel", "panel", 300.0).await;
    client.pause().await;

    match (slider, panel) {
        (Some(slider), Some(panel)) => {
            let connected = client
                .topology()
                .connect(&ConnectRequest::new(slider, panel))
                .await;
            report.record("connect slider to panel", connected, |_| "connected".to_string());
            client.pause().await;
        }
        _ => report.skip("connect slider to panel", "no component ids"),
    }

    let info = client.document().info().await;
    report.record("analyze document", info, |info| {
        let count = |needle: &str| {
            info.components
                .iter()
                .filter(|c| c.component_type.contains(needle))
                .count()
        };
        format!("{} slider(s), {} panel(s)", count("Slider"), count("Panel"))
    });

    report
}

async fn add_basic(
    client: &GrasshopperClient,
    report: &mut SmokeReport,
    name: &'static str,
    component_type: &str,
    x: f64,
) -> Option<ComponentId> {
    let added = client.components().add(component_type, x, 100.0).await;
    report
        .record(name, added, |data| match created_id(data) {
            Some(id) => format!("id {}", id),
            None => "created".to_string(),
        })
        .and_then(|data| created_id(&data))
}

pub async fn enhanced(client: &GrasshopperClient) -> SmokeReport {
    let mut report = SmokeReport::default();

    if client.probe(PROBE_TIMEOUT).await {
        report.push("connection", Outcome::Passed(client.endpoint()));
    } else {
        report.push(
            "connection",
            Outcome::Failed(format!(
                "cannot reach {}; is Grasshopper open with the MCP component on the canvas?",
                client.endpoint()
            )),
        );
        return report;
    }
    client.pause().await;

    enhanced_steps(client, &mut report).await;
    report
}

async fn enhanced_steps(client: &GrasshopperClient, report: &mut SmokeReport) {
    let info = client.document().info().await;
    report.record("document info", info, |info| {
        format!("{} ({} components)", info.name, info.component_count)
    });
    client.pause().await;

    let slider = AddComponent::new("GH_NumberSlider", 100.0, 100.0).initial_params(
        json!({"min": 0, "max": 100, "value": 50, "name": "Test Slider"})
            .as_object()
            .cloned()
            .unwrap_or_default(),
    );
    let added = client.components().add_advanced(&slider).await;
    let slider_id = report
        .record("add slider (advanced)", added, |data| match created_id(data) {
            Some(id) => format!("id {}", id),
            None => "created".to_string(),
        })
        .and_then(|data| created_id(&data));
    client.pause().await;

    match &slider_id {
        Some(id) => {
            let details = client.components().details(id).await;
            report.record("component details", details, |data| {
                format!(
                    "type {}, name {}",
                    data.get("type").cloned().unwrap_or_default(),
                    data.get("name").cloned().unwrap_or_default()
                )
            });
            client.pause().await;

            let set = client.values().set_slider(id, 75.5).await;
            report.record("set slider value", set, |_| "75.5".to_string());
            client.pause().await;
        }
        None => {
            report.skip("component details", "no slider id");
            report.skip("set slider value", "no slider id");
        }
    }

    let found = client.components().find_by_type("GH_NumberSlider").await;
    let sliders = report
        .record("find sliders", found, |ids| format!("{} slider(s)", ids.len()))
        .unwrap_or_default();
    client.pause().await;

    if sliders.is_empty() {
        report.skip("batch set sliders", "no sliders");
        return;
    }

    let values: BTreeMap<ComponentId, f64> = sliders
        .into_iter()
        .take(3)
        .enumerate()
        .map(|(i, id)| (id, 10.0 + 20.0 * i as f64))
        .collect();
    let batch = client.values().batch_set_sliders(&values).await;
    report.record("batch set sliders", batch, |_| format!("{} slider(s) updated", values.len()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghbridge_core::testing::ScriptedTransport;
    use std::sync::Arc;

    fn client(transport: Arc<ScriptedTransport>) -> GrasshopperClient {
        GrasshopperClient::builder()
            .command_delay(Duration::ZERO)
            .transport(transport)
            .build()
            .unwrap()
    }

    fn document(components: serde_json::Value) -> serde_json::Value {
        let count = components.as_array().map(Vec::len).unwrap_or(0);
        json!({
            "success": true,
            "data": {"name": "smoke.gh", "componentCount": count, "components": components}
        })
    }

    #[tokio::test]
    async fn test_basic_suite() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(document(json!([]))).await;
        transport.reply(json!({"success": true, "data": {"id": "s1"}})).await;
        transport.reply(json!({"success": true, "data": {"id": "p1"}})).await;
        transport.reply(json!({"success": true})).await;
        transport
            .reply(document(json!([
                {"id": "s1", "type": "GH_NumberSlider"},
                {"id": "p1", "type": "GH_Panel"}
            ])))
            .await;

        let report = basic(&client(transport.clone())).await;
        assert_eq!(report.failed(), 0);
        assert_eq!(report.passed(), 5);
        assert_eq!(
            report.steps[4].outcome,
            Outcome::Passed("1 slider(s), 1 panel(s)".to_string())
        );

        let connect = &transport.requests().await[3];
        assert_eq!(connect.command, "connect_components");
        assert_eq!(connect.parameters["sourceId"], json!("s1"));
        assert_eq!(connect.parameters["targetId"], json!("p1"));
    }

    #[tokio::test]
    async fn test_basic_suite_skips_connect_without_ids() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(document(json!([]))).await;
        transport.reply(json!({"success": true, "data": {}})).await;
        transport.reply(json!({"success": false, "error": "boom"})).await;
        transport.reply(document(json!([]))).await;

        let report = basic(&client(transport)).await;
        assert_eq!(report.failed(), 1);
        assert!(matches!(report.steps[3].outcome, Outcome::Skipped(_)));
    }

    #[tokio::test]
    async fn test_enhanced_steps() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.reply(document(json!([]))).await;
        transport.reply(json!({"success": true, "data": {"componentId": "s1"}})).await;
        transport
            .reply(json!({"success": true, "data": {"type": "GH_NumberSlider", "name": "Test Slider"}}))
            .await;
        transport.reply(json!({"success": true})).await;
        transport.reply(json!({"success": true, "data": ["s1", "s2"]})).await;
        transport.reply(json!({"success": true})).await;

        let mut report = SmokeReport::default();
        enhanced_steps(&client(transport.clone()), &mut report).await;
        assert_eq!(report.failed(), 0);
        assert_eq!(report.passed(), 6);

        let requests = transport.requests().await;
        assert_eq!(requests[1].parameters["initialParams"]["name"], json!("Test Slider"));
        assert_eq!(requests[3].parameters["value"], json!(75.5));
        assert_eq!(
            requests[5].parameters["sliderValues"],
            json!({"s1": 10.0, "s2": 30.0})
        );
    }

    #[tokio::test]
    async fn test_enhanced_stops_when_unreachable() {
        let port = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = Arc::new(ScriptedTransport::new());
        let client = GrasshopperClient::builder()
            .host("127.0.0.1")
            .port(port)
            .transport(transport.clone())
            .build()
            .unwrap();

        let report = enhanced(&client).await;
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.failed(), 1);
        assert!(transport.requests().await.is_empty());
    }
}
