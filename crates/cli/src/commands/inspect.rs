// Raw access and quick looks at the host

use super::type_table;
use anyhow::{bail, Context, Result};
use ghbridge_core::document::DocumentInfo;
use ghbridge_core::{GrasshopperClient, Params};
use serde_json::Value;
use std::fmt::Write;

/// Send `command` with a JSON object of parameters and print whatever comes back.
///
/// Failures are printed in the `{"success": false, "error": ...}` shape.
pub async fn send(client: &GrasshopperClient, command: &str, params: &str) -> Result<()> {
    let params = parse_params(params)?;
    let response = client.send_command(command, params).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn parse_params(text: &str) -> Result<Params> {
    let value: Value = serde_json::from_str(text).context("Parameters must be valid JSON")?;
    match value {
        Value::Object(map) => Ok(Params::from(map)),
        other => bail!("Parameters must be a JSON object, got {}", other),
    }
}

pub async fn status(client: &GrasshopperClient) -> Result<()> {
    let endpoint = client.endpoint();
    if client.probe(client.config().connect_timeout()).await {
        println!("connected: {}", endpoint);
        Ok(())
    } else {
        bail!("Grasshopper is not reachable at {}", endpoint)
    }
}

pub async fn info(client: &GrasshopperClient) -> Result<()> {
    let info = client
        .document()
        .info()
        .await
        .context("Failed to read document info")?;
    print!("{}", describe(&info));
    Ok(())
}

fn describe(info: &DocumentInfo) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Document: {}", info.name);
    let _ = writeln!(text, "Components: {}", info.component_count);

    if !info.components.is_empty() {
        text.push_str("\nFirst components:\n");
        for (i, component) in info.components.iter().take(5).enumerate() {
            let _ = writeln!(
                text,
                "  {}. {} (ID: {}...)",
                i + 1,
                component.component_type,
                component.id.short()
            );
        }
        text.push_str("\nComponent types:\n");
        text.push_str(&type_table(&info.snapshot(), 10));
    }
    text
}
