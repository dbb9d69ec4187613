pub mod exercise;
pub mod grade;
pub mod inspect;
pub mod smoke;

use anyhow::{Context, Result};
use ghbridge_core::document::DocumentSnapshot;
use ghbridge_core::GrasshopperClient;
use std::path::Path;

/// Snapshot from a file when given, otherwise from the live document.
pub async fn load_snapshot(
    client: &GrasshopperClient,
    path: Option<&Path>,
) -> Result<DocumentSnapshot> {
    match path {
        Some(path) => DocumentSnapshot::load(path)
            .with_context(|| format!("Failed to load snapshot {}", path.display())),
        None => {
            let info = client
                .document()
                .info()
                .await
                .with_context(|| format!("Failed to read document from {}", client.endpoint()))?;
            Ok(info.snapshot())
        }
    }
}

/// Type counts, most frequent first.
pub fn type_table(snapshot: &DocumentSnapshot, limit: usize) -> String {
    snapshot
        .top_types(limit)
        .into_iter()
        .map(|(component_type, count)| format!("  {}: {}\n", component_type, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghbridge_core::testing::ScriptedTransport;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_live_snapshot() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .reply(json!({
                "success": true,
                "data": {
                    "name": "exercise.gh",
                    "componentCount": 3,
                    "components": [
                        {"id": "a", "type": "GH_NumberSlider"},
                        {"id": "b", "type": "GH_NumberSlider"},
                        {"id": "c", "type": "GH_Panel"}
                    ]
                }
            }))
            .await;
        let client = GrasshopperClient::builder().transport(transport).build().unwrap();

        let snapshot = load_snapshot(&client, None).await.unwrap();
        assert_eq!(snapshot.document_name, "exercise.gh");
        assert_eq!(type_table(&snapshot, 10), "  GH_NumberSlider: 2\n  GH_Panel: 1\n");
    }

    #[tokio::test]
    async fn test_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(
            &path,
            r#"{"document_name": "saved", "total_components": 12, "component_types": {"GH_Panel": 12}}"#,
        )
        .unwrap();

        let client = GrasshopperClient::builder()
            .transport(Arc::new(ScriptedTransport::new()))
            .build()
            .unwrap();
        let snapshot = load_snapshot(&client, Some(&path)).await.unwrap();
        assert_eq!(snapshot.total_components, 12);
        assert_eq!(type_table(&snapshot, 1), "  GH_Panel: 12\n");
    }
}
