// Circle exercise: lays out the pieces a student has to wire together

use anyhow::{bail, Result};
use ghbridge_core::api::components::created_id;
use ghbridge_core::{BridgeResult, ComponentId, GrasshopperClient};

pub const INSTRUCTIONS: &str = "Exercise:\n\
    1. Connect XY Plane -> Circle (Plane)\n\
    2. Connect Slider -> Circle (Radius)\n\
    3. Move the slider and watch the circle change";

const INITIAL_RADIUS: &str = "10";

/// Ids of the components placed on the canvas, `None` where creation failed.
#[derive(Debug, Default)]
pub struct Exercise {
    pub slider: Option<ComponentId>,
    pub plane: Option<ComponentId>,
    pub circle: Option<ComponentId>,
    pub panel: Option<ComponentId>,
    pub failures: Vec<String>,
}

pub async fn run(client: &GrasshopperClient) -> Result<()> {
    println!("Creating circle exercise on {}", client.endpoint());
    let exercise = build(client).await;

    if exercise.failures.is_empty() {
        println!("\nExercise created, check the Grasshopper canvas");
        Ok(())
    } else {
        bail!("{} step(s) failed", exercise.failures.len())
    }
}

pub async fn build(client: &GrasshopperClient) -> Exercise {
    let mut exercise = Exercise::default();

    exercise.slider = place(client, &mut exercise.failures, "Radius slider", "slider", 100.0, 100.0).await;
    if let Some(slider) = &exercise.slider {
        let outcome = client.components().set_value(slider, INITIAL_RADIUS).await;
        report(&mut exercise.failures, "Initial radius", outcome.map(|_| INITIAL_RADIUS.to_string()));
    }
    client.pause().await;

    exercise.plane = place(client, &mut exercise.failures, "XY plane", "xy plane", 100.0, 200.0).await;
    client.pause().await;

    exercise.circle = place(client, &mut exercise.failures, "Circle", "circle", 400.0, 150.0).await;
    client.pause().await;

    exercise.panel = place(client, &mut exercise.failures, "Instruction panel", "panel", 650.0, 100.0).await;
    if let Some(panel) = &exercise.panel {
        let outcome = client.components().set_value(panel, INSTRUCTIONS).await;
        report(&mut exercise.failures, "Instructions", outcome.map(|_| "set".to_string()));
    }

    exercise
}

async fn place(
    client: &GrasshopperClient,
    failures: &mut Vec<String>,
    label: &str,
    component_type: &str,
    x: f64,
    y: f64,
) -> Option<ComponentId> {
    let outcome = client.components().add(component_type, x, y).await;
    let id = match outcome {
        Ok(data) => created_id(&data),
        Err(e) => {
            report(failures, label, Err(e));
            return None;
        }
    };

    match id {
        Some(id) => {
            println!("  [ok] {}: {}...", label, id.short());
            Some(id)
        }
        None => {
            println!("  [ok] {}: created, no id returned", label);
            None
        }
    }
}

fn report(failures: &mut Vec<String>, label: &str, outcome: BridgeResult<String>) {
    match outcome {
        Ok(detail) => println!("  [ok] {}: {}", label, detail),
        Err(e) => {
            println!("  [failed] {}: {}", label, e);
            failures.push(format!("{}: {}", label, e));
        }
    }
}
