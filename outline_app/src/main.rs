//! Outline demo application
//!
//! Builds a small scene, selects one model, renders a frame into a
//! recording context and reports what the renderer chain did. A click at
//! the centre of the viewport is then resolved through the picker.
//!
//! Usage: `outline_demo [config.toml|config.ron]`

use simplicity_engine::foundation::logging;
use simplicity_engine::prelude::*;
use simplicity_engine::render::{Capabilities, RecordedCommand, StencilFunction};

fn build_scene() -> Result<(SceneGraph, NodeKey, NodeKey), SceneError> {
    let mut graph = SceneGraph::new();

    let table = graph.create_model_node(
        Mat4::new_translation(&Vec3::new(0.0, -1.0, 0.0)),
        Model::cube("table", 2.0, Colour::rgb(0.6, 0.4, 0.2)),
    );
    let teapot = graph.create_model_node(
        Mat4::new_translation(&Vec3::new(0.0, 1.5, 0.0)) * Mat4::rotation_y(0.5),
        Model::cube("teapot", 1.0, Colour::rgb(0.8, 0.7, 0.5)),
    );
    let lamp = graph.create_model_node(
        Mat4::new_translation(&Vec3::new(3.0, 0.0, 0.0)),
        Model::cube("lamp", 0.5, Colour::rgb(0.9, 0.9, 0.6)),
    );
    graph.add_child(table, teapot)?;
    graph.add_subgraph(table)?;
    graph.add_subgraph(lamp)?;

    // Raised and pitched down so the camera looks at the origin
    let eye = graph.create_node(
        Mat4::new_translation(&Vec3::new(0.0, 2.0, 10.0)) * Mat4::rotation_x(-(0.2_f32).atan()),
    );
    graph.add_subgraph(eye)?;

    Ok((graph, teapot, eye))
}

fn load_config() -> Result<ApplicationConfig, ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => ApplicationConfig::load_from_file(path)?,
        None => ApplicationConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_level(&config.engine.log_level);
    log::info!("Starting outline demo");

    let (graph, teapot, eye) = build_scene()?;
    let mut scene = SceneManager::new(graph, Camera::new(eye, Projection::default()), &config);
    scene.select(teapot, SelectionMode::Replace)?;

    let mut ctx = RecordingContext::new();
    let stats = scene.render_frame(&mut ctx)?;
    log::info!(
        "Frame: {} nodes visited, {} models drawn, {} outlined",
        stats.nodes_visited,
        stats.models_drawn,
        stats.models_outlined
    );

    for command in ctx.commands() {
        match command {
            RecordedCommand::Clear(buffers) => log::info!("  clear {buffers:?}"),
            RecordedCommand::Draw(draw) => {
                let stencilled = draw.capabilities.contains(Capabilities::STENCIL_TEST);
                let pass = match draw.stencil_func.function {
                    StencilFunction::Always if stencilled => "fill",
                    StencilFunction::NotEqual if stencilled => "silhouette",
                    _ => "plain",
                };
                log::info!(
                    "  draw {:<8} {:<10} {:?} width {}",
                    draw.model,
                    pass,
                    draw.polygon_mode,
                    draw.line_width
                );
            }
        }
    }

    match scene.pick(0.0, 0.0, SelectionMode::Replace)? {
        Some(key) => {
            let name = scene.graph().node(key).and_then(|node| node.name()).unwrap_or("<unnamed>");
            log::info!("Picked '{name}' at the viewport centre");
        }
        None => log::info!("Nothing under the viewport centre"),
    }

    let view_state = scene.view_state();
    log::info!("View state:\n{}", view_state.to_ron_string()?);

    Ok(())
}
