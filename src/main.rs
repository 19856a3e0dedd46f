//! Blockgraph - headless block graph session
//!
//! Usage: `blockgraph [definitions.json] [config.json]`
//!
//! Loads the block definitions (built-in set when no path is given), builds
//! a small demo graph, logs the connectivity of every block and prints the
//! export JSON to stdout.

use std::error::Error;
use std::path::PathBuf;

use egui::Pos2;
use log::{info, warn};

use blockgraph::{
    BlockId, DefinitionRegistry, EditorConfig, EditorSession, GraphError, LiteralValue, PortDirection,
    PortRef,
};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let registry = match args.next() {
        Some(path) => DefinitionRegistry::load(&path)?,
        None => DefinitionRegistry::builtin(),
    };
    let config = match args.next() {
        Some(path) => EditorConfig::load(&path)?,
        None => EditorConfig::load_or_default().unwrap_or_else(|err| {
            warn!("Ignoring user config: {}", err);
            EditorConfig::default()
        }),
    };
    info!("{} block definitions available", registry.len());

    let mut session = EditorSession::new(registry, config);
    if let Err(err) = build_demo(&mut session) {
        warn!("Demo graph incomplete: {}", err);
    }

    for block in session.graph().blocks() {
        let (inputs, outputs) = session.describe_connections(block.id())?;
        info!(
            "Block {} '{}': inputs {}, outputs {}",
            block.id(),
            block.title,
            serde_json::to_string(&inputs)?,
            serde_json::to_string(&outputs)?
        );
    }

    println!("{}", session.export_json()?);
    Ok(())
}

/// On Start -> Set Number -> Print String, with the number feeding a Format Text
fn build_demo(session: &mut EditorSession) -> Result<(), Box<dyn Error>> {
    let start = session.spawn_block("On Start", Pos2::new(0.0, 0.0))?;
    let set = session.spawn_block("Set Number", Pos2::new(220.0, 0.0))?;
    let format = session.spawn_block("Format Text", Pos2::new(440.0, 120.0))?;
    let print = session.spawn_block("Print String", Pos2::new(660.0, 0.0))?;

    let value = port_named(session, set, "Value", PortDirection::Input)?;
    session.set_literal(value, Some(LiteralValue::from(5.0)))?;
    let template = port_named(session, format, "Format", PortDirection::Input)?;
    session.set_literal(template, Some(LiteralValue::from("value = {0}")))?;

    let links = [
        (start, "Exec", set, "Exec"),
        (set, "Exec", print, "Exec"),
        (set, "Out", format, "Args"),
        (format, "Result", print, "Message"),
    ];
    for (from, output, to, input) in links {
        let source = port_named(session, from, output, PortDirection::Output)?;
        let target = port_named(session, to, input, PortDirection::Input)?;
        session.begin_connection(source)?;
        session.complete_connection(target)?;
    }
    Ok(())
}

fn port_named(
    session: &EditorSession,
    block: BlockId,
    name: &str,
    direction: PortDirection,
) -> Result<PortRef, Box<dyn Error>> {
    let block = session.graph().block(block).ok_or(GraphError::BlockNotFound(block))?;
    let port = match direction {
        PortDirection::Input => block.input_named(name),
        PortDirection::Output => block.output_named(name),
    };
    port.map(|p| p.port_ref())
        .ok_or_else(|| format!("'{}' has no {} port named '{}'", block.title, direction, name).into())
}
