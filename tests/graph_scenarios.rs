use std::sync::Arc;

use egui::Pos2;

use blockgraph::nodes::{InputDefinition, OutputDefinition};
use blockgraph::{
    Block, BlockDefinition, BlockId, DefinitionRegistry, Graph, GraphError, LiteralValue, PortRef,
    PortType,
};

fn spawn(graph: &mut Graph, registry: &DefinitionRegistry, name: &str, x: f32) -> BlockId {
    let block = registry.create_block(name, Pos2::new(x, 0.0)).unwrap();
    graph.add_block(block)
}

fn input(graph: &Graph, block: BlockId, name: &str) -> PortRef {
    graph.block(block).unwrap().input_named(name).unwrap().port_ref()
}

fn output(graph: &Graph, block: BlockId, name: &str) -> PortRef {
    graph.block(block).unwrap().output_named(name).unwrap().port_ref()
}

fn args(graph: &Graph, block: BlockId) -> Vec<PortRef> {
    graph
        .block(block)
        .unwrap()
        .variadic_group("Args")
        .into_iter()
        .map(|p| PortRef::new(block, p))
        .collect()
}

/// Checks every graph-wide invariant that must hold after any operation
fn assert_invariants(graph: &Graph) {
    for block in graph.blocks() {
        for port in block.inputs() {
            let incoming = graph.wires().iter().filter(|w| w.target == port.port_ref()).count();
            assert!(incoming <= 1, "input {} has {} incoming wires", port.port_ref(), incoming);
        }

        let mut groups: Vec<&str> = block
            .inputs()
            .iter()
            .filter(|p| p.is_variadic)
            .map(|p| p.name.as_str())
            .collect();
        groups.dedup();
        for group in groups {
            let slots = block.variadic_group(group);
            let wired: Vec<bool> = slots
                .iter()
                .map(|&p| graph.incoming_wire(PortRef::new(block.id(), p)).is_some())
                .collect();
            // the tail is always an empty spare
            assert_eq!(wired.last(), Some(&false), "group {} has no spare: {:?}", group, wired);
        }
    }

    for wire in graph.wires() {
        let source = graph.port(wire.source).expect("wire source exists");
        let target = graph.port(wire.target).expect("wire target exists");
        assert!(source.is_output());
        assert!(target.is_input());
    }
}

fn flow_definitions() -> (Arc<BlockDefinition>, Arc<BlockDefinition>) {
    let on_start = BlockDefinition::new("Events", "OnStart")
        .with_outputs(vec![OutputDefinition::new("Out", PortType::Flow)]);
    let log = BlockDefinition::new("Debug", "Log").with_inputs(vec![InputDefinition::new("In", PortType::Flow)]);
    (Arc::new(on_start), Arc::new(log))
}

#[test]
fn number_into_string_is_rejected() {
    let registry = DefinitionRegistry::builtin();
    let mut graph = Graph::new();
    let add = spawn(&mut graph, &registry, "Add", 0.0);
    let print = spawn(&mut graph, &registry, "Print String", 300.0);

    let result = graph.connect(output(&graph, add, "Result"), input(&graph, print, "Message"));
    assert_eq!(
        result,
        Err(GraphError::IncompatibleType {
            source_type: PortType::Number,
            target_type: PortType::String,
        })
    );
    assert!(graph.wires().is_empty());
}

#[test]
fn flow_connection_succeeds() {
    let (on_start, log) = flow_definitions();
    let mut graph = Graph::new();
    let start = graph.add_block(Block::new(on_start, Pos2::ZERO));
    let log = graph.add_block(Block::new(log, Pos2::new(300.0, 0.0)));

    graph.connect(output(&graph, start, "Out"), input(&graph, log, "In")).unwrap();
    assert_eq!(graph.wires().len(), 1);
    assert_invariants(&graph);
}

#[test]
fn second_wire_into_an_input_replaces_the_first() {
    let (on_start, log) = flow_definitions();
    let mut graph = Graph::new();
    let first = graph.add_block(Block::new(Arc::clone(&on_start), Pos2::ZERO));
    let other = graph.add_block(Block::new(on_start, Pos2::new(0.0, 200.0)));
    let log = graph.add_block(Block::new(log, Pos2::new(300.0, 0.0)));
    let target = input(&graph, log, "In");

    let original = graph.connect(output(&graph, first, "Out"), target).unwrap();
    let replacement = graph.connect(output(&graph, other, "Out"), target).unwrap();

    assert_eq!(graph.wires().len(), 1);
    assert!(graph.wire(original).is_none());
    assert_eq!(graph.incoming_wire(target).unwrap().id, replacement);
    assert_eq!(graph.incoming_wire(target).unwrap().source, output(&graph, other, "Out"));
    assert_invariants(&graph);
}

#[test]
fn wiring_the_variadic_tail_grows_the_group() {
    let registry = DefinitionRegistry::builtin();
    let mut graph = Graph::new();
    let number = spawn(&mut graph, &registry, "Set Number", 0.0);
    let format = spawn(&mut graph, &registry, "Format Text", 300.0);
    assert_eq!(args(&graph, format).len(), 1);

    let first = args(&graph, format)[0];
    graph.connect(output(&graph, number, "Out"), first).unwrap();

    let slots = args(&graph, format);
    assert_eq!(slots.len(), 2);
    assert!(graph.incoming_wire(slots[1]).is_none());
    assert_eq!(graph.port(slots[1]).unwrap().slot_index, 2);
    assert_invariants(&graph);
}

#[test]
fn removing_a_block_removes_exactly_its_wires() {
    let registry = DefinitionRegistry::builtin();
    let mut graph = Graph::new();
    let start = spawn(&mut graph, &registry, "On Start", 0.0);
    let set = spawn(&mut graph, &registry, "Set Number", 200.0);
    let add = spawn(&mut graph, &registry, "Add", 400.0);
    let format = spawn(&mut graph, &registry, "Format Text", 600.0);
    let print = spawn(&mut graph, &registry, "Print String", 800.0);

    graph.connect(output(&graph, start, "Exec"), input(&graph, set, "Exec")).unwrap();
    graph.connect(output(&graph, set, "Out"), input(&graph, add, "A")).unwrap();
    graph.connect(output(&graph, add, "Result"), input(&graph, format, "Args")).unwrap();
    graph.connect(output(&graph, set, "Out"), args(&graph, format)[1]).unwrap();
    graph.connect(output(&graph, format, "Result"), input(&graph, print, "Message")).unwrap();
    assert_invariants(&graph);

    let before = graph.wires().len();
    let touching = graph.wires_touching(add).count();
    assert_eq!(touching, 2);

    let removed = graph.remove_block(add).unwrap();
    assert_eq!(removed.id(), add);
    assert!(graph.block(add).is_none());
    assert_eq!(graph.wires().len(), before - touching);
    assert!(graph.wires().iter().all(|w| !w.touches_block(add)));

    // the surviving Args wire stays on its slot, leaving a gap in front
    let slots = args(&graph, format);
    assert_eq!(slots.len(), 3);
    assert!(graph.incoming_wire(slots[0]).is_none());
    assert_eq!(graph.incoming_wire(slots[1]).unwrap().source, output(&graph, set, "Out"));
    assert_invariants(&graph);

    graph.remove_variadic_slot(slots[0]).unwrap();
    let slots = args(&graph, format);
    assert_eq!(slots.len(), 2);
    assert_eq!(graph.incoming_wire(slots[0]).unwrap().source, output(&graph, set, "Out"));
    assert_invariants(&graph);

    assert!(graph.remove_block(add).is_none());
}

#[test]
fn duplicate_copies_literals_but_no_wires() {
    let registry = DefinitionRegistry::builtin();
    let mut graph = Graph::new();
    let set = spawn(&mut graph, &registry, "Set Number", 0.0);
    let add = spawn(&mut graph, &registry, "Add", 300.0);
    let print = spawn(&mut graph, &registry, "Print String", 600.0);

    graph.set_literal(input(&graph, add, "B"), Some(LiteralValue::Number(5.0))).unwrap();
    graph.connect(output(&graph, set, "Out"), input(&graph, add, "A")).unwrap();
    graph.connect(output(&graph, set, "Exec"), input(&graph, print, "Exec")).unwrap();

    let copy = graph.duplicate_block(add, egui::vec2(20.0, 20.0)).unwrap();
    assert_ne!(copy, add);
    assert_eq!(graph.wires_touching(copy).count(), 0);
    assert_eq!(graph.wires_touching(add).count(), 1);

    let original = graph.block(add).unwrap();
    let duplicate = graph.block(copy).unwrap();
    assert_eq!(duplicate.position(), original.position() + egui::vec2(20.0, 20.0));
    for (a, b) in original.inputs().iter().zip(duplicate.inputs()) {
        assert_eq!(a.slot_index, b.slot_index);
        assert_eq!(a.literal_value, b.literal_value);
    }
    assert_eq!(
        duplicate.input_named("B").unwrap().literal_value,
        Some(LiteralValue::Number(5.0))
    );
    assert_invariants(&graph);
}

#[test]
fn direction_is_checked_before_type() {
    let registry = DefinitionRegistry::builtin();
    let mut graph = Graph::new();
    let add = spawn(&mut graph, &registry, "Add", 0.0);
    let print = spawn(&mut graph, &registry, "Print String", 300.0);

    let result = graph.connect(input(&graph, print, "Message"), input(&graph, add, "A"));
    assert!(matches!(result, Err(GraphError::Direction { .. })));
    assert!(graph.wires().is_empty());
}

#[test]
fn interleaved_edits_keep_invariants() {
    let registry = DefinitionRegistry::builtin();
    let mut graph = Graph::new();
    let sources: Vec<BlockId> = (0..4)
        .map(|i| spawn(&mut graph, &registry, "Set Number", i as f32 * 10.0))
        .collect();
    let format = spawn(&mut graph, &registry, "Format Text", 400.0);

    let mut wires = Vec::new();
    for &source in &sources {
        let tail = *args(&graph, format).last().unwrap();
        wires.push(graph.connect(output(&graph, source, "Out"), tail).unwrap());
        assert_invariants(&graph);
    }
    assert_eq!(args(&graph, format).len(), 5);

    graph.disconnect(wires[1]).unwrap();
    assert_invariants(&graph);
    graph.remove_block(sources[2]);
    assert_invariants(&graph);

    let slots = args(&graph, format);
    assert_eq!(slots.len(), 5);
    let feeding: Vec<Option<PortRef>> = slots
        .iter()
        .map(|&slot| graph.incoming_wire(slot).map(|w| w.source))
        .collect();
    assert_eq!(
        feeding,
        vec![
            Some(output(&graph, sources[0], "Out")),
            None,
            None,
            Some(output(&graph, sources[3], "Out")),
            None,
        ]
    );

    graph.remove_variadic_slot(slots[1]).unwrap();
    graph.remove_variadic_slot(slots[2]).unwrap();
    assert_eq!(args(&graph, format), vec![slots[0], slots[3], slots[4]]);
    assert_invariants(&graph);

    let wired = slots[0];
    assert!(matches!(
        graph.remove_variadic_slot(wired),
        Err(GraphError::VariadicCompactionConflict { .. })
    ));
    assert_eq!(args(&graph, format), vec![slots[0], slots[3], slots[4]]);
    assert_invariants(&graph);
}

#[test]
fn duplicate_keeps_grown_variadic_literals_in_place() {
    let registry = DefinitionRegistry::builtin();
    let mut graph = Graph::new();
    let set = spawn(&mut graph, &registry, "Set Number", 0.0);
    let format = spawn(&mut graph, &registry, "Format Text", 300.0);

    graph.set_literal(input(&graph, format, "Format"), Some(LiteralValue::from("{0} {1}"))).unwrap();
    graph.connect(output(&graph, set, "Out"), args(&graph, format)[0]).unwrap();
    graph.set_literal(args(&graph, format)[1], Some(LiteralValue::from(3.0))).unwrap();

    let copy = graph.duplicate_block(format, egui::vec2(20.0, 20.0)).unwrap();
    assert_eq!(args(&graph, copy).len(), 2);
    assert_eq!(
        graph.port(input(&graph, copy, "Format")).unwrap().literal_value,
        Some(LiteralValue::from("{0} {1}"))
    );
    assert_eq!(
        graph.port(args(&graph, copy)[1]).unwrap().literal_value,
        Some(LiteralValue::Number(3.0))
    );
    assert_eq!(graph.wires_touching(copy).count(), 0);
    assert_invariants(&graph);
}
