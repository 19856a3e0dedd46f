//! Stock block definitions shown in the toolbox

use super::factory::{BlockDefinition, InputDefinition, OutputDefinition, PortType};

pub(crate) fn definitions() -> Vec<BlockDefinition> {
    vec![
        BlockDefinition::new("Events", "On Start")
            .with_color("#880000")
            .with_outputs(vec![OutputDefinition::new("Exec", PortType::Flow)]),
        BlockDefinition::new("Variables", "Set Number")
            .with_color("#006688")
            .with_inputs(vec![
                InputDefinition::new("Exec", PortType::Flow),
                InputDefinition::new("Value", PortType::Number),
            ])
            .with_outputs(vec![
                OutputDefinition::new("Exec", PortType::Flow),
                OutputDefinition::new("Out", PortType::Number),
            ]),
        BlockDefinition::new("Logic", "Branch (If)")
            .with_color("#555")
            .with_inputs(vec![
                InputDefinition::new("Exec", PortType::Flow),
                InputDefinition::new("Condition", PortType::Boolean),
            ])
            .with_outputs(vec![
                OutputDefinition::new("True", PortType::Flow),
                OutputDefinition::new("False", PortType::Flow),
            ]),
        arithmetic("Add"),
        arithmetic("Subtract"),
        BlockDefinition::new("Debug", "Print String")
            .with_color("#444")
            .with_inputs(vec![
                InputDefinition::new("Exec", PortType::Flow),
                InputDefinition::new("Message", PortType::String),
            ])
            .with_outputs(vec![OutputDefinition::new("Exec", PortType::Flow)]),
        BlockDefinition::new("Utilities", "Format Text")
            .with_color("#880088")
            .with_inputs(vec![
                InputDefinition::new("Format", PortType::String),
                InputDefinition::new("Args", PortType::Any).variadic(),
            ])
            .with_outputs(vec![OutputDefinition::new("Result", PortType::String)]),
        BlockDefinition::new("Custom", "Custom Code")
            .with_color("#333")
            .with_inputs(vec![InputDefinition::new("Exec", PortType::Flow)])
            .with_outputs(vec![OutputDefinition::new("Exec", PortType::Flow)])
            .with_custom_code(),
    ]
}

fn arithmetic(name: &str) -> BlockDefinition {
    BlockDefinition::new("Math", name)
        .with_color("#228822")
        .with_inputs(vec![
            InputDefinition::new("A", PortType::Number),
            InputDefinition::new("B", PortType::Number),
        ])
        .with_outputs(vec![OutputDefinition::new("Result", PortType::Number)])
}
