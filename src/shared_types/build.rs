use anyhow::Result;
use crux_core::typegen::TypeGen;
use esp32_panel_core::{
    events::{ControlEvent, SessionEvent, TimerEvent, UiEvent},
    types::{ActuatorPosition, OutputState},
    App, TimerOperation, TimerOutput,
};
use std::path::PathBuf;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=../app");

    let mut gen = TypeGen::new();

    gen.register_app::<App>()?;

    // Explicitly register domain event enums to ensure all variants are traced
    gen.register_type::<SessionEvent>()?;
    gen.register_type::<ControlEvent>()?;
    gen.register_type::<TimerEvent>()?;
    gen.register_type::<UiEvent>()?;

    // Enums the shell matches on
    gen.register_type::<OutputState>()?;
    gen.register_type::<ActuatorPosition>()?;
    gen.register_type::<TimerOperation>()?;
    gen.register_type::<TimerOutput>()?;

    let output_root = PathBuf::from("./generated");

    gen.typescript("shared_types", output_root.join("typescript"))?;

    Ok(())
}
