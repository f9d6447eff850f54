use anyhow::Result;
use crux_core::typegen::TypeGen;
use std::path::PathBuf;
use wifi_portal_core::{
    config::DisplayValue,
    events::{ConfigEvent, PortalEvent, UiEvent},
    types::{ControlKind, SaveState},
    App,
};

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=../app");

    let mut gen = TypeGen::new();

    gen.register_app::<App>()?;

    // enums are traced one variant at a time unless registered explicitly
    gen.register_type::<ConfigEvent>()?;
    gen.register_type::<PortalEvent>()?;
    gen.register_type::<UiEvent>()?;
    gen.register_type::<ControlKind>()?;
    gen.register_type::<DisplayValue>()?;
    gen.register_type::<SaveState>()?;

    let output_root = PathBuf::from("./generated");

    gen.typescript("shared_types", output_root.join("typescript"))?;

    Ok(())
}
