//! Generated foreign types for esp32-panel-core live in `generated/`, written by `build.rs`.
