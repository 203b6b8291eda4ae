//! Through-focus MTF (`.thf`) extraction and plot composition.
//!
//! The library is front-end agnostic: every entry point takes and returns
//! plain values (paths, numeric blocks, strings). The `thf-plot` binary
//! renders the resulting [`figure::Figure`] with egui.

pub mod data;
pub mod figure;
pub mod timing;
