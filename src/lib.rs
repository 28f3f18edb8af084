//! Side-scrolling shooter core: entity model, per-frame simulation and
//! rendering against an abstract 2D drawing surface.

pub mod background;
pub mod clock;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod input;
pub mod surface;
pub mod ui;
