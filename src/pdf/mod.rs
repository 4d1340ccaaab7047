//! PDF document rendering.

pub mod renderer;

pub use renderer::{DocumentMeta, PdfRenderer};
