//! Histogram equalization filters.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | Channel | (H, W) | u8 | Single plane, for `equalize_channel` / `clahe_channel` |
//!
//! RGB filters reject every other channel count with `InvalidImageFormat`
//! and zero-area images with `EmptyImage`.
//!
//! ## Architecture
//!
//! - **Pure** - Inputs are borrowed views; every filter allocates its output
//! - **Deterministic** - Same input, same output, regardless of thread count
//! - **Parallel** - rayon over channels, rows and CLAHE tiles
//!
//! ## Filter Categories
//!
//! - **Primitive**: equalize_channel, clahe_channel
//! - **RGB adapters**: channel_wise_equalize, hsv_equalize, clahe_equalize
//! - **Display support**: compute_histogram, channel_histogram

pub mod core;
pub mod histogram;
pub mod color_space;
pub mod method;
pub mod equalize;
pub mod clahe;
