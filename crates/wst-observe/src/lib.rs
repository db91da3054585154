//! Observation primitives for compositor tests.
//!
//! - [`LogTail`] follows a client's captured output line by line without
//!   blocking; [`LoggedProcess`] spawns a client through the compositor and
//!   wires its output to a tail.
//! - [`compare_images`] classifies two rendered frames as the same, different
//!   or incomparable, writing a difference image when they differ.
//! - [`take_screenshot`] captures the screen through the compositor and
//!   waits for the capture to finish.

pub mod compare;
pub mod error;
pub mod logtail;
pub mod process;
pub mod screenshot;

pub use compare::{compare_images, compare_rasters, Comparison, ImageDiff, Raster};
pub use error::{ObserveError, Result};
pub use logtail::{LogTail, EMPTY_LINE};
pub use process::{LogConfig, LoggedProcess, DEFAULT_LOG_ROOT};
pub use screenshot::{pid_exists, take_screenshot, wait_for_exit, ScreenshotConfig};
