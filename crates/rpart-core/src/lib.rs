#![forbid(unsafe_code)]

//! Core: geometry, pointer positions, and region colors.
//!
//! # Role in rpart
//! `rpart-core` holds the host-agnostic primitives that the partition tree
//! (`rpart-tree`) and its drivers share: cell rectangles for layout and hit
//! testing, pointer coordinates for drag gestures, and the [`color::Rgb`]
//! value carried by every leaf region together with the injectable
//! [`color::ColorSource`] that produces fresh colors on split.

pub mod color;
pub mod geometry;

pub use color::{ColorSource, PaletteColors, RandomColors, Rgb};
pub use geometry::{PointerPosition, Rect};
