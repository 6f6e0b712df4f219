//! The LED primitive model: colors, frames, and selectors.

pub mod color;
pub mod selector;

pub use color::{ColorValue, Frame, Rgb};
pub use selector::{Selector, MAX_LED};
