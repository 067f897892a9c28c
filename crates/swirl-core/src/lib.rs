//! Swirl Core - Foundational types for the swirl workspace
//!
//! This crate provides the types every other swirl crate depends on:
//! - `Vec3` - Value-semantics 3D vector
//! - `Color` - RGBA color with hex parsing and HSL conversion
//! - Error types and Result alias

mod color;
mod error;
mod types;

pub use color::{hsl_to_rgb, parse_hex_color, rgb_to_hsl};
pub use error::{Result, SwirlError};
pub use types::{mat4_mul, Color, Vec3};
