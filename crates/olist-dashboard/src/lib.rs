//! Olist Orders Dashboard
//!
//! Startup pipeline and presentation layer over the order analytics.
//!
//! # Core Concepts
//!
//! - [`DashboardConfig`]: Layered settings (defaults, TOML, environment, flags)
//! - [`Dashboard`]: Context object owning the store handle and caches
//! - [`render()`]: Pure mapping from dataset and [`FilterState`] to a [`RenderOutcome`]
//!
//! # Example
//!
//! ```rust,ignore
//! use olist_dashboard::{Dashboard, DashboardConfig, FilterState};
//!
//! let (dashboard, seeded) = Dashboard::open(DashboardConfig::load(None)?).await?;
//! println!("{}", seeded.message());
//! let outcome = dashboard.render(&FilterState::default()).await?;
//! ```

#![warn(unreachable_pub)]

pub mod config;
mod error;
pub mod format;
mod pipeline;
pub mod render;
pub mod telemetry;

pub use config::DashboardConfig;
pub use error::{DashboardError, DashboardResult};
pub use pipeline::Dashboard;
pub use render::{render, render_view, DashboardView, FilterState, RenderOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
