//! su_usage
//!
//! Monthly resource-usage cost charts: gap interpolation, daily/cumulative views,
//! trend-following gradient fills and a grayscale overlay over synthesized days.
//! Pairs with the `su-usage` CLI.
//!
//! ### Features
//! - Fill missing days with neighbor midpoints and remember which ones were filled
//! - Switch between cumulative and day-over-day values
//! - Render stacked charts to PNG with plotters, graying out interpolated spans
//! - Day-by-day table, CSV export and hover tooltips built from the raw values
//!
//! ### Example
//! ```no_run
//! use su_usage::{ChartState, DisplayMode, RenderOptions};
//!
//! let input = su_usage::storage::load_input("usage.json")?;
//! let mut state = ChartState::from_input(input)?;
//! state.switch_mode(DisplayMode::Daily);
//! println!("{}", state.table());
//! let chart = su_usage::viz::render_chart(&state, &RenderOptions::default())?;
//! su_usage::viz::save_png(&chart, "usage.png")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod calendar;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod gradient;
pub mod interpolate;
pub mod models;
pub mod overlay;
pub mod processor;
pub mod responsive;
pub mod storage;
pub mod table;
pub mod tooltip;
pub mod transform;
pub mod viz;

pub use color::{Rgb, Rgba};
pub use error::UsageError;
pub use models::{DisplayMode, ResourceKind, Series, UsageInput};
pub use processor::{ChartState, ProcessedSeries};
pub use viz::{RenderOptions, RenderedChart};
