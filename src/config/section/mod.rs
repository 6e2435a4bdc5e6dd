//! Configuration section definitions.
//!
//! Each module corresponds to a section in `hashicon.toml`:
//!
//! | Module      | TOML Section    | Purpose                              |
//! |-------------|-----------------|--------------------------------------|
//! | `identicon` | `[identicon]`   | Generator colors, grid and canvas    |
//! | `render`    | `[render]`      | Batch output directory               |
//! | `serve`     | `[serve]`       | HTTP server and document cache       |

mod identicon;
mod render;
mod serve;

pub use identicon::{IdenticonConfig, OutputFormat};
pub use render::RenderConfig;
pub use serve::ServeConfig;
