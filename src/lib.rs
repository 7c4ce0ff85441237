//! Workspace root. See the `huddle-*` crates under `crates/` for the
//! actual libraries; this package only anchors shared tooling hooks.
