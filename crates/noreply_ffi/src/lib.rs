//! Flutter-facing bindings for `noreply_core`.

pub mod api;
