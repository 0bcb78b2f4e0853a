//! Flutter-facing bindings for the blog feed core.

pub mod api;
