//! Python bindings for ventureval.

pub mod bindings;
