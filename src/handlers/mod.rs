//! handlers/mod.rs
//! Módulo que agrupa los distintos handlers (envíos, campañas, stream, etc.).

pub mod campaign_handler;
pub mod customer_handler;
pub mod delivery_handler;
pub mod stream_handler;
pub mod target_location_handler;
pub mod targeting_handler;
