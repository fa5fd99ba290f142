//! Support services for the pipeline

pub mod codec;

pub use codec::TransportCodec;
