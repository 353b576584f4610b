pub mod loopback_gate;

pub use loopback_gate::LoopbackOnly;
