pub mod age_gate;
pub mod edge_gate;
pub mod metrics;
pub mod request_id;

pub use age_gate::age_gate_middleware;
pub use edge_gate::edge_gate_middleware;
pub use metrics::metrics_middleware;
pub use request_id::request_id_middleware;
