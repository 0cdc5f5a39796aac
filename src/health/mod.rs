mod monitor;

pub use monitor::{probe_once, ConnectionStatus, HealthMonitor, HealthSnapshot};
