mod decode_probe_port;
mod proximity_port;

pub use decode_probe_port::DecodeProbePort;
pub use proximity_port::{
    LazyElement, ProximityEntry, ProximityObserverPort, ProximityPlatform, ProximitySender,
};

#[cfg(test)]
pub use proximity_port::MockProximityObserverPort;
