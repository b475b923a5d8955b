pub mod host;
pub mod sensor;

pub use host::{AccelSample, HostMotionSensor, RawMotionEvent};
pub use sensor::{first_available, AccessDecision, Availability, MotionSensor, SensorFault};
