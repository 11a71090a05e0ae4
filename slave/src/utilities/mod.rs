pub mod actuator;
pub mod debug;
