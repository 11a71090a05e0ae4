pub mod debug;
pub mod elevator_status;
pub mod floor;
pub mod lcd;
