/// Output pin changes on the slave. The indicators are plain LEDs, the buzzer
/// carries the tone frequency the timer is generating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorEvent {
    MovementLight(bool),
    DoorLight(bool),
    EmergencyLight(bool),
    Buzzer(Option<f64>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Indicators {
    pub movement: bool,
    pub door: bool,
    pub emergency: bool,
    pub buzzer: Option<f64>,
}

impl Indicators {
    pub fn apply(&mut self, event: ActuatorEvent) {
        match event {
            ActuatorEvent::MovementLight(on) => self.movement = on,
            ActuatorEvent::DoorLight(on) => self.door = on,
            ActuatorEvent::EmergencyLight(on) => self.emergency = on,
            ActuatorEvent::Buzzer(tone) => self.buzzer = tone,
        }
    }
}

pub fn as_string(on: bool) -> String {
    if on { String::from("on") } else { String::from("off") }
}
