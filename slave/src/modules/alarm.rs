/// ----- ALARM MODULE -----
/// This module plays the emergency tone sequence. The tone comes from a
/// 16-bit timer toggling the buzzer pin on compare match; the sequence owns
/// the timer through a guard for as long as it plays.

use std::thread;

use crossbeam_channel::{SendError, Sender};

use shared_resources::config::AlarmConfig;

use crate::utilities::actuator::ActuatorEvent;

pub const TIMER_CLOCK_HZ: f64 = 16_000_000.0;
pub const PRESCALER: u16 = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerRegisters {
    pub counter: u16,
    pub compare: u16,
    pub waveform: bool,
    pub toggle_output: bool,
    pub compare_interrupt: bool,
    /// 0 while the clock is stopped.
    pub prescaler: u16,
}

impl TimerRegisters {
    pub fn is_idle(&self) -> bool {
        *self == TimerRegisters::default()
    }
}

/// Frequency on the buzzer pin for a compare value, with the pin toggled in
/// phase and frequency correct mode.
pub fn tone_frequency(compare: u16) -> f64 {
    if compare == 0 {
        return 0.0;
    }
    TIMER_CLOCK_HZ / (4.0 * PRESCALER as f64 * compare as f64)
}

#[derive(Debug, Default)]
pub struct ToneTimer {
    registers: TimerRegisters,
}

impl ToneTimer {
    pub fn new() -> Self {
        ToneTimer::default()
    }

    pub fn registers(&self) -> &TimerRegisters {
        &self.registers
    }

    pub fn acquire<'a>(&'a mut self, actuator_tx: &'a Sender<ActuatorEvent>) -> TimerGuard<'a> {
        self.registers.counter = 0;
        self.registers.prescaler = 0;
        self.registers.toggle_output = true;
        self.registers.waveform = true;
        self.registers.compare_interrupt = true;
        self.registers.prescaler = PRESCALER;
        TimerGuard { timer: self, actuator_tx: actuator_tx }
    }
}

pub struct TimerGuard<'a> {
    timer: &'a mut ToneTimer,
    actuator_tx: &'a Sender<ActuatorEvent>,
}

impl<'a> TimerGuard<'a> {
    pub fn registers(&self) -> &TimerRegisters {
        &self.timer.registers
    }

    pub fn set_compare(&mut self, compare: u16) -> Result<(), SendError<ActuatorEvent>> {
        self.timer.registers.compare = compare;
        self.actuator_tx.send(ActuatorEvent::Buzzer(Some(tone_frequency(compare))))
    }
}

impl<'a> Drop for TimerGuard<'a> {
    fn drop(&mut self) {
        self.timer.registers = TimerRegisters::default();
        // pins go back to idle even when nobody is listening anymore
        let _ = self.actuator_tx.send(ActuatorEvent::Buzzer(None));
        let _ = self.actuator_tx.send(ActuatorEvent::EmergencyLight(false));
    }
}

pub struct Alarm {
    timer: ToneTimer,
    config: AlarmConfig,
    actuator_tx: Sender<ActuatorEvent>,
}

impl Alarm {
    pub fn new(config: AlarmConfig, actuator_tx: Sender<ActuatorEvent>) -> Self {
        Alarm {
            timer: ToneTimer::new(),
            config: config,
            actuator_tx: actuator_tx,
        }
    }

    pub fn timer(&self) -> &ToneTimer {
        &self.timer
    }

    /// Compare values in playing order. The register is 16 bits wide.
    pub fn sequence(&self) -> Vec<u16> {
        let mut note = self.config.base_compare;
        let mut notes = Vec::with_capacity(self.config.steps as usize);
        for _ in 0..self.config.steps {
            notes.push(note);
            note = note.wrapping_add(self.config.compare_step);
        }
        notes
    }

    /// Blocks for the whole sequence.
    pub fn run(&mut self) -> Result<(), SendError<ActuatorEvent>> {
        let notes = self.sequence();
        let step_hold = self.config.step_hold;

        let mut guard = self.timer.acquire(&self.actuator_tx);
        self.actuator_tx.send(ActuatorEvent::EmergencyLight(true))?;
        for note in notes {
            guard.set_compare(note)?;
            thread::sleep(step_hold);
        }
        Ok(())
    }
}
