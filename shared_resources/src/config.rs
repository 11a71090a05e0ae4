use std::fs;
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BusSection {
    pub port: u16,
    pub slave_address: u8,
    pub general_call: bool,
    pub timeout_ms: u64,
}

impl Default for BusSection {
    fn default() -> Self {
        BusSection {
            port: 19740,
            slave_address: 0b1010111,
            general_call: false,
            timeout_ms: 5000,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MasterSection {
    pub initial_floor: u8,
    pub poll_period_ms: u64,
    pub debounce_ms: u64,
    pub movement_start_ms: u64,
    pub floor_step_ms: u64,
    pub already_there_ms: u64,
    pub arrival_ms: u64,
    pub door_prepare_ms: u64,
    pub door_hold_ms: u64,
    pub fault_display_ms: u64,
}

impl Default for MasterSection {
    fn default() -> Self {
        MasterSection {
            initial_floor: 1,
            poll_period_ms: 25,
            debounce_ms: 300,
            movement_start_ms: 3000,
            floor_step_ms: 150,
            already_there_ms: 2000,
            arrival_ms: 1000,
            door_prepare_ms: 100,
            door_hold_ms: 5000,
            fault_display_ms: 2000,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SlaveSection {
    pub blink_count: u8,
    pub blink_ms: u64,
    pub alarm_base_compare: u16,
    pub alarm_compare_step: u16,
    pub alarm_steps: u8,
    pub alarm_step_ms: u64,
}

impl Default for SlaveSection {
    fn default() -> Self {
        SlaveSection {
            blink_count: 3,
            blink_ms: 200,
            alarm_base_compare: 1000,
            alarm_compare_step: 750,
            alarm_steps: 6,
            alarm_step_ms: 500,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ConfigFile {
    pub bus: BusSection,
    pub master: MasterSection,
    pub slave: SlaveSection,
}

impl ConfigFile {
    pub fn parse(contents: &str) -> io::Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }
}

fn read_config_file(file_path: Option<&Path>) -> io::Result<ConfigFile> {
    let config_contents = match file_path {
        Some(path) => fs::read_to_string(path)?,
        None => match fs::read_to_string("../config.json") {
            Ok(content) => content,
            Err(_) => {
                info!("No configuration file provided, using default settings...");
                fs::read_to_string("../_config.json")?
            },
        },
    };
    ConfigFile::parse(&config_contents)
}

/// Command line options shared by both nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub busport: Option<u16>,
    pub logfile: Option<PathBuf>,
    pub verbose: bool,
}

impl Args {
    pub fn from_env() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        parse_env_args(&args)
    }
}

pub fn parse_env_args(args: &[String]) -> Args {
    let mut parsed = Args::default();

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--verbose" => parsed.verbose = true,
            "--config" | "--logfile" | "--busport" => {
                let value = match args.next() {
                    Some(value) => value,
                    None => {
                        eprintln!("{} needs a value, skipping...", arg);
                        continue;
                    },
                };
                match arg.as_str() {
                    "--config" => parsed.config = Some(PathBuf::from(value)),
                    "--logfile" => parsed.logfile = Some(PathBuf::from(value)),
                    _ => match value.parse::<u16>() {
                        Ok(port) => parsed.busport = Some(port),
                        Err(_) => eprintln!("port {} is not a number, skipping...", value),
                    },
                }
            },
            _ => eprintln!("illegal argument {}, skipping...", arg),
        }
    }
    parsed
}

#[derive(Debug, Clone)]
pub struct BusConfig {
    pub port: u16,
    pub slave_address: u8,
    pub general_call: bool,
    pub timeout: Duration,
}

impl BusConfig {
    fn new(section: &BusSection, args: &Args) -> Self {
        BusConfig {
            port: args.busport.unwrap_or(section.port),
            slave_address: section.slave_address,
            general_call: section.general_call,
            timeout: Duration::from_millis(section.timeout_ms),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MasterTiming {
    pub poll_period: Duration,
    pub debounce: Duration,
    pub movement_start: Duration,
    pub floor_step: Duration,
    pub already_there: Duration,
    pub arrival: Duration,
    pub door_prepare: Duration,
    pub door_hold: Duration,
    pub fault_display: Duration,
}

impl MasterTiming {
    /// No holds at all, for driving the controller faster than real time.
    pub fn immediate() -> Self {
        MasterTiming {
            poll_period: Duration::from_millis(1),
            debounce: Duration::ZERO,
            movement_start: Duration::ZERO,
            floor_step: Duration::ZERO,
            already_there: Duration::ZERO,
            arrival: Duration::ZERO,
            door_prepare: Duration::ZERO,
            door_hold: Duration::ZERO,
            fault_display: Duration::ZERO,
        }
    }
}

impl From<&MasterSection> for MasterTiming {
    fn from(section: &MasterSection) -> Self {
        MasterTiming {
            poll_period: Duration::from_millis(section.poll_period_ms),
            debounce: Duration::from_millis(section.debounce_ms),
            movement_start: Duration::from_millis(section.movement_start_ms),
            floor_step: Duration::from_millis(section.floor_step_ms),
            already_there: Duration::from_millis(section.already_there_ms),
            arrival: Duration::from_millis(section.arrival_ms),
            door_prepare: Duration::from_millis(section.door_prepare_ms),
            door_hold: Duration::from_millis(section.door_hold_ms),
            fault_display: Duration::from_millis(section.fault_display_ms),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MasterConfig {
    pub bus: BusConfig,
    pub initial_floor: u8,
    pub timing: MasterTiming,
}

impl MasterConfig {
    pub fn get(args: &Args) -> io::Result<Self> {
        let config_file = read_config_file(args.config.as_deref())?;
        Ok(Self::new(&config_file, args))
    }

    pub fn new(config_file: &ConfigFile, args: &Args) -> Self {
        MasterConfig {
            bus: BusConfig::new(&config_file.bus, args),
            initial_floor: config_file.master.initial_floor,
            timing: MasterTiming::from(&config_file.master),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlinkConfig {
    pub count: u8,
    pub hold: Duration,
}

#[derive(Debug, Clone)]
pub struct AlarmConfig {
    pub base_compare: u16,
    pub compare_step: u16,
    pub steps: u8,
    pub step_hold: Duration,
}

#[derive(Debug, Clone)]
pub struct SlaveConfig {
    pub bus: BusConfig,
    pub blink: BlinkConfig,
    pub alarm: AlarmConfig,
}

impl SlaveConfig {
    pub fn get(args: &Args) -> io::Result<Self> {
        let config_file = read_config_file(args.config.as_deref())?;
        Ok(Self::new(&config_file, args))
    }

    pub fn new(config_file: &ConfigFile, args: &Args) -> Self {
        let slave = &config_file.slave;
        SlaveConfig {
            bus: BusConfig::new(&config_file.bus, args),
            blink: BlinkConfig {
                count: slave.blink_count,
                hold: Duration::from_millis(slave.blink_ms),
            },
            alarm: AlarmConfig {
                base_compare: slave.alarm_base_compare,
                compare_step: slave.alarm_compare_step,
                steps: slave.alarm_steps,
                step_hold: Duration::from_millis(slave.alarm_step_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn empty_file_gives_firmware_defaults() {
        let config_file = ConfigFile::parse("{}").unwrap();
        let master = MasterConfig::new(&config_file, &Args::default());
        assert_eq!(master.bus.slave_address, 87);
        assert_eq!(master.initial_floor, 1);
        assert_eq!(master.timing.door_hold, Duration::from_secs(5));
        assert_eq!(master.timing.floor_step, Duration::from_millis(150));

        let slave = SlaveConfig::new(&config_file, &Args::default());
        assert_eq!(slave.blink.count, 3);
        assert_eq!(slave.alarm.steps, 6);
        assert_eq!(slave.alarm.step_hold, Duration::from_millis(500));
    }

    #[test]
    fn busport_argument_overrides_file() {
        let config_file = ConfigFile::parse(r#"{ "bus": { "port": 20000, "timeout_ms": 250 } }"#).unwrap();
        let args = parse_env_args(&strings(&["--busport", "20001"]));
        let config = SlaveConfig::new(&config_file, &args);
        assert_eq!(config.bus.port, 20001);
        assert_eq!(config.bus.timeout, Duration::from_millis(250));
    }

    #[test]
    fn bad_arguments_are_skipped() {
        let args = parse_env_args(&strings(&["--busport", "many", "--bogus", "--verbose", "--logfile"]));
        assert_eq!(args, Args { verbose: true, ..Args::default() });
    }

    #[test]
    fn reads_explicit_config_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "master": {{ "initial_floor": 7, "door_hold_ms": 10 }} }}"#).unwrap();

        let args = parse_env_args(&[String::from("--config"), file.path().display().to_string()]);
        let config = MasterConfig::get(&args).unwrap();
        assert_eq!(config.initial_floor, 7);
        assert_eq!(config.timing.door_hold, Duration::from_millis(10));
        assert_eq!(config.timing.arrival, Duration::from_secs(1));
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(ConfigFile::parse("{ bus: 1 }").is_err());
    }
}
