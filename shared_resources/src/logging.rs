use std::fs;
use std::io;

use log::LevelFilter;

use super::config::Args;

/// Both nodes draw a status panel on the terminal, so `--logfile` moves the
/// log out of its way.
pub fn init(args: &Args) -> io::Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter(None, LevelFilter::Debug);
    } else {
        builder.filter(None, LevelFilter::Info);
    }
    if let Some(ref logfile) = args.logfile {
        let target = Box::new(fs::File::create(logfile)?);
        builder.target(env_logger::Target::Pipe(target));
    }
    builder.try_init().map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}
