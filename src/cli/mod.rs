mod args;

pub use args::{CliArgs, Command, InspectArgs, MaskMode, PackArgs};
