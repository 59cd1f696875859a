//! Optional clap bridge.
//!
//! The engine itself never parses arguments; this adapter projects a
//! command's option surface onto a `clap::Command` and feeds parsed matches
//! back as explicit input. Only values that actually came from the command
//! line are applied — clap-side defaults never shadow the precedence chain.

use clap::{Arg, ArgAction, ArgMatches};
use clap::parser::ValueSource;

use crate::command::Command;
use crate::schema::Kind;

/// Long flag name for an option: the canonical name with path separators
/// flattened for the terminal.
fn long_name(name: &str) -> String {
    name.replace('.', "-")
}

/// Add every defined option of `cmd` to a clap command. Boolean options
/// become presence flags; everything else takes a string value and is
/// decoded later by the resolution pipeline. Mandatory options are *not*
/// marked required on the clap side — config and environment may satisfy
/// them, and enforcement happens after resolution.
pub fn to_clap_command(cmd: &Command, mut clap_cmd: clap::Command) -> clap::Command {
    for opt in cmd.flags().options() {
        let mut arg = Arg::new(opt.name.clone())
            .long(long_name(&opt.name))
            .help(opt.description.clone());
        if let Some(c) = opt.short {
            arg = arg.short(c);
        }
        arg = match opt.kind {
            Kind::Bool => arg.action(ArgAction::SetTrue),
            _ => arg.action(ArgAction::Set),
        };
        clap_cmd = clap_cmd.arg(arg);
    }
    clap_cmd
}

/// Feed parsed matches back into the command as explicit input.
pub fn apply_matches(cmd: &mut Command, matches: &ArgMatches) {
    let options: Vec<(String, Kind)> = cmd
        .flags()
        .options()
        .iter()
        .map(|o| (o.name.clone(), o.kind))
        .collect();
    for (name, kind) in options {
        if matches.value_source(&name) != Some(ValueSource::CommandLine) {
            continue;
        }
        match kind {
            Kind::Bool => {
                if matches.get_flag(&name) {
                    cmd.flags_mut().set_from_input(&name, "true");
                }
            }
            _ => {
                if let Some(raw) = matches.get_one::<String>(&name) {
                    let raw = raw.clone();
                    cmd.flags_mut().set_from_input(&name, &raw);
                }
            }
        }
    }
}
