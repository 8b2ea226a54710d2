mod args;

pub use args::{
    CliArgs, CommandKind, CompletionsArgs, ConfigArgs, InitArgs, OutputFlags, build_cli,
    try_parse_from,
};

pub fn parse() -> CliArgs {
    args::parse_args()
}
