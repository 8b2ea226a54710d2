use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};

use crate::resource::{LocationRef, MetastoreCommand};

#[derive(Debug, Clone)]
pub struct OutputFlags {
    pub json: bool,
    pub markdown: bool,
    pub pretty: bool,
}

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub profile: Option<String>,
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
    pub quota_project: Option<String>,
    pub timeout_ms: Option<u64>,
    pub output: OutputFlags,
    pub verbose: u8,
    pub quiet: bool,
    pub command: CommandKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Help { all: bool, command: Option<String> },
    Metastore(MetastoreCommand),
    Init(InitArgs),
    Config(ConfigArgs),
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitArgs {
    pub path: Option<PathBuf>,
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigArgs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionsArgs {
    pub shell: Option<String>,
}

/// Identifier flags, in path order.
const IDENTIFIERS: [(&str, &str, &str); 4] = [
    ("project_id", "project-id", "Google Cloud project ID"),
    ("location", "location", "Google Cloud location, e.g. us-central1"),
    ("catalog", "catalog", "BigLake Metastore catalog name"),
    ("database", "database", "Database name within the catalog"),
];

pub fn build_cli(show_all: bool) -> Command {
    let mut cmd = Command::new("blmcli")
        .about("BigLake Metastore CLI for catalogs, databases and tables")
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .disable_help_subcommand(true)
        .subcommand_value_name("COMMAND");

    cmd = add_global_args(cmd);

    cmd = cmd.subcommand(command_help());

    cmd = cmd.subcommand(command_metastore(
        "catalog_list",
        "List catalogs in a project location",
        "catalog-list",
        2,
    ));
    cmd = cmd.subcommand(command_metastore(
        "catalog_create",
        "Create a catalog in a project location",
        "catalog-create",
        3,
    ));
    cmd = cmd.subcommand(command_metastore(
        "database_list",
        "List databases in a catalog",
        "database-list",
        3,
    ));
    cmd = cmd.subcommand(command_metastore(
        "database_create",
        "Create a HIVE database in a catalog",
        "database-create",
        4,
    ));
    cmd = cmd.subcommand(command_metastore(
        "table_list",
        "List tables in a database",
        "table-list",
        4,
    ));

    cmd = cmd.subcommand(command_init());
    cmd = cmd.subcommand(command_config());
    cmd = cmd.subcommand(command_completions(show_all));

    cmd
}

pub fn parse_args() -> CliArgs {
    let matches = build_cli(false).get_matches();
    parse_matches(&matches)
}

pub fn try_parse_from<I, T>(args: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build_cli(false).try_get_matches_from(args)?;
    Ok(parse_matches(&matches))
}

fn add_global_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("config")
            .long("config")
            .value_name("PATH")
            .value_hint(ValueHint::FilePath)
            .global(true)
            .help("Override config file location"),
    )
    .arg(
        Arg::new("env-file")
            .long("env-file")
            .value_name("PATH")
            .value_hint(ValueHint::FilePath)
            .global(true)
            .help("Load environment variables from file (default: .env)"),
    )
    .arg(
        Arg::new("profile")
            .long("profile")
            .value_name("NAME")
            .global(true)
            .help("Select config profile"),
    )
    .arg(
        Arg::new("endpoint")
            .long("endpoint")
            .value_name("URL")
            .value_hint(ValueHint::Url)
            .global(true)
            .help("BigLake API base URL (default: https://biglake.googleapis.com/v1)"),
    )
    .arg(
        Arg::new("access-token")
            .long("access-token")
            .value_name("TOKEN")
            .global(true)
            .help("OAuth access token (default: gcloud auth print-access-token)"),
    )
    .arg(
        Arg::new("quota-project")
            .long("quota-project")
            .value_name("PROJECT")
            .global(true)
            .help("Project billed for API quota"),
    )
    .arg(
        Arg::new("timeout")
            .long("timeout")
            .value_name("MS")
            .value_parser(clap::value_parser!(u64))
            .global(true)
            .help("Request timeout in milliseconds"),
    )
    .arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Output as JSON"),
    )
    .arg(
        Arg::new("markdown")
            .long("markdown")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Render the config table as markdown"),
    )
    .arg(
        Arg::new("pretty")
            .long("pretty")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Render the config table with box borders"),
    )
    .arg(
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .global(true)
            .help("Enable debug logging"),
    )
    .arg(
        Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Suppress output of local commands (service responses still print)"),
    )
}

fn command_help() -> Command {
    Command::new("help")
        .about("Show help for commands")
        .arg(
            Arg::new("all")
                .long("all")
                .action(ArgAction::SetTrue)
                .help("Show all commands, including advanced ones"),
        )
        .arg(Arg::new("command").value_name("COMMAND"))
}

/// A metastore command taking the first `depth` identifier flags, all required.
fn command_metastore(
    name: &'static str,
    about: &'static str,
    alias: &'static str,
    depth: usize,
) -> Command {
    let mut cmd = Command::new(name).about(about).visible_alias(alias);
    for (id, long_alias, help) in IDENTIFIERS.iter().take(depth) {
        let mut arg = Arg::new(*id)
            .long(*id)
            .value_name("NAME")
            .required(true)
            .value_parser(NonEmptyStringValueParser::new())
            .help(*help);
        if long_alias != id {
            arg = arg.alias(*long_alias);
        }
        cmd = cmd.arg(arg);
    }
    cmd
}

fn command_advanced(name: &'static str, about: &'static str, show_all: bool) -> Command {
    let cmd = Command::new(name).about(about);
    if show_all { cmd } else { cmd.hide(true) }
}

fn command_init() -> Command {
    Command::new("init")
        .about("Create config file")
        .arg(
            Arg::new("path")
                .long("path")
                .value_name("path")
                .value_hint(ValueHint::FilePath),
        )
        .arg(Arg::new("force").long("force").action(ArgAction::SetTrue))
}

fn command_config() -> Command {
    Command::new("config").about("Display resolved config")
}

fn command_completions(show_all: bool) -> Command {
    command_advanced("completions", "Generate shell completions", show_all).arg(
        Arg::new("shell")
            .long("shell")
            .value_name("name")
            .value_parser(["bash", "zsh", "fish", "powershell", "elvish"]),
    )
}

fn parse_matches(matches: &ArgMatches) -> CliArgs {
    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let env_file = matches.get_one::<String>("env-file").map(PathBuf::from);
    let profile = matches.get_one::<String>("profile").cloned();
    let endpoint = matches.get_one::<String>("endpoint").cloned();
    let access_token = matches.get_one::<String>("access-token").cloned();
    let quota_project = matches.get_one::<String>("quota-project").cloned();
    let timeout_ms = matches.get_one::<u64>("timeout").copied();
    let output = OutputFlags {
        json: matches.get_flag("json"),
        markdown: matches.get_flag("markdown"),
        pretty: matches.get_flag("pretty"),
    };
    let verbose = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");

    let command = match matches.subcommand() {
        Some(("help", sub_m)) => CommandKind::Help {
            all: sub_m.get_flag("all"),
            command: sub_m.get_one::<String>("command").cloned(),
        },
        Some(("catalog_list", sub_m)) => CommandKind::Metastore(MetastoreCommand::CatalogList {
            parent: location_ref(sub_m),
        }),
        Some(("catalog_create", sub_m)) => {
            CommandKind::Metastore(MetastoreCommand::CatalogCreate {
                parent: location_ref(sub_m),
                catalog: identifier(sub_m, "catalog"),
            })
        }
        Some(("database_list", sub_m)) => CommandKind::Metastore(MetastoreCommand::DatabaseList {
            parent: location_ref(sub_m).catalog(identifier(sub_m, "catalog")),
        }),
        Some(("database_create", sub_m)) => {
            CommandKind::Metastore(MetastoreCommand::DatabaseCreate {
                parent: location_ref(sub_m).catalog(identifier(sub_m, "catalog")),
                database: identifier(sub_m, "database"),
            })
        }
        Some(("table_list", sub_m)) => CommandKind::Metastore(MetastoreCommand::TableList {
            parent: location_ref(sub_m)
                .catalog(identifier(sub_m, "catalog"))
                .database(identifier(sub_m, "database")),
        }),
        Some(("init", sub_m)) => CommandKind::Init(InitArgs {
            path: sub_m.get_one::<String>("path").map(PathBuf::from),
            force: sub_m.get_flag("force"),
        }),
        Some(("config", _)) => CommandKind::Config(ConfigArgs),
        Some(("completions", sub_m)) => CommandKind::Completions(CompletionsArgs {
            shell: sub_m.get_one::<String>("shell").cloned(),
        }),
        _ => CommandKind::Help {
            all: false,
            command: None,
        },
    };

    CliArgs {
        config_path,
        env_file,
        profile,
        endpoint,
        access_token,
        quota_project,
        timeout_ms,
        output,
        verbose,
        quiet,
        command,
    }
}

// Presence and non-emptiness are enforced by clap before we get here.
fn identifier(matches: &ArgMatches, id: &str) -> String {
    matches.get_one::<String>(id).cloned().unwrap_or_default()
}

fn location_ref(matches: &ArgMatches) -> LocationRef {
    LocationRef::new(
        identifier(matches, "project_id"),
        identifier(matches, "location"),
    )
}
