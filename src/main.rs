use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use colored::Colorize;
use playtree::{
    api::{self, Session},
    utils::split_file_name,
    FileDraft, FileRef, FolderDraft, FolderRef, TreeCommand,
};
use std::path::{Path, PathBuf};

fn tree_arg() -> Arg {
    Arg::new("tree")
        .help("tree file, or the name of a tree listed in playtree.toml")
        .required(true)
}

fn parent_arg() -> Arg {
    Arg::new("in")
        .long("in")
        .value_name("PATH")
        .help("folder path the command applies to, e.g. src/components (default: root)")
}

fn ext_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).value_name("EXT").help(help)
}

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("configuration file (default: ./playtree.toml when present)")
                .global(true),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .help("replace same-named siblings instead of rejecting new files and folders")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("yes")
                .short('y')
                .long("yes")
                .help("do not ask for confirmation")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("new")
                .about("Creates an empty tree file")
                .arg(Arg::new("file").help("path of the tree file").required(true))
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("name of the root folder (default: file stem)"),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Prints the whole tree")
                .arg(tree_arg()),
        )
        .subcommand(
            Command::new("ls")
                .about("Lists the children of a folder")
                .arg(tree_arg())
                .arg(Arg::new("path").help("folder path (default: root)")),
        )
        .subcommand(
            Command::new("add-file")
                .about("Adds an empty file")
                .arg(tree_arg())
                .arg(Arg::new("name").help("file name, e.g. index.ts").required(true))
                .arg(ext_arg("ext", "extension; the name is then taken verbatim"))
                .arg(parent_arg()),
        )
        .subcommand(
            Command::new("add-folder")
                .about("Adds an empty folder")
                .arg(tree_arg())
                .arg(Arg::new("name").help("folder name").required(true))
                .arg(parent_arg()),
        )
        .subcommand(
            Command::new("rm-file")
                .about("Deletes a file")
                .arg(tree_arg())
                .arg(Arg::new("name").help("file name").required(true))
                .arg(ext_arg("ext", "extension; the name is then taken verbatim"))
                .arg(parent_arg()),
        )
        .subcommand(
            Command::new("rm-folder")
                .about("Deletes a folder and everything in it")
                .arg(tree_arg())
                .arg(Arg::new("name").help("folder name").required(true))
                .arg(parent_arg()),
        )
        .subcommand(
            Command::new("rename-file")
                .about("Renames a file, keeping its content")
                .arg(tree_arg())
                .arg(Arg::new("name").help("current file name").required(true))
                .arg(Arg::new("new-name").help("new file name").required(true))
                .arg(ext_arg("ext", "current extension; the name is then taken verbatim"))
                .arg(ext_arg("new-ext", "new extension; the new name is then taken verbatim"))
                .arg(parent_arg()),
        )
        .subcommand(
            Command::new("rename-folder")
                .about("Renames a folder")
                .arg(tree_arg())
                .arg(Arg::new("name").help("current folder name").required(true))
                .arg(Arg::new("new-name").help("new folder name").required(true))
                .arg(parent_arg()),
        )
        .subcommand(
            Command::new("import")
                .about("Builds a tree file from a directory")
                .arg(Arg::new("directory").help("directory to read").required(true))
                .arg(Arg::new("output").help("tree file to create").required(true)),
        )
        .subcommand(
            Command::new("export")
                .about("Writes a tree to a directory")
                .arg(tree_arg())
                .arg(
                    Arg::new("destination")
                        .help("directory to write into")
                        .required(true),
                ),
        )
        .get_matches();

    let is_verbose = matches.get_flag("verbose");

    init_logging(is_verbose);

    let session = Session::new(
        matches.get_one::<String>("config").map(Path::new),
        matches.get_flag("overwrite"),
        matches.get_flag("yes"),
    )?;

    match matches.subcommand() {
        Some(("new", args)) => handle_new(args)?,
        Some(("show", args)) => api::show(&session, value(args, "tree"))?,
        Some(("ls", args)) => api::list(&session, value(args, "tree"), value(args, "path"))?,
        Some(("import", args)) => api::import(
            Path::new(value(args, "directory")),
            Path::new(value(args, "output")),
        )?,
        Some(("export", args)) => handle_export(&session, args)?,
        Some((name, args)) => handle_edit(&session, name, args)?,
        None => unreachable!(),
    }

    Ok(())
}

fn init_logging(is_verbose: bool) {
    let level = if is_verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    log::debug!("executing in verbose mode");
}

/// Value of a string argument, empty when an optional one was omitted.
fn value<'a>(args: &'a ArgMatches, id: &str) -> &'a str {
    args.get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

/// Splits a file name argument at its last dot, unless the extension was
/// given separately.
fn file_name(args: &ArgMatches, name: &str, ext: &str) -> (String, String) {
    match args.get_one::<String>(ext) {
        Some(extension) => (value(args, name).to_string(), extension.clone()),
        None => split_file_name(value(args, name)),
    }
}

fn handle_new(args: &ArgMatches) -> Result<(), api::PlaytreeError> {
    let file = PathBuf::from(value(args, "file"));
    let name = args.get_one::<String>("name").map(String::as_str);

    api::new_tree(&file, name)
}

fn handle_export(session: &Session, args: &ArgMatches) -> Result<(), api::PlaytreeError> {
    let destination = PathBuf::from(value(args, "destination"));

    let outcome = api::export(session, value(args, "tree"), &destination)?;

    if !outcome.is_committed() {
        println!("{}", "aborted".yellow());
    }

    Ok(())
}

/// Maps the structural subcommands onto a [`TreeCommand`].
fn handle_edit(
    session: &Session,
    name: &str,
    args: &ArgMatches,
) -> Result<(), api::PlaytreeError> {
    let parent = value(args, "in").to_string();
    let target = value(args, "name");

    let command = match name {
        "add-file" => {
            let (filename, extension) = file_name(args, "name", "ext");
            TreeCommand::AddFile {
                file: FileDraft::new(filename, extension),
                parent,
            }
        }
        "add-folder" => TreeCommand::AddFolder {
            folder: FolderDraft::new(target),
            parent,
        },
        "rm-file" => {
            let (filename, extension) = file_name(args, "name", "ext");
            TreeCommand::DeleteFile {
                file: FileRef::new(filename, extension),
                parent,
            }
        }
        "rm-folder" => TreeCommand::DeleteFolder {
            folder: FolderRef::new(target),
            parent,
        },
        "rename-file" => {
            let (filename, extension) = file_name(args, "name", "ext");
            let (new_filename, new_extension) = file_name(args, "new-name", "new-ext");
            TreeCommand::RenameFile {
                file: FileRef::new(filename, extension),
                new_filename,
                new_extension,
                parent,
            }
        }
        "rename-folder" => TreeCommand::RenameFolder {
            folder: FolderRef::new(target),
            new_folder_name: value(args, "new-name").to_string(),
            parent,
        },
        _ => unreachable!(),
    };

    api::run(session, value(args, "tree"), command)?;

    Ok(())
}
