// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: formula name or path
fn formula_arg() -> Arg {
    Arg::new("formula")
        .required(true)
        .help("Built-in formula name or path to a formula .toml file")
}

fn build_cli() -> Command {
    Command::new("tapster")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Tapster Contributors")
        .about("Build libraries from source formulas into an installation prefix")
        .subcommand_required(false)
        .subcommand(Command::new("list").about("List built-in formulas"))
        .subcommand(
            Command::new("info")
                .about("Show a formula and the configure line it resolves to")
                .arg(formula_arg())
                .arg(
                    Arg::new("prefix")
                        .long("prefix")
                        .default_value("/usr/local/opt/<formula>")
                        .help("Prefix to show in the configure line"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Parse and validate a formula file")
                .arg(Arg::new("path").required(true).help("Path to the formula .toml file")),
        )
        .subcommand(
            Command::new("install")
                .about("Configure, build and install a formula from an extracted source tree")
                .arg(formula_arg())
                .arg(
                    Arg::new("source")
                        .short('s')
                        .long("source")
                        .required(true)
                        .help("Extracted source tree"),
                )
                .arg(
                    Arg::new("prefix")
                        .short('p')
                        .long("prefix")
                        .required(true)
                        .help("Installation prefix"),
                )
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help("Number of parallel make jobs (default: TAPSTER_JOBS or CPU count)"),
                )
                .arg(
                    Arg::new("make")
                        .long("make")
                        .help("Make program (default: TAPSTER_MAKE or \"make\")"),
                )
                .arg(
                    Arg::new("no_receipt")
                        .long("no-receipt")
                        .action(ArgAction::SetTrue)
                        .help("Do not write INSTALL_RECEIPT.json into the prefix"),
                )
                .arg(
                    Arg::new("show_log")
                        .long("show-log")
                        .action(ArgAction::SetTrue)
                        .help("Print the captured build log"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(Arg::new("shell").required(true).help("Shell to generate completions for")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("tapster.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
