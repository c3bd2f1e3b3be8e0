extern crate core;
extern crate libipk;

use std::io::Write;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "IPK CLI")]
#[command(about, author, version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check if the "IPK" module file can be extract
    Check {
        /// "IPK" module file
        file: String,
    },
    /// Print debugging information on the "IPK" module file
    #[command(arg_required_else_help = true)]
    Debug {
        /// "IPK" module file
        file: String,
        /// Filter results by entry name
        #[arg(long)]
        name: Option<String>,
    },
    /// Extract packed files from the "IPK" module file
    #[command(arg_required_else_help = true)]
    Extract {
        /// "IPK" module file
        file: String,
        /// Outbound directory (defaults to the module directory)
        #[arg(short, long, value_name = "DIR")]
        out: Option<String>,
    },
    /// Print a list of files packed in the "IPK" module file
    #[command(arg_required_else_help = true)]
    Ls {
        /// "IPK" module file
        file: String,
        /// Print the list as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Serialize, Debug)]
struct EntryRow {
    name: String,
    offset: u64,
    payload_size: u32,
    size: u32,
}

struct FileSink {
    bar: indicatif::ProgressBar,
    module: String,
    out: Option<String>,
}

impl libipk::reader::EntrySink for FileSink {
    fn write_entry(&mut self, name: &str, content: &[u8]) -> std::io::Result<()> {
        self.bar.set_message(String::from(name));

        let path = match &self.out {
            None => libipk::naming::replace_basename(&self.module, name),
            Some(out) => format!("{}/{}", out, name),
        };

        let mut output = std::fs::File::create(path)?;
        output.write_all(content)?;
        self.bar.inc(1);

        Ok(())
    }
}

pub fn main() -> Result<()> {
    let stdout = console::Term::stdout();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { file } => command_check(stdout, file)?,
        Commands::Debug { file, name } => command_debug(stdout, file, name)?,
        Commands::Extract { file, out } => command_extract(stdout, file, out)?,
        Commands::Ls { file, json } => command_ls(stdout, file, json)?,
    }

    Ok(())
}

fn command_check(stdout: console::Term, file: String) -> Result<()> {
    let module_path = resolve_module_path(&file)?;
    let module = std::fs::File::open(&module_path).into_diagnostic()?;
    let tmp = tempdir::TempDir::new("ipk").into_diagnostic()?;
    let bar = indicatif::ProgressBar::new_spinner();

    bar.set_style(get_spinner_style()?);

    let mut sink = FileSink {
        bar: bar.clone(),
        module: module_path,
        out: Some(tmp.path().to_string_lossy().into_owned()),
    };

    let list = libipk::reader::extract(&module, &mut sink).into_diagnostic()?;

    bar.finish_and_clear();

    let text = format!("OK: {} files can be extracted", list.len());
    stdout.write_line(&text).into_diagnostic()?;

    Ok(())
}

fn command_debug(stdout: console::Term, file: String, name: Option<String>) -> Result<()> {
    let module_path = resolve_module_path(&file)?;
    let module = std::fs::File::open(&module_path).into_diagnostic()?;
    let mut list = libipk::reader::get_list(&module).into_diagnostic()?;

    let mut total_content_size: u64 = 0;
    let mut total_name_size: u64 = 0;
    let mut total_files: u32 = 0;

    for item in &list {
        total_content_size += u64::from(item.size);
        total_name_size += u64::from(item.payload_size - item.size);
        total_files += 1;
    }

    if let Some(name) = name {
        list.retain(|item| item.name.contains(&name));
    };

    for (index, item) in list.iter().enumerate() {
        let text = format!("Index: {};\nItem: {:#?};\n", index, item);
        stdout.write_line(&text).into_diagnostic()?;
    }

    let text = format!(
        "Total files: {};\nTotal content size: {} (bytes);\nTotal name region size: {} (bytes);",
        total_files, total_content_size, total_name_size
    );

    stdout.write_line(&text).into_diagnostic()?;

    Ok(())
}

fn command_extract(stdout: console::Term, file: String, out: Option<String>) -> Result<()> {
    let module_path = resolve_module_path(&file)?;
    let module = std::fs::File::open(&module_path).into_diagnostic()?;
    let bar = indicatif::ProgressBar::new_spinner();

    bar.set_style(get_spinner_style()?);

    let mut sink = FileSink {
        bar: bar.clone(),
        module: module_path,
        out,
    };

    let list = libipk::reader::extract(&module, &mut sink).into_diagnostic()?;

    bar.finish_and_clear();

    let text = format!("Extracted {} files", list.len());
    stdout.write_line(&text).into_diagnostic()?;

    Ok(())
}

fn command_ls(stdout: console::Term, file: String, json: bool) -> Result<()> {
    let module_path = resolve_module_path(&file)?;
    let module = std::fs::File::open(&module_path).into_diagnostic()?;
    let list = libipk::reader::get_list(&module).into_diagnostic()?;

    if json {
        let rows: Vec<EntryRow> = list.iter().map(get_entry_row).collect();
        let text = serde_json::to_string_pretty(&rows).into_diagnostic()?;
        stdout.write_line(&text).into_diagnostic()?;
        return Ok(());
    }

    for entry in list {
        stdout.write_line(&entry.name).into_diagnostic()?;
    }

    Ok(())
}

fn get_entry_row(entry: &libipk::reader::Entry) -> EntryRow {
    EntryRow {
        name: entry.name.clone(),
        offset: entry.offset,
        payload_size: entry.payload_size,
        size: entry.size,
    }
}

fn get_spinner_style() -> Result<indicatif::ProgressStyle> {
    Ok(
        indicatif::ProgressStyle::with_template("{spinner} {pos:>7} {msg}")
            .into_diagnostic()?,
    )
}

fn resolve_module_path(file: &String) -> Result<String> {
    let path = std::path::Path::new(file);

    if !path.is_file() {
        miette::bail!("\"{}\" is not a regular module file", file);
    }

    let path = std::fs::canonicalize(path).into_diagnostic()?;
    Ok(path.to_string_lossy().into_owned())
}
