//! Command dispatch and implementations

use std::io;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{load_response, ApplicationError, IoResultExt, NodePath};
use crate::cli::args::{Cli, Commands, ConfigCommands, ScalarKind};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Response, ScalarView};
use crate::tree_traits::TreeDisplay;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| CliError::Usage(format!("cannot determine current directory: {e}")))?,
    };
    let settings = Settings::load(Some(&config_dir))?;
    if !settings.display.color {
        colored::control::set_override(false);
    }
    debug!(?settings, "effective settings");

    match &cli.command {
        Commands::Show { file, path } => cmd_show(&settings, file, path.as_deref()),
        Commands::Tree { file, path, props } => cmd_tree(&settings, file, path.as_deref(), props),
        Commands::Get {
            file,
            path,
            prop,
            all,
            kind,
        } => cmd_get(&settings, file, path, prop, *all, *kind),
        Commands::Info { file, path } => cmd_info(&settings, file, path.as_deref()),
        Commands::Config { command } => execute_config(&settings, &config_dir, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

fn load(settings: &Settings, file: &Path) -> CliResult<Response> {
    Ok(load_response(file, settings.responses_dir.as_deref())?)
}

fn parse_path(path: Option<&str>) -> CliResult<NodePath> {
    Ok(NodePath::parse(path.unwrap_or_default())?)
}

#[instrument(level = "debug", skip(settings))]
fn cmd_show(settings: &Settings, file: &Path, path: Option<&str>) -> CliResult<()> {
    let response = load(settings, file)?;
    let path = parse_path(path)?;
    let view = path.resolve(&response);
    if view.is_absent() {
        output::warning(&format!("nothing at {path}"));
        return Ok(());
    }
    output::info(&view.to_json_with_indent(settings.display.indent));
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_tree(settings: &Settings, file: &Path, path: Option<&str>, props: &[String]) -> CliResult<()> {
    let response = load(settings, file)?;
    let view = parse_path(path)?.resolve(&response);
    let labels = if props.is_empty() {
        settings.display.label_properties.as_slice()
    } else {
        props
    };
    output::info(&view.to_tree_string(labels));
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_get(
    settings: &Settings,
    file: &Path,
    path: &str,
    prop: &str,
    all: bool,
    kind: ScalarKind,
) -> CliResult<()> {
    let response = load(settings, file)?;
    let view = parse_path(Some(path))?.resolve(&response);

    let values = if all {
        view.properties(prop)
    } else {
        vec![view.property(prop)]
    };
    if values.iter().all(ScalarView::is_absent) {
        return Err(CliError::Usage(format!("no property '{prop}' at {path}")));
    }
    for value in values {
        output::info(&render_scalar(&value, kind)?);
    }
    Ok(())
}

/// Checked extraction: a value of another type is an error, not a default.
pub fn render_scalar(value: &ScalarView<'_>, kind: ScalarKind) -> Result<String, ApplicationError> {
    Ok(match kind {
        ScalarKind::String => value.as_str()?.to_string(),
        ScalarKind::Bytes => STANDARD.encode(value.as_bytes()?),
        ScalarKind::Int => value.as_int()?.to_string(),
        ScalarKind::Bool => value.as_bool()?.to_string(),
        ScalarKind::Float => value.as_float()?.to_string(),
        ScalarKind::Geo => value.as_geometry()?.to_string(),
        ScalarKind::Date => value.as_date()?.to_rfc3339(),
        ScalarKind::Datetime => value.as_datetime()?.to_rfc3339(),
        ScalarKind::Password => value.as_password()?.to_string(),
        ScalarKind::Uid => format!("{:#x}", value.as_uid()?),
    })
}

#[instrument(level = "debug", skip(settings))]
fn cmd_info(settings: &Settings, file: &Path, path: Option<&str>) -> CliResult<()> {
    let response = load(settings, file)?;
    let path = parse_path(path)?;
    let view = path.resolve(&response);

    output::header(&format!("{path}: {} node(s)", view.len()));
    view.each(|node| {
        let Some(n) = node.nodes().first() else {
            return;
        };
        let uid = node
            .uid()
            .map(|u| format!("{u:#x}"))
            .unwrap_or_else(|| "-".into());
        output::detail(&format!(
            "{} uid={} xid={} depth={} properties={} children={}",
            n.attribute,
            uid,
            node.xid().unwrap_or("-"),
            n.depth(),
            n.properties.len(),
            n.children.len()
        ));
    });
    Ok(())
}

fn execute_config(settings: &Settings, config_dir: &Path, cmd: &ConfigCommands) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::action("global", &exists_marker(&p)),
                None => output::warning("no global config directory on this platform"),
            }
            output::action("local", &exists_marker(&local_config_path(config_dir)));
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let target = if *global {
                global_config_path().ok_or_else(|| {
                    CliError::Usage("no global config directory on this platform".into())
                })?
            } else {
                local_config_path(config_dir)
            };
            init_config(&target)?;
            output::success(&format!("created {}", target.display()));
            Ok(())
        }
    }
}

fn exists_marker(path: &Path) -> String {
    let state = if path.exists() { "" } else { " (missing)" };
    format!("{}{}", path.display(), state)
}

fn init_config(target: &Path) -> CliResult<()> {
    if target.exists() {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            target.display()
        )));
    }
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).with_path_context("create config dir", parent)?;
    }
    std::fs::write(target, Settings::template()).with_path_context("write config", target)?;
    Ok(())
}
