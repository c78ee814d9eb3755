//! Command-line front end for the styleguide engine.
//!
//! Lists the catalog as JSON, looks up handles, and renders components either
//! bare (`render`) or wrapped in their layout (`preview`). HTML goes to stdout;
//! diagnostics go to stderr at the level set by `STYLEGUIDE_LOG`.

use anyhow::{Context, Result, anyhow, bail};
use serde_json::Value;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use styleguide::{
    RenderRequest, Styleguide, StyleguideOptions, find_catalog_root, logging,
};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    logging::init();
    let cli = Cli::parse_from(env::args_os().skip(1))?;
    let root = find_catalog_root(cli.root.as_deref())?;
    let styleguide = Styleguide::new(StyleguideOptions::new(root));

    match cli.command {
        Command::Tree => {
            let tree = styleguide.catalog_tree()?;
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        Command::Lookup { handle } => {
            let record = styleguide.lookup_handle(&handle)?;
            println!("{}", serde_json::to_string_pretty(&*record)?);
        }
        Command::Render { request, preview } => {
            let html = if preview {
                styleguide.render_component_preview(&request)?
            } else {
                styleguide.render_component(&request)?
            };
            println!("{html}");
        }
    }
    Ok(())
}

#[derive(Debug)]
struct Cli {
    root: Option<PathBuf>,
    command: Command,
}

#[derive(Debug)]
enum Command {
    Tree,
    Lookup { handle: String },
    Render { request: RenderRequest, preview: bool },
}

impl Cli {
    fn parse_from(args: impl IntoIterator<Item = OsString>) -> Result<Self> {
        let mut args = args.into_iter();
        let mut root: Option<PathBuf> = None;
        let mut positional: Vec<String> = Vec::new();
        let mut variant: Option<String> = None;
        let mut context: Option<Value> = None;
        let mut merge_defaults = true;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--root" => root = Some(PathBuf::from(next_value(&mut args, "--root")?)),
                "--variant" => variant = Some(next_value(&mut args, "--variant")?),
                "--context" => {
                    let raw = next_value(&mut args, "--context")?;
                    let parsed: Value = serde_json::from_str(&raw)
                        .with_context(|| format!("invalid JSON for --context: {raw}"))?;
                    if !parsed.is_object() {
                        bail!("--context must be a JSON object");
                    }
                    context = Some(parsed);
                }
                "--no-defaults" => merge_defaults = false,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other if other.starts_with("--") => bail!("unknown flag: {other}"),
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            Some("tree") => Command::Tree,
            Some("lookup") => Command::Lookup {
                handle: positional
                    .next()
                    .ok_or_else(|| anyhow!("lookup requires a handle"))?,
            },
            Some(name @ ("render" | "preview")) => {
                let preview = name == "preview";
                let handle = positional
                    .next()
                    .ok_or_else(|| anyhow!("{name} requires a handle"))?;
                let mut request = RenderRequest::new(handle).merge_defaults(merge_defaults);
                if let Some(variant) = variant.take() {
                    request = request.variant(variant);
                }
                if let Some(context) = context.take() {
                    request = request.context(context);
                }
                Command::Render { request, preview }
            }
            Some(other) => bail!("unknown command: {other}\n{}", usage()),
            None => bail!("missing command\n{}", usage()),
        };
        if let Some(extra) = positional.next() {
            bail!("unexpected argument: {extra}");
        }
        if !matches!(command, Command::Render { .. }) && (variant.is_some() || context.is_some()) {
            bail!("--variant and --context only apply to render and preview");
        }

        Ok(Cli { root, command })
    }
}

fn next_value(args: &mut impl Iterator<Item = OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: styleguide [--root DIR] tree\n\
       styleguide [--root DIR] lookup HANDLE\n\
       styleguide [--root DIR] render|preview HANDLE [--variant ID] [--context JSON] [--no-defaults]\n\
The catalog root defaults to $STYLEGUIDE_ROOT, then ./components.\n"
}

fn print_usage() {
    print!("{}", usage());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli> {
        Cli::parse_from(args.iter().map(OsString::from))
    }

    #[test]
    fn render_flags_build_a_request() {
        let cli = parse(&[
            "--root",
            "kit",
            "preview",
            "button",
            "--variant",
            "primary",
            "--context",
            r#"{"text":"Go"}"#,
            "--no-defaults",
        ])
        .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("kit")));
        let Command::Render { request, preview } = cli.command else {
            panic!("expected render command");
        };
        assert!(preview);
        assert_eq!(request.handle, "button");
        assert_eq!(request.variant.as_deref(), Some("primary"));
        assert!(!request.merge_defaults);
    }

    #[test]
    fn rejects_missing_handles_and_stray_flags() {
        assert!(parse(&["lookup"]).is_err());
        assert!(parse(&["tree", "--variant", "x"]).is_err());
        assert!(parse(&["render", "button", "--context", "[1]"]).is_err());
        assert!(parse(&["bogus"]).is_err());
    }
}
