use anyhow::{anyhow, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::collections::HashMap;
use tokio::fs;
use ttag::{ManifestParser, ModelRegistry, NoHooks, RawArgs, TagLibrary, Value};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let manifest_arg = Arg::new("manifest")
        .short('m')
        .long("manifest")
        .value_name("FILE")
        .help("Tag manifest (JSON, or YAML with the yaml-support feature)")
        .required(true);

    let matches = Command::new("ttag")
        .version(ttag::VERSION)
        .about("Check tag manifests and clean tag arguments")
        .subcommand_required(true)
        .subcommand(
            Command::new("check")
                .about("Load a manifest and build every tag it declares")
                .arg(manifest_arg.clone()),
        )
        .subcommand(
            Command::new("clean")
                .about("Bind and clean one tag occurrence, printing the cleaned data as JSON")
                .arg(manifest_arg)
                .arg(
                    Arg::new("tag")
                        .short('t')
                        .long("tag")
                        .value_name("NAME")
                        .help("Tag to clean")
                        .required(true),
                )
                .arg(
                    Arg::new("context")
                        .short('c')
                        .long("context")
                        .value_name("FILE")
                        .help("JSON object used to resolve variables"),
                )
                .arg(
                    Arg::new("positional")
                        .short('p')
                        .long("positional")
                        .value_name("TOKEN")
                        .help("Positional argument token, in order")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("arg")
                        .short('a')
                        .long("arg")
                        .value_name("KEY=TOKEN")
                        .help("Keyword argument")
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("flag")
                        .short('f')
                        .long("flag")
                        .value_name("KEY")
                        .help("Keyword given without a value")
                        .action(ArgAction::Append),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("check", sub)) => check(sub).await,
        Some(("clean", sub)) => clean(sub).await,
        _ => Err(anyhow!("unknown subcommand")),
    }
}

async fn load(matches: &ArgMatches) -> anyhow::Result<(TagLibrary, ModelRegistry)> {
    let path = matches
        .get_one::<String>("manifest")
        .ok_or_else(|| anyhow!("--manifest is required"))?;
    let manifest = ManifestParser::load_and_validate(path).await?;
    let library = manifest.build_library()?;
    let models = manifest.model_registry()?;
    Ok((library, models))
}

async fn check(matches: &ArgMatches) -> anyhow::Result<()> {
    let (library, models) = load(matches).await?;
    println!("{} tags, {} models", library.len(), models.len());
    for spec in library.tags() {
        let args: Vec<String> = spec
            .args()
            .map(|arg| format!("{}: {}", arg.display_name(), arg.type_name()))
            .collect();
        println!("  {} ({})", spec.name(), args.join(", "));
    }
    Ok(())
}

async fn clean(matches: &ArgMatches) -> anyhow::Result<()> {
    let (library, models) = load(matches).await?;
    let tag = matches
        .get_one::<String>("tag")
        .ok_or_else(|| anyhow!("--tag is required"))?;

    let context = match matches.get_one::<String>("context") {
        Some(path) => load_context(path, &models).await?,
        None => HashMap::new(),
    };

    let mut raw = RawArgs::new();
    for token in matches.get_many::<String>("positional").into_iter().flatten() {
        raw = raw.positional(token.as_str());
    }
    for pair in matches.get_many::<String>("arg").into_iter().flatten() {
        let (key, token) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("--arg expects KEY=TOKEN (got '{}')", pair))?;
        raw = raw.keyword(key, token);
    }
    for key in matches.get_many::<String>("flag").into_iter().flatten() {
        raw = raw.flag(key.as_str());
    }

    match library.clean(tag, &raw, &context, &NoHooks) {
        Ok(data) => {
            println!("{}", serde_json::to_string_pretty(&data.to_json())?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", serde_json::to_string_pretty(&e.report())?);
            Err(e.into())
        }
    }
}

async fn load_context(path: &str, models: &ModelRegistry) -> anyhow::Result<HashMap<String, Value>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read context file {}", path))?;
    let json: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Context file {} is not valid JSON", path))?;
    let object = json
        .as_object()
        .ok_or_else(|| anyhow!("Context file {} must hold a JSON object", path))?;

    let mut context = HashMap::new();
    for (name, value) in object {
        context.insert(name.clone(), Value::from_json(value, models)?);
    }
    Ok(context)
}
