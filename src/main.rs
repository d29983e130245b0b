use clap::{Arg, ArgAction, Command};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use selsync::logging::{self, warn};
use selsync::{
	Config, ExclusionStore, FileExclusionStore, LocalTransport, RemotePath, SelectError,
	SelectionSession, UserState,
};

///////////////////////
// Utility functions //
///////////////////////

fn cli() -> Command {
	let dir_arg = || Arg::new("dir").required(true).help("Local directory standing in for the remote folder");

	Command::new("selsync")
		.version(env!("CARGO_PKG_VERSION"))
		.author("Szilard Hajba <szilard@symbion.hu>")
		.about("Pick folders to exclude from sync")
		.subcommand_required(true)
		.arg(Arg::new("profile").short('p').long("profile").value_name("PROFILE").help("Profile"))
		.arg(Arg::new("config").short('c').long("config").value_name("FILE").help("Config file"))
		.arg(
			Arg::new("verbose")
				.short('v')
				.long("verbose")
				.action(ArgAction::SetTrue)
				.help("Debug logging"),
		)
		.subcommand(
			Command::new("tree")
				.about("Show the folder tree with selection state")
				.arg(dir_arg())
				.arg(
					Arg::new("depth")
						.short('d')
						.long("depth")
						.value_parser(clap::value_parser!(usize))
						.help("Levels to expand"),
				),
		)
		.subcommand(
			Command::new("exclude")
				.about("Exclude folders from sync")
				.arg(dir_arg())
				.arg(Arg::new("path").required(true).action(ArgAction::Append).num_args(1..)),
		)
		.subcommand(
			Command::new("include")
				.about("Include folders in sync again")
				.arg(dir_arg())
				.arg(Arg::new("path").required(true).action(ArgAction::Append).num_args(1..)),
		)
		.subcommand(Command::new("show").about("Print the stored exclusion list").arg(dir_arg()))
		.subcommand(Command::new("reset").about("Forget the stored exclusion list").arg(dir_arg()))
}

/// Store key of a sync directory
fn store_key(dir: &Path) -> Result<String, Box<dyn Error>> {
	let canonical = std::fs::canonicalize(dir)
		.map_err(|e| format!("Cannot open {}: {}", dir.display(), e))?;
	Ok(canonical.to_string_lossy().into_owned())
}

async fn open_session(
	config: &Config,
	store: &FileExclusionStore,
	dir: &Path,
	key: &str,
) -> Result<SelectionSession<LocalTransport>, Box<dyn Error>> {
	let prior = store.load(key).await?;
	let label = dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| key.to_string());

	Ok(SelectionSession::builder(Arc::new(LocalTransport::new(dir)))
		.label(label)
		.prior_exclusions(prior)
		.timeout(config.listing_timeout())
		.build())
}

fn print_tree(session: &SelectionSession<LocalTransport>) {
	let tree = session.tree();
	for (depth, id) in tree.walk() {
		if let Some(node) = tree.node(id) {
			let more = if node.children_fetched() { "" } else { " ..." };
			println!("{}{} {}{}", "    ".repeat(depth), node.state().marker(), node.name(), more);
		}
	}
}

async fn apply_toggles(
	config: &Config,
	store: &FileExclusionStore,
	dir: &Path,
	paths: Vec<&String>,
	state: UserState,
) -> Result<(), Box<dyn Error>> {
	let key = store_key(dir)?;
	let mut session = open_session(config, store, dir, &key).await?;

	for raw in paths {
		let path = RemotePath::new(raw);
		match session.reveal(&path).await? {
			Some(id) => {
				session.toggle(id, state)?;
			}
			None => warn!("No such folder: {}", path),
		}
	}

	let exclusions = session.commit_to(store, &key).await?;
	for path in exclusions {
		println!("{}", path);
	}
	Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	let matches = cli().get_matches();

	let mut config = Config::load(matches.get_one::<String>("config").map(Path::new))?;
	if let Some(profile) = matches.get_one::<String>("profile") {
		config.profile = profile.clone();
	}
	if matches.get_flag("verbose") {
		config.log_level = "debug".to_string();
	}
	config.validate()?;
	logging::init_tracing(&config.log_level, config.log_format);

	let store = FileExclusionStore::new(config.state_dir.clone(), &config.profile);
	let dir_of = |m: &clap::ArgMatches| -> Result<PathBuf, Box<dyn Error>> {
		let dir = m.get_one::<String>("dir").ok_or("directory argument required")?;
		Ok(PathBuf::from(dir))
	};

	match matches.subcommand() {
		Some(("tree", sub)) => {
			let dir = dir_of(sub)?;
			let key = store_key(&dir)?;
			let depth = sub.get_one::<usize>("depth").copied().unwrap_or(config.expand_depth);

			let mut session = open_session(&config, &store, &dir, &key).await?;
			session.expand_to_depth(depth).await?;
			if session.tree().root().is_none() {
				return Err(SelectError::NoRoot.into());
			}
			print_tree(&session);
			session.cancel();
		}
		Some(("exclude", sub)) => {
			let paths = sub.get_many::<String>("path").ok_or("exclude: at least one path required")?;
			apply_toggles(&config, &store, &dir_of(sub)?, paths.collect(), UserState::Exclude).await?;
		}
		Some(("include", sub)) => {
			let paths = sub.get_many::<String>("path").ok_or("include: at least one path required")?;
			apply_toggles(&config, &store, &dir_of(sub)?, paths.collect(), UserState::Include).await?;
		}
		Some(("show", sub)) => {
			let key = store_key(&dir_of(sub)?)?;
			for path in store.load(&key).await? {
				println!("{}", path);
			}
		}
		Some(("reset", sub)) => {
			let key = store_key(&dir_of(sub)?)?;
			store.clear(&key).await?;
		}
		_ => unreachable!("subcommand_required is set"),
	}

	Ok(())
}

// vim: ts=4
