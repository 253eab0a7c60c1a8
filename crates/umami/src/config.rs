use crate::events::AppEvent;
use async_channel::Sender;
use derive_more::{AsRef, Deref, Display, From, Into};
use directories::ProjectDirs;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use turntable::ItemId;
use turntable::slot::SLOT_COUNT;
use turntable::tuning::{GateTuning, HandoffTuning, Timing, Tuning, TuningError};

const DEFAULT_LABELS: [&str; SLOT_COUNT] = ["Shoyu", "Miso", "Tonkotsu", "Shio", "Tantanmen"];
const DEFAULT_RECIPES_URL: &str = "http://localhost:3000";

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct RecipesUrl(String);

turntable::impl_name_newtype!(RecipesUrl);

impl Default for RecipesUrl {
    fn default() -> Self {
        Self::new(DEFAULT_RECIPES_URL)
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct BowlLabel(String);

turntable::impl_name_newtype!(BowlLabel);

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BowlConfig {
    pub label: Option<BowlLabel>,
    pub image: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub recipes_url: RecipesUrl,
    #[serde(default)]
    pub kiosk: bool,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub gate: GateTuning,
    #[serde(default)]
    pub handoff: HandoffTuning,
    #[serde(default)]
    pub bowls: Vec<BowlConfig>,
}

impl Config {
    pub fn tuning(&self) -> Tuning {
        Tuning {
            timing: self.timing.clone(),
            gate: self.gate.clone(),
            handoff: self.handoff.clone(),
        }
    }

    /// Exactly one entry per item; missing entries get a stock label.
    pub fn bowl(&self, item: ItemId) -> BowlConfig {
        let configured = self.bowls.get(item.index()).cloned().unwrap_or_default();
        BowlConfig {
            label: configured
                .label
                .or_else(|| DEFAULT_LABELS.get(item.index()).map(|l| BowlLabel::new(*l))),
            image: configured.image,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid tuning: {0}")]
    Tuning(#[from] TuningError),
    #[error("At most five bowls can be configured, found {0}")]
    TooManyBowls(usize),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "umami", "umami").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("UMAMI").separator("__"))
        .build()?;

    let config: Config = s.try_deserialize()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.bowls.len() > SLOT_COUNT {
        return Err(ConfigError::TooManyBowls(config.bowls.len()));
    }
    config.tuning().validate()?;
    Ok(())
}

/// First run writes the bundled defaults so there is a file to edit.
pub fn load_or_setup() -> Config {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        match write_default_config() {
            Ok(path) => log::info!("Wrote default configuration to {}", path.display()),
            Err(e) => log::warn!("Failed to write default configuration: {}", e),
        }
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Files whose changes trigger a reload: the config file and every
/// configured bowl image.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchSet {
    config_path: PathBuf,
    images: BTreeSet<PathBuf>,
}

impl WatchSet {
    pub fn new(config_path: PathBuf, config: &Config) -> Self {
        Self {
            images: ItemId::all().filter_map(|item| config.bowl(item).image).collect(),
            config_path,
        }
    }

    /// notify watches directories so that replaced files keep being seen.
    pub fn directories(&self) -> BTreeSet<PathBuf> {
        std::iter::once(&self.config_path)
            .chain(&self.images)
            .filter_map(|p| p.parent())
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect()
    }

    pub fn touches_config(&self, event: &Event) -> bool {
        is_change(event) && event.paths.iter().any(|p| p == &self.config_path)
    }

    pub fn touches_any(&self, event: &Event) -> bool {
        is_change(event)
            && event
                .paths
                .iter()
                .any(|p| p == &self.config_path || self.images.contains(p))
    }
}

fn is_change(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    )
}

/// Brings the watched directories in line with `next`. Directories that
/// cannot be watched are skipped with a warning.
fn rewatch(watcher: &mut impl Watcher, current: &mut BTreeSet<PathBuf>, next: BTreeSet<PathBuf>) {
    for dir in current.difference(&next) {
        if let Err(e) = watcher.unwatch(dir) {
            log::debug!("Failed to unwatch {}: {}", dir.display(), e);
        }
    }
    let mut watched = BTreeSet::new();
    for dir in next {
        if current.contains(&dir) {
            watched.insert(dir);
            continue;
        }
        match watcher.watch(&dir, RecursiveMode::NonRecursive) {
            Ok(()) => {
                log::debug!("Watching {}", dir.display());
                watched.insert(dir);
            }
            Err(e) => log::warn!("Not watching {}: {}", dir.display(), ConfigError::from(e)),
        }
    }
    *current = watched;
}

/// Sends a reload whenever the config file or a bowl image changes. A
/// config change also re-reads the image list so new images are watched.
pub async fn run_async_watcher(tx: Sender<AppEvent>, config: Config) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    if let Some(dir) = config_path.parent()
        && let Err(e) = fs_err::create_dir_all(dir)
    {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    let mut set = WatchSet::new(config_path, &config);
    let mut watched = BTreeSet::new();
    rewatch(&mut watcher, &mut watched, set.directories());

    while let Ok(res) = bridge_rx.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                log::error!("Watch error: {}", e);
                continue;
            }
        };
        if !set.touches_any(&event) {
            continue;
        }
        if set.touches_config(&event)
            && let Ok(next) = load_config()
        {
            set = WatchSet::new(set.config_path.clone(), &next);
            rewatch(&mut watcher, &mut watched, set.directories());
        }
        if tx.send(AppEvent::ConfigReload).await.is_err() {
            break;
        }
    }
}
