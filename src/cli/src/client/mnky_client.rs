use super::mnky_client_models::{
    ConfigurationDetails, ConfigurationInfo, FailureView, RunConfig, RunReport, SourceFile,
};
use super::variables::load_global_variables;
use crate::core::error::MnkyError;
use indexmap::IndexMap;
use mnky_lib::syntax::keywords::OPTION_INCLUDE;
use mnky_lib::{
    ApplyStats, Configuration, DocumentSnapshot, Event, Monkey, MonkeyOptions, RawConfiguration,
    Repository, Tree, Variable,
};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

const EXTENSION: &str = "mnky";

#[derive(Default)]
struct RunEvents {
    applied: Vec<ApplyStats>,
    failures: Vec<FailureView>,
}

pub struct MnkyClient {
    config: RunConfig,
}

impl MnkyClient {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Loads the document and the configurations, lets a Monkey tick over
    /// the document and reports what happened.
    pub async fn run(&self) -> Result<RunReport, MnkyError> {
        let source_path = Path::new(&self.config.source_path);
        let sources = Self::load_sources(source_path)?;
        for name in &self.config.names {
            if !sources.iter().any(|source| &source.name == name) {
                return Err(MnkyError::ConfigurationNotFound(name.clone()));
            }
        }

        let global_variables = load_global_variables(source_path)?;
        let values = self.parse_cli_variables()?;
        let raw_configurations = sources
            .into_iter()
            .map(|source| {
                let enabled = if self.config.names.is_empty() {
                    !Configuration::new(&source.content).is_template()
                } else {
                    self.config.names.contains(&source.name)
                };
                RawConfiguration {
                    name: source.name,
                    content: source.content,
                    enabled,
                    values: if enabled { values.clone() } else { IndexMap::new() },
                }
            })
            .collect();

        let snapshot: DocumentSnapshot =
            serde_json::from_str(&fs::read_to_string(&self.config.document_path)?)?;
        let options = MonkeyOptions {
            with_undo: self.config.with_undo,
            interval: Duration::from_millis(self.config.interval_ms),
            undo_limit: self.config.undo_limit,
        };
        let mut monkey = Monkey::new(
            Tree::from_snapshot(&snapshot),
            raw_configurations,
            global_variables,
            options,
        );

        let events = Rc::new(RefCell::new(RunEvents::default()));
        let sink = Rc::clone(&events);
        monkey.add_observer(move |event: &Event<'_>| {
            let mut events = sink.borrow_mut();
            match event {
                Event::Applied { stats } => events.applied.push((*stats).clone()),
                Event::Failed {
                    configuration,
                    message,
                } => events.failures.push(FailureView {
                    configuration: configuration.to_string(),
                    message: message.clone(),
                }),
                Event::AddUndo { elements } => {
                    tracing::debug!("{} new undo elements", elements.len())
                }
            }
        });

        let started = monkey.start();
        if started == 0 {
            tracing::warn!(
                "No enabled configuration matches {}",
                snapshot.location
            );
        }

        let interval = monkey.interval();
        let mut ticker = tokio::time::interval(interval);
        for _ in 0..self.config.ticks {
            ticker.tick().await;
            let ran = monkey.advance(interval);
            tracing::debug!("Advanced {interval:?}, {ran} ticks ran");
        }

        if self.config.revert {
            monkey.stop();
        }

        let events = std::mem::take(&mut *events.borrow_mut());
        Ok(RunReport {
            location: snapshot.location,
            started,
            ticks: self.config.ticks,
            undo_length: monkey.undo_length(),
            applied: events.applied,
            failures: events.failures,
            url_rules: monkey.urls().rules().cloned().collect(),
            inline_rules: monkey.inline_rules().rules().cloned().collect(),
            document: monkey.document().to_snapshot(),
        })
    }

    pub fn list_configurations(source_path: &Path) -> Result<Vec<ConfigurationInfo>, MnkyError> {
        let sources = Self::load_sources(source_path)?;
        let repository = Self::repository(&sources, load_global_variables(source_path)?);

        let mut configurations: Vec<ConfigurationInfo> = sources
            .iter()
            .filter_map(|source| {
                let configuration = repository.find_by_name(&source.name)?;
                Some(ConfigurationInfo {
                    name: source.name.clone(),
                    file: crate::core::paths::clean_path(&source.path),
                    include: configuration
                        .options()
                        .get(OPTION_INCLUDE)
                        .cloned()
                        .unwrap_or_default(),
                    imports: configuration.imports().to_vec(),
                    commands: configuration.commands().len(),
                    template: configuration.is_template(),
                    deprecated: configuration.is_deprecated(),
                })
            })
            .collect();
        repository.clear();

        configurations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(configurations)
    }

    pub fn get_configuration_details(
        source_path: &Path,
        name: &str,
    ) -> Result<ConfigurationDetails, MnkyError> {
        let sources = Self::load_sources(source_path)?;
        let source = sources
            .iter()
            .find(|source| source.name == name)
            .ok_or_else(|| MnkyError::ConfigurationNotFound(name.to_string()))?;
        let repository = Self::repository(&sources, load_global_variables(source_path)?);
        let configuration = repository
            .find_by_name(name)
            .ok_or_else(|| MnkyError::ConfigurationNotFound(name.to_string()))?;

        let details = ConfigurationDetails {
            name: name.to_string(),
            file: crate::core::paths::clean_path(&source.path),
            options: configuration.options().clone(),
            imports: configuration.imports().to_vec(),
            namespaces: configuration.namespaces(),
            variables: configuration.variables(),
            commands: configuration.commands().len(),
            diagnostics: configuration.diagnostics(),
        };
        repository.clear();
        Ok(details)
    }

    fn repository(sources: &[SourceFile], global_variables: Vec<Variable>) -> Repository {
        let repository = Repository::new();
        for source in sources {
            let configuration = Configuration::new(&source.content)
                .with_repository(repository.clone())
                .with_global_variables(global_variables.clone());
            repository.add_configuration(&source.name, configuration);
        }
        repository
    }

    fn load_sources(source_path: &Path) -> Result<Vec<SourceFile>, MnkyError> {
        if !source_path.exists() {
            return Err(MnkyError::DirectoryNotFound(
                source_path.display().to_string(),
            ));
        }

        if source_path.is_file() {
            let name = source_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default();
            return Ok(vec![SourceFile {
                name,
                path: source_path.to_path_buf(),
                content: fs::read_to_string(source_path)?,
            }]);
        }

        let mut sources = Vec::new();
        Self::collect_sources(source_path, source_path, &mut sources)?;
        sources.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sources)
    }

    fn collect_sources(
        root: &Path,
        dir: &Path,
        sources: &mut Vec<SourceFile>,
    ) -> Result<(), MnkyError> {
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                Self::collect_sources(root, &path, sources)?;
            } else if path.extension().and_then(|s| s.to_str()) == Some(EXTENSION) {
                let name = crate::core::paths::configuration_name(root, &path);
                match fs::read_to_string(&path) {
                    Ok(content) => sources.push(SourceFile {
                        name,
                        path: path.clone(),
                        content,
                    }),
                    Err(e) => tracing::warn!(
                        "Failed to read {}: {e}",
                        crate::core::paths::clean_path(&path)
                    ),
                }
            }
        }
        Ok(())
    }

    fn parse_cli_variables(&self) -> Result<IndexMap<String, String>, MnkyError> {
        self.config
            .variables
            .iter()
            .map(|kv| match kv.split_once('=') {
                Some((name, value)) if !name.trim().is_empty() => {
                    Ok((name.trim().to_string(), value.to_string()))
                }
                _ => Err(MnkyError::Validation(format!(
                    "Variable must be in format NAME=VALUE: {kv}"
                ))),
            })
            .collect()
    }
}
