pub mod corner_cases;
pub mod observer;
pub mod options;

pub use corner_cases::{CornerCases, NoCornerCases, ShortenedLabels};
pub use observer::{ApplyStats, Event, Observer};
pub use options::{MonkeyOptions, DEFAULT_UNDO_LIMIT, MIN_INTERVAL};

use crate::commands::Target;
use crate::configuration::Configuration;
use crate::document::{Document, Selector};
use crate::error::MutationError;
use crate::managers::{InlineRuleManager, InlineRules, UrlManager, UrlRules};
use crate::repository::Repository;
use crate::scheduler::{Scheduler, TaskId};
use crate::undo::{UndoContext, UndoElement};
use crate::variable::Variable;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use std::time::{Duration, Instant};

lazy_static! {
    static ref INPUTS: Selector = Selector::parse("body input").unwrap();
    static ref IMAGES: Selector = Selector::parse("body img").unwrap();
    static ref IMAGE_WIDGETS: Selector =
        Selector::parse("body div[ad-test-id*=dash-image-widget-renderer]").unwrap();
    static ref DASHBOARD_CANVAS: Selector =
        Selector::parse("body div[class*=ads-dashboard-canvas-pane]").unwrap();
}

/// A configuration as handed to a [`Monkey`], before parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConfiguration {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub values: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    Idle,
    Scheduled,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    ApplyOnce(usize),
    Apply(usize),
}

struct Managed {
    name: String,
    configuration: Rc<Configuration>,
    state: RunState,
}

/// Runs a set of configurations against one document.
///
/// `start` schedules every enabled configuration that matches the document
/// location: network rules once, node groups on every tick. Time only moves
/// through [`Monkey::advance`]. `stop` cancels everything and reverts the
/// recorded changes last to first.
pub struct Monkey<D, U = UrlRules, I = InlineRules>
where
    D: Document,
    U: UrlManager,
    I: InlineRuleManager,
{
    document: D,
    urls: U,
    inline_rules: I,
    repository: Repository,
    configurations: Vec<Managed>,
    corner_cases: Box<dyn CornerCases>,
    observers: Vec<Box<dyn Observer>>,
    undo: Vec<UndoElement>,
    with_undo: bool,
    undo_limit: usize,
    interval: Duration,
    scheduler: Scheduler<Job>,
    tasks: Vec<TaskId>,
}

impl<D: Document> Monkey<D> {
    pub fn new(
        document: D,
        raw_configurations: Vec<RawConfiguration>,
        global_variables: Vec<Variable>,
        options: MonkeyOptions,
    ) -> Self {
        Self::with_managers(
            document,
            raw_configurations,
            global_variables,
            options,
            UrlRules::default(),
            InlineRules::default(),
        )
    }
}

impl<D, U, I> Monkey<D, U, I>
where
    D: Document,
    U: UrlManager,
    I: InlineRuleManager,
{
    pub fn with_managers(
        document: D,
        raw_configurations: Vec<RawConfiguration>,
        global_variables: Vec<Variable>,
        options: MonkeyOptions,
        urls: U,
        inline_rules: I,
    ) -> Self {
        let interval = if options.interval < MIN_INTERVAL {
            tracing::warn!(
                "Interval of {:?} is below the minimum, using {:?}",
                options.interval,
                MIN_INTERVAL
            );
            MIN_INTERVAL
        } else {
            options.interval
        };

        let repository = Repository::new();
        let configurations = raw_configurations
            .into_iter()
            .map(|raw| {
                let configuration = Configuration::new(&raw.content)
                    .with_repository(repository.clone())
                    .with_enabled(raw.enabled)
                    .with_values(raw.values)
                    .with_global_variables(global_variables.clone());
                Managed {
                    configuration: repository.add_configuration(&raw.name, configuration),
                    name: raw.name,
                    state: RunState::Idle,
                }
            })
            .collect();

        Self {
            document,
            urls,
            inline_rules,
            repository,
            configurations,
            corner_cases: Box::new(ShortenedLabels),
            observers: Vec::new(),
            undo: Vec::new(),
            with_undo: options.with_undo,
            undo_limit: options.undo_limit,
            interval,
            scheduler: Scheduler::new(),
            tasks: Vec::new(),
        }
    }

    pub fn with_corner_cases(mut self, corner_cases: impl CornerCases + 'static) -> Self {
        self.corner_cases = Box::new(corner_cases);
        self
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn urls(&self) -> &U {
        &self.urls
    }

    pub fn inline_rules(&self) -> &I {
        &self.inline_rules
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether undo elements are still being recorded.
    pub fn is_tracking_undo(&self) -> bool {
        self.with_undo
    }

    pub fn add_observer(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn notify_observers(&mut self, event: &Event<'_>) {
        for observer in &mut self.observers {
            observer.update(event);
        }
    }

    pub fn undo_length(&self) -> usize {
        self.undo.len()
    }

    pub fn count_running_configurations(&self) -> usize {
        self.configurations
            .iter()
            .filter(|managed| matches!(managed.state, RunState::Scheduled | RunState::Running))
            .count()
    }

    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn state(&self, name: &str) -> Option<RunState> {
        self.configurations
            .iter()
            .find(|managed| managed.name == name)
            .map(|managed| managed.state)
    }

    /// Schedules every enabled configuration that matches the document
    /// location. Returns how many were started. Calling it again while
    /// running starts nothing new.
    pub fn start(&mut self) -> usize {
        if self.is_running() {
            return self.count_running_configurations();
        }
        let location = self.document.location().to_string();
        let mut started = 0;
        for (index, managed) in self.configurations.iter_mut().enumerate() {
            let configuration = &managed.configuration;
            if !configuration.is_enabled() || !configuration.is_enabled_for_url(&location) {
                continue;
            }
            tracing::debug!("Starting configuration '{}'", managed.name);
            self.tasks
                .push(self.scheduler.schedule_once(self.interval, Job::ApplyOnce(index)));
            self.tasks
                .push(self.scheduler.schedule_repeating(self.interval, Job::Apply(index)));
            managed.state = RunState::Scheduled;
            started += 1;
        }
        started
    }

    /// Cancels all ticks, reverts every recorded change when undo tracking
    /// is on and clears both rule managers.
    pub fn stop(&mut self) {
        for id in self.tasks.drain(..) {
            self.scheduler.cancel(id);
        }
        for managed in &mut self.configurations {
            if matches!(managed.state, RunState::Scheduled | RunState::Running) {
                managed.state = RunState::Stopped;
            }
        }

        let undo = std::mem::take(&mut self.undo);
        if self.with_undo {
            let mut context = UndoContext {
                document: &mut self.document,
                urls: &mut self.urls,
                inline_rules: &mut self.inline_rules,
            };
            for element in undo.iter().rev() {
                if let Err(e) = element.revert(&mut context) {
                    tracing::warn!("Could not revert {element:?}: {e}");
                }
            }
        }

        self.urls.clear();
        self.inline_rules.clear();
    }

    /// Moves the clock forward by `elapsed` and runs every tick that falls
    /// due, oldest first. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let until = self.scheduler.now() + elapsed;
        let mut ran = 0;
        while let Some((_, job)) = self.scheduler.pop_due(until) {
            self.run(job);
            ran += 1;
        }
        self.scheduler.advance_to(until);
        ran
    }

    /// Applies the network hooks of `configuration` once.
    pub fn apply_once(&mut self, configuration: &Configuration) -> Result<(), MutationError> {
        let location = self.document.location().to_string();
        let undo = configuration.apply(&mut Target::urls(&location, &mut self.urls), "url")?;
        self.add_undo(undo);
        let undo = configuration.apply(
            &mut Target::inline_rules(&location, &mut self.inline_rules),
            "ajax",
        )?;
        self.add_undo(undo);
        Ok(())
    }

    /// One tick of `configuration` over every node group, in a fixed order:
    /// later groups see the text already rewritten by earlier ones.
    pub fn apply(&mut self, configuration: &Configuration) -> Result<ApplyStats, MutationError> {
        let started = Instant::now();

        let undo = self
            .corner_cases
            .normalize(&mut self.document, configuration)?;
        self.add_undo(undo);

        let mut sum = IndexMap::new();
        let mut text = self.apply_on_group(configuration, &Selector::Text, "text", "data")?;
        for attribute in configuration.text_attributes() {
            match Selector::parse(&format!("[{attribute}]")) {
                Ok(selector) => {
                    text += self.apply_on_group(configuration, &selector, "text", &attribute)?
                }
                Err(e) => tracing::warn!("Skipping text attribute '{attribute}': {e}"),
            }
        }
        sum.insert("text".to_string(), text);
        sum.insert(
            "input".to_string(),
            self.apply_on_group(configuration, &INPUTS, "input", "value")?,
        );
        let images = self.apply_on_group(configuration, &IMAGES, "image", "src")?
            + self.apply_on_group(
                configuration,
                &IMAGE_WIDGETS,
                "image",
                "style.backgroundImage",
            )?;
        sum.insert("image".to_string(), images);
        sum.insert(
            "dashboard".to_string(),
            self.apply_on_group(configuration, &DASHBOARD_CANVAS, "ad-dashboard", "style")?,
        );

        let root = self.document.root();
        let undo = configuration.apply(&mut Target::node(&mut self.document, root, "title"), "text")?;
        self.add_undo(undo);
        let undo = configuration.apply(
            &mut Target::node(&mut self.document, root, "documentElement"),
            "document",
        )?;
        self.add_undo(undo);

        let stats = ApplyStats {
            sum,
            runtime_ms: started.elapsed().as_secs_f64() * 1000.0,
            interval_ms: u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX),
            undo_length: self.undo.len(),
        };
        self.notify_observers(&Event::Applied { stats: &stats });
        Ok(stats)
    }

    /// Appends to the undo stack and tells observers about the new elements.
    /// Past the undo limit tracking is switched off for the rest of the run.
    pub fn add_undo(&mut self, elements: Vec<UndoElement>) {
        if elements.is_empty() {
            return;
        }
        if self.with_undo {
            if self.undo.len() > self.undo_limit {
                tracing::warn!(
                    "More than {} undo elements, disabling undo. The configuration might contain a replacement loop.",
                    self.undo_limit
                );
                self.with_undo = false;
            } else {
                self.undo.extend(elements.iter().cloned());
            }
        }
        self.notify_observers(&Event::AddUndo {
            elements: &elements,
        });
    }

    pub fn into_document(mut self) -> D
    where
        D: Default,
    {
        std::mem::take(&mut self.document)
    }

    fn apply_on_group(
        &mut self,
        configuration: &Configuration,
        selector: &Selector,
        group: &str,
        property: &str,
    ) -> Result<usize, MutationError> {
        let nodes = self.document.query(selector);
        for node in &nodes {
            let undo = configuration.apply(
                &mut Target::node(&mut self.document, *node, property),
                group,
            )?;
            self.add_undo(undo);
        }
        Ok(nodes.len())
    }

    fn run(&mut self, job: Job) {
        let (Job::ApplyOnce(index) | Job::Apply(index)) = job;
        let Some(managed) = self.configurations.get_mut(index) else {
            return;
        };
        managed.state = RunState::Running;
        let name = managed.name.clone();
        let configuration = Rc::clone(&managed.configuration);

        let result = match job {
            Job::ApplyOnce(_) => self.apply_once(&configuration),
            Job::Apply(_) => self.apply(&configuration).map(|_| ()),
        };
        if let Err(e) = result {
            tracing::error!("Configuration '{name}' failed: {e}");
            self.notify_observers(&Event::Failed {
                configuration: &name,
                message: e.to_string(),
            });
        }
    }
}

impl<D, U, I> Drop for Monkey<D, U, I>
where
    D: Document,
    U: UrlManager,
    I: InlineRuleManager,
{
    fn drop(&mut self) {
        // Configurations hold the repository that holds them.
        self.repository.clear();
    }
}
