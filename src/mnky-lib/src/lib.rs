//! Interpreter for Monkey configurations: a small line based language that
//! describes text and structure rewrites of a document, and the scheduler
//! that applies them periodically and reverts them on stop.

pub mod commands;
pub mod configuration;
pub mod document;
pub mod error;
pub mod managers;
pub mod monkey;
pub mod pattern;
pub mod repository;
pub mod scheduler;
pub mod syntax;
pub mod undo;
pub mod variable;

pub use commands::{Command, CommandBuilder, CommandInfo};
pub use configuration::{Configuration, Diagnostic};
pub use document::{Document, DocumentSnapshot, NodeId, NodeKind, NodeSnapshot, Selector, Tree};
pub use error::{CommandError, MutationError};
pub use managers::{InlineRuleManager, InlineRules, UrlManager, UrlRules};
pub use monkey::{ApplyStats, Event, Monkey, MonkeyOptions, Observer, RawConfiguration, RunState};
pub use repository::Repository;
pub use undo::UndoElement;
pub use variable::Variable;
