use crate::undo::UndoElement;
use indexmap::IndexMap;
use serde::Serialize;

/// Summary of one repeating tick of one configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyStats {
    /// Number of nodes visited per node group.
    pub sum: IndexMap<String, usize>,
    pub runtime_ms: f64,
    pub interval_ms: u64,
    pub undo_length: usize,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event<'a> {
    /// Only the elements added by the latest mutation.
    AddUndo { elements: &'a [UndoElement] },
    Applied { stats: &'a ApplyStats },
    Failed {
        configuration: &'a str,
        message: String,
    },
}

pub trait Observer {
    fn update(&mut self, event: &Event<'_>);
}

impl<F> Observer for F
where
    F: FnMut(&Event<'_>),
{
    fn update(&mut self, event: &Event<'_>) {
        self(event)
    }
}
