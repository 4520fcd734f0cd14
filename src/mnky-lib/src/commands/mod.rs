pub mod add_script;
pub mod builder;
pub mod error_command;
pub mod group;
pub mod hide;
pub mod html;
pub mod if_command;
pub mod images;
pub mod intercept;
pub mod params;
pub mod protect;
pub mod query_selector;
pub mod registry;
pub mod replace_neighbor;
pub mod search_and_replace;
pub mod stage;
pub mod style;
pub mod traits;

pub use add_script::AddScript;
pub use builder::CommandBuilder;
pub use error_command::ErrorCommand;
pub use group::Group;
pub use hide::Hide;
pub use html::{InsertHtml, InsertPosition, OverwriteHtml};
pub use if_command::If;
pub use images::{RecolorImage, ReplaceImage};
pub use intercept::{InterceptResponse, InterceptWebRequest};
pub use protect::Protect;
pub use query_selector::QuerySelector;
pub use registry::{CommandInfo, Invocation, RegistryEntry};
pub use replace_neighbor::ReplaceNeighbor;
pub use search_and_replace::SearchAndReplace;
pub use stage::Stage;
pub use style::Style;
pub use traits::{ApplyResult, Command, NodeTarget, Subject, Target};
