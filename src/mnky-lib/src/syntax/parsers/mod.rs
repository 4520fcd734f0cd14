pub mod command;
pub mod import;
pub mod option;
pub mod parse_trait;
pub mod section;
pub mod variable;

pub use command::CommandParser;
pub use import::ImportParser;
pub use option::OptionParser;
pub use parse_trait::Parse;
pub use section::SectionParser;
pub use variable::VariableParser;
