pub const PREFIX_OPTION: char = '@';
pub const PREFIX_VARIABLE: char = '$';
pub const PREFIX_IMPORT: char = '+';
pub const PREFIX_COMMAND: char = '!';

pub const OPTION_INCLUDE: &str = "include";
pub const OPTION_EXCLUDE: &str = "exclude";
pub const OPTION_NAMESPACE: &str = "namespace";
pub const OPTION_BLOCKLIST: &str = "blocklist";
pub const OPTION_ALLOWLIST: &str = "allowlist";
pub const OPTION_TEXT_ATTRIBUTES: &str = "textAttributes";
pub const OPTION_TEMPLATE: &str = "template";
pub const OPTION_DEPRECATED: &str = "deprecated";

/// Separates a variable's value from its description. Not matched after `:`
/// so urls survive.
pub const VARIABLE_COMMENT: &str = "//";

/// Tags whose text is never touched unless allow-listed.
pub const DEFAULT_BLOCKED_TAGS: &[&str] = &["SCRIPT", "STYLE"];
