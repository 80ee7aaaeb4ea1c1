/// Identifier used for the instance a provider hands out when none is requested.
pub const DEFAULT_ENTRY_NAME: &str = "[DEFAULT]";
