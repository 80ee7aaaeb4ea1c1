pub const DATA_CONNECT_COMPONENT_NAME: &str = "data-connect";

/// `[http://|https://]host[:port]` of a local emulator, read when a service is created.
pub const EMULATOR_HOST_ENV_VAR: &str = "FIREBASE_DATA_CONNECT_EMULATOR_HOST";
