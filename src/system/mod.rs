pub(super) mod bluetooth;
pub(super) mod config;
pub(super) mod host;
pub(super) mod time;
