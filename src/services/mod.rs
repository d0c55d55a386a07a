pub mod code_defender;
pub mod cyberfraud;
pub mod endpoint;
pub mod http_client;
pub mod logger;
pub mod query;
pub mod time_window;
pub mod tool_executor;
