pub mod config;
pub mod http_client;
pub mod layout;
pub mod shell;

pub use config::ShellConfig;
pub use http_client::{DeviceClient, ReqwestDeviceClient};
pub use layout::Layout;
pub use shell::Shell;
