mod app;
mod message;
mod widgets;

pub use app::{DetectlensApp, run};
pub use message::Message;
