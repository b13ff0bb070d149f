pub mod dispatch;
mod output;
pub mod status;
