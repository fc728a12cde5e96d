pub mod common;

mod event_logger_dispatch;
