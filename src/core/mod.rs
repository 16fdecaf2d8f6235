pub mod credential_format;
pub mod detector;
pub mod evidence;
pub mod pipeline;
pub mod report;
pub mod structure;
