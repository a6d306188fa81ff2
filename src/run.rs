mod cli;
mod render;

pub(crate) use cli::as_cli;
