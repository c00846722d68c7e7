mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

pub use exports::{render, View};
pub use progress::PhaseProgress;
pub use styling::{dim, magenta_bold};

/// Prints the `leadtime` banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("⏱  leadtime"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Pull request lead time statistics")
    );
}
