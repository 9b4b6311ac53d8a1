//! Shared helpers used by every crate in the workspace.

pub mod utils {
    pub mod logging;
}
