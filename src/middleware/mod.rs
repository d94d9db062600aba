pub mod caller;

pub use caller::{CallerModule, MODULE_HEADER};
