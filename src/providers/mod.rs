pub mod er_api;
pub mod fallback;
pub mod util;

pub use er_api::ErApiProvider;
pub use fallback::{FallbackProvider, fallback_snapshot};
