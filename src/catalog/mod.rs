pub mod provider;
pub mod relay;
pub mod theme;

pub use provider::*;
pub use relay::*;
pub use theme::*;
